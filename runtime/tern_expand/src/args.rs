//! Argument materialization.
//!
//! Every structured kind describes its arguments through an [`ArgSource`].
//! [`materialize`] applies the query mode uniformly: the arity cap is checked
//! before anything is resolved or allocated, and chosen queries resolve one
//! type only.

use std::borrow::Cow;

use smallvec::SmallVec;
use tern_heap::TermStore;
use tern_rtti::{ClosureLayout, NotagLayout, TypeInfo, Word};

use crate::decode::dangling;
use crate::error::{ExpandError, Fault};
use crate::query::QueryMode;
use crate::result::{ArgData, ChosenArg, ExpandedArgs};

/// The argument types of one term.
pub(crate) trait ArgSource<'a> {
    /// Number of visible arguments.
    fn arity(&self) -> usize;

    /// Position of the argument declared with `name`.
    fn find_name(&self, _name: &str) -> Option<usize> {
        None
    }

    /// Type of visible argument `index`, which is below the arity.
    fn arg_type(&self, index: usize) -> Result<TypeInfo, ExpandError>;

    /// Types of all visible arguments.
    fn all_types(&self) -> Result<Cow<'a, [TypeInfo]>, ExpandError> {
        (0..self.arity())
            .map(|index| self.arg_type(index))
            .collect::<Result<Vec<_>, _>>()
            .map(Cow::Owned)
    }
}

/// Produce the argument data `mode` asks for.
///
/// `words` holds `num_extra` witness words followed by the visible arguments.
pub(crate) fn materialize<'a>(
    mode: QueryMode<'_>,
    words: &'a [Word],
    num_extra: usize,
    source: &impl ArgSource<'a>,
) -> Result<ArgData<'a>, ExpandError> {
    let arity = source.arity();
    let chosen = match mode {
        QueryMode::NoArgs => return Ok(ArgData::None),
        QueryMode::AllArgs(Some(cap)) if arity > cap => {
            tracing::debug!(arity, cap, "arity limit exceeded");
            return Ok(ArgData::LimitExceeded);
        }
        QueryMode::AllArgs(_) => {
            let types = source.all_types()?;
            return Ok(ArgData::All(ExpandedArgs::new(words, num_extra, types)));
        }
        QueryMode::ArgByIndex(index) => (index < arity).then_some(index),
        QueryMode::ArgByName(name) => source.find_name(name),
    };

    let Some(index) = chosen else {
        return Ok(ArgData::ChosenNotFound);
    };
    Ok(ArgData::Chosen(ChosenArg {
        value: &words[num_extra + index],
        type_info: source.arg_type(index)?,
    }))
}

/// Argument data of a term with no arguments.
pub(crate) fn leaf_args<'a>(mode: QueryMode<'_>) -> ArgData<'a> {
    match mode {
        QueryMode::NoArgs | QueryMode::AllArgs(_) => ArgData::None,
        QueryMode::ArgByIndex(_) | QueryMode::ArgByName(_) => ArgData::ChosenNotFound,
    }
}

// ── Sources ─────────────────────────────────────────────────────────

/// Tuple elements: the types are the tuple descriptor's own arguments.
pub(crate) struct TupleArgs<'r, 'a> {
    pub ty: &'r Cow<'a, TypeInfo>,
}

impl<'a> ArgSource<'a> for TupleArgs<'_, 'a> {
    fn arity(&self) -> usize {
        self.ty.arity()
    }

    fn arg_type(&self, index: usize) -> Result<TypeInfo, ExpandError> {
        Ok(self.ty.args()[index].clone())
    }

    fn all_types(&self) -> Result<Cow<'a, [TypeInfo]>, ExpandError> {
        Ok(match self.ty {
            Cow::Borrowed(ty) => {
                let ty: &'a TypeInfo = *ty;
                Cow::Borrowed(ty.args())
            }
            Cow::Owned(ty) => Cow::Owned(ty.args().to_vec()),
        })
    }
}

/// Arguments that all share one type: array elements, and the arguments of
/// a type descriptor value.
pub(crate) struct UniformArgs {
    pub arity: usize,
    pub ty: TypeInfo,
}

impl<'a> ArgSource<'a> for UniformArgs {
    fn arity(&self) -> usize {
        self.arity
    }

    fn arg_type(&self, _index: usize) -> Result<TypeInfo, ExpandError> {
        Ok(self.ty.clone())
    }

    fn all_types(&self) -> Result<Cow<'a, [TypeInfo]>, ExpandError> {
        Ok(Cow::Owned(vec![self.ty.clone(); self.arity]))
    }
}

/// The single argument of a no-tag wrapper.
pub(crate) struct NotagArgs<'r> {
    pub layout: &'r NotagLayout,
    pub params: &'r [TypeInfo],
}

impl<'a> ArgSource<'a> for NotagArgs<'_> {
    fn arity(&self) -> usize {
        1
    }

    fn find_name(&self, name: &str) -> Option<usize> {
        (self.layout.arg_name() == Some(name)).then_some(0)
    }

    fn arg_type(&self, _index: usize) -> Result<TypeInfo, ExpandError> {
        Ok(self.layout.arg_type().instantiate(self.params)?)
    }
}

/// Captured arguments of a closure.
pub(crate) struct ClosureArgs<'r, S: ?Sized> {
    pub store: &'r S,
    pub layout: &'r ClosureLayout,
    pub hidden: &'r [Word],
}

impl<S: TermStore + ?Sized> ClosureArgs<'_, S> {
    /// Type descriptors of the closure's type parameters, read from the
    /// hidden words the layout names.
    fn type_params(&self) -> Result<SmallVec<[TypeInfo; 4]>, ExpandError> {
        self.layout
            .type_params()
            .iter()
            .map(|&slot| {
                let word = *self.hidden.get(usize::from(slot)).ok_or_else(|| {
                    Fault::WitnessOutOfRange {
                        functor: self.layout.proc_id().display_name().to_string(),
                        slot,
                    }
                    .raise()
                })?;
                let cell = self.store.type_info(word).ok_or_else(|| dangling(word))?;
                Ok(cell.type_info.clone())
            })
            .collect()
    }

    fn instantiate(&self, index: usize, params: &[TypeInfo]) -> Result<TypeInfo, ExpandError> {
        let template = self.layout.arg_types().get(index).ok_or_else(|| {
            Fault::ClosureMismatch {
                captured: self.hidden.len(),
                described: self.layout.num_args(),
            }
            .raise()
        })?;
        Ok(template.instantiate(params)?)
    }
}

impl<'a, S: TermStore + ?Sized> ArgSource<'a> for ClosureArgs<'_, S> {
    fn arity(&self) -> usize {
        self.hidden.len()
    }

    fn arg_type(&self, index: usize) -> Result<TypeInfo, ExpandError> {
        let params = self.type_params()?;
        self.instantiate(index, &params)
    }

    fn all_types(&self) -> Result<Cow<'a, [TypeInfo]>, ExpandError> {
        let params = self.type_params()?;
        (0..self.hidden.len())
            .map(|index| self.instantiate(index, &params))
            .collect::<Result<Vec<_>, _>>()
            .map(Cow::Owned)
    }
}
