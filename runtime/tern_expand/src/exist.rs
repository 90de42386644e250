//! Argument types of discriminated-union alternatives.
//!
//! Universal variables resolve against the enclosing type's arguments.
//! Existential variables resolve against the witness words stored in front
//! of the visible arguments, as located by the alternative's
//! [`ExistInfo`](tern_rtti::ExistInfo). Ground argument types touch neither.

use tern_heap::TermStore;
use tern_rtti::word::body;
use tern_rtti::{ArgType, DuFunctorDesc, ExistLocn, RttiError, TypeInfo, TypeVar, Word};

use crate::args::ArgSource;
use crate::decode::dangling;
use crate::error::{ExpandError, Fault};

/// Arguments of one decoded alternative.
pub(crate) struct DuArgs<'r, S: ?Sized> {
    pub store: &'r S,
    pub functor: &'r DuFunctorDesc,
    /// Arguments of the enclosing type.
    pub params: &'r [TypeInfo],
    /// Witness words of the value.
    pub witnesses: &'r [Word],
}

impl<S: TermStore + ?Sized> DuArgs<'_, S> {
    fn resolve(&self, var: TypeVar) -> Result<TypeInfo, ExpandError> {
        match var {
            TypeVar::Universal(index) => self
                .params
                .get(usize::from(index))
                .cloned()
                .ok_or_else(|| {
                    RttiError::MissingTypeParam {
                        index,
                        available: self.params.len(),
                    }
                    .into()
                }),
            TypeVar::Existential(index) => {
                let locn = self
                    .functor
                    .exist_info()
                    .and_then(|info| info.locn(index))
                    .ok_or_else(|| ExpandError::from(RttiError::UnboundExistential { index }))?;
                self.witness_type(locn)
            }
        }
    }

    fn witness_type(&self, locn: ExistLocn) -> Result<TypeInfo, ExpandError> {
        let witness = *self
            .witnesses
            .get(usize::from(locn.slot()))
            .ok_or_else(|| {
                Fault::WitnessOutOfRange {
                    functor: self.functor.name().to_string(),
                    slot: locn.slot(),
                }
                .raise()
            })?;
        let type_word = match locn {
            ExistLocn::Plain { .. } => witness,
            // A type-class witness is `[instance, type descriptors...]`.
            ExistLocn::InTypeclassInfo { index, .. } => *self
                .store
                .word(body(witness) + 1 + usize::from(index))
                .ok_or_else(|| dangling(witness))?,
        };
        let cell = self
            .store
            .type_info(type_word)
            .ok_or_else(|| dangling(type_word))?;
        Ok(cell.type_info.clone())
    }
}

impl<'a, S: TermStore + ?Sized> ArgSource<'a> for DuArgs<'_, S> {
    fn arity(&self) -> usize {
        self.functor.arity()
    }

    fn find_name(&self, name: &str) -> Option<usize> {
        self.functor.find_arg(name)
    }

    fn arg_type(&self, index: usize) -> Result<TypeInfo, ExpandError> {
        match &self.functor.arg_types()[index] {
            ArgType::Ground(ty) => Ok(ty.clone()),
            ArgType::Poly(template) => template.substitute(&mut |var| self.resolve(var)),
        }
    }
}
