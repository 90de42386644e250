//! The deconstruction engine.
//!
//! [`Expander::expand`] classifies the type, decodes the value's tag and
//! materializes whatever argument data the query mode asks for. Equivalences
//! and univ boxes are resolved by recursing on the substituted type/value
//! pair, with a depth guard from [`ExpandConfig`].

use std::borrow::Cow;

use tern_heap::TermStore;
use tern_rtti::word::{body, word_to_char, word_to_float, word_to_int};
use tern_rtti::{
    ClosureLayoutId, TypeCtorDesc, TypeCtorDescWord, TypeCtorId, TypeCtorRep, TypeInfo,
    TypeTable, Word,
};

use crate::args::{leaf_args, materialize, ClosureArgs, NotagArgs, TupleArgs, UniformArgs};
use crate::config::{ExpandConfig, NoncanonHandling};
use crate::decode::{dangling, decode_du, decode_reserved, Decoded};
use crate::error::{ExpandError, Fault};
use crate::exist::DuArgs;
use crate::query::QueryMode;
use crate::render;
use crate::result::Expansion;

/// Per-call parameters that stay fixed through alias resolution.
#[derive(Copy, Clone)]
struct Request<'q> {
    noncanon: NoncanonHandling,
    want_functor: bool,
    mode: QueryMode<'q>,
}

/// Deconstructs runtime values of types described by one table.
///
/// The expander holds no mutable state; share it freely between threads
/// when the store allows.
pub struct Expander<'a, S: TermStore + ?Sized> {
    table: &'a TypeTable,
    store: &'a S,
    config: ExpandConfig,
}

impl<'a, S: TermStore + ?Sized> Expander<'a, S> {
    pub fn new(table: &'a TypeTable, store: &'a S) -> Self {
        Self::with_config(table, store, ExpandConfig::default())
    }

    pub fn with_config(table: &'a TypeTable, store: &'a S, config: ExpandConfig) -> Self {
        Expander {
            table,
            store,
            config,
        }
    }

    pub fn table(&self) -> &'a TypeTable {
        self.table
    }

    pub fn config(&self) -> &ExpandConfig {
        &self.config
    }

    /// Deconstruct `value`, a value of type `ty`.
    ///
    /// The functor is computed only when `want_functor` is set; arity is
    /// always reported. On error no partial result exists.
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(ctor = ty.ctor().raw(), policy = %noncanon, ?mode)
    )]
    pub fn expand<'v>(
        &self,
        ty: &'v TypeInfo,
        value: &'v Word,
        noncanon: NoncanonHandling,
        want_functor: bool,
        mode: QueryMode<'_>,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        let req = Request {
            noncanon,
            want_functor,
            mode,
        };
        self.expand_at(Cow::Borrowed(ty), value, req, 0)
    }

    // ── Specialized entry points ────────────────────────────────────

    /// Functor and arity only.
    pub fn functor<'v>(
        &self,
        ty: &'v TypeInfo,
        value: &'v Word,
        noncanon: NoncanonHandling,
    ) -> Result<(Cow<'v, str>, usize), ExpandError>
    where
        'a: 'v,
    {
        let expansion = self.expand(ty, value, noncanon, true, QueryMode::NoArgs)?;
        Ok((expansion.functor.unwrap_or_default(), expansion.arity))
    }

    /// Functor, arity and every argument.
    pub fn args<'v>(
        &self,
        ty: &'v TypeInfo,
        value: &'v Word,
        noncanon: NoncanonHandling,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        self.expand(ty, value, noncanon, true, QueryMode::AllArgs(None))
    }

    /// Functor, arity and every argument, unless there are more than
    /// `max_arity` of them.
    pub fn limited_args<'v>(
        &self,
        ty: &'v TypeInfo,
        value: &'v Word,
        noncanon: NoncanonHandling,
        max_arity: usize,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        self.expand(ty, value, noncanon, true, QueryMode::AllArgs(Some(max_arity)))
    }

    /// Arity and the argument at `index`.
    pub fn arg<'v>(
        &self,
        ty: &'v TypeInfo,
        value: &'v Word,
        noncanon: NoncanonHandling,
        index: usize,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        self.expand(ty, value, noncanon, false, QueryMode::ArgByIndex(index))
    }

    /// Arity and the argument declared as `name`.
    pub fn named_arg<'v>(
        &self,
        ty: &'v TypeInfo,
        value: &'v Word,
        noncanon: NoncanonHandling,
        name: &str,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        self.expand(ty, value, noncanon, false, QueryMode::ArgByName(name))
    }

    // ── Dispatch ────────────────────────────────────────────────────

    fn expand_at<'v>(
        &self,
        ty: Cow<'v, TypeInfo>,
        value: &'v Word,
        req: Request<'_>,
        depth: usize,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        let rep = self.table.classify(&ty);
        tracing::trace!(%rep, depth, "classified");

        // Unknown handles have no descriptor; everything else does.
        let Some(desc) = self.table.get(ty.ctor()).filter(|_| rep != TypeCtorRep::Unknown) else {
            return Err(Fault::UnknownRep {
                type_name: self.table.format_type(&ty),
            }
            .raise());
        };

        if rep.has_user_equality() {
            match req.noncanon {
                NoncanonHandling::Abort => {
                    return Err(ExpandError::noncanonical(desc.qualified_name()));
                }
                NoncanonHandling::Allow => {
                    return Ok(leaf(req, || Cow::Owned(desc.noncanonical_name())));
                }
                NoncanonHandling::Cc => {}
            }
        }

        match rep.canonical() {
            TypeCtorRep::Enum => {
                let layout = desc.enum_layout().ok_or_else(|| mismatch(desc))?;
                let name = layout.functor(*value).ok_or_else(|| {
                    Fault::EnumOutOfRange {
                        type_name: desc.qualified_name(),
                        word: *value,
                    }
                    .raise()
                })?;
                Ok(leaf(req, || Cow::Borrowed(name)))
            }

            TypeCtorRep::Du => {
                let layout = desc.du_layout().ok_or_else(|| mismatch(desc))?;
                let decoded = decode_du(self.store, desc, layout, *value)?;
                self.expand_decoded(desc, &ty, decoded, req)
            }

            TypeCtorRep::ReservedAddr => {
                let layout = desc.reserved_addr_layout().ok_or_else(|| mismatch(desc))?;
                let decoded = decode_reserved(self.store, desc, layout, *value)?;
                self.expand_decoded(desc, &ty, decoded, req)
            }

            TypeCtorRep::Notag | TypeCtorRep::NotagGround => {
                let layout = desc.notag_layout().ok_or_else(|| mismatch(desc))?;
                let source = NotagArgs {
                    layout,
                    params: ty.args(),
                };
                Ok(Expansion {
                    functor: req.want_functor.then(|| Cow::Borrowed(layout.functor_name())),
                    arity: 1,
                    args: materialize(req.mode, std::slice::from_ref(value), 0, &source)?,
                })
            }

            TypeCtorRep::Equiv | TypeCtorRep::EquivGround => {
                let target = desc.equiv_target().ok_or_else(|| mismatch(desc))?;
                let target = target.instantiate(ty.args())?;
                self.recurse(Cow::Owned(target), value, req, depth)
            }

            TypeCtorRep::Univ => {
                let cell = self
                    .store
                    .words(body(*value), 2)
                    .ok_or_else(|| dangling(*value))?;
                let type_cell = self.store.type_info(cell[0]).ok_or_else(|| dangling(cell[0]))?;
                self.recurse(Cow::Borrowed(type_cell.type_info), &cell[1], req, depth)
            }

            TypeCtorRep::Tuple => {
                let words = self
                    .store
                    .words(body(*value), ty.arity())
                    .ok_or_else(|| dangling(*value))?;
                Ok(Expansion {
                    functor: req.want_functor.then_some(Cow::Borrowed("{}")),
                    arity: ty.arity(),
                    args: materialize(req.mode, words, 0, &TupleArgs { ty: &ty })?,
                })
            }

            TypeCtorRep::Array => {
                let elem = ty.args().first().ok_or_else(|| mismatch(desc))?;
                let addr = body(*value);
                let size = *self.store.word(addr).ok_or_else(|| dangling(*value))?;
                let size = usize::try_from(size).map_err(|_| dangling(*value))?;
                let words = self
                    .store
                    .words(addr + 1, size)
                    .ok_or_else(|| dangling(*value))?;
                let source = UniformArgs {
                    arity: size,
                    ty: elem.clone(),
                };
                Ok(Expansion {
                    functor: req.want_functor.then_some(Cow::Borrowed("<<array>>")),
                    arity: size,
                    args: materialize(req.mode, words, 0, &source)?,
                })
            }

            TypeCtorRep::Pred | TypeCtorRep::Func => self.expand_closure(desc, rep, *value, req),

            TypeCtorRep::Int => Ok(leaf(req, || {
                Cow::Owned(render::render_int(word_to_int(*value)))
            })),
            TypeCtorRep::Float => Ok(leaf(req, || {
                Cow::Owned(render::render_float(word_to_float(*value)))
            })),
            TypeCtorRep::Char => {
                let c = word_to_char(*value)
                    .ok_or_else(|| Fault::InvalidChar { word: *value }.raise())?;
                Ok(leaf(req, || Cow::Owned(render::render_char(c))))
            }
            TypeCtorRep::String => {
                let s = self.store.string(*value).ok_or_else(|| dangling(*value))?;
                Ok(leaf(req, || Cow::Owned(render::render_string(s))))
            }

            TypeCtorRep::TypeInfo | TypeCtorRep::TypeDesc => {
                refuse_abort(desc, req)?;
                self.expand_type_info(&ty, *value, req)
            }

            TypeCtorRep::TypeCtorInfo => {
                refuse_abort(desc, req)?;
                let described = TypeCtorId::from_word(*value)
                    .and_then(|id| self.table.get(id))
                    .ok_or_else(|| dangling(*value))?;
                Ok(leaf(req, || Cow::Owned(described.qualified_name())))
            }

            TypeCtorRep::TypeCtorDesc => {
                refuse_abort(desc, req)?;
                let word = TypeCtorDescWord::decode(*value).ok_or_else(|| dangling(*value))?;
                let described = self.table.get(word.ctor()).ok_or_else(|| dangling(*value))?;
                Ok(leaf(req, || match word {
                    TypeCtorDescWord::Fixed(_) => Cow::Owned(described.qualified_name()),
                    TypeCtorDescWord::VariableArity { .. } => Cow::Borrowed(described.name()),
                }))
            }

            TypeCtorRep::TypeClassInfo => {
                refuse_abort(desc, req)?;
                Ok(leaf(req, || Cow::Borrowed("<<typeclassinfo>>")))
            }
            TypeCtorRep::BaseTypeClassInfo => {
                refuse_abort(desc, req)?;
                Ok(leaf(req, || Cow::Borrowed("<<basetypeclassinfo>>")))
            }
            TypeCtorRep::CPointer => {
                refuse_abort(desc, req)?;
                Ok(leaf(req, || Cow::Borrowed("<<c_pointer>>")))
            }

            TypeCtorRep::Succip => Ok(leaf(req, || Cow::Borrowed("<<succip>>"))),
            TypeCtorRep::Hp => Ok(leaf(req, || Cow::Borrowed("<<hp>>"))),
            TypeCtorRep::Curfr => Ok(leaf(req, || Cow::Borrowed("<<curfr>>"))),
            TypeCtorRep::Maxfr => Ok(leaf(req, || Cow::Borrowed("<<maxfr>>"))),
            TypeCtorRep::Redofr => Ok(leaf(req, || Cow::Borrowed("<<redofr>>"))),
            TypeCtorRep::Redoip => Ok(leaf(req, || Cow::Borrowed("<<redoip>>"))),
            TypeCtorRep::TrailPtr => Ok(leaf(req, || Cow::Borrowed("<<trail_ptr>>"))),
            TypeCtorRep::Ticket => Ok(leaf(req, || Cow::Borrowed("<<ticket>>"))),

            TypeCtorRep::Void => Err(Fault::VoidValue {
                type_name: desc.qualified_name(),
            }
            .raise()),

            // `canonical` never yields the user-equality reps.
            TypeCtorRep::EnumUserEq
            | TypeCtorRep::DuUserEq
            | TypeCtorRep::ReservedAddrUserEq
            | TypeCtorRep::NotagUserEq
            | TypeCtorRep::NotagGroundUserEq
            | TypeCtorRep::Unknown => Err(Fault::UnknownRep {
                type_name: desc.qualified_name(),
            }
            .raise()),
        }
    }

    /// Expand the alias target one level deeper.
    fn recurse<'v>(
        &self,
        ty: Cow<'v, TypeInfo>,
        value: &'v Word,
        req: Request<'_>,
        depth: usize,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        let depth = depth + 1;
        if depth > self.config.max_alias_depth {
            return Err(Fault::AliasDepthExceeded { depth }.raise());
        }
        self.expand_at(ty, value, req, depth)
    }

    fn expand_decoded<'v>(
        &self,
        desc: &TypeCtorDesc,
        ty: &TypeInfo,
        decoded: Decoded<'v>,
        req: Request<'_>,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        match decoded {
            Decoded::Constant(name) => Ok(leaf(req, || Cow::Borrowed(name))),
            Decoded::Variable => match req.noncanon {
                NoncanonHandling::Cc => Ok(leaf(req, || Cow::Borrowed("<<variable>>"))),
                NoncanonHandling::Abort | NoncanonHandling::Allow => Err(Fault::UnboundVariable {
                    type_name: desc.qualified_name(),
                }
                .raise()),
            },
            Decoded::Functor { functor, fields } => {
                let num_extra = functor.extra_words();
                let source = DuArgs {
                    store: self.store,
                    functor,
                    params: ty.args(),
                    witnesses: &fields[..num_extra],
                };
                Ok(Expansion {
                    functor: req.want_functor.then(|| Cow::Borrowed(functor.name())),
                    arity: functor.arity(),
                    args: materialize(req.mode, fields, num_extra, &source)?,
                })
            }
        }
    }

    fn expand_closure<'v>(
        &self,
        desc: &TypeCtorDesc,
        rep: TypeCtorRep,
        value: Word,
        req: Request<'_>,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        let noncanon = if self.config.canonicalize_closures {
            NoncanonHandling::Allow
        } else {
            req.noncanon
        };
        match noncanon {
            NoncanonHandling::Abort => {
                return Err(ExpandError::noncanonical(desc.qualified_name()));
            }
            NoncanonHandling::Allow => {
                let name = if rep == TypeCtorRep::Func {
                    "<<function>>"
                } else {
                    "<<predicate>>"
                };
                return Ok(leaf(req, || Cow::Borrowed(name)));
            }
            NoncanonHandling::Cc => {}
        }

        let addr = body(value);
        let header = self.store.words(addr, 2).ok_or_else(|| dangling(value))?;
        let layout = ClosureLayoutId::from_word(header[0])
            .and_then(|id| self.table.closure_layout(id))
            .ok_or_else(|| dangling(header[0]))?;
        let num_hidden = usize::try_from(header[1]).map_err(|_| dangling(value))?;
        if num_hidden != layout.num_args() {
            return Err(Fault::ClosureMismatch {
                captured: num_hidden,
                described: layout.num_args(),
            }
            .raise());
        }
        let hidden = self
            .store
            .words(addr + 2, num_hidden)
            .ok_or_else(|| dangling(value))?;

        let source = ClosureArgs {
            store: self.store,
            layout,
            hidden,
        };
        Ok(Expansion {
            functor: req
                .want_functor
                .then(|| Cow::Borrowed(layout.proc_id().display_name())),
            arity: num_hidden,
            args: materialize(req.mode, hidden, 0, &source)?,
        })
    }

    /// A type descriptor as a value: the described type's constructor name,
    /// with the described type's arguments as descriptor-valued arguments.
    fn expand_type_info<'v>(
        &self,
        ty: &TypeInfo,
        value: Word,
        req: Request<'_>,
    ) -> Result<Expansion<'v>, ExpandError>
    where
        'a: 'v,
    {
        let mut cell = self.store.type_info(value).ok_or_else(|| dangling(value))?;
        // Equivalences are the only source of noncanonicality here.
        if req.noncanon == NoncanonHandling::Allow {
            cell = self
                .store
                .type_info(cell.collapsed)
                .ok_or_else(|| dangling(cell.collapsed))?;
        }
        let described = self.table.ctor(cell.type_info.ctor())?;
        let arity = cell.args.len();
        let source = UniformArgs {
            arity,
            ty: ty.clone(),
        };
        Ok(Expansion {
            functor: req.want_functor.then(|| Cow::Borrowed(described.name())),
            arity,
            args: materialize(req.mode, cell.args, 0, &source)?,
        })
    }
}

fn refuse_abort(desc: &TypeCtorDesc, req: Request<'_>) -> Result<(), ExpandError> {
    if req.noncanon == NoncanonHandling::Abort {
        return Err(ExpandError::noncanonical(desc.qualified_name()));
    }
    Ok(())
}

/// A term with no arguments.
fn leaf<'a>(req: Request<'_>, functor: impl FnOnce() -> Cow<'a, str>) -> Expansion<'a> {
    Expansion {
        functor: req.want_functor.then(functor),
        arity: 0,
        args: leaf_args(req.mode),
    }
}

fn mismatch(desc: &TypeCtorDesc) -> ExpandError {
    Fault::LayoutMismatch {
        type_name: desc.qualified_name(),
        rep: desc.rep(),
    }
    .raise()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
