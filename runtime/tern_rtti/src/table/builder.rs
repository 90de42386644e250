//! Incremental construction of a [`TypeTable`].
//!
//! Constructors are declared first and defined later, so mutually recursive
//! types can mention each other's handles in their argument templates.

use rustc_hash::FxHashMap;

use super::{TypeCtorDesc, TypeTable};
use crate::closure::ClosureLayout;
use crate::error::RttiError;
use crate::id::{ClosureLayoutId, TypeCtorId};
use crate::layout::{
    check_template, DuFunctorDesc, DuLayout, EnumLayout, LayoutError, NotagLayout,
    ReservedAddrLayout, TypeLayout,
};
use crate::rep::TypeCtorRep;
use crate::type_info::PseudoTypeInfo;
use crate::word::{mkword, Word, HEAP_BASE, STATIC_BASE};

/// `(handle, module, name, arity, rep)` of every builtin, in handle order.
const BUILTINS: [(TypeCtorId, &str, &str, u16, TypeCtorRep); TypeCtorId::BUILTIN_COUNT as usize] = [
    (TypeCtorId::INT, "builtin", "int", 0, TypeCtorRep::Int),
    (TypeCtorId::CHAR, "builtin", "character", 0, TypeCtorRep::Char),
    (TypeCtorId::FLOAT, "builtin", "float", 0, TypeCtorRep::Float),
    (TypeCtorId::STRING, "builtin", "string", 0, TypeCtorRep::String),
    (TypeCtorId::VOID, "builtin", "void", 0, TypeCtorRep::Void),
    (TypeCtorId::TUPLE, "builtin", "{}", 0, TypeCtorRep::Tuple),
    (TypeCtorId::PRED, "builtin", "pred", 0, TypeCtorRep::Pred),
    (TypeCtorId::FUNC, "builtin", "func", 0, TypeCtorRep::Func),
    (TypeCtorId::UNIV, "univ", "univ", 0, TypeCtorRep::Univ),
    (TypeCtorId::ARRAY, "array", "array", 1, TypeCtorRep::Array),
    (TypeCtorId::C_POINTER, "builtin", "c_pointer", 0, TypeCtorRep::CPointer),
    (TypeCtorId::TYPE_INFO, "private_builtin", "type_info", 0, TypeCtorRep::TypeInfo),
    (TypeCtorId::TYPE_DESC, "type_desc", "type_desc", 0, TypeCtorRep::TypeDesc),
    (TypeCtorId::TYPE_CTOR_INFO, "private_builtin", "type_ctor_info", 0, TypeCtorRep::TypeCtorInfo),
    (TypeCtorId::TYPE_CTOR_DESC, "type_desc", "type_ctor_desc", 0, TypeCtorRep::TypeCtorDesc),
    (TypeCtorId::TYPECLASS_INFO, "private_builtin", "typeclass_info", 0, TypeCtorRep::TypeClassInfo),
    (
        TypeCtorId::BASE_TYPECLASS_INFO,
        "private_builtin",
        "base_typeclass_info",
        0,
        TypeCtorRep::BaseTypeClassInfo,
    ),
    (TypeCtorId::SUCCIP, "private_builtin", "succip", 0, TypeCtorRep::Succip),
    (TypeCtorId::HP, "private_builtin", "hp", 0, TypeCtorRep::Hp),
    (TypeCtorId::CURFR, "private_builtin", "curfr", 0, TypeCtorRep::Curfr),
    (TypeCtorId::MAXFR, "private_builtin", "maxfr", 0, TypeCtorRep::Maxfr),
    (TypeCtorId::REDOFR, "private_builtin", "redofr", 0, TypeCtorRep::Redofr),
    (TypeCtorId::REDOIP, "private_builtin", "redoip", 0, TypeCtorRep::Redoip),
    (TypeCtorId::TRAIL_PTR, "private_builtin", "trail_ptr", 0, TypeCtorRep::TrailPtr),
    (TypeCtorId::TICKET, "private_builtin", "ticket", 0, TypeCtorRep::Ticket),
];

/// Mutable staging area for a [`TypeTable`].
pub struct TypeTableBuilder {
    ctors: Vec<TypeCtorDesc>,
    defined: Vec<bool>,
    closures: Vec<ClosureLayout>,
    by_name: FxHashMap<(Box<str>, Box<str>), TypeCtorId>,
    next_sentinel: usize,
}

impl Default for TypeTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTableBuilder {
    /// Create a builder seeded with the builtin constructors.
    pub fn new() -> Self {
        let mut builder = TypeTableBuilder {
            ctors: Vec::with_capacity(BUILTINS.len() * 2),
            defined: Vec::with_capacity(BUILTINS.len() * 2),
            closures: Vec::new(),
            by_name: FxHashMap::default(),
            next_sentinel: STATIC_BASE,
        };
        for (id, module, name, arity, rep) in BUILTINS {
            debug_assert_eq!(id.raw() as usize, builder.ctors.len());
            builder.push(module, name, arity, rep, true);
        }
        builder
    }

    fn push(&mut self, module: &str, name: &str, arity: u16, rep: TypeCtorRep, defined: bool) -> TypeCtorId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "constructor counts fit in the u32 handle space"
        )]
        let id = TypeCtorId::from_raw(self.ctors.len() as u32);
        self.ctors.push(TypeCtorDesc {
            id,
            module: module.into(),
            name: name.into(),
            arity,
            rep,
            layout: TypeLayout::None,
        });
        self.defined.push(defined);
        self.by_name.insert((module.into(), name.into()), id);
        id
    }

    /// Declare a user constructor. Its layout is supplied by one of the
    /// `define_*` methods.
    pub fn declare(&mut self, module: &str, name: &str, arity: u16) -> Result<TypeCtorId, RttiError> {
        if self.by_name.contains_key(&(Box::from(module), Box::from(name))) {
            return Err(RttiError::DuplicateCtor {
                module: module.to_string(),
                name: name.to_string(),
            });
        }
        Ok(self.push(module, name, arity, TypeCtorRep::Unknown, false))
    }

    /// Find a constructor declared so far.
    pub fn find(&self, module: &str, name: &str) -> Option<TypeCtorId> {
        self.by_name.get(&(Box::from(module), Box::from(name))).copied()
    }

    /// Define an enumeration.
    pub fn define_enum<S: Into<Box<str>>>(
        &mut self,
        id: TypeCtorId,
        names: impl IntoIterator<Item = S>,
        user_eq: bool,
    ) -> Result<(), RttiError> {
        let name = self.undefined(id)?;
        let layout = EnumLayout::new(names).map_err(|source| invalid(name, source))?;
        let rep = pick(user_eq, TypeCtorRep::Enum, TypeCtorRep::EnumUserEq);
        self.set(id, rep, TypeLayout::Enum(layout));
        Ok(())
    }

    /// Define a discriminated union from its functors in declaration order.
    pub fn define_du(
        &mut self,
        id: TypeCtorId,
        functors: Vec<DuFunctorDesc>,
        user_eq: bool,
    ) -> Result<(), RttiError> {
        let name = self.undefined(id)?;
        let arity = self.ctors[index(id)].arity;
        let layout = DuLayout::new(functors, arity).map_err(|source| invalid(name, source))?;
        self.install_du(id, layout, user_eq);
        Ok(())
    }

    /// Define a discriminated union from a prebuilt layout, e.g. one with a
    /// primary tag reserved for solver variables.
    pub fn define_du_layout(
        &mut self,
        id: TypeCtorId,
        layout: DuLayout,
        user_eq: bool,
    ) -> Result<(), RttiError> {
        let name = self.undefined(id)?;
        let expected = self.ctors[index(id)].arity;
        if layout.ctor_arity() != expected {
            return Err(invalid(
                name,
                LayoutError::ArityMismatch {
                    expected,
                    found: layout.ctor_arity(),
                },
            ));
        }
        self.install_du(id, layout, user_eq);
        Ok(())
    }

    fn install_du(&mut self, id: TypeCtorId, layout: DuLayout, user_eq: bool) {
        let rep = pick(user_eq, TypeCtorRep::Du, TypeCtorRep::DuUserEq);
        self.set(id, rep, TypeLayout::Du(layout));
    }

    /// Define a discriminated union with reserved-address constants.
    ///
    /// `numeric[i]` is encoded as the word `i`. Symbolic constants must use
    /// words obtained from [`symbolic_address`](Self::symbolic_address).
    /// `other` lists the remaining functors.
    pub fn define_reserved_addr(
        &mut self,
        id: TypeCtorId,
        numeric: &[&str],
        symbolic: Vec<(Word, String)>,
        other: Vec<DuFunctorDesc>,
        user_eq: bool,
    ) -> Result<(), RttiError> {
        let name = self.undefined(id)?;
        let arity = self.ctors[index(id)].arity;
        let layout = DuLayout::new(other, arity)
            .and_then(|other| ReservedAddrLayout::new(numeric.iter().copied(), symbolic, other))
            .map_err(|source| invalid(name, source))?;
        let rep = pick(user_eq, TypeCtorRep::ReservedAddr, TypeCtorRep::ReservedAddrUserEq);
        self.set(id, rep, TypeLayout::ReservedAddr(layout));
        Ok(())
    }

    /// Define a single-functor, single-argument type stored as its argument.
    pub fn define_notag(
        &mut self,
        id: TypeCtorId,
        functor_name: &str,
        arg_name: Option<&str>,
        arg_type: PseudoTypeInfo,
        user_eq: bool,
    ) -> Result<(), RttiError> {
        let name = self.undefined(id)?;
        let arity = self.ctors[index(id)].arity;
        check_template(functor_name, &arg_type, arity, None).map_err(|source| invalid(name, source))?;
        let rep = match (arg_type.is_ground(), user_eq) {
            (false, false) => TypeCtorRep::Notag,
            (false, true) => TypeCtorRep::NotagUserEq,
            (true, false) => TypeCtorRep::NotagGround,
            (true, true) => TypeCtorRep::NotagGroundUserEq,
        };
        let layout = NotagLayout::new(functor_name, arg_name, arg_type);
        self.set(id, rep, TypeLayout::Notag(layout));
        Ok(())
    }

    /// Define an equivalence for `target`.
    pub fn define_equiv(&mut self, id: TypeCtorId, target: PseudoTypeInfo) -> Result<(), RttiError> {
        let name = self.undefined(id)?;
        let arity = self.ctors[index(id)].arity;
        let ctor_name = self.ctors[index(id)].name.to_string();
        check_template(&ctor_name, &target, arity, None).map_err(|source| invalid(name, source))?;
        let rep = if target.is_ground() {
            TypeCtorRep::EquivGround
        } else {
            TypeCtorRep::Equiv
        };
        self.set(id, rep, TypeLayout::Equiv(target.into()));
        Ok(())
    }

    /// Define an opaque foreign type, represented like `c_pointer`.
    pub fn define_foreign(&mut self, id: TypeCtorId) -> Result<(), RttiError> {
        self.undefined(id)?;
        self.set(id, TypeCtorRep::CPointer, TypeLayout::None);
        Ok(())
    }

    /// Register a closure layout.
    pub fn add_closure_layout(&mut self, layout: ClosureLayout) -> ClosureLayoutId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "closure layout counts fit in the u32 handle space"
        )]
        let id = ClosureLayoutId::from_raw(self.closures.len() as u32);
        self.closures.push(layout);
        id
    }

    /// Hand out a fresh static sentinel word for a symbolic reserved address.
    pub fn symbolic_address(&mut self) -> Result<Word, RttiError> {
        if self.next_sentinel >= HEAP_BASE {
            return Err(RttiError::SentinelsExhausted);
        }
        let word = mkword(0, self.next_sentinel as Word);
        self.next_sentinel += 1;
        Ok(word)
    }

    /// Freeze the table.
    ///
    /// Constructors declared but never defined stay
    /// [`Unknown`](TypeCtorRep::Unknown); decoding one of their values is a
    /// metadata fault.
    pub fn finish(self) -> TypeTable {
        for (desc, defined) in self.ctors.iter().zip(&self.defined) {
            if !defined {
                tracing::warn!(ctor = %desc.qualified_name(), "type constructor declared but never defined");
            }
        }
        tracing::debug!(
            ctors = self.ctors.len(),
            closures = self.closures.len(),
            "type table frozen"
        );
        TypeTable {
            ctors: self.ctors,
            closures: self.closures,
            by_name: self.by_name,
        }
    }

    /// Check that `id` is a declared, still undefined constructor and return
    /// its qualified name for error reporting.
    fn undefined(&self, id: TypeCtorId) -> Result<String, RttiError> {
        let desc = self.ctors.get(index(id)).ok_or(RttiError::UnknownCtor(id))?;
        if self.defined[index(id)] {
            return Err(RttiError::AlreadyDefined {
                name: desc.qualified_name(),
            });
        }
        Ok(desc.qualified_name())
    }

    fn set(&mut self, id: TypeCtorId, rep: TypeCtorRep, layout: TypeLayout) {
        let slot = index(id);
        self.ctors[slot].rep = rep;
        self.ctors[slot].layout = layout;
        self.defined[slot] = true;
    }
}

fn index(id: TypeCtorId) -> usize {
    id.raw() as usize
}

fn pick(user_eq: bool, plain: TypeCtorRep, with_user_eq: TypeCtorRep) -> TypeCtorRep {
    if user_eq {
        with_user_eq
    } else {
        plain
    }
}

fn invalid(name: String, source: LayoutError) -> RttiError {
    RttiError::InvalidLayout { name, source }
}
