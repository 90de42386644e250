//! The frozen type table.
//!
//! A [`TypeTable`] owns one [`TypeCtorDesc`] per type constructor plus every
//! closure layout. It is produced once by a [`TypeTableBuilder`] and never
//! mutated afterwards, so any number of readers can share it by reference.
//!
//! Recursive types refer to each other through [`TypeCtorId`] handles rather
//! than pointers, which keeps the table a flat arena.

mod builder;
mod format;

use rustc_hash::FxHashMap;

use crate::closure::ClosureLayout;
use crate::error::RttiError;
use crate::id::{ClosureLayoutId, TypeCtorId};
use crate::layout::{DuLayout, EnumLayout, NotagLayout, ReservedAddrLayout, TypeLayout};
use crate::rep::TypeCtorRep;
use crate::type_info::{ArgType, TypeInfo};
use crate::word::Word;

pub use builder::TypeTableBuilder;

/// Compile-time description of one type constructor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeCtorDesc {
    id: TypeCtorId,
    module: Box<str>,
    name: Box<str>,
    arity: u16,
    rep: TypeCtorRep,
    layout: TypeLayout,
}

impl TypeCtorDesc {
    pub fn id(&self) -> TypeCtorId {
        self.id
    }

    /// Module that declares the constructor.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Unqualified constructor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared number of type parameters.
    ///
    /// Zero for variable-arity constructors; their arity lives on each
    /// [`TypeInfo`].
    pub fn arity(&self) -> u16 {
        self.arity
    }

    pub fn rep(&self) -> TypeCtorRep {
        self.rep
    }

    pub fn layout(&self) -> &TypeLayout {
        &self.layout
    }

    /// `module.name/arity`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}/{}", self.module, self.name, self.arity)
    }

    /// `<<module.name/arity>>`, the functor reported for noncanonical terms.
    pub fn noncanonical_name(&self) -> String {
        format!("<<{}>>", self.qualified_name())
    }

    pub fn enum_layout(&self) -> Option<&EnumLayout> {
        match &self.layout {
            TypeLayout::Enum(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn du_layout(&self) -> Option<&DuLayout> {
        match &self.layout {
            TypeLayout::Du(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn reserved_addr_layout(&self) -> Option<&ReservedAddrLayout> {
        match &self.layout {
            TypeLayout::ReservedAddr(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn notag_layout(&self) -> Option<&NotagLayout> {
        match &self.layout {
            TypeLayout::Notag(layout) => Some(layout),
            _ => None,
        }
    }

    /// Target of an equivalence.
    pub fn equiv_target(&self) -> Option<&ArgType> {
        match &self.layout {
            TypeLayout::Equiv(target) => Some(target),
            _ => None,
        }
    }
}

/// A user-facing type constructor descriptor value.
///
/// Fixed-arity constructors are described by their handle alone. Tuples and
/// closures also record the arity they are applied at.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeCtorDescWord {
    Fixed(TypeCtorId),
    VariableArity { ctor: TypeCtorId, arity: u32 },
}

impl TypeCtorDescWord {
    /// Encode as a value word: bit 0 marks the variable-arity form, the
    /// constructor handle sits above it and the arity in the high half.
    pub fn encode(self) -> Word {
        match self {
            TypeCtorDescWord::Fixed(ctor) => Word::from(ctor.raw()) << 1,
            TypeCtorDescWord::VariableArity { ctor, arity } => {
                (Word::from(arity) << 32) | (Word::from(ctor.raw()) << 1) | 1
            }
        }
    }

    pub fn decode(word: Word) -> Option<Self> {
        let ctor = TypeCtorId::from_raw(u32::try_from((word & 0xFFFF_FFFF) >> 1).ok()?);
        if word & 1 == 0 {
            (word >> 32 == 0).then_some(TypeCtorDescWord::Fixed(ctor))
        } else {
            let arity = u32::try_from(word >> 32).ok()?;
            Some(TypeCtorDescWord::VariableArity { ctor, arity })
        }
    }

    pub fn ctor(self) -> TypeCtorId {
        match self {
            TypeCtorDescWord::Fixed(ctor) | TypeCtorDescWord::VariableArity { ctor, .. } => ctor,
        }
    }
}

/// All type constructors and closure layouts of a program.
#[derive(Debug)]
pub struct TypeTable {
    ctors: Vec<TypeCtorDesc>,
    closures: Vec<ClosureLayout>,
    by_name: FxHashMap<(Box<str>, Box<str>), TypeCtorId>,
}

impl TypeTable {
    /// Look a constructor up by handle.
    #[inline]
    pub fn get(&self, id: TypeCtorId) -> Option<&TypeCtorDesc> {
        self.ctors.get(usize::try_from(id.raw()).ok()?)
    }

    /// Look a constructor up by handle, failing on foreign handles.
    pub fn ctor(&self, id: TypeCtorId) -> Result<&TypeCtorDesc, RttiError> {
        self.get(id).ok_or(RttiError::UnknownCtor(id))
    }

    /// Representation kind of the type a descriptor instantiates.
    ///
    /// Handles this table does not know classify as
    /// [`Unknown`](TypeCtorRep::Unknown).
    pub fn classify(&self, ty: &TypeInfo) -> TypeCtorRep {
        self.get(ty.ctor()).map_or(TypeCtorRep::Unknown, TypeCtorDesc::rep)
    }

    pub fn closure_layout(&self, id: ClosureLayoutId) -> Option<&ClosureLayout> {
        self.closures.get(usize::try_from(id.raw()).ok()?)
    }

    /// Find a constructor by module and name.
    pub fn find(&self, module: &str, name: &str) -> Option<TypeCtorId> {
        self.by_name
            .get(&(Box::from(module), Box::from(name)))
            .copied()
    }

    /// Expand equivalences at the top of `ty` until it names a constructor
    /// that is not an alias.
    pub fn collapse_equivalences(&self, ty: &TypeInfo) -> Result<TypeInfo, RttiError> {
        let mut current = ty.clone();
        // A chain longer than the number of constructors must revisit one.
        for _ in 0..=self.ctors.len() {
            match self.ctor(current.ctor())?.equiv_target() {
                Some(target) => current = target.instantiate(current.args())?,
                None => return Ok(current),
            }
        }
        Err(RttiError::EquivalenceCycle {
            name: self.format_type(ty),
        })
    }
}
