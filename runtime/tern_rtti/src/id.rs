//! Handles into the type table.
//!
//! `TypeCtorId` is a 32-bit index into a [`TypeTable`](crate::TypeTable).
//! Builtin constructors have fixed indices so that runtime code can name
//! them without a lookup, the same way every table is seeded.

use std::fmt;

use crate::word::Word;

/// Index of a type constructor in the type table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeCtorId(u32);

impl TypeCtorId {
    // === Primitive atomics ===

    /// `builtin.int`.
    pub const INT: Self = Self(0);
    /// `builtin.character`.
    pub const CHAR: Self = Self(1);
    /// `builtin.float`.
    pub const FLOAT: Self = Self(2);
    /// `builtin.string`.
    pub const STRING: Self = Self(3);

    // === Structural builtins ===

    /// `builtin.void`, the uninhabited type.
    pub const VOID: Self = Self(4);
    /// `builtin.{}`, tuples of any arity.
    pub const TUPLE: Self = Self(5);
    /// `builtin.pred`, predicate closures.
    pub const PRED: Self = Self(6);
    /// `builtin.func`, function closures.
    pub const FUNC: Self = Self(7);
    /// `univ.univ`, the dynamically typed box.
    pub const UNIV: Self = Self(8);
    /// `array.array/1`.
    pub const ARRAY: Self = Self(9);
    /// `builtin.c_pointer`.
    pub const C_POINTER: Self = Self(10);

    // === Meta-descriptors ===

    /// `private_builtin.type_info`.
    pub const TYPE_INFO: Self = Self(11);
    /// `type_desc.type_desc`.
    pub const TYPE_DESC: Self = Self(12);
    /// `private_builtin.type_ctor_info`.
    pub const TYPE_CTOR_INFO: Self = Self(13);
    /// `type_desc.type_ctor_desc`.
    pub const TYPE_CTOR_DESC: Self = Self(14);
    /// `private_builtin.typeclass_info`.
    pub const TYPECLASS_INFO: Self = Self(15);
    /// `private_builtin.base_typeclass_info`.
    pub const BASE_TYPECLASS_INFO: Self = Self(16);

    // === Runtime registers ===

    /// `private_builtin.succip`.
    pub const SUCCIP: Self = Self(17);
    /// `private_builtin.hp`.
    pub const HP: Self = Self(18);
    /// `private_builtin.curfr`.
    pub const CURFR: Self = Self(19);
    /// `private_builtin.maxfr`.
    pub const MAXFR: Self = Self(20);
    /// `private_builtin.redofr`.
    pub const REDOFR: Self = Self(21);
    /// `private_builtin.redoip`.
    pub const REDOIP: Self = Self(22);
    /// `private_builtin.trail_ptr`.
    pub const TRAIL_PTR: Self = Self(23);
    /// `private_builtin.ticket`.
    pub const TICKET: Self = Self(24);

    /// Number of pre-registered builtin constructors.
    pub const BUILTIN_COUNT: u32 = 25;

    /// Create a handle from a raw index.
    ///
    /// The index is only meaningful for the table that produced it.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is one of the pre-registered builtins.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }

    /// Encode this handle as a type-constructor-info value word.
    #[inline]
    pub const fn to_word(self) -> Word {
        self.0 as Word
    }

    /// Decode a type-constructor-info value word.
    #[inline]
    pub fn from_word(word: Word) -> Option<Self> {
        u32::try_from(word).ok().map(Self)
    }
}

impl fmt::Debug for TypeCtorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCtorId({})", self.0)
    }
}

/// Index of a closure layout in the type table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ClosureLayoutId(u32);

impl ClosureLayoutId {
    /// Create a handle from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Encode this handle as the layout word of a closure cell.
    #[inline]
    pub const fn to_word(self) -> Word {
        self.0 as Word
    }

    /// Decode the layout word of a closure cell.
    #[inline]
    pub fn from_word(word: Word) -> Option<Self> {
        u32::try_from(word).ok().map(Self)
    }
}
