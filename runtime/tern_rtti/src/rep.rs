//! Representation kind of a type constructor.
//!
//! Every [`TypeCtorDesc`](crate::TypeCtorDesc) carries exactly one
//! `TypeCtorRep`, fixed when the constructor is defined. The rep decides
//! how a value word of that type is laid out, and therefore which decoding
//! path the deconstruction engine takes.
//!
//! # Rep Categories
//!
//! Reps are organized into semantic ranges:
//! - 0-15: Algebraic types (enum, DU, reserved-address, no-tag)
//! - 16-23: Equivalences
//! - 24-31: Structural builtins (tuple, univ, array, closures)
//! - 32-47: Primitive atomics
//! - 48-63: Meta-descriptors and foreign values
//! - 64-79: Runtime registers
//! - 254-255: Sentinels (void, unknown)

use std::fmt;

/// Representation kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum TypeCtorRep {
    // === Algebraic (0-15) ===
    /// Constants only; the value word is the constant's ordinal.
    Enum = 0,
    /// [`Enum`](Self::Enum) with user-defined equality.
    EnumUserEq = 1,
    /// Discriminated union with primary/secondary tags.
    Du = 2,
    /// [`Du`](Self::Du) with user-defined equality.
    DuUserEq = 3,
    /// Discriminated union whose nullary alternatives live at reserved addresses.
    ReservedAddr = 4,
    /// [`ReservedAddr`](Self::ReservedAddr) with user-defined equality.
    ReservedAddrUserEq = 5,
    /// Single functor, single argument, stored unboxed.
    Notag = 6,
    /// [`Notag`](Self::Notag) with user-defined equality.
    NotagUserEq = 7,
    /// [`Notag`](Self::Notag) whose argument type is ground.
    NotagGround = 8,
    /// [`NotagGround`](Self::NotagGround) with user-defined equality.
    NotagGroundUserEq = 9,

    // === Equivalences (16-23) ===
    /// Alias for a type that mentions the constructor's parameters.
    Equiv = 16,
    /// Alias for a ground type.
    EquivGround = 17,

    // === Structural builtins (24-31) ===
    /// Tuple `{T1, ..., Tn}` (variable arity).
    Tuple = 24,
    /// Dynamically typed box `{type_info, value}`.
    Univ = 25,
    /// Array with a size header.
    Array = 26,
    /// Predicate closure (variable arity).
    Pred = 27,
    /// Function closure (variable arity).
    Func = 28,

    // === Primitive atomics (32-47) ===
    /// Signed machine integer.
    Int = 32,
    /// Unicode character.
    Char = 33,
    /// Unboxed double-precision float.
    Float = 34,
    /// String.
    String = 35,

    // === Meta-descriptors and foreign values (48-63) ===
    /// A type descriptor used as a value.
    TypeInfo = 48,
    /// A user-facing type descriptor used as a value.
    TypeDesc = 49,
    /// A type constructor descriptor used as a value.
    TypeCtorInfo = 50,
    /// A user-facing type constructor descriptor used as a value.
    TypeCtorDesc = 51,
    /// A type-class witness.
    TypeClassInfo = 52,
    /// The compile-time template of a type-class witness.
    BaseTypeClassInfo = 53,
    /// Opaque foreign pointer.
    CPointer = 54,

    // === Runtime registers (64-79) ===
    /// Saved success continuation.
    Succip = 64,
    /// Saved heap pointer.
    Hp = 65,
    /// Saved current frame pointer.
    Curfr = 66,
    /// Saved maximum frame pointer.
    Maxfr = 67,
    /// Saved redo frame pointer.
    Redofr = 68,
    /// Saved redo continuation.
    Redoip = 69,
    /// Saved trail pointer.
    TrailPtr = 70,
    /// Saved trail ticket.
    Ticket = 71,

    // === Sentinels (254-255) ===
    /// Uninhabited type; no value can exist.
    Void = 254,
    /// Corrupted or undefined metadata.
    Unknown = 255,
}

impl TypeCtorRep {
    /// Check if values of this rep are compared with user-defined equality.
    #[inline]
    pub const fn has_user_equality(self) -> bool {
        matches!(
            self,
            Self::EnumUserEq
                | Self::DuUserEq
                | Self::ReservedAddrUserEq
                | Self::NotagUserEq
                | Self::NotagGroundUserEq
        )
    }

    /// The rep with the same layout but structural equality.
    #[inline]
    pub const fn canonical(self) -> Self {
        match self {
            Self::EnumUserEq => Self::Enum,
            Self::DuUserEq => Self::Du,
            Self::ReservedAddrUserEq => Self::ReservedAddr,
            Self::NotagUserEq => Self::Notag,
            Self::NotagGroundUserEq => Self::NotagGround,
            other => other,
        }
    }

    /// Check if the arity of this rep lives on the type instance rather than
    /// on the constructor.
    #[inline]
    pub const fn is_variable_arity(self) -> bool {
        matches!(self, Self::Tuple | Self::Pred | Self::Func)
    }

    /// Check if this rep is one of the runtime register kinds.
    #[inline]
    pub const fn is_register(self) -> bool {
        let v = self as u8;
        v >= 64 && v < 80
    }

    /// Check if this rep describes a type or type constructor.
    #[inline]
    pub const fn is_meta(self) -> bool {
        matches!(
            self,
            Self::TypeInfo
                | Self::TypeDesc
                | Self::TypeCtorInfo
                | Self::TypeCtorDesc
                | Self::TypeClassInfo
                | Self::BaseTypeClassInfo
        )
    }

    /// Get the name of this rep as a static string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::EnumUserEq => "enum_usereq",
            Self::Du => "du",
            Self::DuUserEq => "du_usereq",
            Self::ReservedAddr => "reserved_addr",
            Self::ReservedAddrUserEq => "reserved_addr_usereq",
            Self::Notag => "notag",
            Self::NotagUserEq => "notag_usereq",
            Self::NotagGround => "notag_ground",
            Self::NotagGroundUserEq => "notag_ground_usereq",
            Self::Equiv => "equiv",
            Self::EquivGround => "equiv_ground",
            Self::Tuple => "tuple",
            Self::Univ => "univ",
            Self::Array => "array",
            Self::Pred => "pred",
            Self::Func => "func",
            Self::Int => "int",
            Self::Char => "char",
            Self::Float => "float",
            Self::String => "string",
            Self::TypeInfo => "type_info",
            Self::TypeDesc => "type_desc",
            Self::TypeCtorInfo => "type_ctor_info",
            Self::TypeCtorDesc => "type_ctor_desc",
            Self::TypeClassInfo => "typeclass_info",
            Self::BaseTypeClassInfo => "base_typeclass_info",
            Self::CPointer => "c_pointer",
            Self::Succip => "succip",
            Self::Hp => "hp",
            Self::Curfr => "curfr",
            Self::Maxfr => "maxfr",
            Self::Redofr => "redofr",
            Self::Redoip => "redoip",
            Self::TrailPtr => "trail_ptr",
            Self::Ticket => "ticket",
            Self::Void => "void",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Debug for TypeCtorRep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCtorRep::{}", self.name())
    }
}

impl fmt::Display for TypeCtorRep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// Compile-time size assertion: TypeCtorRep must be exactly 1 byte
const _: () = assert!(std::mem::size_of::<TypeCtorRep>() == 1);
