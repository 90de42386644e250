//! Runtime type information for Tern.
//!
//! Everything the deconstruction engine reads about types lives here:
//! - Word encoding of values (primary tags, pointers, unboxed atomics)
//! - `TypeCtorRep`: the closed set of representation kinds
//! - `TypeCtorDesc` and its per-representation layout tables
//! - `TypeInfo`: shared, immutable type descriptors
//! - `PseudoTypeInfo`: compile-time templates and parametric substitution
//! - `TypeTable`: the frozen arena of constructors and closure layouts
//!
//! # Type Tables
//!
//! Tables are built once with a [`TypeTableBuilder`] and then only read.
//! Handles ([`TypeCtorId`], [`ClosureLayoutId`]) are plain indices, so
//! recursive types need no reference cycles.

mod closure;
mod error;
mod id;
mod layout;
mod rep;
mod table;
mod type_info;
pub mod word;

pub use closure::{ClosureLayout, ProcId};
pub use error::RttiError;
pub use id::{ClosureLayoutId, TypeCtorId};
pub use layout::{
    DuFunctorDesc, DuLayout, EnumLayout, ExistInfo, ExistLocn, LayoutError, NotagLayout,
    PtagLayout, ReservedAddrLayout, SectagLocn, TypeLayout,
};
pub use rep::TypeCtorRep;
pub use table::{TypeCtorDesc, TypeCtorDescWord, TypeTable, TypeTableBuilder};
pub use type_info::{ArgType, PseudoTypeInfo, TypeInfo, TypeVar};
pub use word::Word;

// Size assertions to prevent accidental regressions.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{TypeCtorId, TypeInfo};
    // One Arc pointer; descriptors are passed around by value constantly.
    const _: () = assert!(std::mem::size_of::<TypeInfo>() == 8);
    const _: () = assert!(std::mem::size_of::<Option<TypeInfo>>() == 8);
    const _: () = assert!(std::mem::size_of::<TypeCtorId>() == 4);
}
