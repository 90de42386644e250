//! Expansion errors.
//!
//! Two classes, deliberately kept apart:
//! - [`ExpandError::Noncanonical`]: ordinary program behaviour (inspecting a
//!   value of a type with user-defined equality under
//!   [`Abort`](crate::NoncanonHandling::Abort)). Callers may recover.
//! - [`ExpandError::Fault`]: the runtime's own metadata or heap is
//!   inconsistent. Callers should not try to continue.

use tern_rtti::{RttiError, TypeCtorRep, Word};
use thiserror::Error;

/// Failure of one expansion. No partial result accompanies it.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ExpandError {
    #[error("attempt to deconstruct noncanonical term of type `{type_name}`")]
    Noncanonical { type_name: String },

    #[error(transparent)]
    Fault(#[from] Fault),
}

impl ExpandError {
    /// Check if this error signals corrupted runtime state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExpandError::Fault(_))
    }

    pub(crate) fn noncanonical(type_name: String) -> Self {
        tracing::debug!(%type_name, "refusing to deconstruct noncanonical term");
        ExpandError::Noncanonical { type_name }
    }
}

/// A runtime invariant violation.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum Fault {
    #[error("value of uninhabited type `{type_name}`")]
    VoidValue { type_name: String },

    #[error("type `{type_name}` has no usable representation")]
    UnknownRep { type_name: String },

    #[error("unbound solver variable of type `{type_name}` outside committed-choice context")]
    UnboundVariable { type_name: String },

    #[error("primary tag {ptag} is not used by type `{type_name}`")]
    InvalidPtag { type_name: String, ptag: u8 },

    #[error("secondary tag {sectag} under primary tag {ptag} is not used by type `{type_name}`")]
    InvalidSectag {
        type_name: String,
        ptag: u8,
        sectag: Word,
    },

    #[error("enum value {word} is out of range for type `{type_name}`")]
    EnumOutOfRange { type_name: String, word: Word },

    #[error("type `{type_name}` has rep {rep} but no matching layout")]
    LayoutMismatch { type_name: String, rep: TypeCtorRep },

    #[error("word {word:#x} does not refer to a live cell")]
    DanglingWord { word: Word },

    #[error("functor `{functor}` reads witness slot {slot} outside its witness words")]
    WitnessOutOfRange { functor: String, slot: u16 },

    #[error("closure captures {captured} arguments but its layout describes {described}")]
    ClosureMismatch { captured: usize, described: usize },

    #[error("character value {word:#x} is not a Unicode scalar value")]
    InvalidChar { word: Word },

    #[error("alias resolution exceeded depth {depth}")]
    AliasDepthExceeded { depth: usize },

    #[error(transparent)]
    Rtti(#[from] RttiError),
}

impl Fault {
    /// Log the fault at the point it is detected and turn it into an error.
    pub(crate) fn raise(self) -> ExpandError {
        tracing::error!(fault = %self, "term expansion fault");
        ExpandError::Fault(self)
    }
}

impl From<RttiError> for ExpandError {
    fn from(err: RttiError) -> Self {
        Fault::Rtti(err).raise()
    }
}
