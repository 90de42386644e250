//! Errors raised while building type tables or instantiating templates.

use thiserror::Error;

use crate::id::TypeCtorId;
use crate::layout::LayoutError;

/// Metadata construction or substitution failure.
///
/// At table-build time these are programming errors in the table producer.
/// At run time they mean the metadata a value points at is inconsistent.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RttiError {
    /// The handle does not name a constructor in this table.
    #[error("unknown type constructor {0:?}")]
    UnknownCtor(TypeCtorId),

    /// A constructor with this module and name was already declared.
    #[error("type constructor `{module}.{name}` declared twice")]
    DuplicateCtor { module: String, name: String },

    /// The constructor's layout was already defined.
    #[error("type constructor `{name}` defined twice")]
    AlreadyDefined { name: String },

    /// A template refers to a parameter the argument vector does not have.
    #[error("type parameter {index} requested but only {available} available")]
    MissingTypeParam { index: u16, available: usize },

    /// A template mentions an existential variable with no witness source.
    #[error("existential type variable {index} has no witness")]
    UnboundExistential { index: u16 },

    /// A layout table is malformed.
    #[error("invalid layout for `{name}`: {source}")]
    InvalidLayout {
        name: String,
        #[source]
        source: LayoutError,
    },

    /// The static sentinel region has no addresses left.
    #[error("static sentinel region exhausted")]
    SentinelsExhausted,

    /// An equivalence chain did not terminate.
    #[error("equivalence chain starting at `{name}` does not terminate")]
    EquivalenceCycle { name: String },
}
