//! What a caller wants to know about a term's arguments.

/// Argument detail requested from one expansion.
///
/// Functor computation is requested separately; every mode reports arity.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum QueryMode<'q> {
    /// Arity only.
    NoArgs,
    /// Every argument with its type, unless the arity exceeds the cap.
    AllArgs(Option<usize>),
    /// One argument by zero-based position.
    ArgByIndex(usize),
    /// One argument by declared field name.
    ArgByName(&'q str),
}
