//! Expansion results.
//!
//! Results borrow from the type table, the term store and the caller's type
//! descriptor for `'a`. Argument type vectors are [`Cow`]s: borrowed when
//! they are a slice of a descriptor's own argument vector (tuples), owned
//! when the expansion had to build them.

use std::borrow::Cow;

use tern_rtti::{TypeInfo, Word};

/// Functor, arity and requested argument data of one term.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion<'a> {
    /// Present exactly when the caller asked for it.
    pub functor: Option<Cow<'a, str>>,
    /// Number of visible arguments.
    pub arity: usize,
    pub args: ArgData<'a>,
}

/// Argument data of an expansion.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgData<'a> {
    /// No argument data: not requested, or the term is a leaf.
    None,
    /// Every argument.
    All(ExpandedArgs<'a>),
    /// The arity cap was exceeded; nothing was materialized.
    LimitExceeded,
    /// The requested argument.
    Chosen(ChosenArg<'a>),
    /// The requested argument does not exist.
    ChosenNotFound,
}

impl<'a> ArgData<'a> {
    /// The full argument set, if this is one.
    pub fn all(&self) -> Option<&ExpandedArgs<'a>> {
        match self {
            ArgData::All(args) => Some(args),
            _ => None,
        }
    }

    /// The chosen argument, if this is one.
    pub fn chosen(&self) -> Option<&ChosenArg<'a>> {
        match self {
            ArgData::Chosen(arg) => Some(arg),
            _ => None,
        }
    }
}

/// Every argument of a term.
///
/// `words` holds the witness words followed by the visible arguments, so it
/// can be handed to code that walks the raw cell.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedArgs<'a> {
    words: &'a [Word],
    num_extra: usize,
    types: Cow<'a, [TypeInfo]>,
}

impl<'a> ExpandedArgs<'a> {
    pub(crate) fn new(words: &'a [Word], num_extra: usize, types: Cow<'a, [TypeInfo]>) -> Self {
        debug_assert_eq!(words.len(), num_extra + types.len());
        ExpandedArgs {
            words,
            num_extra,
            types,
        }
    }

    /// Witness words followed by the visible arguments.
    pub fn words(&self) -> &'a [Word] {
        self.words
    }

    /// Number of leading witness words.
    pub fn num_extra(&self) -> usize {
        self.num_extra
    }

    pub fn witnesses(&self) -> &'a [Word] {
        &self.words[..self.num_extra]
    }

    /// The visible argument words.
    pub fn values(&self) -> &'a [Word] {
        &self.words[self.num_extra..]
    }

    /// Type of each visible argument.
    pub fn types(&self) -> &[TypeInfo] {
        &self.types
    }

    /// Check if the type vector was built for this result rather than
    /// borrowed from a descriptor.
    pub fn is_owned(&self) -> bool {
        matches!(self.types, Cow::Owned(_))
    }

    /// Visible arguments paired with their types.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Word, &TypeInfo)> + '_ {
        self.values().iter().zip(self.types.iter())
    }

    pub fn into_types(self) -> Cow<'a, [TypeInfo]> {
        self.types
    }
}

/// One argument of a term.
#[derive(Clone, Debug, PartialEq)]
pub struct ChosenArg<'a> {
    pub value: &'a Word,
    pub type_info: TypeInfo,
}
