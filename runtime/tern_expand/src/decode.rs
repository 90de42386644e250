//! Tag decoding: from a value word to the alternative it denotes.

use tern_heap::TermStore;
use tern_rtti::word::{body, tag, unmkbody};
use tern_rtti::{DuFunctorDesc, DuLayout, ReservedAddrLayout, SectagLocn, TypeCtorDesc, Word};

use crate::error::{ExpandError, Fault};

/// The alternative a discriminated-union value belongs to.
pub(crate) enum Decoded<'a> {
    /// A constant: a reserved address or a locally tagged alternative.
    Constant(&'a str),
    /// An ordinary alternative. `fields` holds the witness words followed by
    /// the visible arguments.
    Functor {
        functor: &'a DuFunctorDesc,
        fields: &'a [Word],
    },
    /// An unresolved solver variable.
    Variable,
}

/// Decode a value through the primary/secondary tag tables.
pub(crate) fn decode_du<'a, S: TermStore + ?Sized>(
    store: &'a S,
    desc: &TypeCtorDesc,
    layout: &'a DuLayout,
    value: Word,
) -> Result<Decoded<'a>, ExpandError> {
    let ptag = tag(value);
    let Some(ptag_layout) = layout.ptag(ptag) else {
        return Err(Fault::InvalidPtag {
            type_name: desc.qualified_name(),
            ptag,
        }
        .raise());
    };

    let (sectag, fields_at) = match ptag_layout.sectag_locn() {
        SectagLocn::None => (0, Some(body(value))),
        SectagLocn::Local => (unmkbody(value), None),
        SectagLocn::Remote => {
            let addr = body(value);
            let sectag = *store.word(addr).ok_or_else(|| dangling(value))?;
            (sectag, Some(addr + 1))
        }
        SectagLocn::Variable => return Ok(Decoded::Variable),
    };

    let Some(functor) = layout.alternative(ptag, sectag) else {
        return Err(Fault::InvalidSectag {
            type_name: desc.qualified_name(),
            ptag,
            sectag,
        }
        .raise());
    };

    // Locally tagged alternatives have no cell: the table rejects any with
    // arguments or witnesses.
    let Some(addr) = fields_at else {
        return Ok(Decoded::Constant(functor.name()));
    };
    let fields = store
        .words(addr, functor.extra_words() + functor.arity())
        .ok_or_else(|| dangling(value))?;
    Ok(Decoded::Functor { functor, fields })
}

/// Decode a reserved-address value: constants first, then the fallback
/// tag tables.
pub(crate) fn decode_reserved<'a, S: TermStore + ?Sized>(
    store: &'a S,
    desc: &TypeCtorDesc,
    layout: &'a ReservedAddrLayout,
    value: Word,
) -> Result<Decoded<'a>, ExpandError> {
    if let Some(name) = layout
        .numeric_constant(value)
        .or_else(|| layout.symbolic_constant(value))
    {
        return Ok(Decoded::Constant(name));
    }
    decode_du(store, desc, layout.other(), value)
}

pub(crate) fn dangling(word: Word) -> ExpandError {
    Fault::DanglingWord { word }.raise()
}
