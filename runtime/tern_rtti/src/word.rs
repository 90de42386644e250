//! Machine-word value encoding.
//!
//! Every runtime value is a single [`Word`]. Pointer words carry a primary
//! tag in their low [`TAG_BITS`] bits; the remaining bits are the word address
//! of the cell body. Nullary alternatives with a local secondary tag reuse the
//! same layout, with the secondary tag in place of the address.
//!
//! # Address Space
//!
//! Word addresses are split into three regions:
//!
//! - `0 .. STATIC_BASE`: never allocated. Small integers in this range are
//!   free for reserved-address constants (`null`, `1`, ...).
//! - `STATIC_BASE .. HEAP_BASE`: static sentinels handed out by the type
//!   table builder for symbolic reserved addresses.
//! - `HEAP_BASE ..`: heap cells.

/// One machine word of runtime data.
pub type Word = u64;

/// Number of low bits used for the primary tag.
pub const TAG_BITS: u32 = 3;

/// Number of distinct primary tags.
pub const NUM_PTAGS: usize = 1 << TAG_BITS;

const TAG_MASK: Word = (1 << TAG_BITS) - 1;

/// First word address of the static sentinel region.
pub const STATIC_BASE: usize = 0x400;

/// First word address of the heap region.
pub const HEAP_BASE: usize = 0x10_0000;

/// Smallest raw word that can denote a pointer.
///
/// Reserved numeric addresses must stay strictly below this value.
pub const MIN_POINTER_WORD: Word = (STATIC_BASE as Word) << TAG_BITS;

/// Extract the primary tag of a word.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "masked to TAG_BITS, always fits in u8"
)]
pub const fn tag(word: Word) -> u8 {
    (word & TAG_MASK) as u8
}

/// Build a tagged word from a primary tag and a payload.
///
/// The payload is either a word address (pointer words) or a local secondary
/// tag (nullary alternatives packed into the tag bits).
#[inline]
pub const fn mkword(ptag: u8, payload: Word) -> Word {
    (payload << TAG_BITS) | (ptag as Word & TAG_MASK)
}

/// Strip the primary tag and return the payload.
#[inline]
pub const fn unmkbody(word: Word) -> Word {
    word >> TAG_BITS
}

/// Word address of the cell body a pointer word refers to.
#[inline]
#[expect(
    clippy::cast_possible_truncation,
    reason = "word addresses are produced from usize and fit on 64-bit hosts"
)]
pub const fn body(word: Word) -> usize {
    unmkbody(word) as usize
}

/// Encode a signed integer.
#[inline]
#[expect(clippy::cast_sign_loss, reason = "bit-preserving reinterpretation")]
pub const fn int_to_word(value: i64) -> Word {
    value as Word
}

/// Decode a signed integer.
#[inline]
#[expect(clippy::cast_possible_wrap, reason = "bit-preserving reinterpretation")]
pub const fn word_to_int(word: Word) -> i64 {
    word as i64
}

/// Encode an unboxed float.
#[inline]
pub fn float_to_word(value: f64) -> Word {
    value.to_bits()
}

/// Decode an unboxed float.
#[inline]
pub fn word_to_float(word: Word) -> f64 {
    f64::from_bits(word)
}

/// Encode a character as its scalar value.
#[inline]
pub const fn char_to_word(value: char) -> Word {
    value as Word
}

/// Decode a character, or `None` if the word is not a Unicode scalar value.
#[inline]
pub fn word_to_char(word: Word) -> Option<char> {
    u32::try_from(word).ok().and_then(char::from_u32)
}
