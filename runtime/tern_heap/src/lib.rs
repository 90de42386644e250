//! Term storage for Tern runtime values.
//!
//! The deconstruction engine never owns memory. It reads cells through the
//! [`TermStore`] trait, which is the whole of its contract with the memory
//! manager. [`Heap`] is an arena implementation that lays cells out the way
//! compiled code does:
//!
//! | Value                | Word                  | Cell body                          |
//! |----------------------|-----------------------|------------------------------------|
//! | DU alternative       | tagged `addr`         | `[sectag?] [witnesses] [args]`     |
//! | local-sectag constant| tagged `sectag`       | none                               |
//! | tuple                | `addr`                | `[elems]`                          |
//! | array                | `addr`                | `[size] [elems]`                   |
//! | closure              | `addr`                | `[layout] [num_hidden] [hidden]`   |
//! | univ                 | `addr`                | `[type_info] [value]`              |
//! | type descriptor      | `addr`                | `[index] [collapsed] [arg descs]`  |
//! | type-class witness   | `addr`                | `[instance] [type descs]`          |
//! | string               | string table index    | none                               |
//! | int / char / float   | unboxed               | none                               |

mod heap;

pub use heap::Heap;

use tern_rtti::{TypeInfo, Word};

/// A type descriptor stored as a value.
#[derive(Copy, Clone, Debug)]
pub struct TypeInfoCell<'a> {
    /// The described type.
    pub type_info: &'a TypeInfo,
    /// Word of the same type with top-level equivalences expanded.
    pub collapsed: Word,
    /// Descriptor words of the type's arguments.
    pub args: &'a [Word],
}

/// Read access to the cells runtime values point at.
///
/// Every lookup is fallible: a word that does not resolve is dangling, which
/// the engine reports as a metadata fault rather than reading garbage.
pub trait TermStore {
    /// `len` consecutive words starting at word address `addr`.
    fn words(&self, addr: usize, len: usize) -> Option<&[Word]>;

    /// The word at address `addr`.
    fn word(&self, addr: usize) -> Option<&Word> {
        self.words(addr, 1)?.first()
    }

    /// Contents of a string value.
    fn string(&self, word: Word) -> Option<&str>;

    /// The type descriptor a descriptor-valued word refers to.
    fn type_info(&self, word: Word) -> Option<TypeInfoCell<'_>>;
}
