//! Arena heap.
//!
//! Cells are appended to one growable word vector and never freed; word
//! address `HEAP_BASE + i` is vector slot `i`. Type descriptors are interned
//! so equal descriptors share one cell.

use rustc_hash::FxHashMap;
use tern_rtti::word::{body, mkword, HEAP_BASE};
use tern_rtti::{ClosureLayoutId, DuFunctorDesc, RttiError, SectagLocn, TypeInfo, TypeTable, Word};

use crate::{TermStore, TypeInfoCell};

/// Number of header words in a type-descriptor cell.
const TYPE_INFO_HEADER: usize = 2;

/// An append-only store of runtime cells.
#[derive(Default)]
pub struct Heap {
    words: Vec<Word>,
    strings: Vec<Box<str>>,
    type_infos: Vec<TypeInfo>,
    interned: FxHashMap<TypeInfo, Word>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `cell` into the heap and return a pointer word tagged `ptag`.
    pub fn alloc_cell(&mut self, ptag: u8, cell: &[Word]) -> Word {
        let addr = HEAP_BASE + self.words.len();
        self.words.extend_from_slice(cell);
        mkword(ptag, addr as Word)
    }

    /// Build a value of a discriminated-union alternative.
    ///
    /// `witnesses` are the existential witness words the alternative expects
    /// before its visible `args`. Nullary alternatives with a local secondary
    /// tag need no cell.
    pub fn construct(&mut self, functor: &DuFunctorDesc, witnesses: &[Word], args: &[Word]) -> Word {
        match functor.sectag_locn() {
            SectagLocn::Local => mkword(functor.ptag(), Word::from(functor.sectag())),
            SectagLocn::Remote => {
                let mut cell = Vec::with_capacity(1 + witnesses.len() + args.len());
                cell.push(Word::from(functor.sectag()));
                cell.extend_from_slice(witnesses);
                cell.extend_from_slice(args);
                self.alloc_cell(functor.ptag(), &cell)
            }
            SectagLocn::None | SectagLocn::Variable => {
                let mut cell = Vec::with_capacity(witnesses.len() + args.len());
                cell.extend_from_slice(witnesses);
                cell.extend_from_slice(args);
                self.alloc_cell(functor.ptag(), &cell)
            }
        }
    }

    /// Intern a string.
    pub fn alloc_string(&mut self, s: &str) -> Word {
        let word = self.strings.len() as Word;
        self.strings.push(s.into());
        word
    }

    pub fn alloc_tuple(&mut self, elems: &[Word]) -> Word {
        self.alloc_cell(0, elems)
    }

    pub fn alloc_array(&mut self, elems: &[Word]) -> Word {
        let addr = HEAP_BASE + self.words.len();
        self.words.reserve(1 + elems.len());
        self.words.push(elems.len() as Word);
        self.words.extend_from_slice(elems);
        mkword(0, addr as Word)
    }

    /// Build a closure over the procedure described by `layout`.
    pub fn alloc_closure(&mut self, layout: ClosureLayoutId, hidden: &[Word]) -> Word {
        let mut cell = Vec::with_capacity(2 + hidden.len());
        cell.push(layout.to_word());
        cell.push(hidden.len() as Word);
        cell.extend_from_slice(hidden);
        self.alloc_cell(0, &cell)
    }

    /// Box `value` together with its type.
    pub fn alloc_univ(&mut self, table: &TypeTable, ty: &TypeInfo, value: Word) -> Result<Word, RttiError> {
        let type_word = self.alloc_type_info(table, ty)?;
        Ok(self.alloc_cell(0, &[type_word, value]))
    }

    /// Build a type-class witness whose instance carries the descriptors in
    /// `type_infos`.
    pub fn alloc_typeclass_info(&mut self, instance: Word, type_infos: &[Word]) -> Word {
        let mut cell = Vec::with_capacity(1 + type_infos.len());
        cell.push(instance);
        cell.extend_from_slice(type_infos);
        self.alloc_cell(0, &cell)
    }

    /// Store a type descriptor as a value, interning equal descriptors.
    ///
    /// The cell also records the descriptor with top-level equivalences
    /// expanded, so readers never need the table to collapse it.
    pub fn alloc_type_info(&mut self, table: &TypeTable, ty: &TypeInfo) -> Result<Word, RttiError> {
        if let Some(&word) = self.interned.get(ty) {
            return Ok(word);
        }

        let mut cell = vec![0; TYPE_INFO_HEADER];
        cell.reserve(ty.arity());
        for arg in ty.args() {
            cell.push(self.alloc_type_info(table, arg)?);
        }
        let collapsed = table.collapse_equivalences(ty)?;

        // Arguments may have grown the descriptor list; take the index last.
        cell[0] = self.type_infos.len() as Word;
        self.type_infos.push(ty.clone());
        let word = self.alloc_cell(0, &cell);
        self.interned.insert(ty.clone(), word);

        let collapsed_word = if collapsed == *ty {
            word
        } else {
            self.alloc_type_info(table, &collapsed)?
        };
        self.words[body(word) - HEAP_BASE + 1] = collapsed_word;

        tracing::trace!(ty = %table.format_type(ty), word, "interned type descriptor");
        Ok(word)
    }
}

impl TermStore for Heap {
    fn words(&self, addr: usize, len: usize) -> Option<&[Word]> {
        let start = addr.checked_sub(HEAP_BASE)?;
        self.words.get(start..start.checked_add(len)?)
    }

    fn string(&self, word: Word) -> Option<&str> {
        let index = usize::try_from(word).ok()?;
        self.strings.get(index).map(AsRef::as_ref)
    }

    fn type_info(&self, word: Word) -> Option<TypeInfoCell<'_>> {
        let addr = body(word);
        let header = self.words(addr, TYPE_INFO_HEADER)?;
        let type_info = self.type_infos.get(usize::try_from(header[0]).ok()?)?;
        let args = self.words(addr + TYPE_INFO_HEADER, type_info.arity())?;
        Some(TypeInfoCell {
            type_info,
            collapsed: header[1],
            args,
        })
    }
}
