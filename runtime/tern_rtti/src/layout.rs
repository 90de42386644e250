//! Per-representation layout tables.
//!
//! These are the compile-time tables a [`TypeCtorDesc`](crate::TypeCtorDesc)
//! carries next to its [`TypeCtorRep`](crate::TypeCtorRep). Each table is
//! validated once when it is built; the deconstruction engine then indexes
//! into it without re-checking invariants that the constructors here enforce.
//!
//! # Discriminated Unions
//!
//! A DU value's primary tag selects a [`PtagLayout`]. The layout's
//! [`SectagLocn`] says where the secondary tag lives:
//!
//! | Locn       | Secondary tag          | Arguments start at |
//! |------------|------------------------|--------------------|
//! | `None`     | absent (one functor)   | body word 0        |
//! | `Local`    | payload bits           | (nullary only)     |
//! | `Remote`   | body word 0            | body word 1        |
//! | `Variable` | unresolved solver term | (no functor)       |
//!
//! Arguments of an alternative with existentially quantified variables are
//! preceded by [`ExistInfo::extra_words`] witness words.

use thiserror::Error;

use crate::type_info::{ArgType, PseudoTypeInfo, TypeVar};
use crate::word::{Word, HEAP_BASE, MIN_POINTER_WORD, NUM_PTAGS, STATIC_BASE, TAG_BITS};

/// A malformed layout table.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LayoutError {
    #[error("enum has no constants")]
    EmptyEnum,
    #[error("functor `{functor}` uses primary tag {ptag}, only {NUM_PTAGS} exist")]
    PtagOutOfRange { functor: String, ptag: u8 },
    #[error("primary tag {ptag} mixes secondary tag locations")]
    MixedSectagLocn { ptag: u8 },
    #[error("primary tag {ptag} has no secondary tag but is shared by several functors")]
    SharedUntaggedPtag { ptag: u8 },
    #[error("primary tag {ptag} has no functor with secondary tag {sectag}")]
    SectagGap { ptag: u8, sectag: u32 },
    #[error("functor `{functor}` has a local secondary tag but {arity} arguments")]
    LocalWithArgs { functor: String, arity: usize },
    #[error("functor `{functor}` uses the variable secondary tag location")]
    VariableFunctor { functor: String },
    #[error("primary tag {ptag} is reserved for variables but used by functors")]
    VariablePtagInUse { ptag: u8 },
    #[error("functor `{functor}` mentions type parameter {index}, constructor has {arity}")]
    ParamOutOfRange {
        functor: String,
        index: u16,
        arity: u16,
    },
    #[error("functor `{functor}` mentions existential variable {index} with no witness location")]
    ExistVarUnbound { functor: String, index: u16 },
    #[error("functor `{functor}` locates a witness in slot {slot}, only {extra} witness words")]
    ExistSlotOutOfRange {
        functor: String,
        slot: u16,
        extra: usize,
    },
    #[error("layout was built for {found} type parameters, constructor has {expected}")]
    ArityMismatch { expected: u16, found: u16 },
    #[error("{count} numeric reserved addresses overlap the pointer range")]
    TooManyNumericAddrs { count: usize },
    #[error("symbolic reserved address {word:#x} is not a static sentinel")]
    NotStaticSentinel { word: Word },
}

// ── Enum ────────────────────────────────────────────────────────────

/// Constants of an enumeration, indexed by the value word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumLayout {
    names: Box<[Box<str>]>,
}

impl EnumLayout {
    pub fn new<S: Into<Box<str>>>(names: impl IntoIterator<Item = S>) -> Result<Self, LayoutError> {
        let names: Box<[Box<str>]> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(LayoutError::EmptyEnum);
        }
        Ok(EnumLayout { names })
    }

    /// Name of the constant a value word denotes.
    pub fn functor(&self, word: Word) -> Option<&str> {
        let index = usize::try_from(word).ok()?;
        self.names.get(index).map(AsRef::as_ref)
    }

    /// Number of constants.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: empty enums are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ── Discriminated unions ────────────────────────────────────────────

/// Where a primary tag's secondary tag is stored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SectagLocn {
    /// One functor owns the primary tag.
    None,
    /// Secondary tag is packed into the payload bits (nullary functors).
    Local,
    /// Secondary tag is the first word of the cell body.
    Remote,
    /// The primary tag marks an unresolved solver variable.
    Variable,
}

/// Where an existentially bound type variable's descriptor is found.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExistLocn {
    /// The witness word at `slot` is the type descriptor itself.
    Plain { slot: u16 },
    /// The witness word at `slot` is a type-class witness; the descriptor is
    /// its `index`th type argument.
    InTypeclassInfo { slot: u16, index: u16 },
}

impl ExistLocn {
    /// The witness slot this location reads.
    pub fn slot(self) -> u16 {
        match self {
            ExistLocn::Plain { slot } | ExistLocn::InTypeclassInfo { slot, .. } => slot,
        }
    }
}

/// Existential quantification metadata of one alternative.
///
/// The witness words are laid out as `typeinfos_plain` type descriptors
/// followed by `tcis` type-class witnesses, immediately before the visible
/// arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExistInfo {
    typeinfos_plain: u16,
    tcis: u16,
    locns: Box<[ExistLocn]>,
}

impl ExistInfo {
    /// Build from the location of each existential variable, in variable order.
    pub fn new(locns: Vec<ExistLocn>, tcis: u16) -> Self {
        let mut plain = 0u16;
        for locn in &locns {
            if let ExistLocn::Plain { .. } = locn {
                plain += 1;
            }
        }
        ExistInfo {
            typeinfos_plain: plain,
            tcis,
            locns: locns.into_boxed_slice(),
        }
    }

    /// Type descriptors stored directly as witness words.
    pub fn typeinfos_plain(&self) -> u16 {
        self.typeinfos_plain
    }

    /// Type-class witness words.
    pub fn tcis(&self) -> u16 {
        self.tcis
    }

    /// Number of witness words preceding the visible arguments.
    pub fn extra_words(&self) -> usize {
        usize::from(self.typeinfos_plain) + usize::from(self.tcis)
    }

    /// Location of existential variable `var`.
    pub fn locn(&self, var: u16) -> Option<ExistLocn> {
        self.locns.get(usize::from(var)).copied()
    }
}

/// One alternative of a discriminated union.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuFunctorDesc {
    name: Box<str>,
    ptag: u8,
    sectag_locn: SectagLocn,
    sectag: u32,
    arg_types: Vec<ArgType>,
    arg_names: Vec<Option<Box<str>>>,
    exist_info: Option<ExistInfo>,
}

impl DuFunctorDesc {
    pub fn new(name: impl Into<Box<str>>, ptag: u8, sectag_locn: SectagLocn, sectag: u32) -> Self {
        DuFunctorDesc {
            name: name.into(),
            ptag,
            sectag_locn,
            sectag,
            arg_types: Vec::new(),
            arg_names: Vec::new(),
            exist_info: None,
        }
    }

    /// A functor that owns its primary tag outright.
    pub fn untagged(name: impl Into<Box<str>>, ptag: u8) -> Self {
        Self::new(name, ptag, SectagLocn::None, 0)
    }

    /// A nullary functor packed into the payload bits.
    pub fn local(name: impl Into<Box<str>>, ptag: u8, sectag: u32) -> Self {
        Self::new(name, ptag, SectagLocn::Local, sectag)
    }

    /// A functor whose secondary tag is the first body word.
    pub fn remote(name: impl Into<Box<str>>, ptag: u8, sectag: u32) -> Self {
        Self::new(name, ptag, SectagLocn::Remote, sectag)
    }

    /// Append an unnamed argument.
    #[must_use]
    pub fn with_arg(mut self, arg_type: PseudoTypeInfo) -> Self {
        self.arg_types.push(arg_type.into());
        self.arg_names.push(None);
        self
    }

    /// Append a named argument.
    #[must_use]
    pub fn with_named_arg(mut self, name: impl Into<Box<str>>, arg_type: PseudoTypeInfo) -> Self {
        self.arg_types.push(arg_type.into());
        self.arg_names.push(Some(name.into()));
        self
    }

    /// Attach existential quantification metadata.
    #[must_use]
    pub fn with_exist_info(mut self, exist_info: ExistInfo) -> Self {
        self.exist_info = Some(exist_info);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of visible arguments.
    pub fn arity(&self) -> usize {
        self.arg_types.len()
    }

    pub fn ptag(&self) -> u8 {
        self.ptag
    }

    pub fn sectag_locn(&self) -> SectagLocn {
        self.sectag_locn
    }

    pub fn sectag(&self) -> u32 {
        self.sectag
    }

    pub fn arg_types(&self) -> &[ArgType] {
        &self.arg_types
    }

    pub fn arg_name(&self, index: usize) -> Option<&str> {
        self.arg_names.get(index)?.as_deref()
    }

    /// Index of the first argument declared with `name`.
    pub fn find_arg(&self, name: &str) -> Option<usize> {
        self.arg_names
            .iter()
            .position(|arg_name| arg_name.as_deref() == Some(name))
    }

    pub fn exist_info(&self) -> Option<&ExistInfo> {
        self.exist_info.as_ref()
    }

    /// Number of witness words preceding the visible arguments.
    pub fn extra_words(&self) -> usize {
        self.exist_info.as_ref().map_or(0, ExistInfo::extra_words)
    }

    fn validate(&self, ctor_arity: u16) -> Result<(), LayoutError> {
        if usize::from(self.ptag) >= NUM_PTAGS {
            return Err(LayoutError::PtagOutOfRange {
                functor: self.name.to_string(),
                ptag: self.ptag,
            });
        }
        match self.sectag_locn {
            SectagLocn::Local if !self.arg_types.is_empty() || self.extra_words() > 0 => {
                return Err(LayoutError::LocalWithArgs {
                    functor: self.name.to_string(),
                    arity: self.arg_types.len() + self.extra_words(),
                });
            }
            SectagLocn::Variable => {
                return Err(LayoutError::VariableFunctor {
                    functor: self.name.to_string(),
                });
            }
            _ => {}
        }

        let extra = self.extra_words();
        if let Some(info) = &self.exist_info {
            for locn in info.locns.iter() {
                if usize::from(locn.slot()) >= extra {
                    return Err(LayoutError::ExistSlotOutOfRange {
                        functor: self.name.to_string(),
                        slot: locn.slot(),
                        extra,
                    });
                }
            }
        }

        for template in self.arg_types.iter().filter_map(ArgType::template) {
            check_template(&self.name, template, ctor_arity, self.exist_info.as_ref())?;
        }
        Ok(())
    }
}

/// Check that `template` only mentions variables its context can bind.
pub(crate) fn check_template(
    functor: &str,
    template: &PseudoTypeInfo,
    ctor_arity: u16,
    exist_info: Option<&ExistInfo>,
) -> Result<(), LayoutError> {
    let mut problem = None;
    template.for_each_var(&mut |var| {
        if problem.is_some() {
            return;
        }
        match var {
            TypeVar::Universal(index) if index >= ctor_arity => {
                problem = Some(LayoutError::ParamOutOfRange {
                    functor: functor.to_string(),
                    index,
                    arity: ctor_arity,
                });
            }
            TypeVar::Existential(index) if exist_info.and_then(|i| i.locn(index)).is_none() => {
                problem = Some(LayoutError::ExistVarUnbound {
                    functor: functor.to_string(),
                    index,
                });
            }
            _ => {}
        }
    });
    problem.map_or(Ok(()), Err)
}

/// Alternatives sharing one primary tag, indexed by secondary tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PtagLayout {
    sectag_locn: SectagLocn,
    alternatives: Box<[u32]>,
}

impl PtagLayout {
    pub fn sectag_locn(&self) -> SectagLocn {
        self.sectag_locn
    }

    /// Number of alternatives under this primary tag.
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

/// Layout of a discriminated union: functors plus per-primary-tag dispatch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuLayout {
    functors: Box<[DuFunctorDesc]>,
    ptags: Box<[Option<PtagLayout>]>,
    ctor_arity: u16,
}

impl DuLayout {
    /// Build the dispatch table for `functors`, given in declaration order.
    ///
    /// `ctor_arity` bounds the type parameters argument templates may mention.
    pub fn new(functors: Vec<DuFunctorDesc>, ctor_arity: u16) -> Result<Self, LayoutError> {
        let mut groups: Vec<Vec<(u32, u32)>> = vec![Vec::new(); NUM_PTAGS];
        let mut locns: Vec<Option<SectagLocn>> = vec![None; NUM_PTAGS];

        for (ordinal, functor) in functors.iter().enumerate() {
            functor.validate(ctor_arity)?;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "functor counts are bounded by the u32 sectag space"
            )]
            let ordinal = ordinal as u32;

            let ptag = functor.ptag;
            let slot = usize::from(ptag);
            match locns[slot] {
                Some(locn) if locn != functor.sectag_locn => {
                    return Err(LayoutError::MixedSectagLocn { ptag });
                }
                _ => locns[slot] = Some(functor.sectag_locn),
            }
            groups[slot].push((functor.sectag, ordinal));
        }

        let mut ptags = Vec::with_capacity(NUM_PTAGS);
        for (slot, (mut group, locn)) in groups.into_iter().zip(locns).enumerate() {
            #[expect(clippy::cast_possible_truncation, reason = "slot < NUM_PTAGS")]
            let ptag = slot as u8;
            let Some(sectag_locn) = locn else {
                ptags.push(None);
                continue;
            };
            if sectag_locn == SectagLocn::None && group.len() > 1 {
                return Err(LayoutError::SharedUntaggedPtag { ptag });
            }
            group.sort_unstable();
            if sectag_locn != SectagLocn::None {
                for (expected, &(sectag, _)) in group.iter().enumerate() {
                    if usize::try_from(sectag).ok() != Some(expected) {
                        #[expect(
                            clippy::cast_possible_truncation,
                            reason = "expected is bounded by the group length"
                        )]
                        let sectag = expected as u32;
                        return Err(LayoutError::SectagGap { ptag, sectag });
                    }
                }
            }
            ptags.push(Some(PtagLayout {
                sectag_locn,
                alternatives: group.into_iter().map(|(_, ordinal)| ordinal).collect(),
            }));
        }

        Ok(DuLayout {
            functors: functors.into_boxed_slice(),
            ptags: ptags.into_boxed_slice(),
            ctor_arity,
        })
    }

    /// Reserve `ptag` for unresolved solver variables.
    pub fn with_variable_ptag(mut self, ptag: u8) -> Result<Self, LayoutError> {
        let slot = usize::from(ptag);
        if slot >= NUM_PTAGS {
            return Err(LayoutError::PtagOutOfRange {
                functor: "<<variable>>".to_string(),
                ptag,
            });
        }
        if self.ptags[slot].is_some() {
            return Err(LayoutError::VariablePtagInUse { ptag });
        }
        self.ptags[slot] = Some(PtagLayout {
            sectag_locn: SectagLocn::Variable,
            alternatives: Box::new([]),
        });
        Ok(self)
    }

    /// Number of type parameters the argument templates were checked against.
    pub fn ctor_arity(&self) -> u16 {
        self.ctor_arity
    }

    /// All functors, in declaration order.
    pub fn functors(&self) -> &[DuFunctorDesc] {
        &self.functors
    }

    /// Dispatch entry for a primary tag.
    pub fn ptag(&self, ptag: u8) -> Option<&PtagLayout> {
        self.ptags.get(usize::from(ptag))?.as_ref()
    }

    /// The functor selected by a primary/secondary tag pair.
    pub fn alternative(&self, ptag: u8, sectag: Word) -> Option<&DuFunctorDesc> {
        let layout = self.ptag(ptag)?;
        let index = usize::try_from(sectag).ok()?;
        let ordinal = *layout.alternatives.get(index)?;
        self.functors.get(usize::try_from(ordinal).ok()?)
    }

    /// Look a functor up by name.
    pub fn functor_named(&self, name: &str) -> Option<&DuFunctorDesc> {
        self.functors.iter().find(|functor| functor.name() == name)
    }
}

// ── Reserved addresses ──────────────────────────────────────────────

/// A discriminated union whose nullary alternatives are encoded as small
/// integers or static sentinel pointers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReservedAddrLayout {
    numeric: Box<[Box<str>]>,
    symbolic: Box<[(Word, Box<str>)]>,
    other: DuLayout,
}

impl ReservedAddrLayout {
    /// `numeric[i]` is encoded as the word `i`; each symbolic constant is
    /// encoded as its sentinel word; everything else is decoded with `other`.
    pub fn new<S: Into<Box<str>>>(
        numeric: impl IntoIterator<Item = S>,
        symbolic: Vec<(Word, String)>,
        other: DuLayout,
    ) -> Result<Self, LayoutError> {
        let numeric: Box<[Box<str>]> = numeric.into_iter().map(Into::into).collect();
        let count = numeric.len();
        if u64::try_from(count).map_or(true, |count| count > MIN_POINTER_WORD) {
            return Err(LayoutError::TooManyNumericAddrs { count });
        }
        for &(word, _) in &symbolic {
            let addr = word >> TAG_BITS;
            let in_static = addr >= STATIC_BASE as Word && addr < HEAP_BASE as Word;
            if !in_static || word & ((1 << TAG_BITS) - 1) != 0 {
                return Err(LayoutError::NotStaticSentinel { word });
            }
        }
        Ok(ReservedAddrLayout {
            numeric,
            symbolic: symbolic
                .into_iter()
                .map(|(word, name)| (word, name.into_boxed_str()))
                .collect(),
            other,
        })
    }

    /// Name of the numeric constant encoded as `word`.
    pub fn numeric_constant(&self, word: Word) -> Option<&str> {
        let index = usize::try_from(word).ok()?;
        self.numeric.get(index).map(AsRef::as_ref)
    }

    /// Name of the symbolic constant encoded as `word`.
    pub fn symbolic_constant(&self, word: Word) -> Option<&str> {
        self.symbolic
            .iter()
            .find(|(sentinel, _)| *sentinel == word)
            .map(|(_, name)| name.as_ref())
    }

    /// Layout for values that are not reserved addresses.
    pub fn other(&self) -> &DuLayout {
        &self.other
    }
}

// ── No-tag wrappers ─────────────────────────────────────────────────

/// A single functor with a single argument, stored as the argument itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotagLayout {
    functor_name: Box<str>,
    arg_name: Option<Box<str>>,
    arg_type: ArgType,
}

impl NotagLayout {
    pub fn new(
        functor_name: impl Into<Box<str>>,
        arg_name: Option<&str>,
        arg_type: PseudoTypeInfo,
    ) -> Self {
        NotagLayout {
            functor_name: functor_name.into(),
            arg_name: arg_name.map(Into::into),
            arg_type: arg_type.into(),
        }
    }

    pub fn functor_name(&self) -> &str {
        &self.functor_name
    }

    pub fn arg_name(&self) -> Option<&str> {
        self.arg_name.as_deref()
    }

    pub fn arg_type(&self) -> &ArgType {
        &self.arg_type
    }
}

// ── Per-rep layout ──────────────────────────────────────────────────

/// The layout table of a type constructor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeLayout {
    /// Builtins, and constructors that were declared but never defined.
    None,
    Enum(EnumLayout),
    Du(DuLayout),
    ReservedAddr(ReservedAddrLayout),
    Notag(NotagLayout),
    /// Target of an equivalence.
    Equiv(ArgType),
}
