//! Type descriptors and type templates.
//!
//! A [`TypeInfo`] is a fully instantiated type: a constructor plus argument
//! descriptors. It is immutable and reference counted, so the same descriptor
//! can describe any number of values and can be handed out without copying.
//!
//! A [`PseudoTypeInfo`] is the compile-time template of a type, as stored in
//! layout tables. It may mention the enclosing constructor's parameters
//! (universal variables) or variables bound by one alternative
//! (existential variables). Turning a template into a `TypeInfo` is
//! substitution; see [`PseudoTypeInfo::substitute`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::RttiError;
use crate::id::TypeCtorId;

/// A shared, immutable type descriptor.
#[derive(Clone)]
pub struct TypeInfo(Arc<TypeInfoData>);

struct TypeInfoData {
    ctor: TypeCtorId,
    args: Box<[TypeInfo]>,
}

impl TypeInfo {
    /// Create a descriptor for `ctor` applied to `args`.
    ///
    /// For variable-arity constructors (tuples, closures) the argument count
    /// is the arity of this instance.
    pub fn new(ctor: TypeCtorId, args: impl Into<Box<[TypeInfo]>>) -> Self {
        TypeInfo(Arc::new(TypeInfoData {
            ctor,
            args: args.into(),
        }))
    }

    /// Create a descriptor for a constructor with no arguments.
    pub fn ground(ctor: TypeCtorId) -> Self {
        Self::new(ctor, Vec::new())
    }

    /// `int`.
    pub fn int() -> Self {
        Self::ground(TypeCtorId::INT)
    }

    /// `character`.
    pub fn char() -> Self {
        Self::ground(TypeCtorId::CHAR)
    }

    /// `float`.
    pub fn float() -> Self {
        Self::ground(TypeCtorId::FLOAT)
    }

    /// `string`.
    pub fn string() -> Self {
        Self::ground(TypeCtorId::STRING)
    }

    /// `univ`.
    pub fn univ() -> Self {
        Self::ground(TypeCtorId::UNIV)
    }

    /// `{T1, ..., Tn}`.
    pub fn tuple(elems: impl Into<Box<[TypeInfo]>>) -> Self {
        Self::new(TypeCtorId::TUPLE, elems)
    }

    /// `array(T)`.
    pub fn array(elem: TypeInfo) -> Self {
        Self::new(TypeCtorId::ARRAY, vec![elem])
    }

    /// `pred(T1, ..., Tn)`.
    pub fn pred(params: impl Into<Box<[TypeInfo]>>) -> Self {
        Self::new(TypeCtorId::PRED, params)
    }

    /// `func(T1, ..., Tn) = R`; the return type is the last argument.
    pub fn func(params: impl Into<Box<[TypeInfo]>>) -> Self {
        Self::new(TypeCtorId::FUNC, params)
    }

    /// The constructor this descriptor instantiates.
    #[inline]
    pub fn ctor(&self) -> TypeCtorId {
        self.0.ctor
    }

    /// Argument descriptors, in declaration order.
    #[inline]
    pub fn args(&self) -> &[TypeInfo] {
        &self.0.args
    }

    /// Number of arguments of this instance.
    #[inline]
    pub fn arity(&self) -> usize {
        self.0.args.len()
    }

    /// Check if two handles share the same descriptor allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || (self.0.ctor == other.0.ctor && self.0.args == other.0.args)
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.ctor.hash(state);
        self.0.args.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.ctor.raw())?;
        if !self.0.args.is_empty() {
            f.debug_list().entries(self.0.args.iter()).finish()?;
        }
        Ok(())
    }
}

/// A type variable in a template.
///
/// Indices are zero-based. Universal variables index the enclosing type's
/// argument vector; existential variables index the alternative's
/// [`ExistInfo`](crate::ExistInfo) locations.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeVar {
    /// Parameter of the enclosing type constructor.
    Universal(u16),
    /// Variable bound by one alternative and recorded in witness words.
    Existential(u16),
}

/// Compile-time template of a type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PseudoTypeInfo {
    /// A type variable.
    Var(TypeVar),
    /// A constructor applied to templates.
    App {
        ctor: TypeCtorId,
        args: Box<[PseudoTypeInfo]>,
    },
}

impl PseudoTypeInfo {
    /// The `n`th parameter of the enclosing type.
    pub const fn param(n: u16) -> Self {
        PseudoTypeInfo::Var(TypeVar::Universal(n))
    }

    /// The `n`th existentially bound variable of the alternative.
    pub const fn exist(n: u16) -> Self {
        PseudoTypeInfo::Var(TypeVar::Existential(n))
    }

    /// A constructor applied to templates.
    pub fn app(ctor: TypeCtorId, args: impl Into<Box<[PseudoTypeInfo]>>) -> Self {
        PseudoTypeInfo::App {
            ctor,
            args: args.into(),
        }
    }

    /// A constructor with no arguments.
    pub fn ground(ctor: TypeCtorId) -> Self {
        Self::app(ctor, Vec::new())
    }

    /// Check if the template mentions no type variables.
    pub fn is_ground(&self) -> bool {
        match self {
            PseudoTypeInfo::Var(_) => false,
            PseudoTypeInfo::App { args, .. } => args.iter().all(PseudoTypeInfo::is_ground),
        }
    }

    /// Visit every type variable mentioned by the template.
    pub fn for_each_var(&self, f: &mut impl FnMut(TypeVar)) {
        match self {
            PseudoTypeInfo::Var(var) => f(*var),
            PseudoTypeInfo::App { args, .. } => {
                for arg in args.iter() {
                    arg.for_each_var(f);
                }
            }
        }
    }

    /// Build the descriptor of a ground template.
    pub fn to_ground(&self) -> Option<TypeInfo> {
        match self {
            PseudoTypeInfo::Var(_) => None,
            PseudoTypeInfo::App { ctor, args } => {
                let args = args
                    .iter()
                    .map(PseudoTypeInfo::to_ground)
                    .collect::<Option<Vec<_>>>()?;
                Some(TypeInfo::new(*ctor, args))
            }
        }
    }

    /// Instantiate the template, asking `resolve` for every variable.
    pub fn substitute<E>(
        &self,
        resolve: &mut impl FnMut(TypeVar) -> Result<TypeInfo, E>,
    ) -> Result<TypeInfo, E> {
        match self {
            PseudoTypeInfo::Var(var) => resolve(*var),
            PseudoTypeInfo::App { ctor, args } => {
                let args = args
                    .iter()
                    .map(|arg| arg.substitute(resolve))
                    .collect::<Result<Vec<_>, E>>()?;
                Ok(TypeInfo::new(*ctor, args))
            }
        }
    }

    /// Instantiate a template that mentions only universal variables.
    pub fn instantiate(&self, params: &[TypeInfo]) -> Result<TypeInfo, RttiError> {
        self.substitute(&mut |var| match var {
            TypeVar::Universal(n) => {
                params
                    .get(usize::from(n))
                    .cloned()
                    .ok_or(RttiError::MissingTypeParam {
                        index: n,
                        available: params.len(),
                    })
            }
            TypeVar::Existential(n) => Err(RttiError::UnboundExistential { index: n }),
        })
    }
}

/// An argument type as stored in layout tables.
///
/// Ground templates are resolved once when the table is built, so decoding
/// a ground argument never allocates or substitutes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArgType {
    /// Statically ground; shared by every value.
    Ground(TypeInfo),
    /// Mentions type variables; instantiated per value.
    Poly(PseudoTypeInfo),
}

impl ArgType {
    /// The underlying template, for the polymorphic case.
    pub fn template(&self) -> Option<&PseudoTypeInfo> {
        match self {
            ArgType::Ground(_) => None,
            ArgType::Poly(template) => Some(template),
        }
    }

    /// Check if this argument type is statically ground.
    pub fn is_ground(&self) -> bool {
        matches!(self, ArgType::Ground(_))
    }

    /// Resolve against the enclosing type's argument vector.
    pub fn instantiate(&self, params: &[TypeInfo]) -> Result<TypeInfo, RttiError> {
        match self {
            ArgType::Ground(ty) => Ok(ty.clone()),
            ArgType::Poly(template) => template.instantiate(params),
        }
    }
}

impl From<PseudoTypeInfo> for ArgType {
    fn from(template: PseudoTypeInfo) -> Self {
        match template.to_ground() {
            Some(ty) => ArgType::Ground(ty),
            None => ArgType::Poly(template),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
