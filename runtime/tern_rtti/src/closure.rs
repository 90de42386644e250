//! Closure layouts and procedure identities.
//!
//! A closure cell is `[layout, num_hidden, hidden_0, ..., hidden_n-1]`. The
//! layout word names a [`ClosureLayout`] in the type table, which records
//! where the closure's procedure came from and the types of its captured
//! (hidden) arguments.

use crate::type_info::PseudoTypeInfo;

/// Identity of the procedure a closure calls.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProcId {
    /// A procedure the user declared.
    User {
        module: Box<str>,
        name: Box<str>,
        arity: u16,
        mode: u16,
    },
    /// A procedure the compiler generated for a type (unify, compare, ...).
    Compiler {
        type_module: Box<str>,
        type_name: Box<str>,
        pred_name: Box<str>,
    },
    /// Identity unavailable, e.g. a dynamically linked procedure.
    Dynamic,
}

impl ProcId {
    /// The name reported as a closure's functor.
    pub fn display_name(&self) -> &str {
        match self {
            ProcId::User { name, .. } => name,
            ProcId::Compiler { pred_name, .. } => pred_name,
            ProcId::Dynamic => "dynlink_proc",
        }
    }
}

/// Static description of a closure's captured arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClosureLayout {
    proc_id: ProcId,
    arg_types: Box<[PseudoTypeInfo]>,
    type_params: Box<[u16]>,
}

impl ClosureLayout {
    pub fn new(proc_id: ProcId) -> Self {
        ClosureLayout {
            proc_id,
            arg_types: Box::new([]),
            type_params: Box::new([]),
        }
    }

    /// Types of the captured arguments, in capture order.
    ///
    /// Universal variables refer to the closure's type parameters.
    #[must_use]
    pub fn with_arg_types(mut self, arg_types: Vec<PseudoTypeInfo>) -> Self {
        self.arg_types = arg_types.into_boxed_slice();
        self
    }

    /// Captured slots holding the type descriptor of each type parameter.
    ///
    /// `type_params[n]` is the hidden-argument index whose word is the
    /// descriptor substituted for universal variable `n`.
    #[must_use]
    pub fn with_type_params(mut self, type_params: Vec<u16>) -> Self {
        self.type_params = type_params.into_boxed_slice();
        self
    }

    pub fn proc_id(&self) -> &ProcId {
        &self.proc_id
    }

    pub fn arg_types(&self) -> &[PseudoTypeInfo] {
        &self.arg_types
    }

    pub fn type_params(&self) -> &[u16] {
        &self.type_params
    }

    /// Number of captured arguments this layout describes.
    pub fn num_args(&self) -> usize {
        self.arg_types.len()
    }
}
