//! Expansion configuration.

use std::fmt;

/// Default bound on nested equivalence and univ unwrapping.
pub const MAX_ALIAS_DEPTH: usize = 64;

/// How to treat values whose type has user-defined equality.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NoncanonHandling {
    /// Refuse to look inside; the caller gets a recoverable error.
    Abort,
    /// Report a synthesized functor naming the type, with no arguments.
    Allow,
    /// Decode the underlying representation; the caller promises the result
    /// is only used in a committed-choice context.
    Cc,
}

impl NoncanonHandling {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Allow => "allow",
            Self::Cc => "cc",
        }
    }
}

impl fmt::Display for NoncanonHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for the expander.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExpandConfig {
    /// Treat closures as `Allow` under every policy.
    /// Defaults to `false`.
    pub canonicalize_closures: bool,

    /// Maximum nesting of equivalence and univ unwrapping before giving up.
    /// Defaults to [`MAX_ALIAS_DEPTH`].
    pub max_alias_depth: usize,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            canonicalize_closures: false,
            max_alias_depth: MAX_ALIAS_DEPTH,
        }
    }
}

impl ExpandConfig {
    /// Create a config with closure canonicalization switched on or off.
    pub fn with_canonicalize_closures(canonicalize_closures: bool) -> Self {
        Self {
            canonicalize_closures,
            ..Default::default()
        }
    }

    /// Create a config with the specified alias depth bound.
    pub fn with_max_alias_depth(max_alias_depth: usize) -> Self {
        Self {
            max_alias_depth,
            ..Default::default()
        }
    }

    /// Read overrides from the environment.
    ///
    /// `TERN_CANONICALIZE_CLOSURES` switches closure canonicalization on when
    /// set to anything but `0` or `false`. `TERN_MAX_ALIAS_DEPTH` replaces the
    /// depth bound when it parses as a number.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = var("TERN_CANONICALIZE_CLOSURES") {
            config.canonicalize_closures = !matches!(value.trim(), "0" | "false" | "");
        }
        if let Some(value) = var("TERN_MAX_ALIAS_DEPTH") {
            match value.trim().parse() {
                Ok(depth) => config.max_alias_depth = depth,
                Err(_) => tracing::warn!(%value, "ignoring unparsable TERN_MAX_ALIAS_DEPTH"),
            }
        }
        config
    }
}
