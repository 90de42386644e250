//! Generic term deconstruction for the Tern runtime.
//!
//! Given a value word and its type descriptor, [`Expander::expand`] reports
//! the value's functor, its arity and, on request, its arguments together
//! with each argument's own type descriptor. It is the one operation behind
//! printing, structural comparison, serialization and debugger views.
//!
//! # Query Modes
//!
//! | Mode                   | Functor | Arity | Arguments                    |
//! |------------------------|---------|-------|------------------------------|
//! | `NoArgs`               | opt     | yes   | none                         |
//! | `AllArgs(None)`        | opt     | yes   | all, with types              |
//! | `AllArgs(Some(cap))`   | opt     | yes   | all, or `LimitExceeded`      |
//! | `ArgByIndex(i)`        | opt     | yes   | one, or `ChosenNotFound`     |
//! | `ArgByName(name)`      | opt     | yes   | one, or `ChosenNotFound`     |
//!
//! # Noncanonical Values
//!
//! Values of types with user-defined equality, closures and type-level
//! metadata have no canonical structure. [`NoncanonHandling`] chooses
//! between refusing them, reporting an opaque placeholder, and exposing the
//! concrete representation.
//!
//! # Tracing
//!
//! Set `RUST_LOG=tern_expand=trace` and call [`init_tracing`] to see every
//! classification and alias step.

mod args;
mod config;
mod decode;
mod error;
mod exist;
mod expander;
mod query;
mod render;
mod result;

use std::sync::Once;

pub use config::{ExpandConfig, NoncanonHandling, MAX_ALIAS_DEPTH};
pub use error::{ExpandError, Fault};
pub use expander::Expander;
pub use query::QueryMode;
pub use render::{render_char, render_float, render_int, render_string};
pub use result::{ArgData, ChosenArg, ExpandedArgs, Expansion};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for the engine.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
