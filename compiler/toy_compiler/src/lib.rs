//! Driver for lowering typed units into toy IR modules.
//!
//! # Usage
//!
//! ```ignore
//! use toy_compiler::{CompileConfig, Compiler};
//!
//! let compiler = Compiler::new(&interner, CompileConfig::default());
//! let output = compiler.compile(&units);
//! for diag in &output.diagnostics {
//!     eprintln!("{diag}");
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! toy_syntax, toy_diagnostic, toy_ir
//!                 ↓
//!             toy_lower
//!                 ↓
//!           toy_compiler  ← this crate
//! ```

mod output;
mod pipeline;

pub use output::{CompileOutput, UnitOutput};
pub use pipeline::{CompileConfig, Compiler};
pub use toy_lower::{LowerConfig, Signedness};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=toy_lower=debug` or
/// `RUST_LOG=toy_lower=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
