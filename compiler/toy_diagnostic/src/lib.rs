//! Diagnostic system for the lowering pipeline.
//!
//! Every phase reports problems the same way: build a [`Diagnostic`] with
//! an [`ErrorCode`], a message and a primary label, then hand it to a
//! [`DiagnosticSink`]. Reporting never aborts the caller; the sink decides
//! whether to keep, count or drop what it receives.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is proof that at least one error was emitted. Code
//! that abandons a declaration after reporting returns it, so a failure
//! path cannot forget to tell the user why.
//!
//! ```text
//! let guarantee = sink.emit_error(diagnostic);
//! return Err(LowerError::Reported(guarantee));
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{internal_error, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticQueue, DiagnosticSink};
