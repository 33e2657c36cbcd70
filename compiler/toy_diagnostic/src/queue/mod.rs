//! Diagnostic sinks.
//!
//! [`DiagnosticSink`] is the single seam through which lowering reports
//! problems. [`DiagnosticQueue`] is the accumulating implementation used by
//! the driver: it keeps diagnostics in emission order, counts errors, and
//! stops storing once an optional error limit is reached.

use toy_syntax::Span;

use crate::{Diagnostic, ErrorCode, ErrorGuaranteed};

/// Receiver of diagnostics. Emitting never fails and never aborts the
/// caller.
pub trait DiagnosticSink {
    fn emit(&mut self, diag: Diagnostic);

    /// Emit an error diagnostic and get proof it was emitted.
    fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diag.is_error(), "emit_error called with a non-error");
        self.emit(diag);
        ErrorGuaranteed::new()
    }
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Diagnostic),
{
    fn emit(&mut self, diag: Diagnostic) {
        self(diag);
    }
}

/// Accumulating sink with an optional error limit.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::with_limit(20);
/// lower_unit(&unit, &interner, &config, &mut queue)?;
/// let diagnostics = queue.flush();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Count of errors (not warnings/notes), including dropped ones.
    error_count: usize,
    /// Diagnostics dropped because the limit was reached.
    dropped: usize,
    /// Maximum number of stored errors (0 = unlimited).
    error_limit: usize,
}

impl DiagnosticQueue {
    /// Create an unlimited queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue that stores at most `error_limit` errors
    /// (0 = unlimited).
    pub fn with_limit(error_limit: usize) -> Self {
        DiagnosticQueue {
            error_limit,
            ..Self::default()
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if it was stored, `false` if it was dropped because
    /// the error limit had been reached. Dropped errors are still counted.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        let stored = !self.limit_reached();
        if diag.is_error() {
            self.error_count += 1;
        }
        if stored {
            self.diagnostics.push(diag);
        } else {
            self.dropped += 1;
        }
        stored
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.error_limit > 0 && self.error_count >= self.error_limit
    }

    /// Get the number of errors reported, stored or not.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Check if any errors were emitted and get proof if so.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Return the stored diagnostics in emission order and reset the queue.
    ///
    /// If anything was dropped, a trailing "too many errors" diagnostic
    /// records how many.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut result = std::mem::take(&mut self.diagnostics);
        if self.dropped > 0 {
            result.push(too_many_errors(self.error_limit, self.dropped));
        }
        self.error_count = 0;
        self.dropped = 0;
        result
    }
}

impl DiagnosticSink for DiagnosticQueue {
    fn emit(&mut self, diag: Diagnostic) {
        self.add(diag);
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
pub fn too_many_errors(limit: usize, dropped: usize) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!(
            "error limit of {limit} reached; {dropped} further diagnostic(s) suppressed"
        ))
        .with_label(Span::DUMMY, "error limit reached")
        .with_note("raise `error_limit` in the compile configuration to see them")
}
