//! Type-level proof that an error was reported.

use std::fmt;

/// Proof that at least one error diagnostic was emitted.
///
/// Only the sinks in this crate construct one, so holding an
/// `ErrorGuaranteed` means a user-facing error already exists for the
/// failure being propagated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) const fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Recover the proof from an error count, e.g. after merging the
    /// results of several units.
    pub fn from_error_count(count: usize) -> Option<Self> {
        if count > 0 {
            Some(Self::new())
        } else {
            None
        }
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error(s) emitted")
    }
}
