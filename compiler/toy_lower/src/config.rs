//! Lowering configuration.

/// How integer division, remainder, right shift and ordering comparisons
/// pick between their signed and unsigned forms.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Signedness {
    /// Always the signed form (`sdiv`, `srem`, `slt`, ...), with `>>` as a
    /// logical shift.
    #[default]
    AssumeSigned,
    /// Follow the static type of the left operand: unsigned kinds select
    /// `udiv`/`urem`/`u*` predicates and a logical `>>`, signed kinds the
    /// signed forms and an arithmetic `>>`.
    FromSourceType,
}

/// Options for lowering one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LowerConfig {
    pub signedness: Signedness,
    /// Run the structural verifier on every lowered function body.
    pub verify: bool,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            signedness: Signedness::default(),
            verify: cfg!(debug_assertions),
        }
    }
}

impl LowerConfig {
    #[must_use]
    pub fn with_signedness(mut self, signedness: Signedness) -> Self {
        self.signedness = signedness;
        self
    }

    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}
