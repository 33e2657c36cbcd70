//! Result types for a compilation run.

use toy_diagnostic::Diagnostic;
use toy_ir::Module;

/// What came out of one input unit.
#[derive(Clone, Debug)]
pub struct UnitOutput {
    /// Unit name as written by the front end.
    pub name: String,
    /// The lowered module, or `None` if lowering was aborted by an
    /// internal error.
    pub module: Option<Module>,
}

/// Result of lowering a batch of units.
#[derive(Clone, Debug, Default)]
pub struct CompileOutput {
    /// One entry per input unit, in input order.
    pub units: Vec<UnitOutput>,
    /// Diagnostics from every unit, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Lowered modules, skipping aborted units.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.units.iter().filter_map(|unit| unit.module.as_ref())
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.units
            .iter()
            .find(|unit| unit.name == name)
            .and_then(|unit| unit.module.as_ref())
    }
}
