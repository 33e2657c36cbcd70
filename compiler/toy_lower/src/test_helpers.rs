//! Shared test utilities for lowering tests. Only compiled in test builds.

use toy_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use toy_ir::{Function, Global, Module};
use toy_syntax::{StringInterner, Unit};

use crate::generator::Generator;
use crate::{lower_unit, LowerConfig};

/// Result of lowering a unit in a test.
pub(crate) struct Lowered {
    pub module: Module,
    pub diagnostics: Vec<Diagnostic>,
}

impl Lowered {
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.diagnostics.iter().map(|d| d.code).collect()
    }

    /// # Panics
    /// Panics if the module has no function `name`.
    pub fn func(&self, name: &str) -> &Function {
        match self.module.func_by_name(name) {
            Some(func) => func,
            None => panic!("no function `{name}` in module"),
        }
    }

    /// # Panics
    /// Panics if the module has no global `name`.
    pub fn global(&self, name: &str) -> &Global {
        match self.module.global_by_name(name) {
            Some(global) => global,
            None => panic!("no global `{name}` in module"),
        }
    }

    /// Render a type of the module.
    pub fn ty(&self, ty: &toy_ir::Type) -> String {
        self.module.types.display(ty).to_string()
    }
}

/// Lower `unit` with the default configuration (verification on).
pub(crate) fn lower(unit: &Unit, interner: &StringInterner) -> Lowered {
    lower_with(unit, interner, &LowerConfig::default().with_verify(true))
}

/// # Panics
/// Panics on an internal error.
pub(crate) fn lower_with(unit: &Unit, interner: &StringInterner, config: &LowerConfig) -> Lowered {
    let mut queue = DiagnosticQueue::new();
    let module = match lower_unit(unit, interner, config, &mut queue) {
        Ok(module) => module,
        Err(err) => panic!("internal error: {err}"),
    };
    Lowered {
        module,
        diagnostics: queue.flush(),
    }
}

/// Run `f` against a generator that has resolved types and indexed the
/// unit, without compiling bodies.
pub(crate) fn with_indexed<R>(
    unit: &Unit,
    interner: &StringInterner,
    f: impl FnOnce(&Generator<'_>) -> R,
) -> (R, Vec<Diagnostic>) {
    let config = LowerConfig::default();
    let mut queue = DiagnosticQueue::new();
    let result = {
        let mut generator = Generator::new(unit, &unit.info, interner, &config, &mut queue);
        generator.resolve_types();
        if let Err(err) = generator.index_unit() {
            panic!("internal error: {err}");
        }
        f(&generator)
    };
    (result, queue.flush())
}
