//! Lowering of whole batches of units.
//!
//! Units arrive in dependency order and are lowered one after another by
//! [`Compiler::compile`]. Units known to be independent can instead go
//! through [`Compiler::compile_independent`], which lowers them on a rayon
//! pool. Each unit gets its own generator and diagnostic queue, and results
//! are merged back in input order, so both paths produce the same output.

use rayon::prelude::*;
use toy_diagnostic::{internal_error, Diagnostic, DiagnosticQueue};
use toy_lower::{lower_unit, LowerConfig};
use toy_syntax::{StringInterner, Unit};
use tracing::{debug, warn};

use crate::output::{CompileOutput, UnitOutput};

/// Configuration for a compilation run.
#[derive(Clone, Debug, Default)]
pub struct CompileConfig {
    /// Options passed to every unit's lowering.
    pub lower: LowerConfig,
    /// Maximum number of errors kept in the output (0 = unlimited).
    pub error_limit: usize,
}

/// Lowers units against one shared string interner.
pub struct Compiler<'a> {
    interner: &'a StringInterner,
    config: CompileConfig,
}

impl<'a> Compiler<'a> {
    pub fn new(interner: &'a StringInterner, config: CompileConfig) -> Self {
        Compiler { interner, config }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Lower `units` one at a time, in the order given.
    pub fn compile(&self, units: &[Unit]) -> CompileOutput {
        let lowered = units.iter().map(|unit| self.lower_one(unit)).collect();
        self.merge(lowered)
    }

    /// Lower units that do not depend on each other in parallel.
    ///
    /// Falls back to [`Compiler::compile`]'s sequential order if no thread
    /// pool can be created.
    pub fn compile_independent(&self, units: &[Unit]) -> CompileOutput {
        let lowered = rayon::ThreadPoolBuilder::new()
            .stack_size(16 * 1024 * 1024)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    units
                        .par_iter()
                        .map(|unit| self.lower_one(unit))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                warn!("failed to create thread pool ({e}), lowering sequentially");
                units.iter().map(|unit| self.lower_one(unit)).collect()
            });
        self.merge(lowered)
    }

    fn lower_one(&self, unit: &Unit) -> (UnitOutput, Vec<Diagnostic>) {
        let name = self.interner.lookup(unit.name).to_owned();
        let mut queue = DiagnosticQueue::new();
        let module = match lower_unit(unit, self.interner, &self.config.lower, &mut queue) {
            Ok(module) => Some(module),
            Err(error) => {
                warn!(unit = %name, %error, "lowering aborted");
                queue.add(internal_error(&name, &error));
                None
            }
        };
        (UnitOutput { name, module }, queue.flush())
    }

    fn merge(&self, lowered: Vec<(UnitOutput, Vec<Diagnostic>)>) -> CompileOutput {
        let mut queue = DiagnosticQueue::with_limit(self.config.error_limit);
        let mut units = Vec::with_capacity(lowered.len());
        for (unit, diagnostics) in lowered {
            for diag in diagnostics {
                queue.add(diag);
            }
            units.push(unit);
        }
        debug!(
            units = units.len(),
            errors = queue.error_count(),
            "compilation finished"
        );
        CompileOutput {
            units,
            diagnostics: queue.flush(),
        }
    }
}
