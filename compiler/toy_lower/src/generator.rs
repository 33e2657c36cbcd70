//! Per-unit lowering context.
//!
//! A [`Generator`] owns everything that lives for the lowering of one unit:
//! the type catalog, the symbol table and the module being built. It runs
//! the phases in order:
//!
//! 1. resolve type declarations (declare all, then define all);
//! 2. index functions and globals;
//! 3. compile: lower function bodies and global initializers in
//!    declaration order.
//!
//! Nothing is shared between generators, so independent units can be
//! lowered on different threads.

use toy_diagnostic::{DiagnosticSink, ErrorGuaranteed};
use toy_ir::{Module, Type};
use toy_syntax::{Decl, ExprId, Name, Span, StringInterner, TypeOracle, TypeSpec, Unit};
use tracing::{debug, trace};

use crate::catalog::TypeCatalog;
use crate::index::SymbolTable;
use crate::{InternalError, LowerConfig, LowerError, LowerProblem};

/// Lowering state for one unit.
pub struct Generator<'a> {
    pub(crate) unit: &'a Unit,
    pub(crate) oracle: &'a dyn TypeOracle,
    pub(crate) interner: &'a StringInterner,
    pub(crate) config: &'a LowerConfig,
    sink: &'a mut dyn DiagnosticSink,
    pub(crate) catalog: TypeCatalog<'a>,
    pub(crate) symbols: SymbolTable,
    pub(crate) module: Module,
}

impl<'a> Generator<'a> {
    pub fn new(
        unit: &'a Unit,
        oracle: &'a dyn TypeOracle,
        interner: &'a StringInterner,
        config: &'a LowerConfig,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            unit,
            oracle,
            interner,
            config,
            sink,
            catalog: TypeCatalog::new(interner),
            symbols: SymbolTable::default(),
            module: Module::new(interner.lookup(unit.name)),
        }
    }

    /// Lower the whole unit.
    ///
    /// Reported problems do not stop lowering; the module is returned with
    /// whatever declarations survived. Only an internal error aborts.
    pub fn run(mut self) -> Result<Module, InternalError> {
        debug!(unit = %self.module.name, "lowering unit");

        self.resolve_types();
        self.index_unit()?;
        self.compile_unit()?;

        let module = self.finish();
        debug!(
            unit = %module.name,
            types = module.types.len(),
            globals = module.globals.len(),
            funcs = module.funcs.len(),
            "lowered unit"
        );
        Ok(module)
    }

    // ── Reporting ──────────────────────────────────────────────

    /// Emit `problem` through the sink.
    pub(crate) fn report(&mut self, problem: LowerProblem) -> ErrorGuaranteed {
        trace!(code = %problem.code(), "reporting lowering problem");
        self.sink.emit_error(problem.to_diagnostic())
    }

    // ── Lookups ────────────────────────────────────────────────

    pub(crate) fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub(crate) fn span_of(&self, expr: ExprId) -> Span {
        self.unit.exprs.get(expr).span
    }

    /// The IR type of `expr` as recorded by the checker.
    ///
    /// A missing entry is an internal error: the checker records a type for
    /// every expression lowering asks about.
    pub(crate) fn type_of(&mut self, expr: ExprId) -> Result<Type, LowerError> {
        let oracle = self.oracle;
        let Some(ty) = oracle.type_of(expr) else {
            return Err(InternalError::MissingType { expr: expr.raw() }.into());
        };
        let span = self.span_of(expr);
        self.catalog
            .resolve(ty, span)
            .map_err(|problem| LowerError::Reported(self.report(problem)))
    }

    // ── Phases ─────────────────────────────────────────────────

    pub(crate) fn resolve_types(&mut self) {
        let unit = self.unit;
        let specs: Vec<&TypeSpec> = unit
            .decls()
            .filter_map(|(_, decl)| match decl {
                Decl::Type(spec) => Some(spec),
                _ => None,
            })
            .collect();

        let mut defined = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Some(previous) = self.catalog.lookup(spec.name) {
                let previous = self.catalog.declared_at(previous);
                self.report(LowerProblem::DuplicateSymbol {
                    name: self.name(spec.name).to_owned(),
                    span: spec.span,
                    previous,
                });
                continue;
            }
            let id = self.catalog.declare(spec.name, spec.span);
            trace!(name = self.name(spec.name), "declared type skeleton");
            defined.push((id, spec));
        }

        for (id, spec) in defined {
            if let Err(problem) = self.catalog.define(id, &spec.ty, spec.span) {
                self.report(problem);
            }
        }

        for problem in self.catalog.reject_recursive() {
            self.report(problem);
        }
    }

    fn compile_unit(&mut self) -> Result<(), InternalError> {
        let unit = self.unit;
        for (id, decl) in unit.decls() {
            let result = match decl {
                Decl::Func(func) => self.lower_func_decl(id, func),
                Decl::Var(spec) => self.init_globals(id, spec),
                Decl::Type(_) | Decl::Import(_) => Ok(()),
            };
            match result {
                Ok(()) | Err(LowerError::Reported(_)) => {}
                Err(LowerError::Internal(err)) => return Err(err),
            }
        }
        Ok(())
    }

    fn finish(self) -> Module {
        let mut module = self.module;
        module.type_order = self.catalog.emission_order();
        module.types = self.catalog.into_defs();
        module
    }
}
