//! Function body lowering.
//!
//! [`FuncLowerer`] walks one function body and emits blocks through a
//! [`FunctionBuilder`]. Statements are lowered in `stmt.rs`, expressions in
//! `expr.rs`, and operator selection in `operators.rs`.
//!
//! # Failure
//!
//! A problem in an expression statement, assignment or return is reported
//! and lowering continues with the next statement, so one pass finds as
//! many problems as possible. A problem in an `if` condition or a `switch`
//! tag or case value abandons the rest of the body: the shape of the CFG
//! after it is unknown. Either way, a function with any reported problem
//! keeps only the declaration produced by indexing.

mod expr;
mod operators;
mod stmt;

use rustc_hash::FxHashMap;
use toy_diagnostic::ErrorGuaranteed;
use toy_ir::verify::verify_function;
use toy_ir::{FuncId, FunctionBuilder, Type, Value};
use toy_syntax::{Block, DeclId, FuncDecl, Name, ScopeId};
use tracing::{debug, trace};

use crate::generator::Generator;
use crate::index::BLANK;
use crate::{InternalError, LowerError, LowerProblem};

impl Generator<'_> {
    /// Lower the body of a function declaration, if it has one and won
    /// registration during indexing.
    pub(crate) fn lower_func_decl(&mut self, id: DeclId, decl: &FuncDecl) -> Result<(), LowerError> {
        let Some(func) = self.symbols.func_for_decl(id) else {
            // Not registered: the reason was reported during indexing.
            return Ok(());
        };
        let Some(body) = &decl.body else {
            trace!(name = %self.module.func(func).name, "external function");
            return Ok(());
        };
        FuncLowerer::new(self, func, decl).lower(body)
    }
}

/// Lowering state for one function body.
pub(crate) struct FuncLowerer<'g, 'a> {
    pub(crate) gen: &'g mut Generator<'a>,
    func: FuncId,
    /// Checker scope of the function body.
    scope: Option<ScopeId>,
    builder: FunctionBuilder,
    /// Value of each named parameter, receiver first.
    params: FxHashMap<Name, Value>,
    ret: Type,
    failed: Option<ErrorGuaranteed>,
}

impl<'g, 'a> FuncLowerer<'g, 'a> {
    fn new(gen: &'g mut Generator<'a>, func: FuncId, decl: &FuncDecl) -> Self {
        let sig = gen.module.func(func);
        let ret = sig.ret.clone();

        // An unnamed parameter has no name but still takes a position.
        let slots = decl.recv.iter().chain(&decl.params).flat_map(|field| {
            let unnamed = field.names.is_empty().then_some(None);
            field.names.iter().copied().map(Some).chain(unnamed)
        });
        let mut params = FxHashMap::default();
        for ((slot, param), index) in slots.zip(&sig.params).zip(0u32..) {
            if let Some(name) = slot.filter(|&name| gen.name(name) != BLANK) {
                let ty = param.ty.clone();
                params.insert(name, Value::Param { index, ty });
            }
        }

        let scope = gen.oracle.scope_at(decl.span.start);
        Self {
            gen,
            func,
            scope,
            builder: FunctionBuilder::new(),
            params,
            ret,
            failed: None,
        }
    }

    /// Lower `body` and install the blocks on the function.
    fn lower(mut self, body: &Block) -> Result<(), LowerError> {
        let name = self.gen.module.func(self.func).name.clone();
        trace!(name = %name, scope = ?self.scope.map(ScopeId::raw), "lowering function body");

        let result = self.lower_block(&body.stmts);
        self.recover(result)?;

        if let Some(guarantee) = self.failed {
            debug!(name = %name, "function keeps only its declaration");
            return Err(LowerError::Reported(guarantee));
        }

        if !self.builder.is_terminated() {
            if self.ret.is_void() {
                self.builder.terminate_ret(None);
            } else {
                self.builder.terminate_unreachable();
            }
        }

        let blocks = self.builder.finish();
        trace!(name = %name, blocks = blocks.len(), "lowered function body");
        let func = self.gen.module.func_mut(self.func);
        func.blocks = blocks;

        if self.gen.config.verify {
            if let Some(err) = verify_function(func).into_iter().next() {
                return Err(InternalError::MalformedBody {
                    func: name,
                    detail: err.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    // ── Reporting ──────────────────────────────────────────────

    /// Report `problem` and return the error that unwinds to the nearest
    /// statement boundary.
    fn error(&mut self, problem: LowerProblem) -> LowerError {
        LowerError::Reported(self.gen.report(problem))
    }

    /// Absorb a reported error at a statement boundary, remembering that
    /// the function failed. Internal errors pass through.
    fn recover(&mut self, result: Result<(), LowerError>) -> Result<(), LowerError> {
        match result {
            Err(LowerError::Reported(guarantee)) => {
                self.failed = Some(guarantee);
                Ok(())
            }
            other => other,
        }
    }

    fn display(&self, ty: &Type) -> String {
        self.gen.catalog.display(ty)
    }
}

#[cfg(test)]
mod tests;
