//! Statement lowering.
//!
//! The builder's current block is the only cursor. It moves at three
//! points: into a branch or case block before lowering its body, back to
//! the condition block to emit the branch that was deferred until both
//! targets existed, and into the follow block once the statement is done.

use smallvec::SmallVec;
use toy_ir::{BinOp, BlockId, Constant, Type, Value};
use toy_syntax::{CaseClause, ExprId, IfStmt, Span, Stmt, SwitchStmt};
use tracing::trace;

use super::FuncLowerer;
use crate::{LowerError, LowerProblem};

impl FuncLowerer<'_, '_> {
    /// Lower a statement list into the current block.
    ///
    /// Statements after the block is terminated can never run and are
    /// skipped.
    pub(super) fn lower_block(&mut self, stmts: &[Stmt]) -> Result<(), LowerError> {
        for (i, stmt) in stmts.iter().enumerate() {
            if self.builder.is_terminated() {
                trace!(skipped = stmts.len() - i, "skipping unreachable statements");
                break;
            }
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), LowerError> {
        match stmt {
            Stmt::Block(block) => self.lower_block(&block.stmts),
            Stmt::Expr(expr) => {
                let result = self.lower_expr(*expr).map(drop);
                self.recover(result)
            }
            Stmt::Assign {
                target,
                value,
                span: _,
            } => {
                let result = self.lower_assign(*target, *value);
                self.recover(result)
            }
            Stmt::If(stmt) => self.lower_if(stmt),
            Stmt::Switch(stmt) => self.lower_switch(stmt),
            Stmt::Return { results, span } => {
                let result = self.lower_return(results, *span);
                self.recover(result)
            }
        }
    }

    /// Lower an optional init statement. Returns `false` if it terminated
    /// the current block, leaving nothing reachable for the rest of the
    /// statement.
    fn lower_init(&mut self, init: Option<&Stmt>) -> Result<bool, LowerError> {
        if let Some(init) = init {
            self.lower_stmt(init)?;
        }
        Ok(!self.builder.is_terminated())
    }

    /// Branch to `target` unless the current block already ended.
    fn fall_through_to(&mut self, target: BlockId) {
        if !self.builder.is_terminated() {
            self.builder.terminate_br(target);
        }
    }

    // ── If ─────────────────────────────────────────────────────

    fn lower_if(&mut self, stmt: &IfStmt) -> Result<(), LowerError> {
        if !self.lower_init(stmt.init.as_deref())? {
            return Ok(());
        }

        let cond = self.lower_cond(stmt.cond)?;
        let cond_block = self.builder.current_block();
        let follow = self.builder.new_block("if.done");

        let then_block = self.builder.new_appended_block("if.then");
        self.builder.position_at(then_block);
        self.lower_block(&stmt.then_branch.stmts)?;
        self.fall_through_to(follow);

        let else_block = match &stmt.else_branch {
            Some(else_branch) => {
                let block = self.builder.new_appended_block("if.else");
                self.builder.position_at(block);
                self.lower_stmt(else_branch)?;
                self.fall_through_to(follow);
                block
            }
            None => follow,
        };

        self.builder.position_at(cond_block);
        self.builder.terminate_cond_br(cond, then_block, else_block);

        self.builder.append_block(follow);
        self.builder.position_at(follow);
        Ok(())
    }

    // ── Switch ─────────────────────────────────────────────────

    fn lower_switch(&mut self, stmt: &SwitchStmt) -> Result<(), LowerError> {
        if !self.lower_init(stmt.init.as_deref())? {
            return Ok(());
        }

        let tag = match stmt.tag {
            Some(tag) => Some(self.lower_value(tag)?),
            None => None,
        };

        let follow = self.builder.new_block("switch.done");
        let bodies: SmallVec<[BlockId; 8]> = stmt
            .cases
            .iter()
            .map(|case| {
                let label = if case.is_default() {
                    "switch.default"
                } else {
                    "switch.case"
                };
                self.builder.new_block(label)
            })
            .collect();

        // Dispatch: one comparison chain per case in source order; the
        // default is entered from wherever the last comparison left off.
        let mut default = None;
        for (case, &body) in stmt.cases.iter().zip(&bodies) {
            if case.is_default() {
                default = Some(body);
                continue;
            }
            match &tag {
                Some(tag) => self.dispatch_tagged(tag, case, body)?,
                None => self.dispatch_tagless(case, body)?,
            }
        }
        self.builder.terminate_br(default.unwrap_or(follow));

        for (case, &body) in stmt.cases.iter().zip(&bodies) {
            self.builder.append_block(body);
            self.builder.position_at(body);
            self.lower_block(&case.body)?;
            self.fall_through_to(follow);
        }

        self.builder.append_block(follow);
        self.builder.position_at(follow);
        Ok(())
    }

    /// Compare `tag` against each value of `case` in turn, branching to
    /// `body` on the first match.
    fn dispatch_tagged(
        &mut self,
        tag: &Value,
        case: &CaseClause,
        body: BlockId,
    ) -> Result<(), LowerError> {
        for &value in &case.values {
            let span = self.gen.span_of(value);
            let value = self.lower_value(value)?;
            let matched = self.lower_equal(tag.clone(), value, span)?;
            self.branch_on_match(matched, body);
        }
        Ok(())
    }

    /// OR the case's conditions together and branch once.
    fn dispatch_tagless(&mut self, case: &CaseClause, body: BlockId) -> Result<(), LowerError> {
        let mut matched: Option<Value> = None;
        for &value in &case.values {
            let cond = self.lower_cond(value)?;
            matched = Some(match matched {
                Some(acc) => self.builder.binary(BinOp::Or, acc, cond),
                None => cond,
            });
        }
        if let Some(matched) = matched {
            self.branch_on_match(matched, body);
        }
        Ok(())
    }

    /// Branch to `body` if `matched`, otherwise continue in a fresh
    /// `switch.next` block.
    fn branch_on_match(&mut self, matched: Value, body: BlockId) {
        let next = self.builder.new_appended_block("switch.next");
        self.builder.terminate_cond_br(matched, body, next);
        self.builder.position_at(next);
    }

    // ── Return ─────────────────────────────────────────────────

    fn lower_return(&mut self, results: &[ExprId], span: Span) -> Result<(), LowerError> {
        match results {
            [] if self.ret.is_void() => {
                self.builder.terminate_ret(None);
                Ok(())
            }
            [] => Err(self.error(LowerProblem::UnsupportedStatement {
                what: "bare return in a function with results".into(),
                span,
            })),
            _ if self.ret.is_void() => Err(self.error(LowerProblem::UnsupportedStatement {
                what: "return with values in a function without results".into(),
                span,
            })),
            [result] => {
                let value = self.lower_value(*result)?;
                self.builder.terminate_ret(Some(value));
                Ok(())
            }
            _ => {
                let packed = self.pack_results(results, span)?;
                self.builder.terminate_ret(Some(packed));
                Ok(())
            }
        }
    }

    /// Build the result struct of a multi-value return, fields in order.
    fn pack_results(&mut self, results: &[ExprId], span: Span) -> Result<Value, LowerError> {
        let ret = self.ret.clone();
        let fields = match self.gen.catalog.underlying(&ret) {
            Type::Struct(fields) => fields.len(),
            _ => 1,
        };
        if fields != results.len() {
            return Err(self.error(LowerProblem::UnsupportedStatement {
                what: format!(
                    "return of {} values from a function with {fields} results",
                    results.len()
                ),
                span,
            }));
        }

        let mut packed = Value::Const(Constant::Undef(ret));
        for (&result, index) in results.iter().zip(0u32..) {
            let value = self.lower_value(result)?;
            packed = self.builder.insert_value(packed, value, index);
        }
        Ok(packed)
    }

    // ── Assignment ─────────────────────────────────────────────

    fn lower_assign(&mut self, target: ExprId, value: ExprId) -> Result<(), LowerError> {
        let dst = self.lower_expr(target)?;
        if !matches!(dst, Value::Global { .. }) {
            let span = self.gen.span_of(target);
            return Err(self.error(LowerProblem::InvalidAssignTarget { span }));
        }
        let value = self.lower_value(value)?;
        self.builder.store(dst, value);
        Ok(())
    }
}
