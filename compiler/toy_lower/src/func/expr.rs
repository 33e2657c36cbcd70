//! Expression lowering.

use toy_ir::{Constant, Type, Value};
use toy_stack::ensure_sufficient_stack;
use toy_syntax::{ExprId, ExprKind, Name};

use super::FuncLowerer;
use crate::index::Symbol;
use crate::{LowerError, LowerProblem};

impl FuncLowerer<'_, '_> {
    /// Lower `expr`. Globals and functions stay addresses.
    pub(super) fn lower_expr(&mut self, expr: ExprId) -> Result<Value, LowerError> {
        ensure_sufficient_stack(|| self.lower_expr_inner(expr))
    }

    /// Lower `expr` in value position: a global is loaded.
    pub(super) fn lower_value(&mut self, expr: ExprId) -> Result<Value, LowerError> {
        let value = self.lower_expr(expr)?;
        if let Value::Global { id, .. } = value {
            let ty = self.gen.module.global(id).content_ty.clone();
            return Ok(self.builder.load(ty, value));
        }
        Ok(value)
    }

    /// Lower a branch condition, which must be boolean.
    pub(super) fn lower_cond(&mut self, expr: ExprId) -> Result<Value, LowerError> {
        let value = self.lower_value(expr)?;
        let ty = value.ty();
        if self.gen.catalog.underlying(&ty).is_bool() {
            return Ok(value);
        }
        let span = self.gen.span_of(expr);
        Err(self.invalid_operand("condition", "a boolean", &ty, span))
    }

    fn lower_expr_inner(&mut self, expr: ExprId) -> Result<Value, LowerError> {
        let unit = self.gen.unit;
        match &unit.exprs.get(expr).kind {
            ExprKind::Lit(lit) => Ok(Value::Const(self.gen.lower_literal(expr, lit)?)),
            ExprKind::Ident(name) => self.lower_ident(expr, *name),
            ExprKind::Binary { op, lhs, rhs } => self.lower_binary(expr, *op, *lhs, *rhs),
            ExprKind::Unary { op, operand } => self.lower_unary(expr, *op, *operand),
            ExprKind::Call {
                callee,
                args,
                spread,
            } => self.lower_call(expr, *callee, args, *spread),
            ExprKind::Paren(inner) => self.lower_expr(*inner),
        }
    }

    // ── Identifiers ────────────────────────────────────────────

    fn lower_ident(&mut self, expr: ExprId, name: Name) -> Result<Value, LowerError> {
        if let Some(param) = self.params.get(&name) {
            return Ok(param.clone());
        }
        match self.gen.symbols.lookup(name) {
            Some(Symbol::Func(id)) => return Ok(self.gen.module.func_ref(id)),
            Some(Symbol::Global(id)) => return Ok(self.gen.module.global_ref(id)),
            None => {}
        }

        let spelled = self.gen.name(name);
        match spelled {
            "true" | "false" => {
                let ty = self.predeclared_type(expr, Type::I1)?;
                let value = u64::from(spelled == "true");
                Ok(Value::Const(Constant::uint_with_width(ty, 1, value)))
            }
            "nil" => {
                let ty = self.predeclared_type(expr, Type::pointer_to(Type::I8))?;
                Ok(Value::Const(Constant::Null(ty)))
            }
            _ => {
                let span = self.gen.span_of(expr);
                Err(self.error(LowerProblem::UnresolvedIdentifier {
                    name: spelled.to_owned(),
                    span,
                }))
            }
        }
    }

    /// The checker's type for a predeclared constant, or `fallback` when
    /// it recorded none.
    fn predeclared_type(&mut self, expr: ExprId, fallback: Type) -> Result<Type, LowerError> {
        if self.gen.oracle.type_of(expr).is_some() {
            self.gen.type_of(expr)
        } else {
            Ok(fallback)
        }
    }

    // ── Calls ──────────────────────────────────────────────────

    fn lower_call(
        &mut self,
        expr: ExprId,
        callee: ExprId,
        args: &[ExprId],
        spread: bool,
    ) -> Result<Value, LowerError> {
        let span = self.gen.span_of(expr);
        if spread {
            return Err(self.error(LowerProblem::UnsupportedExpression {
                what: "call with a spread argument".into(),
                span,
            }));
        }

        let target = self.lower_expr(callee)?;
        let target_ty = target.ty();
        let Some((arity, ret)) = signature_of(&target_ty) else {
            let span = self.gen.span_of(callee);
            return Err(self.invalid_operand("call", "a function", &target_ty, span));
        };
        if arity != args.len() {
            let callee = self.callee_name(callee);
            return Err(self.error(LowerProblem::ArgCountMismatch {
                callee,
                expected: arity,
                found: args.len(),
                span,
            }));
        }

        let args = args
            .iter()
            .map(|&arg| self.lower_value(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self
            .builder
            .call(ret.clone(), target, args)
            .unwrap_or_else(Value::void))
    }

    fn callee_name(&self, callee: ExprId) -> String {
        match &self.gen.unit.exprs.get(callee).kind {
            ExprKind::Ident(name) => self.gen.name(*name).to_owned(),
            _ => "function".to_owned(),
        }
    }
}

/// Parameter count and return type of a function reference.
fn signature_of(ty: &Type) -> Option<(usize, &Type)> {
    let Type::Pointer(pointee) = ty else {
        return None;
    };
    match pointee.as_ref() {
        Type::Func { params, ret } => Some((params.len(), ret)),
        _ => None,
    }
}
