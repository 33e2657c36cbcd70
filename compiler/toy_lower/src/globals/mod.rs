//! Global initializers.
//!
//! Only constant initializers are lowered: a basic literal, possibly
//! parenthesized, becomes the global's constant, and a global without an
//! initializer is zero-initialized. Anything else would need code run at
//! startup and is rejected; such a global stays a declaration. So is a
//! literal whose constant does not have the global's type, such as a string
//! literal (a byte array) for a `string` global.

use toy_ir::{Constant, GlobalId};
use toy_syntax::{DeclId, ExprId, ExprKind, ValueSpec};
use tracing::trace;

use crate::generator::Generator;
use crate::{LowerError, LowerProblem};

impl Generator<'_> {
    /// Set the initializer of every global registered for `spec`.
    pub(crate) fn init_globals(&mut self, id: DeclId, spec: &ValueSpec) -> Result<(), LowerError> {
        let mut outcome = Ok(());
        for index in 0..spec.names.len() {
            let Some(global) = self.symbols.global_for_decl(id, index) else {
                continue;
            };
            match self.initializer(global, spec, index) {
                Ok(init) => {
                    trace!(name = %self.module.global(global).name, "initialized global");
                    self.module.global_mut(global).init = Some(init);
                }
                Err(LowerError::Reported(guarantee)) => outcome = Err(LowerError::Reported(guarantee)),
                Err(internal @ LowerError::Internal(_)) => return Err(internal),
            }
        }
        outcome
    }

    fn initializer(
        &mut self,
        global: GlobalId,
        spec: &ValueSpec,
        index: usize,
    ) -> Result<Constant, LowerError> {
        if spec.values.is_empty() {
            let ty = self.module.global(global).content_ty.clone();
            return Ok(Constant::ZeroInit(ty));
        }
        let Some(&value) = spec.values.get(index) else {
            return Err(self.unsupported("multi-value global initializer", spec.values[0]));
        };

        let unit = self.unit;
        let mut expr = value;
        loop {
            match &unit.exprs.get(expr).kind {
                ExprKind::Paren(inner) => expr = *inner,
                ExprKind::Lit(lit) => {
                    let constant = self.lower_literal(expr, lit)?;
                    return self.agree(global, constant, expr);
                }
                _ => return Err(self.unsupported("non-constant global initializer", expr)),
            }
        }
    }

    /// Accept `constant` only if it has the global's content type.
    fn agree(
        &mut self,
        global: GlobalId,
        constant: Constant,
        expr: ExprId,
    ) -> Result<Constant, LowerError> {
        let content_ty = &self.module.global(global).content_ty;
        let ty = constant.ty();
        if self.catalog.same_type(&ty, content_ty) {
            return Ok(constant);
        }
        let what = format!(
            "initializer of type `{}` for a global of type `{}`",
            self.catalog.display(&ty),
            self.catalog.display(content_ty),
        );
        Err(self.unsupported(&what, expr))
    }

    fn unsupported(&mut self, what: &str, expr: ExprId) -> LowerError {
        let problem = LowerProblem::UnsupportedExpression {
            what: what.to_owned(),
            span: self.span_of(expr),
        };
        LowerError::Reported(self.report(problem))
    }
}
