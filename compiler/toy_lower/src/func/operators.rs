//! Operator selection.
//!
//! The instruction for an operator is picked from the underlying type of
//! its left operand: a named integer type selects integer instructions, a
//! vector selects by its element type.

use std::fmt::Display;

use toy_ir::{BinOp, Constant, FloatPredicate, IntPredicate, Type, Value};
use toy_syntax::{BinaryOp, ExprId, Span, UnaryOp};

use super::FuncLowerer;
use crate::{LowerError, LowerProblem, Signedness};

/// Operand class an operator dispatches on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Operand {
    Int { bits: u32 },
    Float,
    Pointer,
    Other,
}

const INT_OR_FLOAT: &str = "an integer or float";
const INT: &str = "an integer";
const BOOL: &str = "a boolean";
const COMPARABLE: &str = "an integer, float or pointer";

impl FuncLowerer<'_, '_> {
    fn classify(&self, ty: &Type) -> Operand {
        let catalog = &self.gen.catalog;
        let scalar = match catalog.underlying(ty) {
            Type::Vector { elem, .. } => catalog.underlying(elem),
            other => other,
        };
        match scalar {
            Type::Int(bits) => Operand::Int { bits: *bits },
            Type::Float(_) => Operand::Float,
            Type::Pointer(_) => Operand::Pointer,
            _ => Operand::Other,
        }
    }

    /// Whether `expr` has an unsigned source type and the configuration
    /// asks for sign-aware selection.
    fn is_unsigned(&self, expr: ExprId) -> bool {
        self.gen.config.signedness == Signedness::FromSourceType
            && self
                .gen
                .oracle
                .type_of(expr)
                .is_some_and(|ty| self.gen.catalog.is_unsigned_source(ty))
    }

    pub(super) fn invalid_operand(
        &mut self,
        op: impl Display,
        expected: &'static str,
        ty: &Type,
        span: Span,
    ) -> LowerError {
        let found = self.display(ty);
        self.error(LowerProblem::InvalidOperandType {
            op: op.to_string(),
            expected,
            found,
            span,
        })
    }

    // ── Binary ─────────────────────────────────────────────────

    pub(super) fn lower_binary(
        &mut self,
        expr: ExprId,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<Value, LowerError> {
        let x = self.lower_value(lhs)?;
        let y = self.lower_value(rhs)?;
        let ty = x.ty();
        let operand = self.classify(&ty);
        let span = self.gen.span_of(expr);

        let unsigned = self.is_unsigned(lhs);
        let inst = match (op, operand) {
            (BinaryOp::Add, Operand::Int { .. }) => BinOp::Add,
            (BinaryOp::Add, Operand::Float) => BinOp::FAdd,
            (BinaryOp::Sub, Operand::Int { .. }) => BinOp::Sub,
            (BinaryOp::Sub, Operand::Float) => BinOp::FSub,
            (BinaryOp::Mul, Operand::Int { .. }) => BinOp::Mul,
            (BinaryOp::Mul, Operand::Float) => BinOp::FMul,
            (BinaryOp::Quo, Operand::Int { .. }) if unsigned => BinOp::UDiv,
            (BinaryOp::Quo, Operand::Int { .. }) => BinOp::SDiv,
            (BinaryOp::Quo, Operand::Float) => BinOp::FDiv,
            (BinaryOp::Rem, Operand::Int { .. }) if unsigned => BinOp::URem,
            (BinaryOp::Rem, Operand::Int { .. }) => BinOp::SRem,
            (BinaryOp::Rem, Operand::Float) => BinOp::FRem,
            (BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Quo | BinaryOp::Rem, _) => {
                return Err(self.invalid_operand(op, INT_OR_FLOAT, &ty, span));
            }

            (BinaryOp::Shl, Operand::Int { .. }) => BinOp::Shl,
            (BinaryOp::Shr, Operand::Int { .. }) => self.right_shift(unsigned),
            (BinaryOp::And, Operand::Int { .. }) => BinOp::And,
            (BinaryOp::Or, Operand::Int { .. }) => BinOp::Or,
            (BinaryOp::Xor, Operand::Int { .. }) => BinOp::Xor,
            (BinaryOp::AndNot, Operand::Int { bits }) => {
                let y_ty = y.ty();
                let underlying = self.gen.catalog.underlying(&y_ty).clone();
                let mask = all_ones(&underlying, &y_ty, bits);
                let flipped = self.builder.binary(BinOp::Xor, y, mask);
                return Ok(self.builder.binary(BinOp::And, x, flipped));
            }
            (
                BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Xor
                | BinaryOp::AndNot,
                _,
            ) => return Err(self.invalid_operand(op, INT, &ty, span)),

            (BinaryOp::LAnd | BinaryOp::LOr, _) => {
                return self.lower_logical(op, x, y, (lhs, rhs));
            }

            (
                BinaryOp::Eql
                | BinaryOp::Neq
                | BinaryOp::Lss
                | BinaryOp::Leq
                | BinaryOp::Gtr
                | BinaryOp::Geq,
                _,
            ) => return self.lower_relational(op, operand, unsigned, x, y, span),
        };
        Ok(self.builder.binary(inst, x, y))
    }

    /// `>>` is logical unless sign-aware selection is on and the operand
    /// is signed.
    fn right_shift(&self, unsigned: bool) -> BinOp {
        match self.gen.config.signedness {
            Signedness::AssumeSigned => BinOp::LShr,
            Signedness::FromSourceType if unsigned => BinOp::LShr,
            Signedness::FromSourceType => BinOp::AShr,
        }
    }

    /// `&&` and `||` evaluate both operands and combine them bitwise.
    fn lower_logical(
        &mut self,
        op: BinaryOp,
        x: Value,
        y: Value,
        (lhs, rhs): (ExprId, ExprId),
    ) -> Result<Value, LowerError> {
        for (value, expr) in [(&x, lhs), (&y, rhs)] {
            let ty = value.ty();
            if !self.gen.catalog.underlying(&ty).is_bool() {
                let span = self.gen.span_of(expr);
                return Err(self.invalid_operand(op, BOOL, &ty, span));
            }
        }
        let inst = if op == BinaryOp::LAnd {
            BinOp::And
        } else {
            BinOp::Or
        };
        Ok(self.builder.binary(inst, x, y))
    }

    fn lower_relational(
        &mut self,
        op: BinaryOp,
        operand: Operand,
        unsigned: bool,
        x: Value,
        y: Value,
        span: Span,
    ) -> Result<Value, LowerError> {
        match operand {
            Operand::Int { .. } => {
                let pred = int_predicate(op, unsigned);
                Ok(self.builder.icmp(pred, x, y))
            }
            Operand::Float => {
                let pred = float_predicate(op);
                Ok(self.builder.fcmp(pred, x, y))
            }
            Operand::Pointer if matches!(op, BinaryOp::Eql | BinaryOp::Neq) => {
                let pred = int_predicate(op, false);
                Ok(self.builder.icmp(pred, x, y))
            }
            Operand::Pointer | Operand::Other => {
                Err(self.invalid_operand(op, COMPARABLE, &x.ty(), span))
            }
        }
    }

    /// `a == b` for a switch case; the operands must share a type.
    pub(super) fn lower_equal(&mut self, a: Value, b: Value, span: Span) -> Result<Value, LowerError> {
        let (a_ty, b_ty) = (a.ty(), b.ty());
        if !self.gen.catalog.same_type(&a_ty, &b_ty) {
            let lhs = self.display(&a_ty);
            let rhs = self.display(&b_ty);
            return Err(self.error(LowerProblem::TypeMismatch { lhs, rhs, span }));
        }
        match self.classify(&a_ty) {
            Operand::Int { .. } | Operand::Pointer => Ok(self.builder.icmp(IntPredicate::Eq, a, b)),
            Operand::Float => Ok(self.builder.fcmp(FloatPredicate::Oeq, a, b)),
            Operand::Other => Err(self.invalid_operand(BinaryOp::Eql, COMPARABLE, &a_ty, span)),
        }
    }

    // ── Unary ──────────────────────────────────────────────────

    pub(super) fn lower_unary(
        &mut self,
        expr: ExprId,
        op: UnaryOp,
        operand: ExprId,
    ) -> Result<Value, LowerError> {
        let x = self.lower_value(operand)?;
        let ty = x.ty();
        let span = self.gen.span_of(expr);
        let underlying = self.gen.catalog.underlying(&ty).clone();

        match (op, self.classify(&ty)) {
            (UnaryOp::Plus, _) => Ok(x),
            (UnaryOp::Neg, Operand::Int { bits }) => {
                let zero = all_zeros(&underlying, &ty, bits);
                Ok(self.builder.binary(BinOp::Sub, zero, x))
            }
            (UnaryOp::Neg, Operand::Float) => {
                let zero = float_splat(&underlying, &ty, -0.0);
                Ok(self.builder.binary(BinOp::FSub, zero, x))
            }
            (UnaryOp::Neg, _) => Err(self.invalid_operand(op, INT_OR_FLOAT, &ty, span)),
            (UnaryOp::Not, _) if underlying.is_bool() => {
                let truth = Value::Const(Constant::uint_with_width(ty, 1, 1));
                Ok(self.builder.binary(BinOp::Xor, x, truth))
            }
            (UnaryOp::Not, _) => Err(self.invalid_operand(op, BOOL, &ty, span)),
            (UnaryOp::Complement, Operand::Int { bits }) => {
                let mask = all_ones(&underlying, &ty, bits);
                Ok(self.builder.binary(BinOp::Xor, x, mask))
            }
            (UnaryOp::Complement, _) => Err(self.invalid_operand(op, INT, &ty, span)),
        }
    }
}

fn int_predicate(op: BinaryOp, unsigned: bool) -> IntPredicate {
    match (op, unsigned) {
        (BinaryOp::Neq, _) => IntPredicate::Ne,
        (BinaryOp::Lss, false) => IntPredicate::Slt,
        (BinaryOp::Lss, true) => IntPredicate::Ult,
        (BinaryOp::Leq, false) => IntPredicate::Sle,
        (BinaryOp::Leq, true) => IntPredicate::Ule,
        (BinaryOp::Gtr, false) => IntPredicate::Sgt,
        (BinaryOp::Gtr, true) => IntPredicate::Ugt,
        (BinaryOp::Geq, false) => IntPredicate::Sge,
        (BinaryOp::Geq, true) => IntPredicate::Uge,
        _ => IntPredicate::Eq,
    }
}

fn float_predicate(op: BinaryOp) -> FloatPredicate {
    match op {
        BinaryOp::Neq => FloatPredicate::One,
        BinaryOp::Lss => FloatPredicate::Olt,
        BinaryOp::Leq => FloatPredicate::Ole,
        BinaryOp::Gtr => FloatPredicate::Ogt,
        BinaryOp::Geq => FloatPredicate::Oge,
        _ => FloatPredicate::Oeq,
    }
}

// ── Constant shapes ────────────────────────────────────────────────

/// A constant of type `ty` built by `scalar`, broadcast to every lane when
/// `underlying` is a vector.
fn splat(underlying: &Type, ty: &Type, scalar: impl Fn(Type) -> Constant) -> Value {
    let constant = match underlying {
        Type::Vector { len, elem } => Constant::Vector {
            ty: ty.clone(),
            elems: (0..*len).map(|_| scalar(elem.as_ref().clone())).collect(),
        },
        _ => scalar(ty.clone()),
    };
    Value::Const(constant)
}

/// All-ones integer of `bits` width in the shape of `ty`.
pub(crate) fn all_ones(underlying: &Type, ty: &Type, bits: u32) -> Value {
    splat(underlying, ty, |ty| Constant::uint_with_width(ty, bits, u64::MAX))
}

/// All-zero integer in the shape of `ty`.
pub(crate) fn all_zeros(underlying: &Type, ty: &Type, bits: u32) -> Value {
    splat(underlying, ty, |ty| Constant::uint_with_width(ty, bits, 0))
}

fn float_splat(underlying: &Type, ty: &Type, value: f64) -> Value {
    splat(underlying, ty, |ty| Constant::float(ty, value))
}
