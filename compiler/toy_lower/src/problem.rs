//! Problems found while lowering, and the errors that carry them.
//!
//! A [`LowerProblem`] is a user-facing failure: it is converted to a
//! [`Diagnostic`] and emitted through the sink, and lowering moves on to the
//! next statement or declaration. An [`InternalError`] means the input broke
//! an assumption the front end guarantees; it aborts the unit.

use std::fmt;

use thiserror::Error;
use toy_diagnostic::{Diagnostic, ErrorCode, ErrorGuaranteed};
use toy_syntax::Span;

/// A reportable lowering failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LowerProblem {
    /// A type reference that names nothing in the unit.
    UnknownType { what: String, span: Span },
    /// A type that has no IR representation.
    UnsupportedType { ty: String, span: Span },
    /// A declaration shape lowering does not handle.
    UnsupportedDeclaration { what: String, span: Span },
    /// A second function or global with an already registered name.
    DuplicateSymbol {
        name: String,
        span: Span,
        previous: Span,
    },
    /// An operand whose type does not fit the operator.
    InvalidOperandType {
        op: String,
        expected: &'static str,
        found: String,
        span: Span,
    },
    /// Operands of an equality that do not share a type.
    TypeMismatch {
        lhs: String,
        rhs: String,
        span: Span,
    },
    UnresolvedIdentifier { name: String, span: Span },
    /// A literal whose text cannot be decoded into its static type.
    InvalidLiteral {
        raw: String,
        reason: String,
        span: Span,
    },
    ArgCountMismatch {
        callee: String,
        expected: usize,
        found: usize,
        span: Span,
    },
    UnsupportedExpression { what: String, span: Span },
    UnsupportedStatement { what: String, span: Span },
    /// Assignment to something other than a global variable.
    InvalidAssignTarget { span: Span },
    /// A named type defined in terms of itself without indirection.
    InvalidRecursiveType { name: String, span: Span },
}

impl LowerProblem {
    pub fn span(&self) -> Span {
        match self {
            LowerProblem::UnknownType { span, .. }
            | LowerProblem::UnsupportedType { span, .. }
            | LowerProblem::UnsupportedDeclaration { span, .. }
            | LowerProblem::DuplicateSymbol { span, .. }
            | LowerProblem::InvalidOperandType { span, .. }
            | LowerProblem::TypeMismatch { span, .. }
            | LowerProblem::UnresolvedIdentifier { span, .. }
            | LowerProblem::InvalidLiteral { span, .. }
            | LowerProblem::ArgCountMismatch { span, .. }
            | LowerProblem::UnsupportedExpression { span, .. }
            | LowerProblem::UnsupportedStatement { span, .. }
            | LowerProblem::InvalidAssignTarget { span }
            | LowerProblem::InvalidRecursiveType { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LowerProblem::UnknownType { .. } => ErrorCode::E4001,
            LowerProblem::UnsupportedType { .. } => ErrorCode::E4002,
            LowerProblem::UnsupportedDeclaration { .. } => ErrorCode::E4003,
            LowerProblem::DuplicateSymbol { .. } => ErrorCode::E4004,
            LowerProblem::InvalidOperandType { .. } => ErrorCode::E4005,
            LowerProblem::TypeMismatch { .. } => ErrorCode::E4006,
            LowerProblem::UnresolvedIdentifier { .. } => ErrorCode::E4007,
            LowerProblem::InvalidLiteral { .. } => ErrorCode::E4008,
            LowerProblem::ArgCountMismatch { .. } => ErrorCode::E4009,
            LowerProblem::UnsupportedExpression { .. } => ErrorCode::E4010,
            LowerProblem::UnsupportedStatement { .. } => ErrorCode::E4011,
            LowerProblem::InvalidAssignTarget { .. } => ErrorCode::E4012,
            LowerProblem::InvalidRecursiveType { .. } => ErrorCode::E4013,
        }
    }

    /// Convert to a diagnostic with a primary label at the problem's span.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code());
        let span = self.span();
        match self {
            LowerProblem::UnknownType { what, .. } => diag
                .with_message(format!("unknown type {what}"))
                .with_label(span, "not declared in this unit"),
            LowerProblem::UnsupportedType { ty, .. } => diag
                .with_message(format!("type `{ty}` cannot be lowered"))
                .with_label(span, "unsupported type"),
            LowerProblem::UnsupportedDeclaration { what, .. } => diag
                .with_message(format!("unsupported declaration: {what}"))
                .with_label(span, "declaration skipped"),
            LowerProblem::DuplicateSymbol { name, previous, .. } => diag
                .with_message(format!("`{name}` is defined more than once"))
                .with_label(span, "redefined here")
                .with_secondary_label(*previous, "first definition here")
                .with_note("the first definition is kept"),
            LowerProblem::InvalidOperandType {
                op,
                expected,
                found,
                ..
            } => diag
                .with_message(format!(
                    "invalid operand for `{op}`: expected {expected}, found `{found}`"
                ))
                .with_label(span, format!("this has type `{found}`")),
            LowerProblem::TypeMismatch { lhs, rhs, .. } => diag
                .with_message(format!("cannot compare `{lhs}` with `{rhs}`"))
                .with_label(span, "operand types differ"),
            LowerProblem::UnresolvedIdentifier { name, .. } => diag
                .with_message(format!("cannot find `{name}` in this unit"))
                .with_label(span, "not a parameter, function or global"),
            LowerProblem::InvalidLiteral { raw, reason, .. } => diag
                .with_message(format!("invalid literal `{raw}`: {reason}"))
                .with_label(span, "invalid literal"),
            LowerProblem::ArgCountMismatch {
                callee,
                expected,
                found,
                ..
            } => diag
                .with_message(format!(
                    "`{callee}` takes {expected} argument{}, but {found} {} supplied",
                    plural(*expected),
                    if *found == 1 { "was" } else { "were" }
                ))
                .with_label(span, "wrong number of arguments"),
            LowerProblem::UnsupportedExpression { what, .. } => diag
                .with_message(format!("unsupported expression: {what}"))
                .with_label(span, "cannot be lowered"),
            LowerProblem::UnsupportedStatement { what, .. } => diag
                .with_message(format!("unsupported statement: {what}"))
                .with_label(span, "cannot be lowered"),
            LowerProblem::InvalidAssignTarget { .. } => diag
                .with_message("invalid assignment target")
                .with_label(span, "only global variables can be assigned"),
            LowerProblem::InvalidRecursiveType { name, .. } => diag
                .with_message(format!("invalid recursive type `{name}`"))
                .with_label(span, "refers to itself without indirection")
                .with_suggestion(format!("use a pointer, e.g. `*{name}`")),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for LowerProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_diagnostic().message)
    }
}

/// Broken front-end guarantee. Aborts lowering of the unit.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("expression #{expr} has no static type")]
    MissingType { expr: u32 },
    #[error("literal `{raw}` has non-basic type `{ty}`")]
    NonBasicLiteral { raw: String, ty: String },
    #[error("lowered body of `{func}` is malformed: {detail}")]
    MalformedBody { func: String, detail: String },
}

/// Failure of a lowering step.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LowerError {
    /// The problem was already emitted; the caller only unwinds.
    #[error("{0}")]
    Reported(ErrorGuaranteed),
    #[error(transparent)]
    Internal(#[from] InternalError),
}
