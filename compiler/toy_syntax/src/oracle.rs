//! Checker results consumed by lowering.

use rustc_hash::FxHashMap;

use crate::{ExprId, Span, TypeExpr};

/// Opaque handle to a lexical scope of the external checker.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Queries answered by the front end's type checker.
///
/// Lowering never re-derives types: every literal, untyped initializer and
/// operator decision that depends on a source type asks the oracle.
pub trait TypeOracle {
    /// Static type of an expression, if the checker recorded one.
    fn type_of(&self, expr: ExprId) -> Option<&TypeExpr>;

    /// Innermost scope enclosing the source position `pos`.
    fn scope_at(&self, pos: u32) -> Option<ScopeId>;
}

/// Table-backed [`TypeOracle`] filled in by the checker.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeInfo {
    types: FxHashMap<ExprId, TypeExpr>,
    scopes: Vec<(Span, ScopeId)>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the static type of `expr`, replacing any earlier entry.
    pub fn record_type(&mut self, expr: ExprId, ty: TypeExpr) {
        self.types.insert(expr, ty);
    }

    /// Record a scope covering `span`.
    pub fn record_scope(&mut self, span: Span, scope: ScopeId) {
        self.scopes.push((span, scope));
    }
}

impl TypeOracle for TypeInfo {
    fn type_of(&self, expr: ExprId) -> Option<&TypeExpr> {
        self.types.get(&expr)
    }

    fn scope_at(&self, pos: u32) -> Option<ScopeId> {
        self.scopes
            .iter()
            .filter(|(span, _)| span.contains(pos))
            .min_by_key(|(span, _)| span.len())
            .map(|&(_, scope)| scope)
    }
}
