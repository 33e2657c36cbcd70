//! Programmatic construction of typed units.
//!
//! Front ends that already hold a typed tree in some other shape, and the
//! test suites of the downstream crates, build units through
//! [`UnitBuilder`]. Every expression gets a distinct synthetic span and,
//! when a type is given, an entry in the unit's [`TypeInfo`].

use crate::{
    BasicKind, BinaryOp, Block, Decl, Expr, ExprId, ExprKind, Field, File, FuncDecl, ImportSpec,
    LitKind, Literal, Name, ScopeId, Span, Stmt, StringInterner, TypeExpr, TypeSpec, UnaryOp,
    Unit, ValueSpec,
};

/// Incremental builder for a [`Unit`].
pub struct UnitBuilder<'a> {
    interner: &'a StringInterner,
    unit: Unit,
    pos: u32,
}

impl<'a> UnitBuilder<'a> {
    /// Start a unit with a single empty file.
    pub fn new(interner: &'a StringInterner, name: &str) -> Self {
        let unit = Unit {
            name: interner.intern(name),
            files: vec![File::default()],
            ..Unit::default()
        };
        Self {
            interner,
            unit,
            pos: 0,
        }
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    fn next_span(&mut self) -> Span {
        let start = self.pos;
        self.pos += 1;
        Span::new(start, self.pos)
    }

    // Types

    pub fn basic(kind: BasicKind) -> TypeExpr {
        TypeExpr::Basic(kind)
    }

    pub fn named(&self, name: &str) -> TypeExpr {
        TypeExpr::Named(self.name(name))
    }

    /// A field list entry with the given names (possibly none).
    pub fn field(&self, names: &[&str], ty: TypeExpr) -> Field {
        Field::new(names.iter().map(|n| self.name(n)).collect(), ty)
    }

    // Expressions

    /// Push an expression, recording `ty` as its static type when given.
    pub fn expr(&mut self, kind: ExprKind, ty: Option<TypeExpr>) -> ExprId {
        let span = self.next_span();
        let id = self.unit.exprs.push(Expr { kind, span });
        if let Some(ty) = ty {
            self.unit.info.record_type(id, ty);
        }
        id
    }

    pub fn lit(&mut self, kind: LitKind, raw: &str, ty: TypeExpr) -> ExprId {
        let lit = Literal {
            kind,
            raw: raw.to_owned(),
        };
        self.expr(ExprKind::Lit(lit), Some(ty))
    }

    pub fn int(&mut self, raw: &str, ty: TypeExpr) -> ExprId {
        self.lit(LitKind::Int, raw, ty)
    }

    pub fn float(&mut self, raw: &str, ty: TypeExpr) -> ExprId {
        self.lit(LitKind::Float, raw, ty)
    }

    pub fn char_lit(&mut self, raw: &str, ty: TypeExpr) -> ExprId {
        self.lit(LitKind::Char, raw, ty)
    }

    pub fn string(&mut self, raw: &str, ty: TypeExpr) -> ExprId {
        self.lit(LitKind::String, raw, ty)
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::Ident(name), None)
    }

    pub fn typed_ident(&mut self, name: &str, ty: TypeExpr) -> ExprId {
        let name = self.name(name);
        self.expr(ExprKind::Ident(name), Some(ty))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(ExprKind::Binary { op, lhs, rhs }, None)
    }

    /// Binary expression whose static type is recorded; needed when the
    /// lowering of the operator depends on the operand's source type.
    pub fn typed_binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        ty: TypeExpr,
    ) -> ExprId {
        self.expr(ExprKind::Binary { op, lhs, rhs }, Some(ty))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.expr(ExprKind::Unary { op, operand }, None)
    }

    pub fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.expr(
            ExprKind::Call {
                callee,
                args,
                spread: false,
            },
            None,
        )
    }

    pub fn spread_call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.expr(
            ExprKind::Call {
                callee,
                args,
                spread: true,
            },
            None,
        )
    }

    pub fn paren(&mut self, inner: ExprId) -> ExprId {
        self.expr(ExprKind::Paren(inner), None)
    }

    // Statements

    pub fn ret(&mut self, results: Vec<ExprId>) -> Stmt {
        let span = self.next_span();
        Stmt::Return { results, span }
    }

    pub fn assign(&mut self, target: ExprId, value: ExprId) -> Stmt {
        let span = self.next_span();
        Stmt::Assign {
            target,
            value,
            span,
        }
    }

    // Declarations

    /// A function declaration with the given signature and body.
    pub fn func_decl(
        &mut self,
        name: &str,
        params: Vec<Field>,
        results: Vec<Field>,
        body: Option<Vec<Stmt>>,
    ) -> FuncDecl {
        FuncDecl {
            name: self.name(name),
            recv: Vec::new(),
            params,
            results,
            body: body.map(Block::new),
            span: self.next_span(),
        }
    }

    /// Append a declaration to the current (last) file.
    pub fn push_decl(&mut self, decl: Decl) {
        if let Some(file) = self.unit.files.last_mut() {
            file.decls.push(decl);
        } else {
            self.unit.files.push(File { decls: vec![decl] });
        }
    }

    pub fn func(&mut self, decl: FuncDecl) {
        self.push_decl(Decl::Func(decl));
    }

    pub fn type_decl(&mut self, name: &str, ty: TypeExpr) {
        let span = self.next_span();
        let spec = TypeSpec {
            name: self.name(name),
            ty,
            span,
        };
        self.push_decl(Decl::Type(spec));
    }

    pub fn var_decl(&mut self, names: &[&str], ty: Option<TypeExpr>, values: Vec<ExprId>) {
        let span = self.next_span();
        let spec = ValueSpec {
            names: names.iter().map(|n| self.name(n)).collect(),
            ty,
            values,
            span,
        };
        self.push_decl(Decl::Var(spec));
    }

    pub fn import(&mut self, path: &str) {
        let span = self.next_span();
        let spec = ImportSpec {
            path: self.name(path),
            span,
        };
        self.push_decl(Decl::Import(spec));
    }

    /// Start a new source file; later declarations go into it.
    pub fn new_file(&mut self) {
        self.unit.files.push(File::default());
    }

    pub fn scope(&mut self, span: Span, scope: ScopeId) {
        self.unit.info.record_scope(span, scope);
    }

    pub fn finish(self) -> Unit {
        self.unit
    }
}
