//! Declarations and statements.

use crate::{ExprArena, ExprId, Name, Span, TypeExpr, TypeInfo};

/// One entry of a parameter, result, receiver or struct field list.
///
/// `a, b int` is a single field with two names; an unnamed parameter has
/// no names and still contributes one entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    pub names: Vec<Name>,
    pub ty: TypeExpr,
}

impl Field {
    pub fn new(names: Vec<Name>, ty: TypeExpr) -> Self {
        Self { names, ty }
    }

    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            names: Vec::new(),
            ty,
        }
    }

    /// Number of entries this field contributes to its list.
    pub fn arity(&self) -> usize {
        self.names.len().max(1)
    }
}

// Declarations

/// Position of a top-level declaration within its unit (files in order,
/// declarations in order within each file).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decl {
    Func(FuncDecl),
    Import(ImportSpec),
    Type(TypeSpec),
    Var(ValueSpec),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Func(decl) => decl.span,
            Decl::Import(spec) => spec.span,
            Decl::Type(spec) => spec.span,
            Decl::Var(spec) => spec.span,
        }
    }
}

/// `func (recv) name(params) (results) { body }`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FuncDecl {
    pub name: Name,
    /// Receiver list; empty for plain functions.
    pub recv: Vec<Field>,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    /// `None` for functions implemented outside the unit.
    pub body: Option<Block>,
    pub span: Span,
}

/// `import "path"`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportSpec {
    pub path: Name,
    pub span: Span,
}

/// `type name ty`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeSpec {
    pub name: Name,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `var a, b ty = x, y`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueSpec {
    pub names: Vec<Name>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<ExprId>,
    pub span: Span,
}

// Statements

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    Block(Block),
    /// Expression evaluated for its side effects.
    Expr(ExprId),
    /// `target = value`
    Assign {
        target: ExprId,
        value: ExprId,
        span: Span,
    },
    If(IfStmt),
    Switch(SwitchStmt),
    Return { results: Vec<ExprId>, span: Span },
}

/// `{ stmts... }`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self {
            stmts,
            span: Span::DUMMY,
        }
    }
}

/// `if init; cond { then } else ...`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: ExprId,
    pub then_branch: Block,
    /// Either a [`Stmt::Block`] or a chained [`Stmt::If`].
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

/// `switch init; tag { cases... }`
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<ExprId>,
    pub cases: Vec<CaseClause>,
    pub span: Span,
}

/// `case values...: body` or `default: body` (empty `values`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseClause {
    pub values: Vec<ExprId>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl CaseClause {
    pub fn is_default(&self) -> bool {
        self.values.is_empty()
    }
}

// Units

/// One source file of a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct File {
    pub decls: Vec<Decl>,
}

/// A compilation unit: its files, the arena holding all of their
/// expressions, and the checker's results for them.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub name: Name,
    pub files: Vec<File>,
    pub exprs: ExprArena,
    pub info: TypeInfo,
}

impl Unit {
    /// All top-level declarations in file order, with their ids.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "declaration counts never exceed u32"
    )]
    pub fn decls(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.files
            .iter()
            .flat_map(|file| file.decls.iter())
            .enumerate()
            .map(|(i, decl)| (DeclId::new(i as u32), decl))
    }
}
