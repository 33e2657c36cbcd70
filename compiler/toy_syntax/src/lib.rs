//! Typed syntax trees for the toy compiler.
//!
//! This crate is the hand-off format between the front end (parser and type
//! checker, both external) and the lowering pipeline in `toy_lower`:
//!
//! - **Declarations** ([`Decl`]): functions, imports, type and variable
//!   specifiers, grouped into [`File`]s and a compilation [`Unit`].
//! - **Statements** ([`Stmt`]): blocks, expression statements, assignments,
//!   `if`, `switch` and `return`.
//! - **Expressions** ([`Expr`]): stored flat in an [`ExprArena`] and
//!   addressed by [`ExprId`], so the checker can attach a static type to
//!   every expression without touching the tree.
//! - **Type syntax** ([`TypeExpr`], [`BasicKind`]): used both for type
//!   annotations in declarations and for the checker's resolved types.
//! - **Checker output** ([`TypeOracle`], [`TypeInfo`]): "what is the static
//!   type of this expression" and "which scope encloses this position".
//!
//! Every dispatch over these trees is a closed enum: a new syntax form is a
//! compile error in the lowering crate until it has a lowering rule.

mod ast;
pub mod builder;
mod expr;
mod interner;
mod name;
mod oracle;
mod span;
mod types;

pub use ast::{Block, CaseClause, Decl, DeclId, Field, File, FuncDecl, IfStmt, Stmt, SwitchStmt, Unit};
pub use ast::{ImportSpec, TypeSpec, ValueSpec};
pub use builder::UnitBuilder;
pub use expr::{BinaryOp, Expr, ExprArena, ExprId, ExprKind, LitKind, Literal, UnaryOp};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use oracle::{ScopeId, TypeInfo, TypeOracle};
pub use span::Span;
pub use types::{BasicKind, TypeExpr};
