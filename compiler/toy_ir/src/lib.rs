//! Typed basic-block IR.
//!
//! The lowering pipeline produces one [`Module`] per compilation unit:
//!
//! - **[`Module`]**: named type definitions (in emission order), globals
//!   and functions
//! - **[`Function`]**: signature plus basic blocks in layout order; a
//!   function without blocks is a declaration
//! - **[`Block`]**: straight-line [`Instr`]s ended by exactly one
//!   [`Terminator`]
//! - **[`Value`]**: a constant, an instruction result, a parameter, or a
//!   reference to a global or function
//!
//! Named types live in a [`TypeDefs`] arena and are referenced by
//! [`TypeDefId`], so a struct may point to itself: the name is declared
//! first and its body filled in later.
//!
//! Function bodies are built with [`FunctionBuilder`], which owns the
//! current-block cursor and the block layout. [`verify`] re-checks the
//! structural invariants of a finished module.

mod builder;
mod instr;
mod module;
mod types;
mod value;
pub mod verify;

pub use builder::FunctionBuilder;
pub use instr::{BinOp, BlockId, FloatPredicate, Instr, InstrKind, IntPredicate, Terminator};
pub use module::{Block, Function, Global, Module, Param};
pub use types::{FloatKind, Type, TypeDef, TypeDefId, TypeDefs, TypeDisplay};
pub use value::{Constant, FuncId, GlobalId, LocalId, Value};
