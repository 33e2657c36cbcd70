//! Lowering of type-checked units into the toy IR.
//!
//! One [`Generator`] lowers one unit in three phases:
//!
//! 1. **Type resolution** (`catalog`, `basic`): every type declaration is
//!    declared as a skeleton, then defined, so named types may refer to
//!    each other in any order.
//! 2. **Indexing** (`index`): every function and global gets its signature
//!    and is registered by name before any body is looked at.
//! 3. **Compilation** (`func`, `globals`): function bodies become basic
//!    blocks, literal initializers become global constants.
//!
//! # Errors
//!
//! A [`LowerProblem`] is reported through the [`DiagnosticSink`] and the
//! offending declaration is dropped or left body-less; lowering carries on
//! with its siblings. An [`InternalError`] means the front end broke a
//! guarantee and aborts the unit.
//!
//! ```text
//! Parse → Type Check → **Lower** → Module
//! ```

mod basic;
mod catalog;
mod config;
mod func;
mod generator;
mod globals;
mod index;
mod literal;
mod natural;
mod problem;

#[cfg(test)]
mod test_helpers;

pub use basic::{lower_basic, WORD_BITS};
pub use catalog::TypeCatalog;
pub use config::{LowerConfig, Signedness};
pub use generator::Generator;
pub use index::{Symbol, SymbolTable};
pub use natural::natural_cmp;
pub use problem::{InternalError, LowerError, LowerProblem};

use toy_diagnostic::DiagnosticSink;
use toy_ir::Module;
use toy_syntax::{StringInterner, TypeOracle, Unit};

/// Lower `unit` using the checker results recorded in the unit itself.
pub fn lower_unit(
    unit: &Unit,
    interner: &StringInterner,
    config: &LowerConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Module, InternalError> {
    lower_unit_with_oracle(unit, &unit.info, interner, config, sink)
}

/// Lower `unit`, asking `oracle` for expression types and scopes.
pub fn lower_unit_with_oracle(
    unit: &Unit,
    oracle: &dyn TypeOracle,
    interner: &StringInterner,
    config: &LowerConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<Module, InternalError> {
    Generator::new(unit, oracle, interner, config, sink).run()
}
