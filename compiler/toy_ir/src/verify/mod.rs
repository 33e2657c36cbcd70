//! Structural checks on finished functions.
//!
//! Every block of a [`Function`] carries exactly one terminator by
//! construction. What can still go wrong is the layout: a branch to a block
//! that was never appended, or a block appended twice.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{BlockId, Function};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("function `{func}`: block {} branches to block {} which is not in the layout", .block.raw(), .target.raw())]
    DanglingSuccessor {
        func: String,
        block: BlockId,
        target: BlockId,
    },
    #[error("function `{func}`: block {} appears more than once in the layout", .block.raw())]
    DuplicateBlock { func: String, block: BlockId },
    #[error("function `{func}`: entry block has predecessors")]
    EntryHasPredecessor { func: String },
}

/// Check one function. Declarations trivially pass.
pub fn verify_function(func: &Function) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let mut seen = FxHashSet::default();

    for block in &func.blocks {
        if !seen.insert(block.id) {
            errors.push(VerifyError::DuplicateBlock {
                func: func.name.clone(),
                block: block.id,
            });
        }
    }

    let entry = func.entry().map(|b| b.id);
    let mut entry_targeted = false;
    for block in &func.blocks {
        for target in block.term.successors() {
            if !seen.contains(&target) {
                errors.push(VerifyError::DanglingSuccessor {
                    func: func.name.clone(),
                    block: block.id,
                    target,
                });
            }
            entry_targeted |= Some(target) == entry;
        }
    }
    if entry_targeted {
        errors.push(VerifyError::EntryHasPredecessor {
            func: func.name.clone(),
        });
    }

    errors
}

#[cfg(test)]
mod tests;
