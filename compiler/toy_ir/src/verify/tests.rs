use pretty_assertions::assert_eq;

use super::*;
use crate::{Block, Constant, FunctionBuilder, Terminator, Type, Value};

fn func(blocks: Vec<Block>) -> Function {
    let mut f = Function::new("f", vec![], Type::Void);
    f.blocks = blocks;
    f
}

fn block(id: u32, term: Terminator) -> Block {
    Block {
        id: BlockId::new(id),
        label: None,
        instrs: vec![],
        term,
    }
}

#[test]
fn built_functions_verify() {
    let mut b = FunctionBuilder::new();
    let then = b.new_appended_block("then");
    let done = b.new_block("done");
    b.terminate_cond_br(Value::Const(Constant::bool(false)), then, done);
    b.position_at(then);
    b.terminate_br(done);
    b.append_block(done);
    b.position_at(done);
    b.terminate_ret(None);

    assert_eq!(verify_function(&func(b.finish())), vec![]);
}

#[test]
fn declarations_verify() {
    assert_eq!(verify_function(&func(vec![])), vec![]);
}

#[test]
fn dangling_successor_is_reported() {
    let f = func(vec![block(0, Terminator::Br(BlockId::new(7)))]);
    assert_eq!(
        verify_function(&f),
        vec![VerifyError::DanglingSuccessor {
            func: "f".into(),
            block: BlockId::new(0),
            target: BlockId::new(7),
        }]
    );
}

#[test]
fn duplicate_layout_entry_is_reported() {
    let f = func(vec![
        block(0, Terminator::Br(BlockId::new(1))),
        block(1, Terminator::Ret(None)),
        block(1, Terminator::Ret(None)),
    ]);
    let errors = verify_function(&f);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("more than once"));
}

#[test]
fn branch_to_entry_is_reported() {
    let f = func(vec![
        block(0, Terminator::Br(BlockId::new(1))),
        block(1, Terminator::Br(BlockId::new(0))),
    ]);
    assert_eq!(
        verify_function(&f),
        vec![VerifyError::EntryHasPredecessor { func: "f".into() }]
    );
}
