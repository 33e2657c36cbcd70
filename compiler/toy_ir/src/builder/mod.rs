//! Function body construction.
//!
//! [`FunctionBuilder`] owns the in-progress blocks of one function, the
//! current insertion point, and the block layout. Blocks are created
//! detached and enter the layout only when appended, so a caller can
//! allocate a join block before its predecessors and still place it after
//! them.

use tracing::{trace, warn};

use crate::{
    BinOp, Block, BlockId, FloatPredicate, Instr, InstrKind, IntPredicate, LocalId, Terminator,
    Type, Value,
};

/// In-progress basic block.
struct BlockBuilder {
    #[allow(dead_code)]
    id: BlockId,
    label: Option<String>,
    instrs: Vec<Instr>,
    term: Option<Terminator>,
}

impl BlockBuilder {
    fn new(id: BlockId, label: Option<String>) -> Self {
        Self {
            id,
            label,
            instrs: Vec::new(),
            term: None,
        }
    }
}

/// Builder for one function body.
pub struct FunctionBuilder {
    blocks: Vec<BlockBuilder>,
    layout: Vec<BlockId>,
    current_block: BlockId,
    next_local: u32,
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionBuilder {
    /// Create a builder positioned at an appended block labelled `entry`.
    pub fn new() -> Self {
        let entry = BlockId::new(0);
        Self {
            blocks: vec![BlockBuilder::new(entry, Some("entry".to_owned()))],
            layout: vec![entry],
            current_block: entry,
            next_local: 0,
        }
    }

    // Block management

    /// Allocate a new empty block outside the layout.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "block indices never exceed u32"
    )]
    pub fn new_block(&mut self, label: &str) -> BlockId {
        let id = BlockId::new(self.blocks.len() as u32);
        let label = (!label.is_empty()).then(|| label.to_owned());
        self.blocks.push(BlockBuilder::new(id, label));
        id
    }

    /// Place `block` at the end of the layout.
    pub fn append_block(&mut self, block: BlockId) {
        debug_assert!(
            !self.layout.contains(&block),
            "block {} appended twice",
            block.raw()
        );
        self.layout.push(block);
    }

    /// Allocate a block and place it at the end of the layout.
    pub fn new_appended_block(&mut self, label: &str) -> BlockId {
        let id = self.new_block(label);
        self.append_block(id);
        id
    }

    /// Set the current insertion point to the given block.
    pub fn position_at(&mut self, block: BlockId) {
        debug_assert!(
            block.index() < self.blocks.len(),
            "BlockId {} out of bounds (have {} blocks)",
            block.raw(),
            self.blocks.len(),
        );
        self.current_block = block;
    }

    #[inline]
    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    /// Check whether the current block already has a terminator.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.block_is_terminated(self.current_block)
    }

    pub fn block_is_terminated(&self, block: BlockId) -> bool {
        self.blocks[block.index()].term.is_some()
    }

    // Instruction emission

    fn fresh_local(&mut self) -> LocalId {
        let id = LocalId::new(self.next_local);
        self.next_local += 1;
        id
    }

    fn push(&mut self, instr: Instr) {
        let block = &mut self.blocks[self.current_block.index()];
        debug_assert!(
            block.term.is_none(),
            "instruction appended to terminated block {}",
            self.current_block.raw()
        );
        block.instrs.push(instr);
    }

    /// Emit a value-producing instruction and return its result.
    fn emit(&mut self, ty: Type, kind: InstrKind) -> Value {
        let id = self.fresh_local();
        self.push(Instr {
            dst: Some(id),
            ty: ty.clone(),
            kind,
        });
        Value::Local { id, ty }
    }

    /// Emit a binary instruction; the result has the operands' type.
    pub fn binary(&mut self, op: BinOp, lhs: Value, rhs: Value) -> Value {
        let ty = lhs.ty();
        self.emit(ty, InstrKind::Binary { op, lhs, rhs })
    }

    /// Emit an integer comparison; the result is `i1` (or `<N x i1>` for
    /// vector operands).
    pub fn icmp(&mut self, pred: IntPredicate, lhs: Value, rhs: Value) -> Value {
        let ty = cmp_result_type(&lhs.ty());
        self.emit(ty, InstrKind::ICmp { pred, lhs, rhs })
    }

    /// Emit an ordered float comparison.
    pub fn fcmp(&mut self, pred: FloatPredicate, lhs: Value, rhs: Value) -> Value {
        let ty = cmp_result_type(&lhs.ty());
        self.emit(ty, InstrKind::FCmp { pred, lhs, rhs })
    }

    /// Emit a load of type `ty` through the pointer `src`.
    pub fn load(&mut self, ty: Type, src: Value) -> Value {
        self.emit(ty, InstrKind::Load { src })
    }

    pub fn store(&mut self, dst: Value, value: Value) {
        self.push(Instr {
            dst: None,
            ty: Type::Void,
            kind: InstrKind::Store { dst, value },
        });
    }

    /// Emit a call. Returns `None` when `ret_ty` is `void`.
    pub fn call(&mut self, ret_ty: Type, callee: Value, args: Vec<Value>) -> Option<Value> {
        let kind = InstrKind::Call { callee, args };
        if ret_ty.is_void() {
            self.push(Instr {
                dst: None,
                ty: Type::Void,
                kind,
            });
            None
        } else {
            Some(self.emit(ret_ty, kind))
        }
    }

    /// Emit an `insertvalue`; the result has the aggregate's type.
    pub fn insert_value(&mut self, agg: Value, elem: Value, index: u32) -> Value {
        let ty = agg.ty();
        self.emit(ty, InstrKind::InsertValue { agg, elem, index })
    }

    // Terminators

    fn terminate(&mut self, term: Terminator) {
        let block = &mut self.blocks[self.current_block.index()];
        debug_assert!(
            block.term.is_none(),
            "block {} already terminated",
            self.current_block.raw()
        );
        block.term = Some(term);
    }

    /// Terminate with `ret`, with a value unless the function is `void`.
    pub fn terminate_ret(&mut self, value: Option<Value>) {
        self.terminate(Terminator::Ret(value));
    }

    /// Terminate with an unconditional branch.
    pub fn terminate_br(&mut self, target: BlockId) {
        self.terminate(Terminator::Br(target));
    }

    /// Terminate with a conditional branch.
    pub fn terminate_cond_br(&mut self, cond: Value, then_block: BlockId, else_block: BlockId) {
        self.terminate(Terminator::CondBr {
            cond,
            then_block,
            else_block,
        });
    }

    pub fn terminate_unreachable(&mut self) {
        self.terminate(Terminator::Unreachable);
    }

    // Finalization

    /// Consume the builder and produce the blocks in layout order.
    ///
    /// Unterminated blocks get `Unreachable` as a fallback (with a tracing
    /// warning). Blocks that were never appended are dropped.
    pub fn finish(mut self) -> Vec<Block> {
        let mut blocks = Vec::with_capacity(self.layout.len());

        for &id in &self.layout {
            let bb = &mut self.blocks[id.index()];
            let term = bb.term.take().unwrap_or_else(|| {
                warn!(
                    block = id.raw(),
                    "unterminated block in function body, adding Unreachable"
                );
                Terminator::Unreachable
            });

            blocks.push(Block {
                id,
                label: bb.label.take(),
                instrs: std::mem::take(&mut bb.instrs),
                term,
            });
        }

        let detached = self.blocks.len() - blocks.len();
        if detached > 0 {
            trace!(detached, "dropping blocks that were never appended");
        }

        blocks
    }
}

/// Result type of a comparison on operands of type `operand`.
fn cmp_result_type(operand: &Type) -> Type {
    match operand {
        Type::Vector { len, .. } => Type::vector_of(*len, Type::I1),
        _ => Type::I1,
    }
}
