//! Instructions and terminators.

use smallvec::{smallvec, SmallVec};

use crate::{LocalId, Type, Value};

/// Basic block ID within one function, allocated sequentially by the
/// [`FunctionBuilder`](crate::FunctionBuilder).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Two-operand arithmetic and bitwise instructions.
///
/// Integer and float variants are distinct; both operands and the result
/// share one type (scalar or vector).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    Add,
    FAdd,
    Sub,
    FSub,
    Mul,
    FMul,
    SDiv,
    UDiv,
    FDiv,
    SRem,
    URem,
    FRem,
    Shl,
    /// Logical (zero-filling) shift right.
    LShr,
    /// Arithmetic (sign-extending) shift right.
    AShr,
    And,
    Or,
    Xor,
}

impl BinOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::FAdd => "fadd",
            BinOp::Sub => "sub",
            BinOp::FSub => "fsub",
            BinOp::Mul => "mul",
            BinOp::FMul => "fmul",
            BinOp::SDiv => "sdiv",
            BinOp::UDiv => "udiv",
            BinOp::FDiv => "fdiv",
            BinOp::SRem => "srem",
            BinOp::URem => "urem",
            BinOp::FRem => "frem",
            BinOp::Shl => "shl",
            BinOp::LShr => "lshr",
            BinOp::AShr => "ashr",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
        }
    }
}

/// Integer comparison predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

/// Ordered float comparison predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatPredicate {
    Oeq,
    One,
    Olt,
    Ole,
    Ogt,
    Oge,
}

/// A non-terminating instruction.
///
/// `ty` is the result type (`Void` for stores and calls to functions
/// returning nothing, in which case `dst` is `None`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instr {
    pub dst: Option<LocalId>,
    pub ty: Type,
    pub kind: InstrKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstrKind {
    Binary { op: BinOp, lhs: Value, rhs: Value },
    /// Result is `i1` (or a vector of `i1`).
    ICmp {
        pred: IntPredicate,
        lhs: Value,
        rhs: Value,
    },
    FCmp {
        pred: FloatPredicate,
        lhs: Value,
        rhs: Value,
    },
    /// Read through a pointer.
    Load { src: Value },
    /// Write `value` through the pointer `dst`.
    Store { dst: Value, value: Value },
    Call { callee: Value, args: Vec<Value> },
    /// Copy of the aggregate `agg` with field `index` replaced by `elem`.
    InsertValue { agg: Value, elem: Value, index: u32 },
}

/// How control leaves a block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terminator {
    /// Return, with a value unless the function returns `void`.
    Ret(Option<Value>),
    /// Unconditional branch.
    Br(BlockId),
    /// Conditional branch on an `i1`.
    CondBr {
        cond: Value,
        then_block: BlockId,
        else_block: BlockId,
    },
    Unreachable,
}

impl Terminator {
    /// Blocks control may transfer to.
    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        match self {
            Terminator::Br(target) => smallvec![*target],
            Terminator::CondBr {
                then_block,
                else_block,
                ..
            } => smallvec![*then_block, *else_block],
            Terminator::Ret(_) | Terminator::Unreachable => SmallVec::new(),
        }
    }
}
