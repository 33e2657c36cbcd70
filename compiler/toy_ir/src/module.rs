//! Blocks, functions, globals and modules.

use crate::{
    BlockId, Constant, FuncId, GlobalId, Instr, Terminator, Type, TypeDefId, TypeDefs, Value,
};

/// A basic block: straight-line instructions and one terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub id: BlockId,
    pub label: Option<String>,
    pub instrs: Vec<Instr>,
    pub term: Terminator,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    /// Source name; empty for unnamed parameters.
    pub name: String,
    pub ty: Type,
}

/// A function declaration, or a definition once it has blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Type,
    /// Blocks in layout order; the first is the entry block.
    pub blocks: Vec<Block>,
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<Param>, ret: Type) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
            blocks: Vec::new(),
        }
    }

    /// A function without a body.
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The signature as a [`Type::Func`].
    pub fn sig(&self) -> Type {
        Type::func(
            self.params.iter().map(|p| p.ty.clone()).collect(),
            self.ret.clone(),
        )
    }

    pub fn entry(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

/// A global variable. `init` is `None` for a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Global {
    pub name: String,
    pub content_ty: Type,
    pub init: Option<Constant>,
}

/// The IR of one compilation unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub name: String,
    pub types: TypeDefs,
    /// Named types in deterministic emission order.
    pub type_order: Vec<TypeDefId>,
    pub globals: Vec<Global>,
    pub funcs: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "function counts never exceed u32"
    )]
    pub fn add_func(&mut self, func: Function) -> FuncId {
        let id = FuncId::new(self.funcs.len() as u32);
        self.funcs.push(func);
        id
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "global counts never exceed u32"
    )]
    pub fn add_global(&mut self, global: Global) -> GlobalId {
        let id = GlobalId::new(self.globals.len() as u32);
        self.globals.push(global);
        id
    }

    pub fn func(&self, id: FuncId) -> &Function {
        &self.funcs[id.index()]
    }

    pub fn func_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.funcs[id.index()]
    }

    pub fn global(&self, id: GlobalId) -> &Global {
        &self.globals[id.index()]
    }

    pub fn global_mut(&mut self, id: GlobalId) -> &mut Global {
        &mut self.globals[id.index()]
    }

    pub fn func_by_name(&self, name: &str) -> Option<&Function> {
        self.funcs.iter().find(|f| f.name == name)
    }

    pub fn global_by_name(&self, name: &str) -> Option<&Global> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// A reference to function `id`, typed pointer-to-signature.
    pub fn func_ref(&self, id: FuncId) -> Value {
        Value::Func {
            id,
            ty: Type::pointer_to(self.func(id).sig()),
        }
    }

    /// A reference to global `id`, typed pointer-to-content.
    pub fn global_ref(&self, id: GlobalId) -> Value {
        Value::Global {
            id,
            ty: Type::pointer_to(self.global(id).content_ty.clone()),
        }
    }
}
