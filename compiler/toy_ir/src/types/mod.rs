//! IR types and the named-type arena.

use std::fmt;

use rustc_hash::FxHashMap;

/// Index of a named type in a [`TypeDefs`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeDefId(u32);

impl TypeDefId {
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

/// IEEE floating-point formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FloatKind {
    Single,
    Double,
}

/// An IR type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Void,
    /// Integer of the given bit width; `Int(1)` is the boolean type.
    Int(u32),
    Float(FloatKind),
    Pointer(Box<Type>),
    /// Struct with fields in declaration order.
    Struct(Vec<Type>),
    /// Fixed-length array (constant byte sequences).
    Array { len: u64, elem: Box<Type> },
    /// Fixed-length vector; operators apply element-wise.
    Vector { len: u32, elem: Box<Type> },
    /// Function signature. Function references have type pointer-to-this.
    Func { params: Vec<Type>, ret: Box<Type> },
    /// Reference to a named type definition.
    Named(TypeDefId),
}

impl Type {
    pub const I1: Type = Type::Int(1);
    pub const I8: Type = Type::Int(8);
    pub const I16: Type = Type::Int(16);
    pub const I32: Type = Type::Int(32);
    pub const I64: Type = Type::Int(64);
    pub const F32: Type = Type::Float(FloatKind::Single);
    pub const F64: Type = Type::Float(FloatKind::Double);

    #[must_use]
    pub fn pointer_to(elem: Type) -> Type {
        Type::Pointer(Box::new(elem))
    }

    #[must_use]
    pub fn vector_of(len: u32, elem: Type) -> Type {
        Type::Vector {
            len,
            elem: Box::new(elem),
        }
    }

    #[must_use]
    pub fn func(params: Vec<Type>, ret: Type) -> Type {
        Type::Func {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Int(1))
    }

    /// The element type of a vector, or the type itself.
    pub fn scalar(&self) -> &Type {
        match self {
            Type::Vector { elem, .. } => elem,
            other => other,
        }
    }

    /// Bit width of an integer scalar or of a vector's integer elements.
    pub fn int_bits(&self) -> Option<u32> {
        match self.scalar() {
            Type::Int(bits) => Some(*bits),
            _ => None,
        }
    }
}

/// A named type: its name and, once defined, its body.
///
/// A def whose body is `None` is a skeleton: declared so that other types
/// can refer to it, not yet (or never successfully) defined.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDef {
    pub name: String,
    pub body: Option<Type>,
}

/// Arena of named types, one entry per name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDefs {
    defs: Vec<TypeDef>,
    by_name: FxHashMap<String, TypeDefId>,
}

impl TypeDefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the def named `name`, creating a skeleton if there is none.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "type counts never exceed u32"
    )]
    pub fn declare(&mut self, name: &str) -> TypeDefId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = TypeDefId::new(self.defs.len() as u32);
        self.defs.push(TypeDef {
            name: name.to_owned(),
            body: None,
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<TypeDefId> {
        self.by_name.get(name).copied()
    }

    /// # Panics
    /// Panics if `id` was not produced by this arena.
    pub fn get(&self, id: TypeDefId) -> &TypeDef {
        &self.defs[id.index()]
    }

    pub fn set_body(&mut self, id: TypeDefId, body: Option<Type>) {
        self.defs[id.index()].body = body;
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "type counts never exceed u32"
    )]
    pub fn iter(&self) -> impl Iterator<Item = (TypeDefId, &TypeDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (TypeDefId::new(i as u32), def))
    }

    /// Follow `Named` links to the first structural type.
    ///
    /// Stops at a skeleton or at a chain that loops back on itself, and
    /// returns the last `Named` reference in that case.
    pub fn underlying<'a>(&'a self, mut ty: &'a Type) -> &'a Type {
        for _ in 0..=self.defs.len() {
            match ty {
                Type::Named(id) => match &self.get(*id).body {
                    Some(body) => ty = body,
                    None => return ty,
                },
                _ => return ty,
            }
        }
        ty
    }

    /// Render `ty` with named types shown by name.
    pub fn display<'a>(&'a self, ty: &'a Type) -> TypeDisplay<'a> {
        TypeDisplay { ty, defs: self }
    }
}

/// [`Display`](fmt::Display) adapter for a [`Type`] in the context of its
/// [`TypeDefs`].
pub struct TypeDisplay<'a> {
    ty: &'a Type,
    defs: &'a TypeDefs,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Void => f.write_str("void"),
            Type::Int(bits) => write!(f, "i{bits}"),
            Type::Float(FloatKind::Single) => f.write_str("float"),
            Type::Float(FloatKind::Double) => f.write_str("double"),
            Type::Pointer(elem) => write!(f, "{}*", self.defs.display(elem)),
            Type::Struct(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.defs.display(field))?;
                }
                f.write_str("}")
            }
            Type::Array { len, elem } => write!(f, "[{len} x {}]", self.defs.display(elem)),
            Type::Vector { len, elem } => write!(f, "<{len} x {}>", self.defs.display(elem)),
            Type::Func { params, ret } => {
                write!(f, "{} (", self.defs.display(ret))?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.defs.display(param))?;
                }
                f.write_str(")")
            }
            Type::Named(id) => write!(f, "%{}", self.defs.get(*id).name),
        }
    }
}
