//! Type syntax.
//!
//! [`TypeExpr`] doubles as the checker's representation of resolved types:
//! the type of an expression reported by a [`TypeOracle`](crate::TypeOracle)
//! is a `TypeExpr` whose named references point at type declarations of the
//! same unit.

use std::fmt;

use crate::ast::Field;
use crate::Name;

/// A type as written in source, or as resolved by the checker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeExpr {
    /// A predeclared basic type (`int`, `string`, ...) or the type of an
    /// untyped constant.
    Basic(BasicKind),
    /// Reference to a type declared in the unit: `T`.
    Named(Name),
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `struct { a, b int; c string }`
    Struct(Vec<Field>),
}

impl TypeExpr {
    #[must_use]
    pub fn pointer_to(elem: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(elem))
    }

    /// The name of the named type this type refers to, looking through one
    /// level of pointer (`T` and `*T` both yield `T`).
    pub fn base_name(&self) -> Option<Name> {
        match self {
            TypeExpr::Named(name) => Some(*name),
            TypeExpr::Pointer(elem) => match elem.as_ref() {
                TypeExpr::Named(name) => Some(*name),
                _ => None,
            },
            TypeExpr::Basic(_) | TypeExpr::Struct(_) => None,
        }
    }
}

/// Predeclared basic types and the kinds of untyped constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BasicKind {
    /// The checker's placeholder for an ill-typed expression.
    Invalid,

    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,

    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    /// Unsigned integer kinds (including `uintptr`).
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
        )
    }

    /// Source spelling of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            BasicKind::Invalid => "invalid type",
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedComplex => "untyped complex",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
