//! Constants and values.

use crate::{FloatKind, Type};

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
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
    };
}

id_newtype!(
    /// Instruction result within one function, allocated sequentially.
    LocalId
);
id_newtype!(
    /// Index of a function in its [`Module`](crate::Module).
    FuncId
);
id_newtype!(
    /// Index of a global variable in its [`Module`](crate::Module).
    GlobalId
);

/// Mask covering the low `bits` bits.
fn width_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// A compile-time constant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constant {
    /// Integer; `bits` holds the two's-complement pattern truncated to the
    /// type's width.
    Int { ty: Type, bits: u64 },
    /// Float; `bits` holds the `f64` bit pattern of the value (already
    /// rounded to single precision for `float`).
    Float { ty: Type, bits: u64 },
    Null(Type),
    Undef(Type),
    ZeroInit(Type),
    /// Constant byte sequence of type `[len x i8]`.
    CharArray(Vec<u8>),
    Vector { ty: Type, elems: Vec<Constant> },
    Struct { ty: Type, fields: Vec<Constant> },
}

impl Constant {
    /// Integer constant from a signed value, truncated to the width of
    /// `ty`.
    #[expect(clippy::cast_sign_loss, reason = "two's-complement bit pattern")]
    pub fn int(ty: Type, value: i64) -> Self {
        Self::uint(ty, value as u64)
    }

    /// Integer constant from a raw bit pattern, truncated to the width of
    /// `ty`.
    pub fn uint(ty: Type, value: u64) -> Self {
        let width = ty.int_bits().unwrap_or(64);
        Self::uint_with_width(ty, width, value)
    }

    /// Integer constant truncated to `width` bits.
    ///
    /// For named integer types, whose width is only known through their
    /// definition.
    pub fn uint_with_width(ty: Type, width: u32, value: u64) -> Self {
        let bits = value & width_mask(width);
        Constant::Int { ty, bits }
    }

    pub fn bool(value: bool) -> Self {
        Constant::Int {
            ty: Type::I1,
            bits: u64::from(value),
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "rounding to single precision is intended"
    )]
    pub fn float(ty: Type, value: f64) -> Self {
        let value = match ty {
            Type::Float(FloatKind::Single) => f64::from(value as f32),
            _ => value,
        };
        Constant::Float {
            ty,
            bits: value.to_bits(),
        }
    }

    /// The constant's type.
    pub fn ty(&self) -> Type {
        match self {
            Constant::Int { ty, .. }
            | Constant::Float { ty, .. }
            | Constant::Null(ty)
            | Constant::Undef(ty)
            | Constant::ZeroInit(ty)
            | Constant::Vector { ty, .. }
            | Constant::Struct { ty, .. } => ty.clone(),
            Constant::CharArray(bytes) => Type::Array {
                len: bytes.len() as u64,
                elem: Box::new(Type::I8),
            },
        }
    }

    /// Raw bit pattern of an integer constant.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Constant::Int { bits, .. } => Some(*bits),
            _ => None,
        }
    }

    /// Sign-extended value of an integer constant.
    #[expect(
        clippy::cast_possible_wrap,
        reason = "reinterpreting the sign-extended pattern"
    )]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Constant::Int { ty, bits } => {
                let width = ty.int_bits().unwrap_or(64);
                if width >= 64 || width == 0 {
                    return Some(*bits as i64);
                }
                let shift = 64 - width;
                Some(((*bits << shift) as i64) >> shift)
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Constant::Float { bits, .. } => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}

/// An operand: a constant, a computed value, or a symbol reference.
///
/// Symbol references are addresses: a `Global` has type pointer-to-content
/// and must be loaded to obtain its value; a `Func` has type
/// pointer-to-signature and is used by reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Const(Constant),
    /// Result of an instruction.
    Local { id: LocalId, ty: Type },
    /// Function parameter by position.
    Param { index: u32, ty: Type },
    Global { id: GlobalId, ty: Type },
    Func { id: FuncId, ty: Type },
}

impl Value {
    /// Placeholder result of a call to a function returning nothing.
    pub fn void() -> Self {
        Value::Const(Constant::Undef(Type::Void))
    }

    pub fn ty(&self) -> Type {
        match self {
            Value::Const(c) => c.ty(),
            Value::Local { ty, .. }
            | Value::Param { ty, .. }
            | Value::Global { ty, .. }
            | Value::Func { ty, .. } => ty.clone(),
        }
    }
}

impl From<Constant> for Value {
    fn from(c: Constant) -> Self {
        Value::Const(c)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn int_constants_are_truncated_to_width() {
        let c = Constant::int(Type::I8, -1);
        assert_eq!(c.as_uint(), Some(0xff));
        assert_eq!(c.as_int(), Some(-1));

        let c = Constant::uint(Type::I16, 0x1_2345);
        assert_eq!(c.as_uint(), Some(0x2345));

        let named = Type::Named(crate::TypeDefId::new(0));
        let c = Constant::uint_with_width(named, 32, u64::MAX);
        assert_eq!(c.as_uint(), Some(0xffff_ffff));
        assert_eq!(Constant::int(Type::I64, -2).as_int(), Some(-2));
    }

    #[test]
    fn single_floats_are_rounded() {
        let c = Constant::float(Type::F32, 0.1);
        assert_eq!(c.as_f64(), Some(f64::from(0.1f32)));
        assert_eq!(Constant::float(Type::F64, 0.1).as_f64(), Some(0.1));
    }

    #[test]
    fn char_array_type_tracks_length() {
        let c = Constant::CharArray(b"hi".to_vec());
        assert_eq!(
            c.ty(),
            Type::Array {
                len: 2,
                elem: Box::new(Type::I8)
            }
        );
    }
}
