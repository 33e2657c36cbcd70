//! Basic kinds to IR types, for a 64-bit target.

use toy_ir::{FloatKind, Type};
use toy_syntax::{BasicKind, Span};

use crate::catalog::TypeCatalog;
use crate::LowerProblem;

/// Width of `int`, `uint`, `uintptr` and `unsafe.Pointer`.
pub const WORD_BITS: u32 = 64;

/// Lower a basic kind.
///
/// Untyped constant kinds become named types (`untyped_int`, ...),
/// registered in `catalog` on first use. Repeated calls with the same kind
/// return the same type.
pub fn lower_basic(
    catalog: &mut TypeCatalog<'_>,
    kind: BasicKind,
    span: Span,
) -> Result<Type, LowerProblem> {
    let ty = match kind {
        BasicKind::Bool => Type::I1,
        BasicKind::Int | BasicKind::Uint | BasicKind::Uintptr | BasicKind::UnsafePointer => {
            Type::Int(WORD_BITS)
        }
        BasicKind::Int8 | BasicKind::Uint8 => Type::I8,
        BasicKind::Int16 | BasicKind::Uint16 => Type::I16,
        BasicKind::Int32 | BasicKind::Uint32 => Type::I32,
        BasicKind::Int64 | BasicKind::Uint64 => Type::I64,
        BasicKind::Float32 => Type::F32,
        BasicKind::Float64 => Type::F64,
        BasicKind::Complex64 => complex(FloatKind::Single),
        BasicKind::Complex128 => complex(FloatKind::Double),
        BasicKind::String => string(),

        BasicKind::UntypedBool => catalog.register_implicit("untyped_bool", Type::I1),
        BasicKind::UntypedInt => catalog.register_implicit("untyped_int", Type::Int(WORD_BITS)),
        BasicKind::UntypedRune => catalog.register_implicit("untyped_rune", Type::I32),
        BasicKind::UntypedFloat => catalog.register_implicit("untyped_float", Type::F64),
        BasicKind::UntypedComplex => {
            catalog.register_implicit("untyped_complex", complex(FloatKind::Double))
        }
        BasicKind::UntypedString => catalog.register_implicit("untyped_string", string()),
        BasicKind::UntypedNil => catalog.register_implicit("untyped_nil", Type::pointer_to(Type::I8)),

        BasicKind::Invalid => {
            return Err(LowerProblem::UnsupportedType {
                ty: kind.as_str().to_owned(),
                span,
            })
        }
    };
    Ok(ty)
}

/// `{float, float}` or `{double, double}`.
fn complex(kind: FloatKind) -> Type {
    Type::Struct(vec![Type::Float(kind), Type::Float(kind)])
}

/// `{i8*, i64}`: data pointer and length.
fn string() -> Type {
    Type::Struct(vec![Type::pointer_to(Type::I8), Type::I64])
}
