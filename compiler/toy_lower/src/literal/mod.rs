//! Literal decoding.
//!
//! A literal's constant is determined by its raw text and by the static
//! type the checker gave it: `1` typed `float64` is a float constant, `'a'`
//! typed `int32` an `i32`. Decoding follows the source language's literal
//! grammar:
//!
//! - integers: decimal, `0x`, `0o`, `0b` and legacy `0`-prefixed octal, with
//!   `_` between digits;
//! - floats: decimal with optional exponent, or hexadecimal mantissa with a
//!   mandatory `p` exponent;
//! - imaginary: an integer or float body followed by `i`;
//! - characters and interpreted strings: `\a \b \f \n \r \t \v \\ \' \"`,
//!   `\xHH`, `\ooo`, `\uHHHH` and `\UHHHHHHHH`;
//! - raw strings: backquoted, carriage returns dropped.

use toy_ir::{Constant, FloatKind, Type, TypeDefs};
use toy_syntax::{ExprId, LitKind, Literal};

use crate::generator::Generator;
use crate::{InternalError, LowerError, LowerProblem};

/// Why a literal could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DecodeError {
    /// The text is malformed or its value does not fit the type.
    Malformed(String),
    /// The static type is not one a literal can have.
    NonBasicType,
}

impl From<String> for DecodeError {
    fn from(reason: String) -> Self {
        DecodeError::Malformed(reason)
    }
}

impl From<&str> for DecodeError {
    fn from(reason: &str) -> Self {
        DecodeError::Malformed(reason.to_owned())
    }
}

/// What a numeric literal turns into, by the underlying type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Shape {
    Int(u32),
    Float(FloatKind),
    Complex(FloatKind),
    Other,
}

fn shape_of(ty: &Type, defs: &TypeDefs) -> Shape {
    match defs.underlying(ty) {
        Type::Int(bits) => Shape::Int(*bits),
        Type::Float(kind) => Shape::Float(*kind),
        Type::Struct(fields) => match fields.as_slice() {
            [re, im] => match (defs.underlying(re), defs.underlying(im)) {
                (Type::Float(a), Type::Float(b)) if a == b => Shape::Complex(*a),
                _ => Shape::Other,
            },
            _ => Shape::Other,
        },
        _ => Shape::Other,
    }
}

/// Decode `lit` as a constant of type `ty`.
///
/// String literals become byte arrays whatever their static type.
pub(crate) fn decode_literal(
    lit: &Literal,
    ty: &Type,
    defs: &TypeDefs,
) -> Result<Constant, DecodeError> {
    if lit.kind == LitKind::String {
        return Ok(Constant::CharArray(unquote_string(&lit.raw)?));
    }

    let shape = shape_of(ty, defs);
    if shape == Shape::Other {
        return Err(DecodeError::NonBasicType);
    }

    match lit.kind {
        LitKind::Int => {
            let value = parse_int(&lit.raw)?;
            numeric(ty, shape, Number::Int(value))
        }
        LitKind::Float => {
            let value = parse_float(&lit.raw)?;
            numeric(ty, shape, Number::Float(value))
        }
        LitKind::Char => {
            let value = unquote_char(&lit.raw)?;
            numeric(ty, shape, Number::Int(u128::from(value)))
        }
        LitKind::Imag => {
            let Shape::Complex(kind) = shape else {
                return Err("imaginary constant needs a complex type".into());
            };
            let im = parse_imag(&lit.raw)?;
            complex(ty, kind, 0.0, im)
        }
        LitKind::String => Err(DecodeError::NonBasicType),
    }
}

impl Generator<'_> {
    /// Decode the literal expression `expr` under its static type.
    pub(crate) fn lower_literal(
        &mut self,
        expr: ExprId,
        lit: &Literal,
    ) -> Result<Constant, LowerError> {
        let ty = self.type_of(expr)?;
        match decode_literal(lit, &ty, self.catalog.defs()) {
            Ok(constant) => Ok(constant),
            Err(DecodeError::Malformed(reason)) => {
                let problem = LowerProblem::InvalidLiteral {
                    raw: lit.raw.clone(),
                    reason,
                    span: self.span_of(expr),
                };
                Err(LowerError::Reported(self.report(problem)))
            }
            Err(DecodeError::NonBasicType) => Err(InternalError::NonBasicLiteral {
                raw: lit.raw.clone(),
                ty: self.catalog.display(&ty),
            }
            .into()),
        }
    }
}

// ── Constant construction ──────────────────────────────────────────

enum Number {
    Int(u128),
    Float(f64),
}

impl Number {
    #[expect(
        clippy::cast_precision_loss,
        reason = "integer constants beyond 2^53 round like the source language does"
    )]
    fn to_f64(&self) -> f64 {
        match *self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }
}

fn numeric(ty: &Type, shape: Shape, value: Number) -> Result<Constant, DecodeError> {
    match shape {
        Shape::Int(bits) => {
            let value = match value {
                Number::Int(value) => value,
                Number::Float(value) => float_to_int(value)?,
            };
            int(ty, bits, value)
        }
        Shape::Float(kind) => float(ty, kind, value.to_f64()),
        Shape::Complex(kind) => complex(ty, kind, value.to_f64(), 0.0),
        Shape::Other => Err(DecodeError::NonBasicType),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "checked to be a non-negative integral value first"
)]
fn float_to_int(value: f64) -> Result<u128, DecodeError> {
    if value.fract() != 0.0 {
        return Err(format!("constant {value} truncated to integer").into());
    }
    if value < 0.0 || value >= 2f64.powi(128) {
        return Err(format!("constant {value} overflows integer").into());
    }
    Ok(value as u128)
}

#[expect(clippy::cast_possible_truncation, reason = "range checked first")]
fn int(ty: &Type, bits: u32, value: u128) -> Result<Constant, DecodeError> {
    if bits < 128 && value >> bits != 0 {
        return Err(format!("constant {value} overflows i{bits}").into());
    }
    Ok(Constant::uint_with_width(ty.clone(), bits, value as u64))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "rounding to single precision is intended"
)]
fn round(kind: FloatKind, value: f64) -> Result<f64, DecodeError> {
    let value = match kind {
        FloatKind::Single => f64::from(value as f32),
        FloatKind::Double => value,
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err("constant overflows floating-point type".into())
    }
}

fn float(ty: &Type, kind: FloatKind, value: f64) -> Result<Constant, DecodeError> {
    Ok(Constant::Float {
        ty: ty.clone(),
        bits: round(kind, value)?.to_bits(),
    })
}

fn complex(ty: &Type, kind: FloatKind, re: f64, im: f64) -> Result<Constant, DecodeError> {
    let part = Type::Float(kind);
    Ok(Constant::Struct {
        ty: ty.clone(),
        fields: vec![float(&part, kind, re)?, float(&part, kind, im)?],
    })
}

// ── Numbers ────────────────────────────────────────────────────────

/// `_` may only separate digits (or follow a base prefix).
fn check_separators(raw: &str) -> Result<(), String> {
    if raw.starts_with('_') || raw.ends_with('_') || raw.contains("__") {
        return Err("'_' must separate successive digits".to_owned());
    }
    Ok(())
}

fn split_radix(raw: &str) -> (u32, &str) {
    let bytes = raw.as_bytes();
    match bytes {
        [b'0', b'x' | b'X', ..] => (16, &raw[2..]),
        [b'0', b'o' | b'O', ..] => (8, &raw[2..]),
        [b'0', b'b' | b'B', ..] => (2, &raw[2..]),
        [b'0', _, ..] => (8, &raw[1..]),
        _ => (10, raw),
    }
}

pub(crate) fn parse_int(raw: &str) -> Result<u128, String> {
    check_separators(raw)?;
    let (radix, digits) = split_radix(raw);
    let digits = digits.strip_prefix('_').unwrap_or(digits);
    if digits.is_empty() {
        return Err("missing digits".to_owned());
    }

    let mut value: u128 = 0;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c
            .to_digit(radix)
            .ok_or_else(|| format!("invalid digit {c:?} in base {radix} literal"))?;
        value = value
            .checked_mul(u128::from(radix))
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or_else(|| "integer constant too large".to_owned())?;
    }
    Ok(value)
}

pub(crate) fn parse_float(raw: &str) -> Result<f64, String> {
    check_separators(raw)?;
    let text: String = raw.chars().filter(|&c| c != '_').collect();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return parse_hex_float(hex);
    }
    if !text.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err("malformed floating-point literal".to_owned());
    }
    let value: f64 = text
        .parse()
        .map_err(|_| "malformed floating-point literal".to_owned())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err("floating-point constant too large".to_owned())
    }
}

fn parse_hex_float(text: &str) -> Result<f64, String> {
    let (mantissa, exponent) = text
        .split_once(['p', 'P'])
        .ok_or_else(|| "hexadecimal mantissa requires a 'p' exponent".to_owned())?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err("hexadecimal mantissa has no digits".to_owned());
    }

    let mut value = 0.0f64;
    for c in int_part.chars().chain(frac_part.chars()) {
        let digit = c
            .to_digit(16)
            .ok_or_else(|| format!("invalid digit {c:?} in hexadecimal literal"))?;
        value = value * 16.0 + f64::from(digit);
    }

    let exponent: i32 = exponent
        .parse()
        .map_err(|_| "malformed exponent".to_owned())?;
    let scale = i32::try_from(frac_part.len())
        .ok()
        .and_then(|len| exponent.checked_sub(len.checked_mul(4)?))
        .ok_or_else(|| "exponent out of range".to_owned())?;
    let value = value * 2f64.powi(scale);
    if value.is_finite() {
        Ok(value)
    } else {
        Err("floating-point constant too large".to_owned())
    }
}

/// Value of an imaginary literal's body.
///
/// A body of decimal digits is decimal even with leading zeros (`0123i` is
/// `123i`).
pub(crate) fn parse_imag(raw: &str) -> Result<f64, String> {
    let body = raw
        .strip_suffix('i')
        .ok_or_else(|| "imaginary literal must end in 'i'".to_owned())?;
    let decimal_digits = body.chars().all(|c| c.is_ascii_digit() || c == '_');
    if decimal_digits {
        check_separators(body)?;
        let digits: String = body.chars().filter(|&c| c != '_').collect();
        return parse_float(&digits);
    }
    let is_int = match split_radix(body) {
        (16, digits) => !digits.contains(['.', 'p', 'P']),
        (8, digits) => !digits.contains(['.', 'e', 'E']),
        (radix, _) => radix == 2,
    };
    if is_int {
        let value = parse_int(body)?;
        Ok(Number::Int(value).to_f64())
    } else {
        parse_float(body)
    }
}

// ── Characters and strings ─────────────────────────────────────────

/// One decoded unit of a quoted literal.
enum Unit {
    Char(char),
    /// `\x` and octal escapes denote single bytes.
    Byte(u8),
}

/// Decode the character or escape sequence at the start of `s`, inside a
/// literal delimited by `quote`.
fn next_unit(s: &str, quote: char) -> Result<(Unit, &str), String> {
    let mut chars = s.chars();
    let c = chars
        .next()
        .ok_or_else(|| "unexpected end of literal".to_owned())?;
    if c == quote {
        return Err(format!("unescaped {quote} in literal"));
    }
    if c == '\n' {
        return Err("newline in literal".to_owned());
    }
    if c != '\\' {
        return Ok((Unit::Char(c), chars.as_str()));
    }

    let escape = chars
        .next()
        .ok_or_else(|| "escape sequence not terminated".to_owned())?;
    let rest = chars.as_str();
    let simple = match escape {
        'a' => Some('\u{7}'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{b}'),
        '\\' => Some('\\'),
        '\'' | '"' if escape == quote => Some(escape),
        _ => None,
    };
    if let Some(c) = simple {
        return Ok((Unit::Char(c), rest));
    }

    match escape {
        'x' => {
            let (value, rest) = take_digits(rest, 2, 16)?;
            Ok((Unit::Byte(byte(value)?), rest))
        }
        'u' | 'U' => {
            let len = if escape == 'u' { 4 } else { 8 };
            let (value, rest) = take_digits(rest, len, 16)?;
            let c = char::from_u32(value)
                .ok_or_else(|| format!("escape sequence is invalid Unicode code point {value:#x}"))?;
            Ok((Unit::Char(c), rest))
        }
        '0'..='7' => {
            // The first octal digit was consumed as the escape character.
            let (value, rest) = take_digits(&s[1..], 3, 8)?;
            Ok((Unit::Byte(byte(value)?), rest))
        }
        other => Err(format!("unknown escape sequence \\{other}")),
    }
}

/// Exactly `len` digits of `radix` at the start of `s`.
fn take_digits(s: &str, len: usize, radix: u32) -> Result<(u32, &str), String> {
    let digits = s
        .get(..len)
        .filter(|digits| digits.chars().all(|c| c.is_digit(radix)))
        .ok_or_else(|| format!("escape sequence needs {len} base-{radix} digits"))?;
    let value = u32::from_str_radix(digits, radix)
        .map_err(|_| format!("escape sequence needs {len} base-{radix} digits"))?;
    Ok((value, &s[len..]))
}

fn byte(value: u32) -> Result<u8, String> {
    u8::try_from(value).map_err(|_| format!("octal escape value {value} > 255"))
}

/// Code point of a character literal such as `'a'` or `'\n'`.
pub(crate) fn unquote_char(raw: &str) -> Result<u32, String> {
    let body = raw
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(|| "character literal must be quoted with '".to_owned())?;
    if body.is_empty() {
        return Err("empty character literal".to_owned());
    }
    let (unit, rest) = next_unit(body, '\'')?;
    if !rest.is_empty() {
        return Err("more than one character in character literal".to_owned());
    }
    Ok(match unit {
        Unit::Char(c) => u32::from(c),
        Unit::Byte(b) => u32::from(b),
    })
}

/// Bytes of an interpreted (`"..."`) or raw (`` `...` ``) string literal.
pub(crate) fn unquote_string(raw: &str) -> Result<Vec<u8>, String> {
    if let Some(body) = raw.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Ok(body.bytes().filter(|&b| b != b'\r').collect());
    }
    let mut body = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| "string literal must be quoted".to_owned())?;

    let mut bytes = Vec::with_capacity(body.len());
    while !body.is_empty() {
        let (unit, rest) = next_unit(body, '"')?;
        match unit {
            Unit::Char(c) => {
                let mut buf = [0; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            Unit::Byte(b) => bytes.push(b),
        }
        body = rest;
    }
    Ok(bytes)
}
