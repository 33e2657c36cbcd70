//! Error codes for all lowering diagnostics.
//!
//! Each code is a unique identifier (e.g. `E4001`) whose first digit names
//! the phase that reports it.

use std::fmt;

/// Error codes for all lowering diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E4xxx: lowering errors (types, symbols, statements, expressions)
/// - E9xxx: internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lowering Errors (E4xxx)
    /// Reference to a type name with no declaration
    E4001,
    /// Type kind with no IR representation
    E4002,
    /// Declaration form the lowering does not model
    E4003,
    /// Function or global defined twice in one unit
    E4004,
    /// Operator applied to an operand of the wrong shape
    E4005,
    /// Operand types of a comparison disagree
    E4006,
    /// Identifier that names no parameter, function or global
    E4007,
    /// Malformed or out-of-range literal
    E4008,
    /// Call with the wrong number of arguments
    E4009,
    /// Expression form the lowering does not model
    E4010,
    /// Statement form the lowering does not model
    E4011,
    /// Assignment to something other than a global variable
    E4012,
    /// Named type defined only in terms of itself
    E4013,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E4001,
        ErrorCode::E4002,
        ErrorCode::E4003,
        ErrorCode::E4004,
        ErrorCode::E4005,
        ErrorCode::E4006,
        ErrorCode::E4007,
        ErrorCode::E4008,
        ErrorCode::E4009,
        ErrorCode::E4010,
        ErrorCode::E4011,
        ErrorCode::E4012,
        ErrorCode::E4013,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
            ErrorCode::E4004 => "E4004",
            ErrorCode::E4005 => "E4005",
            ErrorCode::E4006 => "E4006",
            ErrorCode::E4007 => "E4007",
            ErrorCode::E4008 => "E4008",
            ErrorCode::E4009 => "E4009",
            ErrorCode::E4010 => "E4010",
            ErrorCode::E4011 => "E4011",
            ErrorCode::E4012 => "E4012",
            ErrorCode::E4013 => "E4013",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a lowering error (E4xxx range).
    pub fn is_lowering_error(&self) -> bool {
        !self.is_internal_error()
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E4004"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
