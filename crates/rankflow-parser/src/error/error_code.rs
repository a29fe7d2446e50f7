//! Error codes for the Rankflow diagnostic system.
//!
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Validation errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A string was opened with a quote but never closed on the same line.
    E001,

    /// A character that cannot start any token.
    E002,

    /// A backslash escape other than `\n`, `\t`, `\\` or `\"`.
    E003,

    /// The parser found a token it did not expect at this position.
    E100,

    /// The input ended in the middle of a statement.
    E101,

    /// The `graph` header names a direction other than `TB` or `LR`.
    E102,

    /// A node is declared more than once.
    E200,

    /// More than one `graph` header.
    E201,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete statement",
            ErrorCode::E102 => "unknown direction",
            ErrorCode::E200 => "duplicate node",
            ErrorCode::E201 => "duplicate graph header",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
