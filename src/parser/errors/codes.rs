//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (separators, parentheses)
//! - E03xx: Statement errors
//! - E04xx: Expression errors
//! - E09xx: Generic/fallback errors

use std::fmt;

use crate::parser::SyntaxKind;

/// Error codes for parser diagnostics
///
/// Each error code represents a specific category of parse error,
/// enabling filtering, documentation, and IDE integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors (invalid tokens)
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// Missing `:` between two statements on one line
    E0201,
    /// Unclosed parenthesis
    E0202,
    /// Closing parenthesis without an opening one
    E0203,

    // =========================================================================
    // E03xx: Statement errors
    // =========================================================================
    /// Missing `THEN` in an `IF` statement
    E0301,
    /// Missing `TO` in a `FOR` statement
    E0302,
    /// Missing `=` in an assignment or `FOR`
    E0303,
    /// Missing line number after `GOTO`/`GOSUB`
    E0304,

    // =========================================================================
    // E04xx: Expression errors
    // =========================================================================
    /// Missing expression where expected
    E0401,
    /// Missing variable name
    E0402,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
    /// Expected a specific token
    E0902,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            // Structural
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            // Statement
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            // Expression
            Self::E0401 => "E0401",
            Self::E0402 => "E0402",
            // Generic
            Self::E0901 => "E0901",
            Self::E0902 => "E0902",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 => "structural error",
            Self::E0301 | Self::E0302 | Self::E0303 | Self::E0304 => "statement error",
            Self::E0401 | Self::E0402 => "expression error",
            Self::E0901 | Self::E0902 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0201 => "missing ':' between statements",
            Self::E0202 => "unclosed parenthesis",
            Self::E0203 => "unexpected closing parenthesis",
            Self::E0301 => "missing 'THEN'",
            Self::E0302 => "missing 'TO'",
            Self::E0303 => "missing '='",
            Self::E0304 => "missing line number",
            Self::E0401 => "expected expression",
            Self::E0402 => "expected variable name",
            Self::E0901 => "unexpected token",
            Self::E0902 => "expected token",
        }
    }

    /// Code for a token the parser had to invent during recovery
    pub fn for_missing(kind: SyntaxKind) -> ErrorCode {
        match kind {
            SyntaxKind::COLON => Self::E0201,
            SyntaxKind::R_PAREN => Self::E0202,
            SyntaxKind::THEN_KW => Self::E0301,
            SyntaxKind::TO_KW => Self::E0302,
            SyntaxKind::EQ => Self::E0303,
            SyntaxKind::NUMBER | SyntaxKind::STRING => Self::E0401,
            SyntaxKind::IDENT => Self::E0402,
            _ => Self::E0902,
        }
    }

    /// Check if this is a structural error (separator or parenthesis related)
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::E0201 | Self::E0202 | Self::E0203)
    }

    /// Check if this error comes from the lexer rather than the grammar
    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::E0101 | Self::E0102)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
