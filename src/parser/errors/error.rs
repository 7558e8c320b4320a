//! Syntax diagnostics
//!
//! Diagnostics are derived from a finished tree (ERROR and MISSING nodes),
//! never collected while parsing, so an incremental reparse reports the same
//! list as a fresh one.

use rowan::{TextRange, TextSize};

use super::codes::ErrorCode;

/// A second location a diagnostic points at, such as the `(` an unclosed
/// expression was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// One problem found in a tree.
///
/// `range` covers the ERROR node or bad token; a MISSING token yields an
/// empty range at its insertion point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub range: TextRange,
    pub message: String,
    /// Suggested fix, when the code has an obvious one
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            code,
            range,
            message: message.into(),
            hint: None,
            related: Vec::new(),
        }
    }

    pub fn builder(code: ErrorCode) -> SyntaxErrorBuilder {
        SyntaxErrorBuilder {
            code,
            message: None,
            range: None,
            hint: None,
            related: Vec::new(),
        }
    }
}

pub struct SyntaxErrorBuilder {
    code: ErrorCode,
    message: Option<String>,
    range: Option<TextRange>,
    hint: Option<String>,
    related: Vec<RelatedInfo>,
}

impl SyntaxErrorBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.related.push(RelatedInfo::new(message, range));
        self
    }

    /// An unset message falls back to the code's default message and an
    /// unset range to an empty range at offset 0.
    pub fn build(self) -> SyntaxError {
        SyntaxError {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            range: self
                .range
                .unwrap_or_else(|| TextRange::empty(TextSize::new(0))),
            code: self.code,
            hint: self.hint,
            related: self.related,
        }
    }
}
