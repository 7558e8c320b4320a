//! # basic-syntax
//!
//! Incremental, error-tolerant syntax trees for line-numbered BASIC.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! incremental → Edits, reuse of old subtrees
//!   ↓
//! tree        → Arena, SyntaxTree/Node, diagnostics, rowan export
//!   ↓
//! parser      → Logos lexer, grammar + LALR(1) tables, GLR engine
//!   ↓
//! base        → Primitives (Point, LineIndex, TextRange)
//! ```
//!
//! ## Usage
//!
//! ```
//! use basic_syntax::{InputEdit, Parser};
//!
//! let parser = Parser::new();
//! let old_text = "10 PRINT \"HI\"\n20 GOTO 10\n";
//! let old = parser.parse(old_text);
//! assert!(!old.has_error());
//!
//! let new_text = "10 PRINT \"HI\"\n20 GOTO 100\n";
//! let edit = InputEdit::replace(old_text, 22, 24, "100");
//! let new = parser.parse_incremental(&old, new_text, &[edit]);
//! assert_eq!(new.text(), new_text);
//! assert!(new.structurally_eq(&parser.parse(new_text)));
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → tree → incremental)
// ============================================================================

/// Foundation types: Point, LineIndex, TextRange
pub mod base;

/// Parser: Logos lexer, grammar tables, GLR engine
pub mod parser;

/// Syntax trees: arena, nodes, walks, diagnostics
pub mod tree;

/// Incremental reparsing: edits and subtree reuse
pub mod incremental;

// Re-export commonly needed items
pub use parser::keywords;

pub use base::{LineIndex, Point, TextRange, TextSize};
pub use incremental::InputEdit;
pub use parser::{
    CasePolicy, ConfigError, ErrorCode, Language, ParseOptions, Parser, SyntaxError, SyntaxKind,
    TextSource, parse,
};
pub use tree::{Node, SyntaxTree};
