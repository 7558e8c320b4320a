//! Foundation types for the BASIC parser.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`Point`] - Row/column positions
//! - [`LineIndex`] - Byte offset to [`Point`] conversion
//!
//! This module has NO dependencies on other crate modules.

mod position;

pub use position::{LineIndex, Point};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
