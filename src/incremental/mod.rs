//! Incremental reparsing support
//!
//! An edited document is reparsed with [`Parser::parse_incremental`], given
//! the previous tree and the [`InputEdit`]s that turned the old text into
//! the new one. Old subtrees the edits cannot have affected are indexed by
//! their new position and handed to the engine, which shifts them whole
//! instead of lexing and reducing their text again.
//!
//! ```text
//! old tree ──┐
//!            ├──▶ ReuseIndex (new offset ──▶ old nodes) ──▶ Engine ──▶ new tree
//! edits ─────┘                                        new text ──┘
//! ```
//!
//! The result is always the tree a fresh parse of the new text produces;
//! reuse only changes how much of it is rebuilt.
//!
//! [`Parser::parse_incremental`]: crate::parser::Parser::parse_incremental

mod reusable;

pub(crate) use reusable::ReuseIndex;

use text_size::TextSize;

use crate::base::Point;

/// A single text replacement, in byte offsets and points.
///
/// Edits passed together are applied in order, each in the coordinates of
/// the text produced by the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdit {
    pub start_byte: TextSize,
    pub old_end_byte: TextSize,
    pub new_end_byte: TextSize,
    pub start_point: Point,
    pub old_end_point: Point,
    pub new_end_point: Point,
}

impl InputEdit {
    /// Replace `old_text[start..old_end]` with `new_text`, computing the
    /// points from the old text.
    ///
    /// # Panics
    /// Panics if `start..old_end` is not a range of `old_text`.
    pub fn replace(
        old_text: impl AsRef<[u8]>,
        start: u32,
        old_end: u32,
        new_text: impl AsRef<[u8]>,
    ) -> Self {
        let old_text = old_text.as_ref();
        let new_text = new_text.as_ref();
        let (start_usize, old_end_usize) = (start as usize, old_end as usize);
        assert!(
            start <= old_end && old_end_usize <= old_text.len(),
            "edit {start}..{old_end} is outside a text of {} bytes",
            old_text.len()
        );

        let start_point = Point::default().advance(&old_text[..start_usize]);
        let old_end_point = start_point.advance(&old_text[start_usize..old_end_usize]);
        let new_end_point = start_point.advance(new_text);
        Self {
            start_byte: TextSize::new(start),
            old_end_byte: TextSize::new(old_end),
            new_end_byte: TextSize::new(start + new_text.len() as u32),
            start_point,
            old_end_point,
            new_end_point,
        }
    }

    pub fn insert(old_text: impl AsRef<[u8]>, at: u32, new_text: impl AsRef<[u8]>) -> Self {
        Self::replace(old_text, at, at, new_text)
    }

    pub fn delete(old_text: impl AsRef<[u8]>, start: u32, end: u32) -> Self {
        Self::replace(old_text, start, end, b"")
    }

    /// Change in text length
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.new_end_byte)) - i64::from(u32::from(self.old_end_byte))
    }

    /// Apply the edit to a byte buffer.
    ///
    /// # Panics
    /// Panics if the edit does not fit `text`.
    pub fn apply(&self, text: &mut Vec<u8>, new_text: &[u8]) {
        let start = u32::from(self.start_byte) as usize;
        let old_end = u32::from(self.old_end_byte) as usize;
        text.splice(start..old_end, new_text.iter().copied());
    }
}
