//! Lookup of old subtrees that survive a set of edits

use text_size::TextSize;
use tracing::debug;

use super::InputEdit;
use crate::parser::SyntaxKind;
use crate::parser::grammar::StateId;
use crate::tree::{Arena, Child, NodeId, SyntaxTree};

/// Bytes the lexer may read past a token before it knows where the token
/// ends: `1E+5` is one number but `1E+X` is four tokens.
const LEXER_LOOKAHEAD: i64 = 3;

/// Old nodes by their start offset in the new text.
///
/// A node is reusable when neither it nor the input it was parsed from
/// were touched: everything up to and including the next significant
/// token after it, plus the lexer's lookahead, must lie wholly before or
/// wholly after every edit. Nodes containing errors, nodes built while the
/// parse was ambiguous, nodes followed by a MISSING token and zero-width
/// nodes never are.
///
/// Only the start offsets of the root's children are computed up front.
/// A lookup maps its offset back into the old text and descends to it, so
/// a reparse pays for the offsets the parser visits and not for the size
/// of the old tree.
#[derive(Debug)]
pub(crate) struct ReuseIndex<'t> {
    old: &'t SyntaxTree,
    edits: Vec<InputEdit>,
    old_len: i64,
    /// Old start offset of each child of the root
    top_starts: Vec<TextSize>,
}

impl<'t> ReuseIndex<'t> {
    /// Returns `None` if the edits do not describe a change from `old`'s
    /// text to a text of `new_len` bytes.
    pub fn build(old: &'t SyntaxTree, edits: &[InputEdit], new_len: TextSize) -> Option<Self> {
        let old_len = i64::from(u32::from(old.len()));
        if !edits_are_consistent(edits, old_len, i64::from(u32::from(new_len))) {
            return None;
        }

        let arena = old.arena();
        let top = arena.children(old.root_node().id());
        let mut top_starts = Vec::with_capacity(top.len());
        let mut at = TextSize::new(0);
        for child in top {
            top_starts.push(at);
            at += arena.get(child.node).width;
        }
        debug!(
            "[REUSE] {} top-level nodes against {} edits",
            top_starts.len(),
            edits.len()
        );
        Some(Self {
            old,
            edits: edits.to_vec(),
            old_len,
            top_starts,
        })
    }

    /// Candidates starting at `offset`, outermost first
    pub fn at(&self, offset: TextSize) -> Vec<NodeId> {
        let mut found = Vec::new();
        let Some(old_start) = self.unmap(offset) else {
            return found;
        };
        let arena = self.old.arena();
        let top = arena.children(self.old.root_node().id());
        let Some(index) = self
            .top_starts
            .partition_point(|&start| start <= old_start)
            .checked_sub(1)
        else {
            return found;
        };

        let (mut node, mut start) = (top[index].node, self.top_starts[index]);
        loop {
            let data = arena.get(node);
            if start + data.width <= old_start {
                break;
            }
            if start == old_start && self.new_start(node, start) == Some(offset) {
                found.push(node);
            }
            let mut child_start = start;
            let mut next = None;
            for child in arena.children(node) {
                let width = arena.get(child.node).width;
                if old_start < child_start + width {
                    next = Some(child.node);
                    break;
                }
                child_start += width;
            }
            match next {
                Some(child) => (node, start) = (child, child_start),
                None => break,
            }
        }
        found
    }

    /// An old node equal to the one about to be built
    pub fn find_node(
        &self,
        arena: &Arena,
        start: TextSize,
        kind: SyntaxKind,
        pre_state: StateId,
        children: &[Child],
    ) -> Option<NodeId> {
        self.at(start).into_iter().find(|&id| {
            let data = arena.get(id);
            data.kind == kind && data.pre_state == pre_state && arena.children(id) == children
        })
    }

    /// Where the old node at `start` begins in the new text, if it survives.
    fn new_start(&self, node: NodeId, start: TextSize) -> Option<TextSize> {
        let arena = self.old.arena();
        let data = arena.get(node);
        if data.has_error() || data.is_fragile() || data.width == TextSize::new(0) {
            return None;
        }
        let end = start + data.width;
        let after = match self.next_leaf(end) {
            Some((leaf, _)) if arena.get(leaf).is_missing() => return None,
            Some((leaf, leaf_start)) => i64::from(u32::from(leaf_start + arena.get(leaf).width)),
            None => self.old_len,
        };
        let extent = (after + 1).max(i64::from(u32::from(end)) + LEXER_LOOKAHEAD);
        map_through(&self.edits, i64::from(u32::from(start)), extent)
    }

    /// First non-trivia leaf starting at or after `offset`, MISSING ones
    /// included, with its start.
    fn next_leaf(&self, offset: TextSize) -> Option<(NodeId, TextSize)> {
        let arena = self.old.arena();
        let top = arena.children(self.old.root_node().id());
        let first = self
            .top_starts
            .partition_point(|&start| start < offset)
            .saturating_sub(1);
        top.iter()
            .zip(&self.top_starts)
            .skip(first)
            .find_map(|(child, &start)| first_significant(arena, child.node, start, offset))
    }

    /// Old offset for a new one; `None` inside inserted text.
    fn unmap(&self, offset: TextSize) -> Option<TextSize> {
        let mut at = i64::from(u32::from(offset));
        for edit in self.edits.iter().rev() {
            if at >= i64::from(u32::from(edit.new_end_byte)) {
                at -= edit.delta();
            } else if at >= i64::from(u32::from(edit.start_byte)) {
                return None;
            }
        }
        u32::try_from(at).ok().map(TextSize::new)
    }
}

fn first_significant(
    arena: &Arena,
    node: NodeId,
    start: TextSize,
    offset: TextSize,
) -> Option<(NodeId, TextSize)> {
    let data = arena.get(node);
    if start < offset && start + data.width <= offset {
        return None;
    }
    if data.is_leaf() {
        return (!data.kind.is_trivia() && start >= offset).then_some((node, start));
    }
    let mut child_start = start;
    for child in arena.children(node) {
        if let Some(found) = first_significant(arena, child.node, child_start, offset) {
            return Some(found);
        }
        child_start += arena.get(child.node).width;
    }
    None
}

fn edits_are_consistent(edits: &[InputEdit], old_len: i64, new_len: i64) -> bool {
    let mut len = old_len;
    for edit in edits {
        let start = i64::from(u32::from(edit.start_byte));
        let old_end = i64::from(u32::from(edit.old_end_byte));
        let new_end = i64::from(u32::from(edit.new_end_byte));
        if start > old_end || start > new_end || old_end > len {
            return false;
        }
        len += edit.delta();
    }
    len == new_len
}

/// New start of the span `start..extent`, or `None` if an edit touches it.
fn map_through(edits: &[InputEdit], mut start: i64, mut extent: i64) -> Option<TextSize> {
    for edit in edits {
        let edit_start = i64::from(u32::from(edit.start_byte));
        let old_end = i64::from(u32::from(edit.old_end_byte));
        if extent <= edit_start {
            continue;
        }
        if start >= old_end {
            start += edit.delta();
            extent += edit.delta();
            continue;
        }
        return None;
    }
    u32::try_from(start).ok().map(TextSize::new)
}
