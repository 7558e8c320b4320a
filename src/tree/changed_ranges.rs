//! Ranges that differ between two versions of a tree

use rustc_hash::FxHashSet;
use text_size::TextRange;

use super::SyntaxTree;
use super::arena::NodeId;

/// Byte ranges of `new` not covered by subtrees it shares with `old`.
///
/// Subtrees are shared only between trees of one incremental lineage; for
/// unrelated trees the whole of `new` is reported unless the two are
/// structurally equal.
pub(crate) fn changed_ranges(old: &SyntaxTree, new: &SyntaxTree) -> Vec<TextRange> {
    if !new.arena().descends_from(old.arena()) {
        if old.root_node().structurally_eq(new.root_node()) {
            return Vec::new();
        }
        return vec![new.root_node().byte_range()];
    }

    let old_ids: FxHashSet<NodeId> = old.root_node().preorder_nodes().map(|n| n.id()).collect();

    let mut ranges: Vec<TextRange> = Vec::new();
    let mut walk = new.root_node().preorder();
    while let Some(event) = walk.next() {
        let rowan::WalkEvent::Enter(node) = event else {
            continue;
        };
        if old_ids.contains(&node.id()) {
            walk.skip_subtree();
            continue;
        }
        if node.child_count() > 0 {
            continue;
        }
        let range = node.byte_range();
        match ranges.last_mut() {
            Some(last) if last.end() >= range.start() => *last = last.cover(range),
            _ => ranges.push(range),
        }
    }
    ranges
}
