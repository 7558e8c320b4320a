//! Export to rowan
//!
//! Builds a rowan green tree with the same shape as the arena tree, so code
//! written against rowan's cursor API can walk a parse result. Fields and
//! node flags have no rowan counterpart and are dropped.

use rowan::{GreenNode, GreenNodeBuilder, WalkEvent};

use super::node::Node;

pub(crate) fn build_green(root: Node<'_>) -> GreenNode {
    let mut builder = GreenNodeBuilder::new();
    for event in root.preorder() {
        match event {
            WalkEvent::Enter(node) if node.is_leaf() => {
                // Missing leaves are zero width and carry no text
                builder.token(node.kind().into(), node.leaf_text().unwrap_or_default());
            }
            WalkEvent::Enter(node) => builder.start_node(node.kind().into()),
            WalkEvent::Leave(node) if node.is_leaf() => {}
            WalkEvent::Leave(_) => builder.finish_node(),
        }
    }
    builder.finish()
}
