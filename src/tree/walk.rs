//! Tree traversal

use rowan::WalkEvent;
use text_size::TextSize;

use super::SyntaxTree;
use super::arena::Child;
use super::node::Node;

/// Children of a node, with positions computed from the running width
#[derive(Clone)]
pub struct NodeChildren<'t> {
    tree: &'t SyntaxTree,
    children: std::slice::Iter<'t, Child>,
    offset: TextSize,
}

impl<'t> NodeChildren<'t> {
    pub(crate) fn new(tree: &'t SyntaxTree, children: &'t [Child], start: TextSize) -> Self {
        Self {
            tree,
            children: children.iter(),
            offset: start,
        }
    }
}

impl<'t> Iterator for NodeChildren<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let child = self.children.next()?;
        let node = Node::new(self.tree, child.node, self.offset, child.field);
        self.offset += self.tree.arena().get(child.node).width;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl ExactSizeIterator for NodeChildren<'_> {}

/// Depth-first walk yielding enter/leave events.
///
/// Uses an explicit stack, so deeply nested input cannot overflow the call
/// stack.
pub struct Preorder<'t> {
    stack: Vec<(Node<'t>, NodeChildren<'t>)>,
    start: Option<Node<'t>>,
}

impl<'t> Preorder<'t> {
    pub(crate) fn new(root: Node<'t>) -> Self {
        Self {
            stack: Vec::new(),
            start: Some(root),
        }
    }

    /// Don't descend into the node just entered.
    pub fn skip_subtree(&mut self) {
        if let Some((_, children)) = self.stack.last_mut() {
            children.by_ref().for_each(drop);
        }
    }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = WalkEvent<Node<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.start.take() {
            self.stack.push((root, root.children()));
            return Some(WalkEvent::Enter(root));
        }
        let (node, children) = self.stack.last_mut()?;
        match children.next() {
            Some(child) => {
                self.stack.push((child, child.children()));
                Some(WalkEvent::Enter(child))
            }
            None => {
                let node = *node;
                self.stack.pop();
                Some(WalkEvent::Leave(node))
            }
        }
    }
}
