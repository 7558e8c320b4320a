//! Borrowed node handles

use std::fmt;

use text_size::{TextRange, TextSize};

use super::SyntaxTree;
use super::arena::{Child, NodeData, NodeId};
use super::walk::{NodeChildren, Preorder};
use crate::parser::SyntaxKind;
use crate::parser::grammar::FieldId;

/// A node of a [`SyntaxTree`], with its absolute position.
///
/// Nodes carry no parent pointer; [`Node::parent`] searches down from the
/// root instead.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
    start: TextSize,
    field: Option<FieldId>,
}

impl<'t> Node<'t> {
    pub(crate) fn new(
        tree: &'t SyntaxTree,
        id: NodeId,
        start: TextSize,
        field: Option<FieldId>,
    ) -> Self {
        Self {
            tree,
            id,
            start,
            field,
        }
    }

    pub(crate) fn data(&self) -> &'t NodeData {
        self.tree.arena().get(self.id)
    }

    pub(crate) fn raw_children(&self) -> &'t [Child] {
        self.tree.arena().children(self.id)
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    /// Arena id; equal ids in two trees of one lineage mean a shared node
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn symbol_id(&self) -> u16 {
        self.kind() as u16
    }

    pub fn start_byte(&self) -> TextSize {
        self.start
    }

    pub fn end_byte(&self) -> TextSize {
        self.start + self.data().width
    }

    pub fn byte_range(&self) -> TextRange {
        TextRange::at(self.start, self.data().width)
    }

    pub fn is_leaf(&self) -> bool {
        self.data().is_leaf()
    }

    /// Named nodes are the ones S-expressions show
    pub fn is_named(&self) -> bool {
        self.kind().is_named()
    }

    pub fn is_trivia(&self) -> bool {
        self.kind().is_trivia()
    }

    pub fn is_error(&self) -> bool {
        self.data().is_error()
    }

    pub fn is_missing(&self) -> bool {
        self.data().is_missing()
    }

    pub fn has_error(&self) -> bool {
        self.data().has_error()
    }

    /// Field this node fills in its parent
    pub fn field_name(&self) -> Option<&'t str> {
        self.tree.language().field_name(self.field?)
    }

    /// Field label of the child at `index`
    pub fn field_name_for_child(&self, index: usize) -> Option<&'t str> {
        let field = self.raw_children().get(index)?.field?;
        self.tree.language().field_name(field)
    }

    pub fn child_count(&self) -> usize {
        self.data().child_count()
    }

    pub fn children(&self) -> NodeChildren<'t> {
        NodeChildren::new(self.tree, self.raw_children(), self.start)
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.children().nth(index)
    }

    /// Children other than keywords, punctuation and whitespace
    pub fn named_children(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.children().filter(|child| child.is_named() && !child.is_trivia())
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node<'t>> {
        self.children_by_field_name(name).next()
    }

    pub fn children_by_field_name(&self, name: &str) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let field = self.tree.language().field_id(name);
        self.children()
            .filter(move |child| field.is_some() && child.field == field)
    }

    /// Source text covered by this node
    pub fn text(&self) -> String {
        if self.is_leaf() {
            return self.data().text.to_string();
        }
        let mut text = String::with_capacity(self.data().width.into());
        for node in self.preorder_nodes() {
            if node.is_leaf() {
                text.push_str(&node.data().text);
            }
        }
        text
    }

    /// Text of a leaf, borrowed from the tree
    pub fn leaf_text(&self) -> Option<&'t str> {
        let data = self.data();
        data.is_leaf().then_some(data.text.as_str())
    }

    /// Enter/leave events over this subtree
    pub fn preorder(&self) -> Preorder<'t> {
        Preorder::new(*self)
    }

    /// This node and all its descendants, in document order
    pub fn preorder_nodes(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.preorder().filter_map(|event| match event {
            rowan::WalkEvent::Enter(node) => Some(node),
            rowan::WalkEvent::Leave(_) => None,
        })
    }

    pub fn leaves(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.preorder_nodes().filter(|node| node.is_leaf())
    }

    /// The node this one is a child of.
    ///
    /// Computed by descending from the root, so it costs a walk down the
    /// tree's height.
    pub fn parent(&self) -> Option<Node<'t>> {
        fn search<'t>(current: Node<'t>, target: &Node<'t>) -> Option<Node<'t>> {
            let range = target.byte_range();
            for child in current.children() {
                if child == *target {
                    return Some(current);
                }
                if !child.is_leaf() && child.byte_range().contains_range(range) {
                    if let Some(parent) = search(child, target) {
                        return Some(parent);
                    }
                }
            }
            None
        }
        search(self.tree.root_node(), self)
    }

    /// Parents up to the root, innermost first
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Compare shape and text, ignoring absolute positions and node identity.
    pub fn structurally_eq(&self, other: Node<'_>) -> bool {
        let (left, right) = (self.tree.arena(), other.tree.arena());
        let shared = left.descends_from(right) || right.descends_from(left);
        let mut stack = vec![(*self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.field_name() != b.field_name() {
                return false;
            }
            if shared && a.id == b.id {
                continue;
            }
            let (da, db) = (a.data(), b.data());
            if da.kind != db.kind
                || da.width != db.width
                || da.is_error() != db.is_error()
                || da.is_missing() != db.is_missing()
                || da.child_count() != db.child_count()
                || da.text != db.text
            {
                return false;
            }
            stack.extend(a.children().zip(b.children()));
        }
        true
    }

    /// Render named nodes as an S-expression, e.g.
    /// `(line_statement label: (number) (goto_statement target: (number)))`.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out, None);
        out
    }

    fn write_sexp(&self, out: &mut String, field: Option<&str>) {
        if !out.is_empty() {
            out.push(' ');
        }
        if let Some(field) = field {
            out.push_str(field);
            out.push_str(": ");
        }
        out.push('(');
        if self.is_missing() {
            out.push_str("MISSING ");
            if self.is_named() {
                out.push_str(self.kind_name());
            } else {
                out.push('"');
                out.push_str(self.kind_name());
                out.push('"');
            }
        } else {
            out.push_str(if self.is_error() { "ERROR" } else { self.kind_name() });
            for child in self.children() {
                if child.is_trivia() && !self.is_error() {
                    continue;
                }
                if child.is_named() || child.is_missing() {
                    child.write_sexp(out, child.field_name());
                }
            }
        }
        out.push(')');
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id && self.start == other.start
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.kind_name(), self.byte_range())?;
        if self.is_leaf() && !self.is_missing() {
            write!(f, " {:?}", self.data().text)?;
        }
        Ok(())
    }
}
