//! Immutable syntax trees
//!
//! A [`SyntaxTree`] is a root [`NodeId`] into a reference-counted [`Arena`].
//! Cloning a tree is cheap, and trees produced by incremental reparses share
//! the arenas (and the untouched subtrees) of the trees they came from.
//!
//! ```text
//! SyntaxTree ──▶ Arc<Arena> (layer 2) ──▶ Arc<Arena> (layer 1) ──▶ Arc<Arena> (base)
//!     │
//!     └── root_node() ──▶ Node<'_> ──▶ children(), child_by_field_name(), parent()
//! ```

mod arena;
mod changed_ranges;
mod diagnostics;
mod green;
mod node;
mod walk;

pub use arena::{Arena, Child, NO_STATE, NodeData, NodeFlags, NodeId};
pub use node::Node;
pub use walk::{NodeChildren, Preorder};

/// Events yielded by [`Preorder`]
pub use rowan::WalkEvent;

use std::fmt;
use std::sync::Arc;

use rowan::GreenNode;
use text_size::{TextRange, TextSize};

use crate::parser::errors::SyntaxError;
use crate::parser::{Language, ParseOptions, RowanNode};

/// The result of a parse
#[derive(Clone)]
pub struct SyntaxTree {
    arena: Arc<Arena>,
    root: NodeId,
    language: Language,
    options: ParseOptions,
}

impl SyntaxTree {
    pub(crate) fn new(
        arena: Arc<Arena>,
        root: NodeId,
        language: Language,
        options: ParseOptions,
    ) -> Self {
        Self {
            arena,
            root,
            language,
            options,
        }
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::new(self, self.root, TextSize::new(0), None)
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Options the tree was parsed with
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    pub(crate) fn shared_arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    /// Length of the parsed text in bytes
    pub fn len(&self) -> TextSize {
        self.arena.get(self.root).width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == TextSize::new(0)
    }

    pub fn has_error(&self) -> bool {
        self.root_node().has_error()
    }

    /// The source text, rebuilt from the leaves
    pub fn text(&self) -> String {
        self.root_node().text()
    }

    /// Number of incremental reparses layered under this tree's arena
    pub fn arena_depth(&self) -> usize {
        self.arena.depth()
    }

    /// Diagnostics for every ERROR node, error token and MISSING token,
    /// in document order.
    pub fn errors(&self) -> Vec<SyntaxError> {
        diagnostics::collect(self.root_node())
    }

    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    /// Structural equality of the two trees, ignoring node identity
    pub fn structurally_eq(&self, other: &SyntaxTree) -> bool {
        self.root_node().structurally_eq(other.root_node())
    }

    /// Ranges of this tree that are not shared with `old`.
    pub fn changed_ranges(&self, old: &SyntaxTree) -> Vec<TextRange> {
        changed_ranges::changed_ranges(old, self)
    }

    /// Lossless rowan green tree with the same shape
    pub fn to_green(&self) -> GreenNode {
        green::build_green(self.root_node())
    }

    pub fn to_rowan(&self) -> RowanNode {
        RowanNode::new_root(self.to_green())
    }

    /// Indented dump of every node, one per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in self.root_node().preorder() {
            match event {
                rowan::WalkEvent::Enter(node) => {
                    out.push_str(&"  ".repeat(depth));
                    if let Some(field) = node.field_name() {
                        out.push_str(field);
                        out.push_str(": ");
                    }
                    if node.is_missing() {
                        out.push_str("MISSING ");
                    }
                    out.push_str(&format!("{node:?}\n"));
                    depth += 1;
                }
                rowan::WalkEvent::Leave(_) => depth -= 1,
            }
        }
        out
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.language.name())
            .field("len", &self.len())
            .field("has_error", &self.has_error())
            .field("arena_depth", &self.arena_depth())
            .finish()
    }
}
