//! Append-only node arena
//!
//! Nodes are addressed by [`NodeId`] and never freed individually. An arena
//! built by an incremental reparse is a new *layer* on top of the previous
//! tree's arena: old ids stay valid, new ids continue after them, and the
//! whole stack of layers is released when the last tree using it is dropped.
//!
//! Nodes store widths, not offsets, so a subtree can be shared between tree
//! versions whatever moved in front of it.

use std::ops::BitOr;
use std::sync::Arc;

use smol_str::SmolStr;
use text_size::TextSize;

use crate::parser::grammar::{FieldId, StateId};
use crate::parser::{LexMode, SyntaxKind};

/// Stable index of a node within an arena lineage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeFlags(u8);

impl NodeFlags {
    /// Unrecognised input: an error token or an ERROR wrapper node
    pub const ERROR: NodeFlags = NodeFlags(1);
    /// Zero-width token invented by recovery
    pub const MISSING: NodeFlags = NodeFlags(1 << 1);
    /// This node or a descendant is an error or missing
    pub const HAS_ERROR: NodeFlags = NodeFlags(1 << 2);
    /// Built while several GLR versions were alive
    pub const FRAGILE: NodeFlags = NodeFlags(1 << 3);

    pub const fn empty() -> Self {
        NodeFlags(0)
    }

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: NodeFlags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: NodeFlags) {
        self.0 |= other.0;
    }
}

impl BitOr for NodeFlags {
    type Output = NodeFlags;

    fn bitor(self, rhs: NodeFlags) -> NodeFlags {
        NodeFlags(self.0 | rhs.0)
    }
}

/// A child reference with its field label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Child {
    pub node: NodeId,
    pub field: Option<FieldId>,
}

impl Child {
    pub fn new(node: NodeId) -> Self {
        Self { node, field: None }
    }
}

/// Sentinel for nodes that record no parse state (leaves, errors)
pub const NO_STATE: StateId = StateId::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub flags: NodeFlags,
    /// Lexer mode at the node's first token
    pub mode: LexMode,
    /// Parse state uncovered when this node was reduced
    pub pre_state: StateId,
    pub width: TextSize,
    /// Leaf text; empty for internal nodes
    pub text: SmolStr,
    children: (u32, u32),
}

impl NodeData {
    /// Tokens are leaves; an internal node with no children is not.
    pub fn is_leaf(&self) -> bool {
        self.children.1 == 0 && self.kind.is_terminal()
    }

    pub fn child_count(&self) -> usize {
        self.children.1 as usize
    }

    pub fn is_error(&self) -> bool {
        self.flags.contains(NodeFlags::ERROR)
    }

    pub fn is_missing(&self) -> bool {
        self.flags.contains(NodeFlags::MISSING)
    }

    pub fn has_error(&self) -> bool {
        self.flags.contains(NodeFlags::HAS_ERROR)
    }

    pub fn is_fragile(&self) -> bool {
        self.flags.contains(NodeFlags::FRAGILE)
    }
}

#[derive(Debug, Default)]
pub struct Arena {
    base: Option<Arc<Arena>>,
    /// Id of `nodes[0]`
    first: u32,
    depth: usize,
    nodes: Vec<NodeData>,
    children: Vec<Child>,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new layer continuing after `base`
    pub fn layered(base: Arc<Arena>) -> Self {
        Self {
            first: base.end(),
            depth: base.depth + 1,
            base: Some(base),
            nodes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// One past the highest id in this lineage
    pub fn end(&self) -> u32 {
        self.first + self.nodes.len() as u32
    }

    /// Number of layers below this one
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Nodes stored in this layer alone
    pub fn layer_len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `other` is this arena or one of its base layers
    pub fn descends_from(&self, other: &Arena) -> bool {
        let mut layer = self;
        loop {
            if std::ptr::eq(layer, other) {
                return true;
            }
            match &layer.base {
                Some(base) => layer = base.as_ref(),
                None => return false,
            }
        }
    }

    fn layer(&self, id: NodeId) -> &Arena {
        let mut layer = self;
        while id.0 < layer.first {
            match &layer.base {
                Some(base) => layer = base.as_ref(),
                None => panic!("node {} is not in this arena", id.0),
            }
        }
        layer
    }

    pub fn get(&self, id: NodeId) -> &NodeData {
        let layer = self.layer(id);
        &layer.nodes[(id.0 - layer.first) as usize]
    }

    pub fn children(&self, id: NodeId) -> &[Child] {
        let layer = self.layer(id);
        let (offset, len) = layer.nodes[(id.0 - layer.first) as usize].children;
        &layer.children[offset as usize..(offset + len) as usize]
    }

    pub fn push_leaf(
        &mut self,
        kind: SyntaxKind,
        text: SmolStr,
        width: TextSize,
        mut flags: NodeFlags,
        mode: LexMode,
    ) -> NodeId {
        if flags.intersects(NodeFlags::ERROR | NodeFlags::MISSING) {
            flags.insert(NodeFlags::HAS_ERROR);
        }
        self.push(NodeData {
            kind,
            flags,
            mode,
            pre_state: NO_STATE,
            width,
            text,
            children: (0, 0),
        })
    }

    /// Push an internal node; width, error propagation and mode come from
    /// the children.
    pub fn push_node(
        &mut self,
        kind: SyntaxKind,
        children: &[Child],
        mut flags: NodeFlags,
        pre_state: StateId,
    ) -> NodeId {
        let mut width = TextSize::new(0);
        for child in children {
            let data = self.get(child.node);
            width += data.width;
            if data
                .flags
                .intersects(NodeFlags::ERROR | NodeFlags::MISSING | NodeFlags::HAS_ERROR)
            {
                flags.insert(NodeFlags::HAS_ERROR);
            }
        }
        if flags.contains(NodeFlags::ERROR) {
            flags.insert(NodeFlags::HAS_ERROR);
        }
        let mode = children
            .first()
            .map_or(LexMode::Normal, |child| self.get(child.node).mode);

        let offset = self.children.len() as u32;
        self.children.extend_from_slice(children);
        self.push(NodeData {
            kind,
            flags,
            mode,
            pre_state,
            width,
            text: SmolStr::default(),
            children: (offset, children.len() as u32),
        })
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.end());
        self.nodes.push(data);
        id
    }
}
