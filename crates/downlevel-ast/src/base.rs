//! Base types shared by all AST nodes.

use serde::{Deserialize, Serialize};

/// Index of a node in the arena. `NodeIndex::NONE` marks an absent child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == NodeIndex::NONE
    }
}

impl Default for NodeIndex {
    fn default() -> NodeIndex {
        NodeIndex::NONE
    }
}

/// An ordered list of child node indices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new(nodes: Vec<NodeIndex>) -> NodeList {
        NodeList { nodes }
    }

    pub fn empty() -> NodeList {
        NodeList { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> NodeList {
        NodeList { nodes }
    }
}

/// A half-open character range in the source text.
///
/// Synthesized nodes keep the range of the node they replace so source maps
/// and comments can still be attributed; a zero range marks a node with no
/// source counterpart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub pos: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(pos: u32, end: u32) -> TextRange {
        TextRange { pos, end }
    }
}
