//! Cleanse DOM - markup tree
//!
//! Arena-allocated tree for parsed markup fragments. Nodes are addressed by
//! [`NodeId`] handles and linked through parent/sibling handles, so every node
//! has exactly one owner slot in the arena and at most one parent.

mod node;
mod tree;

pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use tree::{ChildIterator, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the fragment container)
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this handle points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
