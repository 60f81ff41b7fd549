//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree. Nodes are addressed by [`NodeId`] handles that
//! carry a slot generation, so a handle to a destroyed node never resolves
//! to whatever node later reuses its slot.

mod document;
mod node;
mod observer;
mod operations;
mod style;
mod tree;

pub use document::Document;
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use observer::{MutationObserverInit, MutationRecord, ObserverId};
pub use operations::{DomError, DomResult};
pub use style::{InlineStyle, StyleDeclaration};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (arena slot + generation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId { index: u32::MAX, generation: 0 };

    /// Build a handle from its raw parts
    #[inline]
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation the handle was minted for
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Check if this is a real handle (not [`NodeId::NONE`])
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.index != u32::MAX
    }

    /// Convert the sentinel into `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NONE
    }
}
