//! Highlight overlay seam
//!
//! Drawing highlights over the page is left to the host. The session only
//! decides *which* nodes are highlighted and hands the lists over.

use fos_dom::{DomTree, NodeId};

/// Nodes currently highlighted, by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightLists {
    /// Nodes picked by the operator
    pub picked: Vec<NodeId>,
    /// Nodes hidden by committed filters
    pub hidden: Vec<NodeId>,
    /// Nodes revealed by committed exception filters
    pub unhidden: Vec<NodeId>,
}

impl HighlightLists {
    pub fn clear(&mut self) {
        self.picked.clear();
        self.hidden.clear();
        self.unhidden.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty() && self.hidden.is_empty() && self.unhidden.is_empty()
    }
}

/// Host-side highlight renderer
pub trait Overlay {
    /// Redraw highlights; `scroll_to` asks to bring them into view
    fn render(&mut self, tree: &DomTree, lists: &HighlightLists, scroll_to: bool);

    /// Switch between highlighting the nodes and masking around them
    fn set_inverted(&mut self, inverted: bool);

    /// Remove everything the overlay injected
    fn teardown(&mut self);
}

/// Overlay for headless sessions
#[derive(Debug, Default)]
pub struct NullOverlay;

impl Overlay for NullOverlay {
    fn render(&mut self, _tree: &DomTree, lists: &HighlightLists, scroll_to: bool) {
        tracing::trace!(
            picked = lists.picked.len(),
            hidden = lists.hidden.len(),
            unhidden = lists.unhidden.len(),
            scroll_to,
            "highlight"
        );
    }

    fn set_inverted(&mut self, _inverted: bool) {}

    fn teardown(&mut self) {}
}
