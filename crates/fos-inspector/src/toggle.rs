//! Preview visibility toggling
//!
//! Hiding or revealing nodes during a preview rewrites their inline
//! `display`. The value it replaced is remembered per node so the preview
//! can be undone, until the records are forgotten on commit.

use std::collections::HashMap;

use fos_dom::{DomTree, NodeId};

/// Inline `display` a node had before it was toggled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedDisplay {
    Inline { value: String, important: bool },
    Absent,
}

/// Undo records of the current preview
#[derive(Debug, Default)]
pub struct ToggleRecords {
    saved: HashMap<NodeId, SavedDisplay>,
}

impl ToggleRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a visibility transition to `nodes`.
    ///
    /// | original | target | effect |
    /// |---|---|---|
    /// | shown | shown | restore the saved `display` |
    /// | shown | hidden | remember `display`, set `none` |
    /// | hidden | shown | remember `none`, force `initial !important` |
    /// | hidden | hidden | forget, force `none !important` |
    pub fn toggle(&mut self, tree: &mut DomTree, nodes: &[NodeId], original: bool, target: bool) {
        for &node in nodes.iter().rev() {
            match (original, target) {
                (true, true) => {
                    if let Some(saved) = self.saved.remove(&node) {
                        restore(tree, node, saved);
                    }
                }
                (true, false) => {
                    let current = saved_display(tree, node);
                    self.saved.entry(node).or_insert(current);
                    set_display(tree, node, "none", false);
                }
                (false, true) => {
                    self.saved.entry(node).or_insert(SavedDisplay::Inline {
                        value: "none".to_string(),
                        important: false,
                    });
                    set_display(tree, node, "initial", true);
                }
                (false, false) => {
                    self.saved.remove(&node);
                    set_display(tree, node, "none", true);
                }
            }
        }
    }

    /// Undo every recorded toggle
    pub fn reset(&mut self, tree: &mut DomTree) {
        for (node, saved) in self.saved.drain() {
            restore(tree, node, saved);
        }
    }

    /// Keep current visibility as is and drop the undo records
    pub fn forget(&mut self) {
        self.saved.clear();
    }

    pub fn saved(&self, node: NodeId) -> Option<&SavedDisplay> {
        self.saved.get(&node)
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

fn saved_display(tree: &DomTree, node: NodeId) -> SavedDisplay {
    let Some(element) = tree.element(node) else {
        return SavedDisplay::Absent;
    };
    let style = element.style();
    match style.get_property_value("display").filter(|v| !v.is_empty()) {
        Some(value) => SavedDisplay::Inline {
            value: value.to_string(),
            important: style.get_property_priority("display"),
        },
        None => SavedDisplay::Absent,
    }
}

fn set_display(tree: &mut DomTree, node: NodeId, value: &str, important: bool) {
    if let Some(element) = tree.element_mut(node) {
        element.set_style_property("display", value, important);
    }
}

// Stale handles are skipped: the node is gone, nothing to restore.
fn restore(tree: &mut DomTree, node: NodeId, saved: SavedDisplay) {
    let Some(element) = tree.element_mut(node) else {
        return;
    };
    match saved {
        SavedDisplay::Inline { value, important } => {
            element.set_style_property("display", &value, important);
        }
        SavedDisplay::Absent => {
            element.remove_style_property("display");
        }
    }
}
