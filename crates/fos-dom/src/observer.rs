//! Mutation observation
//!
//! The tree keeps a list of registrations; every child-list change is
//! offered to each registration and queued on those whose target covers the
//! mutated parent. Consumers pull queued records with
//! [`DomTree::take_records`](crate::DomTree::take_records).

use crate::NodeId;

/// Handle to one registration on a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    /// Report insertions and removals of children
    pub child_list: bool,
    /// Extend observation to the whole subtree of the target
    pub subtree: bool,
}

impl MutationObserverInit {
    /// Subtree-wide structural changes
    pub fn subtree_child_list() -> Self {
        Self { child_list: true, subtree: true }
    }
}

/// A batch of children added to or removed from one parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

#[derive(Debug)]
pub(crate) struct Registration {
    pub(crate) id: ObserverId,
    pub(crate) target: NodeId,
    pub(crate) options: MutationObserverInit,
    pub(crate) records: Vec<MutationRecord>,
}

impl Registration {
    pub(crate) fn new(id: ObserverId, target: NodeId, options: MutationObserverInit) -> Self {
        Self {
            id,
            target,
            options,
            records: Vec::new(),
        }
    }
}
