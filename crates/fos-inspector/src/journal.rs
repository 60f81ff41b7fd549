//! Mutation journal
//!
//! Raw change records are pulled from the tree and buffered as they come.
//! The first buffered batch arms the debounce timer; when it fires the
//! buffers are coalesced into [`JournalEntry`]s: removals of known nodes
//! first, then additions in document order of their inserted roots.
//! Replaying the additions in emission order, each one inserted under its
//! parent right after its left sibling, rebuilds the live sibling order.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, Instant};

use fos_dom::{DomTree, MutationObserverInit, NodeId, ObserverId};
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::config::InspectorConfig;
use crate::debounce::DebounceTimer;
use crate::registry::{IdentityRegistry, Nid};
use crate::snapshot::{LayoutNode, SnapshotBuilder, compute_counts};

/// One coalesced change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    Removal {
        nid: Nid,
    },
    Addition {
        nid: Nid,
        parent: Nid,
        /// Nearest preceding layout sibling, `None` for a first child
        left: Option<Nid>,
    },
}

impl JournalEntry {
    pub fn nid(&self) -> &Nid {
        match self {
            Self::Removal { nid } | Self::Addition { nid, .. } => nid,
        }
    }
}

impl Serialize for JournalEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Removal { nid } => {
                let mut s = serializer.serialize_struct("JournalEntry", 2)?;
                s.serialize_field("what", &-1)?;
                s.serialize_field("nid", nid)?;
                s.end()
            }
            Self::Addition { nid, parent, left } => {
                let mut s = serializer.serialize_struct("JournalEntry", 4)?;
                s.serialize_field("what", &1)?;
                s.serialize_field("nid", nid)?;
                s.serialize_field("u", parent)?;
                s.serialize_field("l", left)?;
                s.end()
            }
        }
    }
}

/// Entries and descriptors accumulated since the last drain
#[derive(Debug, Default)]
pub struct JournalBatch {
    pub entries: Vec<JournalEntry>,
    pub nodes: BTreeMap<Nid, LayoutNode>,
}

/// Debounced record of structural changes for one epoch
#[derive(Debug)]
pub struct MutationJournal {
    observer: Option<ObserverId>,
    target: Option<NodeId>,
    added: Vec<Vec<NodeId>>,
    removed: Vec<Vec<NodeId>>,
    timer: DebounceTimer,
    batch: JournalBatch,
    // removals already emitted, while the node keeps that identifier
    retired: HashMap<NodeId, Nid>,
}

impl MutationJournal {
    pub fn new(debounce: Duration) -> Self {
        Self {
            observer: None,
            target: None,
            added: Vec::new(),
            removed: Vec::new(),
            timer: DebounceTimer::new(debounce),
            batch: JournalBatch::default(),
            retired: HashMap::new(),
        }
    }

    /// Whether the subscription watches `target` and `target` is still in
    /// the document
    pub fn observes(&self, tree: &DomTree, target: NodeId) -> bool {
        self.observer.is_some() && self.target == Some(target) && tree.is_connected(target)
    }

    /// Start observing the subtree of `target`. A journal holds at most
    /// one subscription.
    pub fn subscribe(&mut self, tree: &mut DomTree, target: NodeId) -> bool {
        if self.observer.is_some() {
            return false;
        }
        self.observer = Some(tree.observe(target, MutationObserverInit::subtree_child_list()));
        self.target = Some(target);
        true
    }

    /// Move queued change records into the buffers, arming the timer on
    /// the first non-empty batch.
    pub fn pump(&mut self, tree: &mut DomTree, now: Instant) {
        let Some(observer) = self.observer else {
            return;
        };
        let records = tree.take_records(observer);
        if records.is_empty() {
            return;
        }
        for record in records {
            if !record.added_nodes.is_empty() {
                self.added.push(record.added_nodes);
            }
            if !record.removed_nodes.is_empty() {
                self.removed.push(record.removed_nodes);
            }
        }
        if self.timer.arm(now) {
            tracing::trace!(deadline = ?self.timer.deadline(), "journal window opened");
        }
    }

    pub fn has_buffered(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Coalesce if the debounce window has elapsed at `now`
    pub fn coalesce_if_due(
        &mut self,
        now: Instant,
        tree: &DomTree,
        config: &InspectorConfig,
        registry: &mut IdentityRegistry,
        builder: &SnapshotBuilder<'_>,
        root: Option<NodeId>,
    ) -> bool {
        if !self.timer.fire(now) {
            return false;
        }
        self.coalesce(tree, config, registry, builder, root);
        true
    }

    /// Turn buffered records into journal entries and clear the buffers
    pub fn coalesce(
        &mut self,
        tree: &DomTree,
        config: &InspectorConfig,
        registry: &mut IdentityRegistry,
        builder: &SnapshotBuilder<'_>,
        root: Option<NodeId>,
    ) {
        self.timer.cancel();
        let removed = std::mem::take(&mut self.removed);
        let added = std::mem::take(&mut self.added);
        let before = self.batch.entries.len();

        for node in removed.into_iter().flatten() {
            let Some(nid) = registry.lookup(node) else {
                continue;
            };
            if self.retired.get(&node) != Some(nid) {
                self.retired.insert(node, nid.clone());
                self.batch.entries.push(JournalEntry::Removal { nid: nid.clone() });
            }
        }

        if let Some(root) = root {
            for top in inserted_roots(tree, config, registry, root, added) {
                self.record_subtree(tree, config, registry, builder, root, top);
            }
        }

        let pruned = registry.prune(tree);
        self.retired.retain(|&node, nid| registry.lookup(node) == Some(&*nid));
        tracing::debug!(
            entries = self.batch.entries.len() - before,
            pruned,
            "journal coalesced"
        );
    }

    fn record_subtree(
        &mut self,
        tree: &DomTree,
        config: &InspectorConfig,
        registry: &mut IdentityRegistry,
        builder: &SnapshotBuilder<'_>,
        root: NodeId,
        top: NodeId,
    ) {
        let Some(lvl) = tree.depth_from(root, top) else {
            return;
        };
        let subtree = builder.subtree(top, lvl);
        let mut described = Vec::with_capacity(subtree.len());

        for &(node, lvl) in &subtree {
            let nid = registry.assign_fresh(node);
            let Some(parent) = tree.parent_element(node).and_then(|p| registry.lookup(p)).cloned()
            else {
                tracing::trace!(%nid, "added node without a known parent");
                continue;
            };
            let left = previous_layout_sibling(tree, config, node)
                .and_then(|s| registry.lookup(s))
                .cloned();
            self.batch.entries.push(JournalEntry::Addition {
                nid: nid.clone(),
                parent,
                left,
            });
            described.push(builder.describe(nid, node, lvl));
        }

        compute_counts(&mut described);
        self.batch
            .nodes
            .extend(described.into_iter().map(|n| (n.nid.clone(), n)));
    }

    /// Take everything coalesced so far, if anything
    pub fn take(&mut self) -> Option<JournalBatch> {
        if self.batch.entries.is_empty() {
            self.batch.nodes.clear();
            return None;
        }
        Some(std::mem::take(&mut self.batch))
    }

    /// Entries coalesced and not yet taken
    pub fn entries(&self) -> &[JournalEntry] {
        &self.batch.entries
    }

    /// Cancel the timer, unsubscribe and drop everything buffered
    pub fn shutdown(&mut self, tree: &mut DomTree) {
        self.timer.cancel();
        if let Some(observer) = self.observer.take() {
            tree.disconnect(observer);
        }
        self.target = None;
        self.added.clear();
        self.removed.clear();
        self.batch = JournalBatch::default();
        self.retired.clear();
    }
}

/// Inserted nodes worth journaling, reduced to the topmost ones and put in
/// document order.
fn inserted_roots(
    tree: &DomTree,
    config: &InspectorConfig,
    registry: &IdentityRegistry,
    root: NodeId,
    added: Vec<Vec<NodeId>>,
) -> Vec<NodeId> {
    let candidates: HashSet<NodeId> = added
        .into_iter()
        .flatten()
        .filter(|&node| {
            node != root
                && tree.is_element(node)
                && tree.is_connected(node)
                && tree.is_inclusive_ancestor(root, node)
        })
        .collect();

    let tops: HashSet<NodeId> = candidates
        .iter()
        .copied()
        .filter(|&node| {
            let mut ancestor = tree.parent_element(node);
            while let Some(current) = ancestor {
                if candidates.contains(&current) {
                    return false;
                }
                if current == root {
                    break;
                }
                if config.excludes(tree, current) {
                    return false;
                }
                ancestor = tree.parent_element(current);
            }
            !config.excludes(tree, node)
        })
        .filter(|&node| {
            tree.parent_element(node)
                .is_some_and(|parent| registry.lookup(parent).is_some())
        })
        .collect();

    if tops.is_empty() {
        return Vec::new();
    }
    let order: HashMap<NodeId, usize> = tree
        .descendants(root)
        .enumerate()
        .filter(|(_, node)| tops.contains(node))
        .map(|(index, node)| (node, index))
        .collect();
    let mut tops: Vec<NodeId> = tops.into_iter().collect();
    tops.sort_by_key(|node| order.get(node).copied().unwrap_or(usize::MAX));
    tops
}

fn previous_layout_sibling(tree: &DomTree, config: &InspectorConfig, node: NodeId) -> Option<NodeId> {
    let mut sibling = tree.previous_element_sibling(node);
    while let Some(current) = sibling {
        if !config.excludes(tree, current) {
            return Some(current);
        }
        sibling = tree.previous_element_sibling(current);
    }
    None
}
