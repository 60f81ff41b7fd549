//! Snapshot builder
//!
//! Flattens the subtree under the designated root into [`LayoutNode`]s in
//! document pre-order. Descendant counts are filled in by a second pass
//! over the flat list, see [`compute_counts`].

use fos_dom::{DomTree, NodeId};
use serde::Serialize;

use crate::config::InspectorConfig;
use crate::provenance::ProvenanceIndex;
use crate::registry::{IdentityRegistry, Nid};
use crate::synthesizer::SelectorSynthesizer;

/// One element of a layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutNode {
    pub nid: Nid,
    /// Depth below the designated root (root = 0)
    pub lvl: usize,
    /// Coarse selector
    pub sel: String,
    /// Number of layout descendants
    pub cnt: usize,
    /// Injected rule selector targeting this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Describes nodes of one tree
pub struct SnapshotBuilder<'a> {
    tree: &'a DomTree,
    config: &'a InspectorConfig,
    synth: SelectorSynthesizer<'a>,
    provenance: &'a ProvenanceIndex,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(
        tree: &'a DomTree,
        config: &'a InspectorConfig,
        provenance: &'a ProvenanceIndex,
    ) -> Self {
        Self {
            tree,
            config,
            synth: SelectorSynthesizer::new(tree, config),
            provenance,
        }
    }

    /// Full layout of the designated root's subtree. Unseen nodes get
    /// identifiers as they are visited.
    pub fn build_full_snapshot(&self, registry: &mut IdentityRegistry) -> Vec<LayoutNode> {
        let Some(root) = self.synth.root_element() else {
            tracing::debug!(root = %self.config.root_selector, "no root element, empty layout");
            return Vec::new();
        };

        let mut layout: Vec<LayoutNode> = self
            .subtree(root, 0)
            .into_iter()
            .map(|(node, lvl)| {
                let nid = registry.identifier_of(node);
                self.describe(nid, node, lvl)
            })
            .collect();
        compute_counts(&mut layout);

        tracing::debug!(nodes = layout.len(), "full snapshot built");
        layout
    }

    /// `start` and its descendants in pre-order, paired with their depth
    /// (`start` at `lvl`). Excluded nodes are skipped along with their
    /// subtrees.
    pub fn subtree(&self, start: NodeId, lvl: usize) -> Vec<(NodeId, usize)> {
        let tree = self.tree;
        let mut out = Vec::new();
        if self.config.excludes(tree, start) {
            return out;
        }

        let mut stack = vec![(start, lvl)];
        while let Some((node, depth)) = stack.pop() {
            out.push((node, depth));
            let children: Vec<NodeId> = tree
                .element_children(node)
                .filter(|&child| !self.config.excludes(tree, child))
                .collect();
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
        out
    }

    /// Layout entry for `node`, with a zero descendant count
    pub fn describe(&self, nid: Nid, node: NodeId, lvl: usize) -> LayoutNode {
        let sel = self.synth.coarse_selector_of(node).unwrap_or_else(|err| {
            tracing::warn!(%nid, %err, "node has no usable coarse selector");
            String::new()
        });
        LayoutNode {
            nid,
            lvl,
            sel,
            cnt: 0,
            filter: self.provenance.filter_for(self.tree, node).map(str::to_string),
        }
    }
}

/// Fill in `cnt` for a pre-order list, walking it backwards with one
/// accumulator per depth.
pub fn compute_counts(layout: &mut [LayoutNode]) {
    let Some(base) = layout.iter().map(|n| n.lvl).min() else {
        return;
    };
    let mut acc: Vec<usize> = Vec::new();
    for node in layout.iter_mut().rev() {
        let depth = node.lvl - base;
        if acc.len() < depth + 2 {
            acc.resize(depth + 2, 0);
        }
        node.cnt = acc[depth + 1];
        acc.truncate(depth + 1);
        acc[depth] += node.cnt + 1;
    }
}
