//! Identity registry
//!
//! Maps arena handles to small opaque identifiers. The map is keyed by
//! [`NodeId`], which carries the slot generation, so a destroyed node's
//! entry can never be confused with whatever node later reuses its slot.
//! Entries for destroyed nodes stay resolvable until [`IdentityRegistry::prune`]
//! or [`IdentityRegistry::reset`].

use std::collections::HashMap;
use std::fmt;

use fos_dom::{DomTree, NodeId};
use serde::{Deserialize, Serialize};

/// Opaque node identifier, unique within one epoch
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nid(String);

impl Nid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Nid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Nid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Node → identifier mapping for one epoch
#[derive(Debug)]
pub struct IdentityRegistry {
    ids: HashMap<NodeId, Nid>,
    next: u64,
    epoch: u64,
    session: String,
}

impl IdentityRegistry {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            ids: HashMap::new(),
            next: 0,
            epoch: 0,
            session: session.into(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Opaque token naming the current epoch
    pub fn fingerprint(&self) -> String {
        format!("{}:{}", self.session, radix36(self.epoch))
    }

    /// Identifier of `node`, minted on first sight
    pub fn identifier_of(&mut self, node: NodeId) -> Nid {
        match self.ids.get(&node) {
            Some(nid) => nid.clone(),
            None => self.assign_fresh(node),
        }
    }

    /// Mint a new identifier for `node`, replacing any previous one
    pub fn assign_fresh(&mut self, node: NodeId) -> Nid {
        let nid = Nid(format!("n{}-{}", radix36(self.epoch), radix36(self.next)));
        self.next += 1;
        self.ids.insert(node, nid.clone());
        nid
    }

    /// Identifier of `node`, without minting
    pub fn lookup(&self, node: NodeId) -> Option<&Nid> {
        self.ids.get(&node)
    }

    /// The candidate registered under `nid`, searching from the last one
    pub fn find(&self, candidates: &[NodeId], nid: &Nid) -> Option<NodeId> {
        candidates
            .iter()
            .rev()
            .copied()
            .find(|&n| self.lookup(n) == Some(nid))
    }

    /// Forget everything and start a new epoch
    pub fn reset(&mut self) {
        self.ids.clear();
        self.next = 0;
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "identity registry reset");
    }

    /// Drop entries whose node no longer exists in `tree`
    pub fn prune(&mut self, tree: &DomTree) -> usize {
        let before = self.ids.len();
        self.ids.retain(|&node, _| tree.contains(node));
        before - self.ids.len()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn radix36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut buf = Vec::new();
    loop {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    buf.iter().rev().map(|&b| b as char).collect()
}
