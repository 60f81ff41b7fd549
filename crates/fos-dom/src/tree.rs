//! DOM Tree (arena-based allocation)
//!
//! Slots are recycled through a free list. Each slot carries a generation
//! that is bumped when its node is destroyed, which invalidates every
//! outstanding [`NodeId`] for it.

use crate::observer::{MutationObserverInit, MutationRecord, ObserverId, Registration};
use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId};

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    root: NodeId,
    observers: Vec<Registration>,
    next_observer: u32,
}

impl DomTree {
    /// Create a tree holding only a document node
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            root: NodeId::NONE,
            observers: Vec::new(),
            next_observer: 0,
        };
        tree.root = tree.alloc(Node::document());
        tree
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID (None for stale handles)
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.node.as_mut()
    }

    /// Whether the handle resolves to a live node
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes, attached or not
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId::from_raw_parts(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot { generation: 0, node: Some(node) });
        NodeId::from_raw_parts(index, 0)
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(ElementData::new(tag)))
    }

    /// Create a detached element from prepared data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.alloc(Node::element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node::text(text))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(Node::comment(text))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        let mut node = Node::document();
        node.data = NodeData::Doctype { name: name.to_string() };
        self.alloc(node)
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    /// Element data, if the node is a live element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lower-cased tag name of an element
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.local_name.as_str())
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let element = self.element_mut(id).ok_or(DomError::NotFound(id))?;
        element.set_attr(name, value);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    #[inline]
    fn link(&self, id: NodeId, pick: impl Fn(&Node) -> NodeId) -> Option<NodeId> {
        self.get(id).map(pick).and_then(NodeId::to_option)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.parent)
    }

    /// Parent, if it is an element (the document node is not)
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.first_child)
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.last_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.link(id, |n| n.prev_sibling)
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.last_child(id);
        while let Some(node) = current {
            if self.is_element(node) {
                return Some(node);
            }
            current = self.prev_sibling(node);
        }
        None
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(node) = current {
            if self.is_element(node) {
                return Some(node);
            }
            current = self.next_sibling(node);
        }
        None
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.prev_sibling(id);
        while let Some(node) = current {
            if self.is_element(node) {
                return Some(node);
            }
            current = self.prev_sibling(node);
        }
        None
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Iterate over direct element children
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&c| self.is_element(c))
    }

    /// Pre-order iteration over all descendants (excluding `id` itself)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Number of edges between `ancestor` and `node`, if related
    pub fn depth_from(&self, ancestor: NodeId, node: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut current = node;
        while current != ancestor {
            current = self.parent(current)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Whether the node is attached to the document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(id) && self.is_inclusive_ancestor(self.root, id)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|n| self.get(n).and_then(Node::as_text))
            .collect()
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`).
    ///
    /// An attached `child` is moved: a removal is reported on its old parent
    /// before the insertion is reported on the new one.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.contains(parent) {
            return Err(DomError::NotFound(parent));
        }
        if !self.contains(child) {
            return Err(DomError::NotFound(child));
        }
        if child == self.root {
            return Err(DomError::DocumentNode);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let mut reference = reference;
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: r });
            }
            if r == child {
                reference = self.next_sibling(child);
            }
        }

        self.detach(child)?;

        let prev = match reference {
            Some(r) => self.prev_sibling(r),
            None => self.last_child(parent),
        };
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev.unwrap_or(NodeId::NONE);
            node.next_sibling = reference.unwrap_or(NodeId::NONE);
        }
        match prev {
            Some(p) => {
                if let Some(node) = self.get_mut(p) {
                    node.next_sibling = child;
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = child;
                }
            }
        }
        match reference {
            Some(r) => {
                if let Some(node) = self.get_mut(r) {
                    node.prev_sibling = child;
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.last_child = child;
                }
            }
        }

        self.notify(parent, vec![child], Vec::new(), prev, reference);
        Ok(())
    }

    /// Remove `child` from `parent`. The child stays alive, detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if !self.contains(child) {
            return Err(DomError::NotFound(child));
        }
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        let prev = self.prev_sibling(child);
        let next = self.next_sibling(child);
        self.unlink(child);
        self.notify(parent, Vec::new(), vec![child], prev, next);
        Ok(())
    }

    /// Remove a node from its parent, if it has one
    pub fn detach(&mut self, node: NodeId) -> DomResult<()> {
        if !self.contains(node) {
            return Err(DomError::NotFound(node));
        }
        match self.parent(node) {
            Some(parent) => self.remove_child(parent, node),
            None => Ok(()),
        }
    }

    /// Detach a node and free it together with its whole subtree.
    ///
    /// Every handle into the subtree becomes stale.
    pub fn destroy(&mut self, node: NodeId) -> DomResult<()> {
        if node == self.root {
            return Err(DomError::DocumentNode);
        }
        self.detach(node)?;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(current));
            let slot = &mut self.slots[current.index() as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index());
            self.live -= 1;
        }
        tracing::trace!(?node, "destroyed subtree");
        Ok(())
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(node) = self.get(child) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        match self.get_mut(prev) {
            Some(p) => p.next_sibling = next,
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = next;
                }
            }
        }
        match self.get_mut(next) {
            Some(n) => n.prev_sibling = prev,
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.last_child = prev;
                }
            }
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    /// Register interest in child-list changes at or below `target`
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer = self.next_observer.wrapping_add(1);
        self.observers.push(Registration::new(id, target, options));
        tracing::debug!(?target, ?id, "observer registered");
        id
    }

    /// Drop a registration and its queued records
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|r| r.id != id);
        before != self.observers.len()
    }

    /// Take all records queued for a registration
    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| std::mem::take(&mut r.records))
            .unwrap_or_default()
    }

    fn notify(
        &mut self,
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) {
        if self.observers.is_empty() {
            return;
        }
        let hits: Vec<usize> = self
            .observers
            .iter()
            .enumerate()
            .filter(|(_, reg)| {
                reg.options.child_list
                    && (reg.target == target
                        || (reg.options.subtree && self.is_inclusive_ancestor(reg.target, target)))
            })
            .map(|(i, _)| i)
            .collect();
        if hits.is_empty() {
            return;
        }
        let record = MutationRecord {
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
        };
        for i in hits {
            self.observers[i].records.push(record.clone());
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree, driven by sibling/parent links
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.following(current);
        Some(current)
    }
}

impl Descendants<'_> {
    fn following(&self, node: NodeId) -> Option<NodeId> {
        if let Some(child) = self.tree.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        loop {
            if current == self.root {
                return None;
            }
            if let Some(sibling) = self.tree.next_sibling(current) {
                return Some(sibling);
            }
            current = self.tree.parent(current)?;
        }
    }
}
