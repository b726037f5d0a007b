//! DOM Tree (arena-based allocation)
//!
//! Detached nodes stay in the arena but are unreachable from the root; a node
//! is always unlinked from its old position before it is linked anywhere else.

use crate::{ElementData, Node, NodeData, NodeId, TextData};

/// Arena-based DOM tree
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the fragment root
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(Node::with_data(NodeData::Fragment));
        Self { nodes }
    }

    /// Root (fragment) node ID
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of arena slots, including detached nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena holds nothing but the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::with_data(data));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(name)))
    }

    /// Create a detached element from prepared element data
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.push(NodeData::Element(data))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text(TextData {
            content: content.to_owned(),
        }))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Comment(content.to_owned()))
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.detach(child);

        let last = self.get(parent).map_or(NodeId::NONE, |p| p.last_child);
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last;
        }
        if let Some(last_node) = self.get_mut(last) {
            last_node.next_sibling = child;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = child;
        }
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.last_child = child;
        }
    }

    /// Insert `child` into `parent` before `reference`.
    ///
    /// An invalid `reference` appends instead.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if !reference.is_valid() {
            self.append_child(parent, child);
            return;
        }
        if child == reference || child == parent || self.get(child).is_none() {
            return;
        }
        if self.get(reference).map(|r| r.parent) != Some(parent) {
            return;
        }
        self.detach(child);

        let prev = self.get(reference).map_or(NodeId::NONE, |r| r.prev_sibling);
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if let Some(reference_node) = self.get_mut(reference) {
            reference_node.prev_sibling = child;
        }
        if let Some(prev_node) = self.get_mut(prev) {
            prev_node.next_sibling = child;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = child;
        }
    }

    /// Unlink a node from its parent and siblings. Its own children stay attached.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        if let Some(prev_node) = self.get_mut(prev) {
            prev_node.next_sibling = next;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.first_child = next;
        }
        if let Some(next_node) = self.get_mut(next) {
            next_node.prev_sibling = prev;
        } else if let Some(parent_node) = self.get_mut(parent) {
            parent_node.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Remove a node but keep its children, spliced into the parent at the
    /// node's position. Returns the moved children in order.
    pub fn unwrap(&mut self, id: NodeId) -> Vec<NodeId> {
        let parent = self.get(id).map_or(NodeId::NONE, |n| n.parent);
        if !parent.is_valid() {
            return Vec::new();
        }
        let children = self.child_ids(id);
        for &child in &children {
            self.insert_before(parent, child, id);
        }
        self.detach(id);
        children
    }

    /// Replace a node with a sequence of (detached) nodes
    pub fn replace_with(&mut self, id: NodeId, replacements: &[NodeId]) {
        let parent = self.get(id).map_or(NodeId::NONE, |n| n.parent);
        if !parent.is_valid() {
            return;
        }
        for &node in replacements {
            self.insert_before(parent, node, id);
        }
        self.detach(id);
    }

    /// Iterate over children of a node
    pub fn children(&self, parent: NodeId) -> ChildIterator<'_> {
        let first = self.get(parent).map_or(NodeId::NONE, |n| n.first_child);
        ChildIterator {
            tree: self,
            current: first,
        }
    }

    /// Snapshot of child IDs, for loops that mutate the tree
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// All nodes below `id` in document (pre-)order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(id).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            let kids = self.child_ids(current);
            stack.extend(kids.into_iter().rev());
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Merge adjacent text runs and drop empty ones, recursively
    pub fn normalize(&mut self, id: NodeId) {
        let mut prev_text = NodeId::NONE;
        for child in self.child_ids(id) {
            let text = self.get(child).and_then(Node::as_text).map(str::to_owned);
            match text {
                Some(content) if content.is_empty() => {
                    self.detach(child);
                }
                Some(content) if prev_text.is_valid() => {
                    if let Some(Node {
                        data: NodeData::Text(prev),
                        ..
                    }) = self.get_mut(prev_text)
                    {
                        prev.content.push_str(&content);
                    }
                    self.detach(child);
                    tracing::trace!("merged text run into {:?}", prev_text);
                }
                Some(_) => prev_text = child,
                None => {
                    prev_text = NodeId::NONE;
                    self.normalize(child);
                }
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node
pub struct ChildIterator<'a> {
    tree: &'a DomTree,
    current: NodeId,
}

impl<'a> Iterator for ChildIterator<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current;
        let node = self.tree.get(id)?;
        self.current = node.next_sibling;
        Some((id, node))
    }
}
