//! `NodeArena`: owner of every node in a compilation unit.
//!
//! Nodes are appended and never freed; a rewrite either replaces the node
//! stored at an index (the index stays valid, so parents need no update) or
//! rewires a parent's child slot. Each node records its parent. A node is
//! detached once no parent slot leads to it; detached nodes stay in storage
//! but are unreachable from the root.

use crate::node::{FunctionData, Node, NodeIndex, PropertyData};
use objrest_common::limits::MAX_PARENT_WALK;

#[derive(Debug, Default, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
    parents: Vec<NodeIndex>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            parents: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and adopt its children.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        for child in node.children() {
            self.set_parent(child, idx);
        }
        self.nodes.push(node);
        self.parents.push(NodeIndex::NONE);
        idx
    }

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        if idx.is_none() {
            return NodeIndex::NONE;
        }
        self.parents
            .get(idx.0 as usize)
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_none() {
            return;
        }
        if let Some(slot) = self.parents.get_mut(child.0 as usize) {
            *slot = parent;
        }
    }

    /// Detach `child` only if it still belongs to `parent`; a child that was
    /// already adopted elsewhere keeps its new parent.
    fn release(&mut self, child: NodeIndex, parent: NodeIndex) {
        if self.parent(child) == parent {
            self.set_parent(child, NodeIndex::NONE);
        }
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    pub fn identifier_text(&self, idx: NodeIndex) -> Option<&str> {
        match self.get(idx)? {
            Node::Identifier { name } => Some(name),
            _ => None,
        }
    }

    pub fn get_property(&self, idx: NodeIndex) -> Option<&PropertyData> {
        match self.get(idx)? {
            Node::Property(prop) => Some(prop),
            _ => None,
        }
    }

    pub fn get_function(&self, idx: NodeIndex) -> Option<&FunctionData> {
        match self.get(idx)? {
            Node::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Entries of an object literal or object pattern.
    pub fn object_members(&self, idx: NodeIndex) -> Option<&[NodeIndex]> {
        match self.get(idx)? {
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                Some(properties)
            }
            _ => None,
        }
    }

    /// Index of `child` within its parent's ordered child list.
    pub fn position_in_parent(&self, child: NodeIndex) -> Option<usize> {
        let parent = self.parent(child);
        let list = match self.get(parent)? {
            Node::Program { body } | Node::BlockStatement { body } => body,
            Node::VariableDeclaration { declarations, .. } => declarations,
            Node::Function(func) => &func.params,
            Node::ArrayExpression { elements } | Node::ArrayPattern { elements } => elements,
            Node::ObjectExpression { properties } | Node::ObjectPattern { properties } => {
                properties
            }
            Node::CallExpression { arguments, .. } => arguments,
            _ => return None,
        };
        list.iter().position(|&c| c == child)
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Replace the node stored at `idx`. Parents referring to `idx` now see
    /// the new node; children of the old node that the new one does not adopt
    /// become detached.
    pub fn replace(&mut self, idx: NodeIndex, node: Node) {
        let Some(old) = self.get(idx) else {
            return;
        };
        for child in old.children() {
            self.release(child, idx);
        }
        for child in node.children() {
            self.set_parent(child, idx);
        }
        self.nodes[idx.0 as usize] = node;
    }

    /// Point every slot of `parent` holding `old` at `new` instead.
    pub fn replace_child(&mut self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) -> bool {
        let Some(node) = self.nodes.get_mut(parent.0 as usize) else {
            return false;
        };
        let mut found = false;
        for slot in node.child_slots_mut() {
            if *slot == old {
                *slot = new;
                found = true;
            }
        }
        if found {
            self.release(old, parent);
            self.set_parent(new, parent);
        }
        found
    }

    /// Replace `anchor` inside its parent's child list with `replacements`.
    ///
    /// An empty replacement removes the entry; in array literals and array
    /// patterns it leaves a hole instead so later positions keep their index.
    pub fn splice(&mut self, anchor: NodeIndex, replacements: &[NodeIndex]) -> bool {
        let parent = self.parent(anchor);
        let Some(node) = self.nodes.get_mut(parent.0 as usize) else {
            return false;
        };
        let positional = node.has_positional_list();
        let Some(list) = node.child_list_mut() else {
            return false;
        };
        let Some(pos) = list.iter().position(|&c| c == anchor) else {
            return false;
        };
        if replacements.is_empty() && positional {
            list[pos] = NodeIndex::NONE;
        } else {
            list.remove(pos);
            for (offset, &child) in replacements.iter().enumerate() {
                list.insert(pos + offset, child);
            }
        }
        self.release(anchor, parent);
        for &child in replacements {
            self.set_parent(child, parent);
        }
        true
    }

    pub fn remove(&mut self, idx: NodeIndex) -> bool {
        self.splice(idx, &[])
    }

    pub fn insert_before(&mut self, anchor: NodeIndex, new: NodeIndex) -> bool {
        self.insert_relative(anchor, new, 0)
    }

    pub fn insert_after(&mut self, anchor: NodeIndex, new: NodeIndex) -> bool {
        self.insert_relative(anchor, new, 1)
    }

    fn insert_relative(&mut self, anchor: NodeIndex, new: NodeIndex, offset: usize) -> bool {
        let parent = self.parent(anchor);
        let Some(list) = self
            .nodes
            .get_mut(parent.0 as usize)
            .and_then(Node::child_list_mut)
        else {
            return false;
        };
        let Some(pos) = list.iter().position(|&c| c == anchor) else {
            return false;
        };
        list.insert(pos + offset, new);
        self.set_parent(new, parent);
        true
    }

    /// Insert `nodes` at the front of `parent`'s child list, keeping their order.
    pub fn prepend_children(&mut self, parent: NodeIndex, nodes: &[NodeIndex]) -> bool {
        let Some(list) = self
            .nodes
            .get_mut(parent.0 as usize)
            .and_then(Node::child_list_mut)
        else {
            return false;
        };
        let tail = std::mem::take(list);
        list.extend(nodes.iter().copied());
        list.extend(tail);
        for &child in nodes {
            self.set_parent(child, parent);
        }
        true
    }

    /// Deep-copy the subtree rooted at `idx`. The copy is detached.
    pub fn clone_subtree(&mut self, idx: NodeIndex) -> NodeIndex {
        let Some(mut node) = self.get(idx).cloned() else {
            return NodeIndex::NONE;
        };
        for slot in node.child_slots_mut() {
            if slot.is_some() {
                *slot = self.clone_subtree(*slot);
            }
        }
        self.add(node)
    }

    /// Whether following parent links from `idx` reaches `root`.
    pub fn is_attached(&self, idx: NodeIndex, root: NodeIndex) -> bool {
        let mut current = idx;
        for _ in 0..MAX_PARENT_WALK {
            if current == root {
                return true;
            }
            let parent = self.parent(current);
            if parent.is_none() {
                return false;
            }
            current = parent;
        }
        false
    }

    /// Iterate over every stored node, attached or not.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i as u32), node))
    }
}
