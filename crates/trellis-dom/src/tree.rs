//! Generic arena tree shared by the document and the box tree.
//!
//! Every node lives in one contiguous vector and is addressed by a typed
//! index. A node owns the ordered list of its children; its parent and
//! sibling links are plain indices, so the ownership graph stays acyclic
//! while traversal in any direction remains O(1).
//!
//! Detached nodes keep their slot in the arena until the whole tree is
//! dropped. Nothing is ever freed individually, which is what makes the
//! indices stable.

use thiserror::Error;

/// A typed index into a [`Tree`].
///
/// Implemented by the DOM's `NodeId` and the box tree's `LayoutId` so the
/// two trees cannot hand each other indices by accident.
pub trait TreeIndex: Copy + Eq + std::fmt::Debug {
    /// Wrap a raw arena slot.
    fn from_index(index: usize) -> Self;

    /// The raw arena slot.
    fn index(self) -> usize;
}

/// Structural errors reported by [`Tree`] mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The index does not name a node of this tree.
    #[error("node {0} does not exist in this tree")]
    UnknownNode(usize),

    /// Appending would make a node its own ancestor.
    #[error("appending node {child} under node {parent} would create a cycle")]
    WouldCycle {
        /// The would-be parent.
        parent: usize,
        /// The node being appended.
        child: usize,
    },

    /// The node is not a child of the given parent.
    #[error("node {child} is not a child of node {parent}")]
    NotAChild {
        /// The expected parent.
        parent: usize,
        /// The node that was not found among its children.
        child: usize,
    },
}

/// One slot of the arena: user data plus structural links.
#[derive(Debug, Clone)]
pub struct TreeNode<I, T> {
    /// The payload stored at this node.
    pub data: T,
    parent: Option<I>,
    children: Vec<I>,
    next_sibling: Option<I>,
    prev_sibling: Option<I>,
}

impl<I: TreeIndex, T> TreeNode<I, T> {
    const fn new(data: T) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }

    /// The parent of this node, if attached.
    pub const fn parent(&self) -> Option<I> {
        self.parent
    }

    /// The children of this node in order.
    pub fn children(&self) -> &[I] {
        &self.children
    }

    /// The node immediately following this one in its parent's children.
    pub const fn next_sibling(&self) -> Option<I> {
        self.next_sibling
    }

    /// The node immediately preceding this one in its parent's children.
    pub const fn prev_sibling(&self) -> Option<I> {
        self.prev_sibling
    }
}

/// Arena-allocated tree with O(1) parent, child and sibling access.
#[derive(Debug, Clone)]
pub struct Tree<I, T> {
    nodes: Vec<TreeNode<I, T>>,
}

impl<I: TreeIndex, T> Default for Tree<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: TreeIndex, T> Tree<I, T> {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a new, detached node and return its index.
    pub fn alloc(&mut self, data: T) -> I {
        let id = I::from_index(self.nodes.len());
        self.nodes.push(TreeNode::new(data));
        id
    }

    /// Number of allocated nodes (attached or not).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node has been allocated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if `id` names a node of this tree.
    #[must_use]
    pub fn contains(&self, id: I) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get a node by index.
    #[must_use]
    pub fn get(&self, id: I) -> Option<&TreeNode<I, T>> {
        self.nodes.get(id.index())
    }

    /// Get a node mutably by index.
    pub fn get_mut(&mut self, id: I) -> Option<&mut TreeNode<I, T>> {
        self.nodes.get_mut(id.index())
    }

    /// The payload of a node.
    #[must_use]
    pub fn data(&self, id: I) -> Option<&T> {
        self.get(id).map(|n| &n.data)
    }

    /// The payload of a node, mutably.
    pub fn data_mut(&mut self, id: I) -> Option<&mut T> {
        self.get_mut(id).map(|n| &mut n.data)
    }

    /// Iterate over every allocated node, attached or not.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (I::from_index(i), &n.data))
    }

    /// Mutable iteration over every allocated payload.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (I, &mut T)> {
        self.nodes
            .iter_mut()
            .enumerate()
            .map(|(i, n)| (I::from_index(i), &mut n.data))
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: I) -> Option<I> {
        self.get(id).and_then(TreeNode::parent)
    }

    /// The children of a node (empty for unknown indices).
    #[must_use]
    pub fn children(&self, id: I) -> &[I] {
        self.get(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// The first child of a node.
    #[must_use]
    pub fn first_child(&self, id: I) -> Option<I> {
        self.children(id).first().copied()
    }

    /// The last child of a node.
    #[must_use]
    pub fn last_child(&self, id: I) -> Option<I> {
        self.children(id).last().copied()
    }

    /// The next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: I) -> Option<I> {
        self.get(id).and_then(TreeNode::next_sibling)
    }

    /// The previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: I) -> Option<I> {
        self.get(id).and_then(TreeNode::prev_sibling)
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` is currently attached elsewhere it is detached first, so
    /// a node is never owned by two parents.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if either index is foreign to this tree,
    /// [`TreeError::WouldCycle`] if `child` is `parent` or one of its
    /// ancestors.
    pub fn append_child(&mut self, parent: I, child: I) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(TreeError::WouldCycle {
                parent: parent.index(),
                child: child.index(),
            });
        }

        self.detach(child)?;

        let prev_last_child = self.last_child(parent);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.index()].next_sibling = Some(child);
            self.nodes[child.index()].prev_sibling = Some(prev_id);
        }
        Ok(())
    }

    /// Detach a node from its parent, relinking its former siblings.
    ///
    /// The node keeps its own children. Detaching an already detached node
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `id` is foreign to this tree.
    pub fn detach(&mut self, id: I) -> Result<(), TreeError> {
        self.check(id)?;
        let Some(parent) = self.nodes[id.index()].parent else {
            return Ok(());
        };

        let prev = self.nodes[id.index()].prev_sibling;
        let next = self.nodes[id.index()].next_sibling;

        self.nodes[parent.index()].children.retain(|&c| c != id);
        if let Some(prev) = prev {
            self.nodes[prev.index()].next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next.index()].prev_sibling = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        Ok(())
    }

    /// Detach `child` from `parent`, checking the relationship first.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAChild`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: I, child: I) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild {
                parent: parent.index(),
                child: child.index(),
            });
        }
        self.detach(child)
    }

    /// The first direct child of `id` accepted by `predicate`.
    ///
    /// Stops at the first match.
    pub fn first_child_matching<P>(&self, id: I, mut predicate: P) -> Option<I>
    where
        P: FnMut(I, &T) -> bool,
    {
        let mut current = self.first_child(id);
        while let Some(child) = current {
            if predicate(child, &self.nodes[child.index()].data) {
                return Some(child);
            }
            current = self.next_sibling(child);
        }
        None
    }

    /// The nearest proper ancestor of `id` accepted by `predicate`.
    ///
    /// Walks parent links, so the cost is bounded by the node's depth.
    pub fn first_ancestor_matching<P>(&self, id: I, mut predicate: P) -> Option<I>
    where
        P: FnMut(I, &T) -> bool,
    {
        self.ancestors(id)
            .find(|&ancestor| predicate(ancestor, &self.nodes[ancestor.index()].data))
    }

    /// Check if `descendant` is a proper descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: I, ancestor: I) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub const fn ancestors(&self, id: I) -> Ancestors<'_, I, T> {
        Ancestors {
            tree: self,
            current: Some(id),
            started: false,
        }
    }

    /// Iterate over all descendants of a node in document (pre-)order,
    /// excluding the node itself.
    pub fn descendants(&self, id: I) -> Descendants<'_, I, T> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }

    fn check(&self, id: I) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id.index()))
        }
    }
}

/// Iterator over ancestors of a node.
pub struct Ancestors<'a, I, T> {
    tree: &'a Tree<I, T>,
    current: Option<I>,
    started: bool,
}

impl<I: TreeIndex, T> Iterator for Ancestors<'_, I, T> {
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.current = self.current.and_then(|id| self.tree.parent(id));
        }
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a, I, T> {
    tree: &'a Tree<I, T>,
    root: I,
    next: Option<I>,
}

impl<I: TreeIndex, T> Iterator for Descendants<'_, I, T> {
    type Item = I;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = self.tree.first_child(current).or_else(|| {
            let mut node = current;
            loop {
                if node == self.root {
                    return None;
                }
                if let Some(sibling) = self.tree.next_sibling(node) {
                    return Some(sibling);
                }
                node = self.tree.parent(node)?;
            }
        });
        Some(current)
    }
}
