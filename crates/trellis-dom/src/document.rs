//! The document: owner of the node tree and of its dirty state.
//!
//! [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)

use std::collections::HashMap;

use crate::error::DomError;
use crate::node::{DoctypeData, ElementData, LayoutHandle, Node, NodeId, NodeType, StyleState};
use crate::tree::{Tree, TreeError};
use crate::variant::{self, Element, NodeVariant};

/// A document and its node tree.
///
/// The document node itself is always at [`NodeId::ROOT`]. Nodes are
/// created detached with the `create_*` methods and attached with
/// [`Document::append_child`], which enforces [`Document::is_child_allowed`].
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<NodeId, Node>,
    /// Connected elements by `id` attribute, maintained by the insertion
    /// and removal hooks.
    ids: HashMap<String, NodeId>,
    needs_style_update: bool,
    needs_layout: bool,
    hovered_node: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the document node.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Tree::new();
        let root = tree.alloc(Node::new(NodeType::Document));
        debug_assert_eq!(root, NodeId::ROOT);
        Self {
            tree,
            ids: HashMap::new(),
            needs_style_update: true,
            needs_layout: true,
            hovered_node: None,
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// The underlying node tree, for read-only traversal.
    #[must_use]
    pub const fn tree(&self) -> &Tree<NodeId, Node> {
        &self.tree
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.tree.data(id)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// True if no node has been allocated. Never the case in practice: the
    /// document node exists from construction on.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    // ── Node creation ──────────────────────────────────────────────────

    /// Create a detached element with the given tag name.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element_with(ElementData::new(tag_name))
    }

    /// Create a detached element from prepared element data.
    pub fn create_element_with(&mut self, data: ElementData) -> NodeId {
        self.tree.alloc(Node::new(NodeType::Element(data)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.tree.alloc(Node::new(NodeType::Text(text.to_string())))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.tree.alloc(Node::new(NodeType::Comment(text.to_string())))
    }

    /// Create a detached doctype node.
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.tree.alloc(Node::new(NodeType::DocumentType(DoctypeData {
            name: name.to_string(),
        })))
    }

    // ── Structure ──────────────────────────────────────────────────────

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    /// The children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children(id)
    }

    /// The first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.tree.first_child(id)
    }

    /// The last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.tree.last_child(id)
    }

    /// The next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.tree.next_sibling(id)
    }

    /// The previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.tree.prev_sibling(id)
    }

    /// True if the node is the document or has the document as an ancestor.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.tree.is_descendant_of(id, NodeId::ROOT)
    }

    /// The first direct child of `id` with capability `V`.
    #[must_use]
    pub fn first_child_of<V: NodeVariant>(&self, id: NodeId) -> Option<NodeId> {
        self.tree
            .first_child_matching(id, |_, node| variant::is::<V>(Some(node)))
    }

    /// The nearest proper ancestor of `id` with capability `V`.
    #[must_use]
    pub fn first_ancestor_of<V: NodeVariant>(&self, id: NodeId) -> Option<NodeId> {
        self.tree
            .first_ancestor_matching(id, |_, node| variant::is::<V>(Some(node)))
    }

    /// [§ 4.2.7 NonDocumentTypeChildNode](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-previouselementsibling)
    ///
    /// "The previousElementSibling getter steps are to return the first
    /// preceding sibling that is an element; otherwise null."
    #[must_use]
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.prev_sibling(id);
        while let Some(sibling) = current {
            if self.get(sibling).is_some_and(Node::is_element) {
                return Some(sibling);
            }
            current = self.prev_sibling(sibling);
        }
        None
    }

    /// [§ 4.2.7 NonDocumentTypeChildNode](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-nextelementsibling)
    ///
    /// "The nextElementSibling getter steps are to return the first
    /// following sibling that is an element; otherwise null."
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(sibling) = current {
            if self.get(sibling).is_some_and(Node::is_element) {
                return Some(sibling);
            }
            current = self.next_sibling(sibling);
        }
        None
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_child_of::<Element>(NodeId::ROOT)
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.tree.first_child_matching(html, |_, node| {
            node.as_element()
                .is_some_and(|e| e.tag_name == "body" || e.tag_name == "frameset")
        })
    }

    /// [§ 4.2.4 NonElementParentNode](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// Look up a connected element by its `id` attribute.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// The nearest `<a href>` element at or above `id`.
    ///
    /// Used by the view layer to turn a hit-test result into a link target.
    #[must_use]
    pub fn enclosing_link_element(&self, id: NodeId) -> Option<NodeId> {
        let is_link = |node: &Node| {
            node.as_element()
                .is_some_and(|e| e.tag_name == "a" && e.attr("href").is_some())
        };
        if self.get(id).is_some_and(is_link) {
            return Some(id);
        }
        self.tree.first_ancestor_matching(id, |_, node| is_link(node))
    }

    // ── Per-variant behaviour ──────────────────────────────────────────

    /// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#dom-node-nodename)
    ///
    /// The element's local name, or the DOM node name of the other variants.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> &str {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(data)) => &data.tag_name,
            Some(NodeType::Text(_)) => "#text",
            Some(NodeType::Comment(_)) => "#comment",
            Some(NodeType::Document) => "#document",
            Some(NodeType::DocumentType(_)) => "#doctype",
            None => "",
        }
    }

    /// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Character data returns its own data; every other node returns the
    /// concatenation of its descendant text in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Text(text) | NodeType::Comment(text)) => text.clone(),
            Some(NodeType::DocumentType(_)) | None => String::new(),
            Some(NodeType::Element(_) | NodeType::Document) => self
                .tree
                .descendants(id)
                .filter_map(|d| self.get(d).and_then(Node::as_text))
                .collect(),
        }
    }

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-ensure-pre-insertion-validity)
    ///
    /// Structural gate consulted before every insertion:
    /// - the document takes at most one element and one doctype, plus comments;
    /// - character data and doctypes take no children;
    /// - elements take anything except documents and doctypes.
    #[must_use]
    pub fn is_child_allowed(&self, parent: NodeId, child: NodeId) -> bool {
        let (Some(parent_node), Some(child_node)) = (self.get(parent), self.get(child)) else {
            return false;
        };

        match parent_node.node_type {
            NodeType::Document => match child_node.node_type {
                NodeType::Comment(_) => true,
                NodeType::Element(_) => self
                    .tree
                    .first_child_matching(parent, |id, n| id != child && n.is_element())
                    .is_none(),
                NodeType::DocumentType(_) => self
                    .tree
                    .first_child_matching(parent, |id, n| id != child && n.is_document_type())
                    .is_none(),
                NodeType::Document | NodeType::Text(_) => false,
            },
            NodeType::Element(_) => {
                !(child_node.is_document() || child_node.is_document_type())
            }
            NodeType::Text(_) | NodeType::Comment(_) | NodeType::DocumentType(_) => false,
        }
    }

    /// [§ 4.2.3 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Append `child` as the last child of `parent`, then run the
    /// insertion hook. Any existing box tree becomes stale.
    ///
    /// # Errors
    ///
    /// [`DomError::HierarchyRequest`] if [`Document::is_child_allowed`]
    /// refuses, [`DomError::Tree`] for unknown nodes or cycles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.is_child_allowed(parent, child) {
            return Err(self.hierarchy_error(parent, child));
        }

        let old_parent = self.parent(child);
        self.tree.append_child(parent, child)?;
        if let Some(old_parent) = old_parent {
            self.removed_from(child, old_parent);
        }
        self.inserted_into(child, parent);
        self.needs_style_update = true;
        Ok(())
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detach `child` from `parent` after running the removal hook.
    ///
    /// # Errors
    ///
    /// [`DomError::Tree`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild {
                parent: parent.0,
                child: child.0,
            }
            .into());
        }
        self.removed_from(child, parent);
        self.tree.remove_child(parent, child)?;
        self.needs_style_update = true;
        Ok(())
    }

    fn hierarchy_error(&self, parent: NodeId, child: NodeId) -> DomError {
        match (self.get(parent), self.get(child)) {
            (Some(p), Some(c)) => DomError::HierarchyRequest {
                parent,
                parent_kind: p.kind(),
                child,
                child_kind: c.kind(),
            },
            (None, _) => DomError::Tree(TreeError::UnknownNode(parent.0)),
            (_, None) => DomError::Tree(TreeError::UnknownNode(child.0)),
        }
    }

    /// Insertion hook: register ids of the newly connected subtree.
    fn inserted_into(&mut self, node: NodeId, parent: NodeId) {
        if !self.is_connected(parent) {
            return;
        }
        let keys = self.id_keys_in(node);
        self.reindex_ids(&keys, &[]);
    }

    /// Removal hook: forget ids and hover state inside the departing subtree.
    ///
    /// Runs while the subtree may still be attached, so it is excluded from
    /// the id lookup explicitly.
    fn removed_from(&mut self, node: NodeId, _old_parent: NodeId) {
        let subtree: Vec<NodeId> = std::iter::once(node)
            .chain(self.tree.descendants(node))
            .collect();
        let keys = self.id_keys_in(node);
        self.reindex_ids(&keys, &subtree);
        if self.hovered_node.is_some_and(|h| subtree.contains(&h)) {
            self.hovered_node = None;
        }
    }

    /// The `id` values carried by `node` and its descendants.
    fn id_keys_in(&self, node: NodeId) -> Vec<String> {
        std::iter::once(node)
            .chain(self.tree.descendants(node))
            .filter_map(|id| self.get(id).and_then(Node::as_element).and_then(ElementData::id))
            .map(str::to_string)
            .collect()
    }

    /// Point each of `keys` at the first connected element in tree order
    /// carrying it, ignoring the nodes in `skip`.
    fn reindex_ids(&mut self, keys: &[String], skip: &[NodeId]) {
        if keys.is_empty() {
            return;
        }
        for key in keys {
            let _ = self.ids.remove(key);
        }
        for id in self.tree.descendants(NodeId::ROOT) {
            if skip.contains(&id) {
                continue;
            }
            if let Some(key) = self.tree.data(id).and_then(Node::as_element).and_then(ElementData::id)
                && keys.iter().any(|k| k == key)
                && !self.ids.contains_key(key)
            {
                let _ = self.ids.insert(key.to_string(), id);
            }
        }
    }

    // ── Style invalidation ─────────────────────────────────────────────

    /// Mark `id` and its descendants style-dirty and flag the document for
    /// a style update. The next layout request rebuilds the box tree.
    pub fn invalidate_style(&mut self, id: NodeId) {
        let subtree: Vec<NodeId> = std::iter::once(id)
            .chain(self.tree.descendants(id))
            .collect();
        for node in subtree {
            if let Some(node) = self.tree.data_mut(node) {
                node.set_style_state(StyleState::StyleDirty);
            }
        }
        self.needs_style_update = true;
    }

    /// Flag the document for relayout without a style update (e.g. the
    /// viewport changed size).
    pub fn invalidate_layout(&mut self) {
        self.needs_layout = true;
        if let Some(root) = self.tree.data_mut(NodeId::ROOT)
            && root.style_state() == StyleState::Clean
        {
            root.set_style_state(StyleState::LayoutDirty);
        }
    }

    /// True if styles must be re-resolved and the box tree rebuilt.
    #[must_use]
    pub const fn needs_style_update(&self) -> bool {
        self.needs_style_update
    }

    /// True if geometry must be recomputed.
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        self.needs_layout || self.needs_style_update
    }

    /// Reset every dirty flag. Called by the layout pipeline once the box
    /// tree reflects the document.
    pub fn mark_clean(&mut self) {
        for (_, node) in self.tree.iter_mut() {
            node.set_style_state(StyleState::Clean);
        }
        self.needs_style_update = false;
        self.needs_layout = false;
    }

    // ── Layout node cache ──────────────────────────────────────────────

    /// The cached box-tree handle of a node.
    #[must_use]
    pub fn layout_node(&self, id: NodeId) -> Option<LayoutHandle> {
        self.get(id).and_then(Node::layout_node)
    }

    /// Point a node at its box-tree counterpart.
    pub fn set_layout_node(&mut self, id: NodeId, handle: LayoutHandle) {
        if let Some(node) = self.tree.data_mut(id) {
            node.set_layout_node(Some(handle));
        }
    }

    /// Forget every cached box-tree handle. Must run before the box tree
    /// they point into is discarded.
    pub fn clear_layout_nodes(&mut self) {
        for (_, node) in self.tree.iter_mut() {
            node.set_layout_node(None);
        }
    }

    // ── Hover ──────────────────────────────────────────────────────────

    /// The node currently under the pointer.
    #[must_use]
    pub const fn hovered_node(&self) -> Option<NodeId> {
        self.hovered_node
    }

    /// Update the hovered node. Returns true (and invalidates style, since
    /// hover can change resolved style) if it changed.
    pub fn set_hovered_node(&mut self, node: Option<NodeId>) -> bool {
        if node == self.hovered_node {
            return false;
        }
        let old = std::mem::replace(&mut self.hovered_node, node);
        for id in [old, node].into_iter().flatten() {
            self.invalidate_style(id);
        }
        true
    }
}
