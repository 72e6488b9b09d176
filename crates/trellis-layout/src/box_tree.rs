//! Box tree construction.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The box tree mirrors the renderable subset of the document. It is built
//! in one pass from the document and a [`StyleResolver`], then normalized so
//! every block container holds either only block-level or only inline-level
//! children.

use std::rc::Rc;

use trellis_common::warning::warn_once;
use trellis_dom::{Document, LayoutHandle, NodeId, NodeType, Tree};

use crate::box_model::BoxDimensions;
use crate::inline::LineBoxFragment;
use crate::layout_node::{BoxKind, LayoutData, LayoutId, LayoutNode};
use crate::style::{ComputedStyle, Display, StyleResolver};

/// The box tree of one document, stamped with the generation it was built in.
#[derive(Debug)]
pub struct BoxTree {
    tree: Tree<LayoutId, LayoutNode>,
    root: LayoutId,
    generation: u32,
    initial_style: ComputedStyle,
}

impl BoxTree {
    /// Build the box tree of `document`.
    ///
    /// Every cached handle on the document is cleared first; every document
    /// node that generated a box is then pointed at it with a handle of
    /// `generation`.
    pub fn build(document: &mut Document, resolver: &dyn StyleResolver, generation: u32) -> Self {
        document.clear_layout_nodes();

        let root_node = Self::create_layout_node(document, resolver, document.root(), None)
            .unwrap_or_else(|| LayoutNode::block(None, Rc::new(ComputedStyle::root())));
        let mut tree = Tree::new();
        let root = tree.alloc(root_node);
        let mut box_tree = Self {
            tree,
            root,
            generation,
            initial_style: ComputedStyle::default(),
        };

        let root_style = box_tree.tree.data(root).and_then(LayoutNode::own_style).cloned();
        box_tree.build_children(document, resolver, document.root(), root, root_style.as_ref(), false);
        box_tree.normalize_block_children(root);
        box_tree.link_handles(document);
        box_tree
    }

    /// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    /// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    ///
    /// The layout node a document node generates, if any.
    ///
    /// `parent_style` is the style of the nearest generated ancestor box.
    fn create_layout_node(
        document: &Document,
        resolver: &dyn StyleResolver,
        node: NodeId,
        parent_style: Option<&Rc<ComputedStyle>>,
    ) -> Option<LayoutNode> {
        match &document.get(node)?.node_type {
            NodeType::Document => Some(LayoutNode::block(Some(node), Rc::new(ComputedStyle::root()))),
            NodeType::Element(data) => {
                let style = resolver.resolve(document, node, parent_style.map(AsRef::as_ref));
                // [§ 2.6 display: none](https://www.w3.org/TR/css-display-3/#valdef-display-none)
                // "The element and its descendants generate no boxes or text runs."
                if style.display == Display::None {
                    return None;
                }
                if data.tag_name == "br" {
                    return Some(LayoutNode::new(Some(node), BoxKind::LineBreak, LayoutData::Plain));
                }
                let kind = if style.display.is_block() {
                    BoxKind::Block
                } else {
                    BoxKind::Inline
                };
                Some(LayoutNode::new(
                    Some(node),
                    kind,
                    LayoutData::StyledWithBoxModel {
                        style: Rc::new(style),
                        box_model: BoxDimensions::default(),
                    },
                ))
            }
            // [§ 9.2.2.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-inline)
            //
            // Text takes the style of its parent box unchanged.
            NodeType::Text(text) => {
                let style = parent_style
                    .cloned()
                    .unwrap_or_else(|| Rc::new(ComputedStyle::default()));
                Some(LayoutNode::new(
                    Some(node),
                    BoxKind::Text(text.clone()),
                    LayoutData::Styled { style },
                ))
            }
            NodeType::Comment(_) | NodeType::DocumentType(_) => None,
        }
    }

    fn build_children(
        &mut self,
        document: &Document,
        resolver: &dyn StyleResolver,
        dom_parent: NodeId,
        parent: LayoutId,
        parent_style: Option<&Rc<ComputedStyle>>,
        in_inline: bool,
    ) {
        for &child in document.children(dom_parent) {
            let Some(mut layout_node) = Self::create_layout_node(document, resolver, child, parent_style)
            else {
                continue;
            };

            // A block inside an inline box cannot split it, so it is laid
            // out as inline content instead.
            if in_inline && layout_node.is_block() {
                let _ = warn_once(
                    "layout",
                    &format!(
                        "block-level <{}> inside an inline box is laid out as inline",
                        document.tag_name(child)
                    ),
                );
                layout_node.kind = BoxKind::Inline;
                layout_node.inline = true;
            }

            let child_style = layout_node.own_style().cloned();
            let child_in_inline = in_inline || !layout_node.is_block();
            let child_is_block = layout_node.is_block();
            let id = self.tree.alloc(layout_node);
            self.append(parent, id);

            self.build_children(
                document,
                resolver,
                child,
                id,
                child_style.as_ref().or(parent_style),
                child_in_inline,
            );
            if child_is_block {
                self.normalize_block_children(id);
            }
        }
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "If a block container box has a block-level box inside it, then we
    /// force it to have only block-level boxes inside it."
    ///
    /// Each maximal run of inline-level children of a mixed block is wrapped
    /// in an anonymous block. Runs made only of collapsible whitespace are
    /// dropped.
    fn normalize_block_children(&mut self, parent: LayoutId) {
        let children = self.tree.children(parent).to_vec();
        let is_inline = |tree: &Tree<LayoutId, LayoutNode>, id: LayoutId| tree.data(id).is_some_and(|n| n.inline);

        let has_inline = children.iter().any(|&c| is_inline(&self.tree, c));
        let has_block = children.iter().any(|&c| !is_inline(&self.tree, c));
        if !(has_inline && has_block) {
            return;
        }

        let parent_style = self.style(parent).clone();
        for &child in &children {
            if let Err(err) = self.tree.detach(child) {
                log::error!("box tree: cannot detach {child:?}: {err}");
            }
        }

        let mut run: Vec<LayoutId> = Vec::new();
        for &child in &children {
            if is_inline(&self.tree, child) {
                run.push(child);
                continue;
            }
            self.flush_inline_run(parent, &parent_style, &mut run);
            self.append(parent, child);
        }
        self.flush_inline_run(parent, &parent_style, &mut run);
    }

    fn flush_inline_run(&mut self, parent: LayoutId, parent_style: &ComputedStyle, run: &mut Vec<LayoutId>) {
        if run.is_empty() {
            return;
        }
        let collapsible = run.iter().all(|&id| {
            self.tree
                .data(id)
                .and_then(LayoutNode::text)
                .is_some_and(|text| text.trim().is_empty())
        });
        if collapsible {
            run.clear();
            return;
        }

        let anonymous = self.tree.alloc(LayoutNode::block(
            None,
            Rc::new(ComputedStyle::anonymous_block(parent_style)),
        ));
        self.append(parent, anonymous);
        for id in run.drain(..) {
            self.append(anonymous, id);
        }
    }

    fn append(&mut self, parent: LayoutId, child: LayoutId) {
        // Both ids come from this arena and `child` is always fresh or
        // detached, so the only failure would be an arena bug.
        let appended = self.tree.append_child(parent, child);
        debug_assert!(appended.is_ok(), "box tree append failed: {appended:?}");
    }

    /// Point every document node with a box at it.
    fn link_handles(&self, document: &mut Document) {
        for id in std::iter::once(self.root).chain(self.tree.descendants(self.root)) {
            if let Some(node) = self.tree.data(id).and_then(|n| n.node) {
                document.set_layout_node(node, LayoutHandle::new(self.generation, id.0));
            }
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// The box generated for the document node.
    #[must_use]
    pub const fn root(&self) -> LayoutId {
        self.root
    }

    /// The generation this tree was built in.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of boxes in the arena.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// True if the arena is empty (never the case for a built tree).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The box with the given id.
    #[must_use]
    pub fn get(&self, id: LayoutId) -> Option<&LayoutNode> {
        self.tree.data(id)
    }

    pub(crate) fn get_mut(&mut self, id: LayoutId) -> Option<&mut LayoutNode> {
        self.tree.data_mut(id)
    }

    /// The children of a box, in document order.
    #[must_use]
    pub fn children(&self, id: LayoutId) -> &[LayoutId] {
        self.tree.children(id)
    }

    /// The parent of a box.
    #[must_use]
    pub fn parent(&self, id: LayoutId) -> Option<LayoutId> {
        self.tree.parent(id)
    }

    /// The underlying arena.
    #[must_use]
    pub const fn tree(&self) -> &Tree<LayoutId, LayoutNode> {
        &self.tree
    }

    /// Resolve a cached handle. Handles from another generation, or
    /// pointing outside the arena, are stale and resolve to `None`.
    #[must_use]
    pub fn resolve(&self, handle: LayoutHandle) -> Option<LayoutId> {
        let id = LayoutId(handle.index());
        (handle.generation() == self.generation && self.tree.contains(id)).then_some(id)
    }

    /// The style that applies to a box: its own snapshot, else that of the
    /// nearest styled ancestor, else initial values.
    #[must_use]
    pub fn style(&self, id: LayoutId) -> &ComputedStyle {
        std::iter::once(id)
            .chain(self.tree.ancestors(id))
            .find_map(|a| self.tree.data(a).and_then(LayoutNode::own_style))
            .map_or(&self.initial_style, AsRef::as_ref)
    }

    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// True if a box establishes an inline formatting context for its
    /// children: it has children and every one of them is inline-level.
    #[must_use]
    pub fn children_are_inline(&self, id: LayoutId) -> bool {
        let children = self.tree.children(id);
        !children.is_empty()
            && children
                .iter()
                .all(|&c| self.tree.data(c).is_some_and(|n| n.inline))
    }

    /// The text a fragment shows, with whitespace collapsed. Empty for
    /// line-break fragments.
    #[must_use]
    pub fn fragment_text(&self, fragment: &LineBoxFragment) -> String {
        self.tree
            .data(fragment.layout_node)
            .and_then(LayoutNode::text)
            .map(|text| fragment.collapsed_text(text))
            .unwrap_or_default()
    }

    /// The inline-formatting ancestor block of an inline-level box: the
    /// nearest ancestor that holds line boxes.
    #[must_use]
    pub fn containing_line_block(&self, id: LayoutId) -> Option<LayoutId> {
        self.tree
            .ancestors(id)
            .find(|&a| self.tree.data(a).is_some_and(LayoutNode::is_block))
    }
}
