//! The frame: a document, its styles and its current layout.
//!
//! Layout is pull-based. Mutations only mark the document dirty; the box
//! tree is rebuilt or relaid out the next time geometry is asked for
//! ([`Frame::layout`], [`Frame::render`], [`Frame::hit_test`]).

use trellis_common::warning::clear_warnings;
use trellis_dom::{Document, NodeId};

use crate::box_model::{BoxDimensions, Point, Rect};
use crate::box_tree::BoxTree;
use crate::hit_test::HitTestResult;
use crate::inline::{ApproximateFontMetrics, FontMetrics};
use crate::layout_node::{LayoutId, LayoutNode};
use crate::paint::RenderingContext;
use crate::style::StyleResolver;

/// Callback told which area of the frame must be repainted.
pub type NeedsDisplayCallback = Box<dyn FnMut(Rect)>;

/// Owns a document and everything needed to lay it out and paint it.
pub struct Frame<R: StyleResolver> {
    document: Document,
    resolver: R,
    font_metrics: Box<dyn FontMetrics>,
    viewport: Rect,
    box_tree: Option<BoxTree>,
    generation: u32,
    on_set_needs_display: Option<NeedsDisplayCallback>,
}

impl<R: StyleResolver> Frame<R> {
    /// A frame showing `document` in a `width`×`height` viewport, measuring
    /// text with [`ApproximateFontMetrics`].
    #[must_use]
    pub fn new(document: Document, resolver: R, width: f32, height: f32) -> Self {
        clear_warnings();
        Self {
            document,
            resolver,
            font_metrics: Box::new(ApproximateFontMetrics),
            viewport: Rect::new(0.0, 0.0, width, height),
            box_tree: None,
            generation: 0,
            on_set_needs_display: None,
        }
    }

    /// Replace the font metrics. Forces a relayout.
    #[must_use]
    pub fn with_font_metrics(mut self, font_metrics: Box<dyn FontMetrics>) -> Self {
        self.font_metrics = font_metrics;
        self.document.invalidate_layout();
        self
    }

    /// The document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The document, for mutation. Structural changes invalidate style by
    /// themselves; anything else must call
    /// [`Document::invalidate_style`] or [`Document::invalidate_layout`].
    pub const fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The style resolver.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The style resolver, for mutation. Every resolved style is considered
    /// stale afterwards, so the next layout rebuilds the box tree.
    pub fn resolver_mut(&mut self) -> &mut R {
        let root = self.document.root();
        self.document.invalidate_style(root);
        &mut self.resolver
    }

    /// The current box tree, if one has been built.
    #[must_use]
    pub const fn box_tree(&self) -> Option<&BoxTree> {
        self.box_tree.as_ref()
    }

    /// Generation of the current box tree. Incremented on every rebuild.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// The viewport rectangle.
    #[must_use]
    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Resize the viewport. Triggers relayout (not a rebuild) and a full
    /// repaint if the size changed.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        let viewport = Rect::new(self.viewport.x, self.viewport.y, width, height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.document.invalidate_layout();
        self.set_needs_display(viewport);
    }

    /// Bring the box tree up to date with the document.
    ///
    /// A pending style update discards the box tree and rebuilds it under a
    /// new generation; pending layout only recomputes geometry. Otherwise
    /// nothing happens, so calling this repeatedly is cheap.
    pub fn layout(&mut self) {
        if self.document.needs_style_update() || self.box_tree.is_none() {
            // Handles must never outlive the tree they point into.
            self.document.clear_layout_nodes();
            self.box_tree = None;
            self.generation = self.generation.wrapping_add(1);
            log::debug!("rebuilding box tree, generation {}", self.generation);

            let mut box_tree = BoxTree::build(&mut self.document, &self.resolver, self.generation);
            box_tree.layout(self.viewport, self.font_metrics.as_ref());
            log::debug!("box tree has {} boxes", box_tree.len());
            self.box_tree = Some(box_tree);
        } else if self.document.needs_layout()
            && let Some(box_tree) = self.box_tree.as_mut()
        {
            log::debug!(
                "relayout at {}x{}",
                self.viewport.width,
                self.viewport.height
            );
            box_tree.layout(self.viewport, self.font_metrics.as_ref());
        }
        self.document.mark_clean();
    }

    /// Lay out if needed, then paint into `ctx`.
    pub fn render(&mut self, ctx: &mut RenderingContext) {
        self.layout();
        if let Some(box_tree) = &self.box_tree {
            box_tree.render(ctx);
        }
    }

    /// Lay out if needed, then find the topmost box at `point`.
    pub fn hit_test(&mut self, point: Point) -> HitTestResult {
        self.layout();
        self.box_tree
            .as_ref()
            .map(|box_tree| box_tree.hit_test(point))
            .unwrap_or_default()
    }

    /// Register the repaint callback, replacing any previous one.
    pub fn on_set_needs_display(&mut self, callback: impl FnMut(Rect) + 'static) {
        self.on_set_needs_display = Some(Box::new(callback));
    }

    /// Ask for `rect` to be repainted.
    pub fn set_needs_display(&mut self, rect: Rect) {
        if let Some(callback) = self.on_set_needs_display.as_mut() {
            callback(rect);
        }
    }

    /// The current box of a document node, through its cached handle. `None`
    /// if the node has no box or the handle is from an older generation.
    #[must_use]
    pub fn layout_node_for(&self, node: NodeId) -> Option<LayoutId> {
        let handle = self.document.layout_node(node)?;
        self.box_tree.as_ref()?.resolve(handle)
    }

    /// The area a node currently occupies: the union of its line-box
    /// fragments if it is inline-level, else its border box.
    #[must_use]
    pub fn rect_for(&self, node: NodeId) -> Option<Rect> {
        let id = self.layout_node_for(node)?;
        self.box_tree.as_ref()?.absolute_rect(id)
    }

    /// Ask for the area occupied by `node` to be repainted. Returns that
    /// area, or `None` if the node has no current box.
    pub fn set_needs_display_for(&mut self, node: NodeId) -> Option<Rect> {
        let rect = self.rect_for(node)?;
        self.set_needs_display(rect);
        Some(rect)
    }

    /// [§ 4.2 The user action pseudo-classes](https://drafts.csswg.org/selectors/#the-hover-pseudo)
    ///
    /// Move the hover to `node`. The areas of the old and the new hovered
    /// node are repainted, both before and after the restyle. Returns true
    /// if the hovered node changed.
    pub fn set_hovered_node(&mut self, node: Option<NodeId>) -> bool {
        let old = self.document.hovered_node();
        let before: Vec<Rect> = [old, node]
            .into_iter()
            .flatten()
            .filter_map(|n| self.rect_for(n))
            .collect();

        if !self.document.set_hovered_node(node) {
            return false;
        }
        self.layout();

        let after: Vec<Rect> = [old, node]
            .into_iter()
            .flatten()
            .filter_map(|n| self.rect_for(n))
            .collect();
        for rect in before.into_iter().chain(after) {
            self.set_needs_display(rect);
        }
        true
    }

    /// Lay out if needed and return the size of the laid-out content: the
    /// root's margin box.
    pub fn content_size(&mut self) -> (f32, f32) {
        self.layout();
        self.box_tree
            .as_ref()
            .and_then(|box_tree| box_tree.get(box_tree.root()))
            .and_then(LayoutNode::box_model)
            .map(BoxDimensions::margin_box)
            .map_or((0.0, 0.0), |rect| (rect.width, rect.height))
    }
}
