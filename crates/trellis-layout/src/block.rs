//! Block layout.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block."
//!
//! Every block is laid out in four steps: its width from the containing
//! block, its position from the containing block and the previous sibling,
//! its children (block mode or inline mode), and finally its height from
//! the children.

#[cfg(feature = "layout-trace")]
use std::cell::Cell;

use crate::box_model::Rect;
use crate::box_tree::BoxTree;
use crate::inline::{FontMetrics, InlineLayout, LineBox};
use crate::layout_node::{BoxKind, LayoutId, LayoutNode};
use crate::values::AutoOr;

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Decrements the trace depth on every return path.
#[cfg(feature = "layout-trace")]
struct DepthGuard;

#[cfg(feature = "layout-trace")]
impl Drop for DepthGuard {
    fn drop(&mut self) {
        LAYOUT_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths."
///
/// Only adjoining margins of consecutive block siblings collapse.
#[must_use]
pub fn collapse_sibling_margins(a: f32, b: f32) -> f32 {
    a.max(b)
}

impl BoxTree {
    /// Lay out the whole tree against `viewport`.
    ///
    /// The root's containing block is the viewport; its used content width
    /// is the viewport width minus the root's own margins, borders and
    /// padding.
    pub fn layout(&mut self, viewport: Rect, font_metrics: &dyn FontMetrics) {
        let root = self.root();
        self.compute_width(root, viewport);
        self.compute_position(root, viewport, None);
        self.layout_block(root, font_metrics);
    }

    fn layout_block(&mut self, id: LayoutId, font_metrics: &dyn FontMetrics) {
        #[cfg(feature = "layout-trace")]
        let _depth = {
            let depth = LAYOUT_DEPTH.with(|d| {
                let current = d.get();
                d.set(current + 1);
                current
            });
            log::trace!(
                "{:indent$}layout {id:?} {:?} children={}",
                "",
                self.get(id).map(|n| &n.kind),
                self.children(id).len(),
                indent = depth * 2
            );
            DepthGuard
        };

        let Some(content) = self.get(id).and_then(LayoutNode::box_model).map(|b| b.content) else {
            return;
        };

        let used_height = if self.children_are_inline(id) {
            self.layout_inline_children(id, content, font_metrics)
        } else {
            if let Some(node) = self.get_mut(id) {
                node.line_boxes.clear();
            }
            self.layout_block_children(id, content, font_metrics)
        };

        self.compute_height(id, used_height);
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    /// 'padding-right' + 'border-right-width' + 'margin-right' = width of
    /// containing block"
    fn compute_width(&mut self, id: LayoutId, containing_block: Rect) {
        let style = self.style(id);
        let padding = style.padding;
        let border = style.border_width;
        let width = style.width;
        let mut margin_left = style.margin.left;
        let mut margin_right = style.margin.right;

        let edges = border.left + padding.left + padding.right + border.right;

        // "If 'width' is not 'auto' and 'border-left-width' + 'padding-left' +
        // 'width' + 'padding-right' + 'border-right-width' (plus any of
        // 'margin-left' or 'margin-right' that are not 'auto') is larger than
        // the width of the containing block, then any 'auto' values for
        // 'margin-left' or 'margin-right' are, for the following rules,
        // treated as zero."
        if let AutoOr::Length(w) = width
            && edges + w + margin_left.to_px_or(0.0) + margin_right.to_px_or(0.0)
                > containing_block.width
        {
            margin_left = AutoOr::Length(margin_left.to_px_or(0.0));
            margin_right = AutoOr::Length(margin_right.to_px_or(0.0));
        }

        let (used_width, used_margin_left, used_margin_right) = match (width, margin_left, margin_right) {
            // "If 'width' is set to 'auto', any other 'auto' values become
            // '0' and 'width' follows from the resulting equality."
            (AutoOr::Auto, left, right) => {
                let left = left.to_px_or(0.0);
                let right = right.to_px_or(0.0);
                ((containing_block.width - left - right - edges).max(0.0), left, right)
            }
            // "If both 'margin-left' and 'margin-right' are 'auto', their
            // used values are equal."
            (AutoOr::Length(w), AutoOr::Auto, AutoOr::Auto) => {
                let remaining = containing_block.width - w - edges;
                (w, remaining / 2.0, remaining / 2.0)
            }
            // "If there is exactly one value specified as 'auto', its used
            // value follows from the equality."
            (AutoOr::Length(w), AutoOr::Auto, AutoOr::Length(right)) => {
                (w, containing_block.width - w - right - edges, right)
            }
            // Over-constrained, or 'margin-right' alone is 'auto': with
            // 'direction: ltr' the right margin absorbs the difference.
            (AutoOr::Length(w), AutoOr::Length(left), _) => {
                (w, left, containing_block.width - w - left - edges)
            }
        };

        if let Some(box_model) = self.get_mut(id).and_then(LayoutNode::box_model_mut) {
            box_model.content.width = used_width;
            box_model.margin.left = used_margin_left;
            box_model.margin.right = used_margin_right;
            box_model.padding.left = padding.left;
            box_model.padding.right = padding.right;
            box_model.border.left = border.left;
            box_model.border.right = border.right;
        }
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "Each box's left outer edge touches the left edge of the containing
    /// block. The vertical distance between two sibling boxes is determined
    /// by the 'margin' properties."
    fn compute_position(&mut self, id: LayoutId, containing_block: Rect, previous: Option<LayoutId>) {
        let style = self.style(id);
        let margin = style.used_margin();
        let border = style.border_width;
        let padding = style.padding;

        let border_top = match previous.and_then(|p| self.get(p)).and_then(LayoutNode::box_model) {
            Some(prev) => {
                prev.border_box().bottom() + collapse_sibling_margins(prev.margin.bottom, margin.top)
            }
            None => containing_block.y + margin.top,
        };

        if let Some(box_model) = self.get_mut(id).and_then(LayoutNode::box_model_mut) {
            box_model.margin.top = margin.top;
            box_model.margin.bottom = margin.bottom;
            box_model.border.top = border.top;
            box_model.border.bottom = border.bottom;
            box_model.padding.top = padding.top;
            box_model.padding.bottom = padding.bottom;

            box_model.content.x =
                containing_block.x + box_model.margin.left + box_model.border.left + box_model.padding.left;
            box_model.content.y = border_top + border.top + padding.top;
        }
    }

    /// Lay out block-level children one after the other. Returns the used
    /// content height: from the content top to the bottom margin edge of
    /// the last child.
    fn layout_block_children(&mut self, id: LayoutId, content: Rect, font_metrics: &dyn FontMetrics) -> f32 {
        let mut previous = None;
        for child in self.children(id).to_vec() {
            if !self.get(child).is_some_and(LayoutNode::has_box_model) {
                continue;
            }
            self.compute_width(child, content);
            self.compute_position(child, content, previous);
            self.layout_block(child, font_metrics);
            previous = Some(child);
        }

        previous
            .and_then(|p| self.get(p))
            .and_then(LayoutNode::box_model)
            .map_or(0.0, |last| (last.margin_box().bottom() - content.y).max(0.0))
    }

    /// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// "If 'height' is 'auto', the height depends on whether the element has
    /// any block-level children."
    fn compute_height(&mut self, id: LayoutId, used_content_height: f32) {
        let height = self.style(id).height.to_px_or(used_content_height);
        if let Some(box_model) = self.get_mut(id).and_then(LayoutNode::box_model_mut) {
            box_model.content.height = height;
        }
    }

    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// Break the inline content of `id` into line boxes. Returns the sum of
    /// the line box heights.
    fn layout_inline_children(&mut self, id: LayoutId, content: Rect, font_metrics: &dyn FontMetrics) -> f32 {
        let mut inline = InlineLayout::new(content.x, content.y, content.width);
        for &child in self.children(id) {
            self.collect_inline(child, &mut inline, font_metrics);
        }
        inline.finish_line();
        let used_height = inline.total_height();
        let line_boxes = inline.line_boxes;

        self.place_inline_boxes(id, &line_boxes);
        if let Some(node) = self.get_mut(id) {
            node.line_boxes = line_boxes;
        }
        used_height
    }

    /// Feed one inline-level box and its descendants to the line breaker.
    fn collect_inline(&self, id: LayoutId, inline: &mut InlineLayout, font_metrics: &dyn FontMetrics) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.kind {
            BoxKind::Text(text) => {
                inline.add_text(id, text, self.style(id).font_size, font_metrics);
            }
            BoxKind::LineBreak => {
                let line_height = font_metrics.line_height(self.style(id).font_size);
                inline.add_line_break(id, line_height);
            }
            BoxKind::Inline | BoxKind::Block => {
                let style = self.style(id);
                let margin = style.used_margin();
                let border = style.border_width;
                let padding = style.padding;

                inline.begin_inline_box(margin.left + border.left + padding.left);
                for &child in self.children(id) {
                    self.collect_inline(child, inline, font_metrics);
                }
                inline.end_inline_box(padding.right + border.right + margin.right);
            }
        }
    }

    /// Give every inline box under `block` a content rectangle: the union
    /// of the fragments of its descendants. An inline box with no
    /// fragments collapses to an empty rectangle at the block's content
    /// origin.
    fn place_inline_boxes(&mut self, block: LayoutId, line_boxes: &[LineBox]) {
        let origin = self
            .get(block)
            .and_then(LayoutNode::box_model)
            .map(|b| Rect::new(b.content.x, b.content.y, 0.0, 0.0))
            .unwrap_or_default();

        let inline_boxes: Vec<LayoutId> = self
            .tree()
            .descendants(block)
            .filter(|&d| self.get(d).is_some_and(|n| n.kind == BoxKind::Inline))
            .collect();

        for inline_box in inline_boxes {
            let content = line_boxes
                .iter()
                .flat_map(|line| &line.fragments)
                .filter(|f| f.layout_node == inline_box || self.tree().is_descendant_of(f.layout_node, inline_box))
                .map(|f| f.bounds)
                .reduce(|a, b| a.union(&b))
                .unwrap_or(origin);

            let style = self.style(inline_box);
            let margin = style.used_margin();
            let border = style.border_width;
            let padding = style.padding;
            if let Some(box_model) = self.get_mut(inline_box).and_then(LayoutNode::box_model_mut) {
                box_model.content = content;
                box_model.margin = margin;
                box_model.border = border;
                box_model.padding = padding;
            }
        }
    }
}
