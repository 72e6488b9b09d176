//! Painter: walks the box tree and emits drawing commands.
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)

use crate::box_model::{BoxDimensions, EdgeSizes, Rect};
use crate::box_tree::BoxTree;
use crate::layout_node::{BoxKind, LayoutId, LayoutNode};
use crate::style::ColorValue;

use super::{DisplayCommand, RenderingContext};

/// Paints a laid-out box tree into a [`RenderingContext`].
///
/// Every box is painted as: background, border, then its content. Block
/// content is the children in tree order; inline content is the
/// backgrounds of the inline boxes followed by the text of each line box.
#[derive(Debug, Clone, Copy)]
pub struct Painter<'a> {
    tree: &'a BoxTree,
}

impl<'a> Painter<'a> {
    /// A painter for `tree`.
    #[must_use]
    pub const fn new(tree: &'a BoxTree) -> Self {
        Self { tree }
    }

    /// Paint the whole tree, appending to `ctx.display_list`.
    pub fn paint(&self, ctx: &mut RenderingContext) {
        self.paint_block(self.tree.root(), ctx);
    }

    fn paint_block(&self, id: LayoutId, ctx: &mut RenderingContext) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        self.paint_box_decorations(id, node, ctx);

        if self.tree.children_are_inline(id) {
            self.paint_inline_content(id, node, ctx);
        } else {
            for &child in self.tree.children(id) {
                self.paint_block(child, ctx);
            }
        }
    }

    /// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
    /// Step 2: "the background color of the element" and "the border of the
    /// element".
    fn paint_box_decorations(&self, id: LayoutId, node: &LayoutNode, ctx: &mut RenderingContext) {
        let Some(box_model) = node.box_model() else {
            return;
        };
        if !node.visible {
            return;
        }
        let style = self.tree.style(id);

        // [§ 3.7 Painting Area](https://www.w3.org/TR/css-backgrounds-3/#background-painting-area)
        //
        // "The initial value of 'background-clip' is 'border-box', meaning
        // the background is painted within the border box."
        let border_box = box_model.border_box();
        if let Some(background) = style.background_color {
            fill(ctx, border_box, background);
        }
        paint_borders(ctx, box_model, style.used_border_color());
    }

    fn paint_inline_content(&self, block: LayoutId, node: &LayoutNode, ctx: &mut RenderingContext) {
        for inline_box in self.tree.tree().descendants(block) {
            if let Some(inline_node) = self.tree.get(inline_box)
                && inline_node.kind == BoxKind::Inline
            {
                self.paint_box_decorations(inline_box, inline_node, ctx);
            }
        }

        for fragment in node.line_boxes.iter().flat_map(|line| &line.fragments) {
            if !fragment.bounds.intersects(&ctx.viewport) {
                continue;
            }
            let Some(owner) = self.tree.get(fragment.layout_node) else {
                continue;
            };

            let text = self.tree.fragment_text(fragment);
            if owner.visible && !text.is_empty() {
                let style = self.tree.style(fragment.layout_node);
                ctx.display_list.push(DisplayCommand::DrawText {
                    x: fragment.bounds.x,
                    y: fragment.bounds.y,
                    text,
                    font_size: style.font_size,
                    color: style.color,
                });
            }

            if ctx.show_line_box_borders {
                ctx.display_list.push(DisplayCommand::StrokeRect {
                    x: fragment.bounds.x,
                    y: fragment.bounds.y,
                    width: fragment.bounds.width,
                    height: fragment.bounds.height,
                    color: ColorValue::RED,
                });
            }
        }
    }
}

fn fill(ctx: &mut RenderingContext, rect: Rect, color: ColorValue) {
    ctx.display_list.push(DisplayCommand::FillRect {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        color,
    });
}

/// [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
///
/// One filled rectangle per non-empty side. Top and bottom span the corners;
/// left and right fit between them.
fn paint_borders(ctx: &mut RenderingContext, box_model: &BoxDimensions, color: ColorValue) {
    let outer = box_model.border_box();
    let inner = box_model.padding_box();
    let EdgeSizes {
        top,
        right,
        bottom,
        left,
    } = box_model.border;

    if top > 0.0 {
        fill(ctx, Rect::new(outer.x, outer.y, outer.width, top), color);
    }
    if bottom > 0.0 {
        fill(ctx, Rect::new(outer.x, inner.bottom(), outer.width, bottom), color);
    }
    if left > 0.0 {
        fill(ctx, Rect::new(outer.x, inner.y, left, inner.height), color);
    }
    if right > 0.0 {
        fill(ctx, Rect::new(inner.right(), inner.y, right, inner.height), color);
    }
}
