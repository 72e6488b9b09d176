//! Painting.
//!
//! [CSS 2.1 Appendix E - Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! Painting turns a laid-out box tree into a display list of drawing
//! commands. It never mutates the tree; any renderer can execute the list.
//!
//! ```text
//! Style → Box tree → Layout → Paint → Render
//!                               ↓
//!                         DisplayList
//! ```

mod display_list;
mod painter;

pub use display_list::{DisplayCommand, DisplayList};
pub use painter::Painter;

use crate::box_model::Rect;
use crate::box_tree::BoxTree;

/// Where a paint pass writes its output and what it may skip.
#[derive(Debug, Clone, Default)]
pub struct RenderingContext {
    /// Commands emitted by the pass, appended in painting order.
    pub display_list: DisplayList,
    /// The visible area. Line-box fragments outside it are not painted.
    pub viewport: Rect,
    /// Outline every line-box fragment (a debugging aid).
    pub show_line_box_borders: bool,
}

impl RenderingContext {
    /// An empty context painting into `viewport`.
    #[must_use]
    pub fn new(viewport: Rect) -> Self {
        Self {
            display_list: DisplayList::new(),
            viewport,
            show_line_box_borders: false,
        }
    }
}

impl BoxTree {
    /// Paint the tree into `ctx`, appending to its display list.
    pub fn render(&self, ctx: &mut RenderingContext) {
        Painter::new(self).paint(ctx);
    }
}
