//! Box tree construction, flow layout, hit testing and painting for Trellis.
//!
//! # Scope
//!
//! This crate implements:
//! - **Box tree** ([§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen))
//!   - One layout node per displayed document node
//!   - Anonymous block boxes around inline runs of mixed blocks
//!   - Generation-checked handles from document nodes to their boxes
//!
//! - **Block layout** ([§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth))
//!   - Width constraint equation with auto margins
//!   - Vertical stacking with sibling margin collapsing
//!
//! - **Inline layout** ([§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting))
//!   - Greedy line breaking at whitespace
//!   - Forced breaks
//!
//! - **Hit testing**, **painting** into a display list, and the [`Frame`]
//!   that ties them to a document and pulls layout when it is stale.
//!
//! # Not Yet Implemented
//!
//! - Floats, positioning, tables, flex and grid
//! - Parent/child and empty-box margin collapsing
//! - Bidirectional text and vertical writing modes

/// Block layout per [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting).
pub mod block;
/// Box model structures per [CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/).
pub mod box_model;
/// Box tree construction per [§ 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen).
pub mod box_tree;
/// Text dump of a laid-out box tree.
pub mod dump;
/// The frame that owns a document and its layout.
pub mod frame;
/// Inline layout and line boxes per [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting).
pub mod inline;
/// Layout node types.
pub mod layout_node;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Resolved styles and the style resolver seam.
pub mod style;
/// Auto-or-length values.
pub mod values;

pub use block::collapse_sibling_margins;
pub use box_model::{BoxDimensions, EdgeSizes, Point, Rect};
pub use box_tree::BoxTree;
pub use dump::dump_tree;
pub use frame::{Frame, NeedsDisplayCallback};
pub use hit_test::HitTestResult;
pub use inline::{ApproximateFontMetrics, FontMetrics, InlineLayout, LineBox, LineBoxFragment};
pub use layout_node::{BoxKind, LayoutData, LayoutId, LayoutNode};
pub use paint::{DisplayCommand, DisplayList, Painter, RenderingContext};
pub use style::{
    ColorValue, ComputedStyle, Display, StyleDeclarations, StyleMap, StyleResolver, Visibility,
    default_display_for_element,
};
pub use values::{AutoEdgeSizes, AutoOr};
