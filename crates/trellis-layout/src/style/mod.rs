//! Resolved style snapshots and the resolver seam.
//!
//! Selector matching and the cascade live outside this crate. What layout
//! consumes is a [`ComputedStyle`] per node, produced by a
//! [`StyleResolver`]. [`StyleMap`] is the bundled resolver: user-agent
//! display defaults plus per-node declarations.

mod color;
mod display;
mod resolver;

pub use color::ColorValue;
pub use display::{Display, default_display_for_element};
pub use resolver::{StyleDeclarations, StyleMap, StyleResolver, Visibility};

use serde::Serialize;

use crate::box_model::EdgeSizes;
use crate::values::{AutoEdgeSizes, AutoOr};

/// Initial `font-size` in pixels (the `medium` keyword).
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// The resolved style of one node. Built once per box-tree generation and
/// shared with `Rc`; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    /// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: Display,
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    pub margin: AutoEdgeSizes,
    /// [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
    pub border_width: EdgeSizes,
    /// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    pub padding: EdgeSizes,
    /// [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: AutoOr,
    /// [§ 10.5 Content height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: AutoOr,
    /// [§ 3.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop), in pixels.
    pub font_size: f32,
    /// [§ 3.1 'color'](https://www.w3.org/TR/css-color-4/#the-color-property)
    pub color: ColorValue,
    /// [§ 3.2 'background-color'](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    ///
    /// `None` is `transparent`: nothing is painted.
    pub background_color: Option<ColorValue>,
    /// [§ 4.1 'border-color'](https://www.w3.org/TR/css-backgrounds-3/#border-color)
    ///
    /// `None` is `currentColor`.
    pub border_color: Option<ColorValue>,
    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    ///
    /// Invisible boxes still take up space but are neither painted nor hit.
    pub visible: bool,
}

impl Default for ComputedStyle {
    /// Initial values of every property.
    fn default() -> Self {
        Self {
            display: Display::Inline,
            margin: AutoEdgeSizes::zero(),
            border_width: EdgeSizes::default(),
            padding: EdgeSizes::default(),
            width: AutoOr::Auto,
            height: AutoOr::Auto,
            font_size: DEFAULT_FONT_SIZE,
            color: ColorValue::BLACK,
            background_color: None,
            border_color: None,
            visible: true,
        }
    }
}

impl ComputedStyle {
    /// Style of the box generated for the document node: a block with
    /// initial values everywhere else.
    #[must_use]
    pub fn root() -> Self {
        Self {
            display: Display::Block,
            ..Self::default()
        }
    }

    /// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// Initial values, except the inherited properties (`font-size`,
    /// `color`, `visibility`) which are copied from `parent`.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        Self {
            font_size: parent.font_size,
            color: parent.color,
            visible: parent.visible,
            ..Self::default()
        }
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box. Non-inherited properties have their initial value."
    #[must_use]
    pub fn anonymous_block(parent: &Self) -> Self {
        Self {
            display: Display::Block,
            ..Self::inherit_from(parent)
        }
    }

    /// The used border color (`currentColor` when unset).
    #[must_use]
    pub fn used_border_color(&self) -> ColorValue {
        self.border_color.unwrap_or(self.color)
    }

    /// Margins with 'auto' resolved to zero, as used for the vertical
    /// margins of blocks and all margins of inline boxes.
    #[must_use]
    pub const fn used_margin(&self) -> EdgeSizes {
        self.margin.to_px_or(0.0)
    }
}
