//! The style resolver seam and the bundled map-based resolver.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use trellis_common::warning::warn_once;
use trellis_dom::{Document, Node, NodeId};

use super::{ColorValue, ComputedStyle, Display, default_display_for_element};
use crate::box_model::EdgeSizes;
use crate::values::{AutoEdgeSizes, AutoOr};

/// Supplies the resolved style of a document node.
///
/// Called once per element per box-tree build, top-down, with the style of
/// the nearest generated ancestor box so inherited properties can be
/// carried over.
pub trait StyleResolver {
    /// Resolve the style of `node`.
    fn resolve(
        &self,
        document: &Document,
        node: NodeId,
        parent_style: Option<&ComputedStyle>,
    ) -> ComputedStyle;
}

impl<F> StyleResolver for F
where
    F: Fn(&Document, NodeId, Option<&ComputedStyle>) -> ComputedStyle,
{
    fn resolve(
        &self,
        document: &Document,
        node: NodeId,
        parent_style: Option<&ComputedStyle>,
    ) -> ComputedStyle {
        self(document, node, parent_style)
    }
}

/// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// "The generated box is visible."
    Visible,
    /// "The generated box is invisible (fully transparent, nothing is
    /// drawn), but still affects layout."
    Hidden,
}

/// A set of specified values for one node, as read from a document
/// description. Unset fields leave the inherited or initial value alone;
/// per-side fields override the matching shorthand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StyleDeclarations {
    /// `display` keyword. Unsupported keywords are ignored with a warning.
    pub display: Option<String>,
    /// `margin` shorthand (all four sides).
    pub margin: Option<AutoOr>,
    /// `margin-top`
    pub margin_top: Option<AutoOr>,
    /// `margin-right`
    pub margin_right: Option<AutoOr>,
    /// `margin-bottom`
    pub margin_bottom: Option<AutoOr>,
    /// `margin-left`
    pub margin_left: Option<AutoOr>,
    /// `padding` shorthand (all four sides).
    pub padding: Option<f32>,
    /// `padding-top`
    pub padding_top: Option<f32>,
    /// `padding-right`
    pub padding_right: Option<f32>,
    /// `padding-bottom`
    pub padding_bottom: Option<f32>,
    /// `padding-left`
    pub padding_left: Option<f32>,
    /// `border-width` shorthand (all four sides).
    pub border_width: Option<f32>,
    /// `border-top-width`
    pub border_top_width: Option<f32>,
    /// `border-right-width`
    pub border_right_width: Option<f32>,
    /// `border-bottom-width`
    pub border_bottom_width: Option<f32>,
    /// `border-left-width`
    pub border_left_width: Option<f32>,
    /// `width`
    pub width: Option<AutoOr>,
    /// `height`
    pub height: Option<AutoOr>,
    /// `font-size` in pixels.
    pub font_size: Option<f32>,
    /// `color`
    pub color: Option<ColorValue>,
    /// `background-color`
    pub background_color: Option<ColorValue>,
    /// `border-color`
    pub border_color: Option<ColorValue>,
    /// `visibility`
    pub visibility: Option<Visibility>,
}

impl StyleDeclarations {
    /// An empty declaration block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `display`.
    #[must_use]
    pub fn display(mut self, keyword: &str) -> Self {
        self.display = Some(keyword.to_string());
        self
    }

    /// Set all four margins.
    #[must_use]
    pub fn margin(mut self, px: f32) -> Self {
        self.margin = Some(AutoOr::Length(px));
        self
    }

    /// Set the horizontal margins to 'auto' (centering a fixed-width block).
    #[must_use]
    pub fn margin_auto(mut self) -> Self {
        self.margin_left = Some(AutoOr::Auto);
        self.margin_right = Some(AutoOr::Auto);
        self
    }

    /// Set all four paddings.
    #[must_use]
    pub fn padding(mut self, px: f32) -> Self {
        self.padding = Some(px);
        self
    }

    /// Set all four border widths.
    #[must_use]
    pub fn border_width(mut self, px: f32) -> Self {
        self.border_width = Some(px);
        self
    }

    /// Set `width`.
    #[must_use]
    pub fn width(mut self, px: f32) -> Self {
        self.width = Some(AutoOr::Length(px));
        self
    }

    /// Set `height`.
    #[must_use]
    pub fn height(mut self, px: f32) -> Self {
        self.height = Some(AutoOr::Length(px));
        self
    }

    /// Set `font-size`.
    #[must_use]
    pub fn font_size(mut self, px: f32) -> Self {
        self.font_size = Some(px);
        self
    }

    /// Set `background-color`.
    #[must_use]
    pub fn background_color(mut self, color: ColorValue) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Set `visibility`.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Overlay these declarations onto `style`.
    pub fn apply_to(&self, style: &mut ComputedStyle) {
        if let Some(keyword) = &self.display {
            match keyword.parse::<Display>() {
                Ok(display) => style.display = display,
                Err(_) => {
                    let _ = warn_once("style", &format!("unsupported display value '{keyword}'"));
                }
            }
        }

        if let Some(margin) = self.margin {
            style.margin = AutoEdgeSizes::uniform(margin);
        }
        override_side(&mut style.margin.top, self.margin_top);
        override_side(&mut style.margin.right, self.margin_right);
        override_side(&mut style.margin.bottom, self.margin_bottom);
        override_side(&mut style.margin.left, self.margin_left);

        if let Some(padding) = self.padding {
            style.padding = EdgeSizes::uniform(padding.max(0.0));
        }
        override_side(&mut style.padding.top, self.padding_top.map(non_negative));
        override_side(&mut style.padding.right, self.padding_right.map(non_negative));
        override_side(&mut style.padding.bottom, self.padding_bottom.map(non_negative));
        override_side(&mut style.padding.left, self.padding_left.map(non_negative));

        if let Some(width) = self.border_width {
            style.border_width = EdgeSizes::uniform(width.max(0.0));
        }
        override_side(&mut style.border_width.top, self.border_top_width.map(non_negative));
        override_side(&mut style.border_width.right, self.border_right_width.map(non_negative));
        override_side(&mut style.border_width.bottom, self.border_bottom_width.map(non_negative));
        override_side(&mut style.border_width.left, self.border_left_width.map(non_negative));

        override_side(&mut style.width, self.width);
        override_side(&mut style.height, self.height);
        override_side(&mut style.font_size, self.font_size.map(non_negative));
        override_side(&mut style.color, self.color);

        if self.background_color.is_some() {
            style.background_color = self.background_color;
        }
        if self.border_color.is_some() {
            style.border_color = self.border_color;
        }
        if let Some(visibility) = self.visibility {
            style.visible = visibility == Visibility::Visible;
        }
    }
}

fn override_side<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn non_negative(px: f32) -> f32 {
    px.max(0.0)
}

/// Resolver backed by per-node declaration blocks.
///
/// Resolution order for an element: inherited values from the parent box,
/// the user-agent default `display` for its tag, its declarations, then
/// its hover declarations while it (or a descendant) is hovered.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    declarations: HashMap<NodeId, StyleDeclarations>,
    hover_declarations: HashMap<NodeId, StyleDeclarations>,
}

impl StyleMap {
    /// An empty map: every element gets user-agent defaults only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the declarations of `node`, returning the previous ones.
    pub fn set(&mut self, node: NodeId, declarations: StyleDeclarations) -> Option<StyleDeclarations> {
        self.declarations.insert(node, declarations)
    }

    /// Set the declarations applied while `node` matches `:hover`.
    pub fn set_hover(
        &mut self,
        node: NodeId,
        declarations: StyleDeclarations,
    ) -> Option<StyleDeclarations> {
        self.hover_declarations.insert(node, declarations)
    }

    /// The declarations of `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&StyleDeclarations> {
        self.declarations.get(&node)
    }

    /// Remove the declarations of `node`.
    pub fn remove(&mut self, node: NodeId) -> Option<StyleDeclarations> {
        let _ = self.hover_declarations.remove(&node);
        self.declarations.remove(&node)
    }

    /// [§ 4.2 The user action pseudo-classes](https://drafts.csswg.org/selectors/#the-hover-pseudo)
    ///
    /// "An element also matches :hover if one of its descendants in the flat
    /// tree matches :hover."
    fn matches_hover(document: &Document, node: NodeId) -> bool {
        document
            .hovered_node()
            .is_some_and(|hovered| hovered == node || document.tree().is_descendant_of(hovered, node))
    }
}

impl StyleResolver for StyleMap {
    fn resolve(
        &self,
        document: &Document,
        node: NodeId,
        parent_style: Option<&ComputedStyle>,
    ) -> ComputedStyle {
        let mut style = parent_style.map_or_else(ComputedStyle::default, ComputedStyle::inherit_from);

        if let Some(element) = document.get(node).and_then(Node::as_element) {
            style.display = default_display_for_element(&element.tag_name);
        }
        if let Some(declarations) = self.declarations.get(&node) {
            declarations.apply_to(&mut style);
        }
        if let Some(hover) = self.hover_declarations.get(&node)
            && Self::matches_hover(document, node)
        {
            hover.apply_to(&mut style);
        }
        style
    }
}
