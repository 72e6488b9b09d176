//! Box-tree node types.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! A layout node is one of three capability levels:
//!
//! ```text
//! Plain                no style of its own; inherits its nearest styled ancestor's
//! Styled               a shared style snapshot (text runs)
//! StyledWithBoxModel   style + margin/border/padding/content geometry (elements, anonymous blocks)
//! ```

use std::rc::Rc;

use trellis_dom::{NodeId, TreeIndex};

use crate::box_model::BoxDimensions;
use crate::inline::LineBox;
use crate::style::ComputedStyle;

/// A type-safe index into the box tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub usize);

impl TreeIndex for LayoutId {
    fn from_index(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// What a layout node represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxKind {
    /// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    ///
    /// Block containers, including the root and anonymous blocks.
    Block,
    /// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    Inline,
    /// [§ 9.2.2.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-inline)
    ///
    /// A run of text; owns a copy of the text node's data.
    Text(String),
    /// A forced line break (`<br>`).
    LineBreak,
}

impl BoxKind {
    /// Class name shown in tree dumps.
    #[must_use]
    pub const fn class_name(&self) -> &'static str {
        match self {
            Self::Block => "LayoutBlock",
            Self::Inline => "LayoutInline",
            Self::Text(_) => "LayoutText",
            Self::LineBreak => "LayoutBreak",
        }
    }
}

/// The capability level of a layout node and the data that comes with it.
#[derive(Debug, Clone)]
pub enum LayoutData {
    /// No style of its own.
    Plain,
    /// A style snapshot, possibly shared with other nodes.
    Styled {
        /// The snapshot.
        style: Rc<ComputedStyle>,
    },
    /// A style snapshot plus box-model geometry.
    StyledWithBoxModel {
        /// The snapshot.
        style: Rc<ComputedStyle>,
        /// Used margin/border/padding and content rectangle.
        box_model: BoxDimensions,
    },
}

/// One node of the box tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    /// The document node this box was generated for; `None` for anonymous boxes.
    pub node: Option<NodeId>,
    /// What this box represents.
    pub kind: BoxKind,
    /// True if the box is inline-level (participates in a line).
    pub inline: bool,
    /// False for `visibility: hidden`.
    pub visible: bool,
    /// Capability level and the matching data.
    pub data: LayoutData,
    /// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
    ///
    /// Line boxes of a block whose children are inline-level. Rebuilt by
    /// every layout pass; always empty for other nodes.
    pub line_boxes: Vec<LineBox>,
}

impl LayoutNode {
    /// A node with the given kind and data. Visibility and inline-ness are
    /// derived from the style when there is one.
    #[must_use]
    pub fn new(node: Option<NodeId>, kind: BoxKind, data: LayoutData) -> Self {
        let (inline, visible) = match &data {
            LayoutData::Plain => (true, true),
            LayoutData::Styled { style } | LayoutData::StyledWithBoxModel { style, .. } => {
                (!matches!(kind, BoxKind::Block), style.visible)
            }
        };
        Self {
            node,
            kind,
            inline,
            visible,
            data,
            line_boxes: Vec::new(),
        }
    }

    /// A block box with fresh geometry.
    #[must_use]
    pub fn block(node: Option<NodeId>, style: Rc<ComputedStyle>) -> Self {
        Self::new(
            node,
            BoxKind::Block,
            LayoutData::StyledWithBoxModel {
                style,
                box_model: BoxDimensions::default(),
            },
        )
    }

    /// True if the node carries its own style snapshot.
    #[must_use]
    pub const fn has_style(&self) -> bool {
        !matches!(self.data, LayoutData::Plain)
    }

    /// True if the node carries box-model geometry.
    #[must_use]
    pub const fn has_box_model(&self) -> bool {
        matches!(self.data, LayoutData::StyledWithBoxModel { .. })
    }

    /// True for anonymous boxes.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.node.is_none()
    }

    /// True for block containers.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self.kind, BoxKind::Block)
    }

    /// The node's own style snapshot, without ancestor fallback.
    #[must_use]
    pub fn own_style(&self) -> Option<&Rc<ComputedStyle>> {
        match &self.data {
            LayoutData::Plain => None,
            LayoutData::Styled { style } | LayoutData::StyledWithBoxModel { style, .. } => {
                Some(style)
            }
        }
    }

    /// Box-model geometry, if the node has any.
    #[must_use]
    pub const fn box_model(&self) -> Option<&BoxDimensions> {
        match &self.data {
            LayoutData::StyledWithBoxModel { box_model, .. } => Some(box_model),
            _ => None,
        }
    }

    /// Mutable box-model geometry, if the node has any.
    pub fn box_model_mut(&mut self) -> Option<&mut BoxDimensions> {
        match &mut self.data {
            LayoutData::StyledWithBoxModel { box_model, .. } => Some(box_model),
            _ => None,
        }
    }

    /// The text of a text run.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BoxKind::Text(text) => Some(text),
            _ => None,
        }
    }
}
