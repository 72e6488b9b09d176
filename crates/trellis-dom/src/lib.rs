//! Document model for the Trellis layout engine.
//!
//! This crate provides:
//! - [`Tree`], the arena tree shared by the document and the box tree
//! - [`Document`], the node tree with structural validation, the `id`
//!   index, hover state and style invalidation
//! - checked downcasts ([`is`], [`to`], [`to_checked`]) over node variants
//!
//! [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)

pub mod document;
pub mod error;
pub mod node;
pub mod tree;
pub mod variant;

pub use document::Document;
pub use error::DomError;
pub use node::{
    AttributesMap, DoctypeData, ElementData, LayoutHandle, Node, NodeId, NodeKind, NodeType,
    StyleState,
};
pub use tree::{Ancestors, Descendants, Tree, TreeError, TreeIndex, TreeNode};
pub use variant::{
    Comment, DocumentNode, DocumentType, Element, NodeVariant, ParentNode, Text, is, to,
    to_checked,
};
