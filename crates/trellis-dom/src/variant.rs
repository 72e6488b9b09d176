//! Checked downcasts over document node variants.
//!
//! Each marker type below names one capability of a [`Node`]. [`is`] tests
//! for it, [`to`] converts to the variant's payload and returns `None` on a
//! mismatch. [`to_checked`] is the asserting form for call sites that have
//! already tested the node: converting to the wrong variant is a programmer
//! error and panics instead of reinterpreting the node.
//!
//! ```
//! use trellis_dom::{Element, ElementData, Node, NodeType, Text, is, to};
//!
//! let node = Node::new(NodeType::Element(ElementData::new("div")));
//! assert!(is::<Element>(Some(&node)));
//! assert!(!is::<Text>(Some(&node)));
//! assert_eq!(to::<Element>(&node).map(|e| e.tag_name.as_str()), Some("div"));
//! ```

use crate::node::{DoctypeData, ElementData, Node, NodeType};

/// A node capability that can be tested for and converted to.
pub trait NodeVariant {
    /// What a successful conversion yields.
    type Data: ?Sized;

    /// Human-readable name used in contract-violation panics.
    const NAME: &'static str;

    /// Convert `node` if it has this capability.
    fn downcast(node: &Node) -> Option<&Self::Data>;
}

/// Element nodes; converts to [`ElementData`].
#[derive(Debug)]
pub enum Element {}

/// Text nodes; converts to the text data.
#[derive(Debug)]
pub enum Text {}

/// Comment nodes; converts to the comment data.
#[derive(Debug)]
pub enum Comment {}

/// Doctype nodes; converts to [`DoctypeData`].
#[derive(Debug)]
pub enum DocumentType {}

/// The document node; converts to the node itself.
#[derive(Debug)]
pub enum DocumentNode {}

/// Nodes that may have children (elements and the document); converts to
/// the node itself.
#[derive(Debug)]
pub enum ParentNode {}

impl NodeVariant for Element {
    type Data = ElementData;
    const NAME: &'static str = "Element";

    fn downcast(node: &Node) -> Option<&ElementData> {
        node.as_element()
    }
}

impl NodeVariant for Text {
    type Data = str;
    const NAME: &'static str = "Text";

    fn downcast(node: &Node) -> Option<&str> {
        node.as_text()
    }
}

impl NodeVariant for Comment {
    type Data = str;
    const NAME: &'static str = "Comment";

    fn downcast(node: &Node) -> Option<&str> {
        match &node.node_type {
            NodeType::Comment(data) => Some(data),
            _ => None,
        }
    }
}

impl NodeVariant for DocumentType {
    type Data = DoctypeData;
    const NAME: &'static str = "DocumentType";

    fn downcast(node: &Node) -> Option<&DoctypeData> {
        match &node.node_type {
            NodeType::DocumentType(data) => Some(data),
            _ => None,
        }
    }
}

impl NodeVariant for DocumentNode {
    type Data = Node;
    const NAME: &'static str = "Document";

    fn downcast(node: &Node) -> Option<&Node> {
        node.is_document().then_some(node)
    }
}

impl NodeVariant for ParentNode {
    type Data = Node;
    const NAME: &'static str = "ParentNode";

    fn downcast(node: &Node) -> Option<&Node> {
        node.is_parent_node().then_some(node)
    }
}

/// Capability test. A missing node never has any capability.
#[must_use]
pub fn is<V: NodeVariant>(node: Option<&Node>) -> bool {
    node.and_then(V::downcast).is_some()
}

/// Safe conversion: `None` if `node` lacks the capability.
#[must_use]
pub fn to<V: NodeVariant>(node: &Node) -> Option<&V::Data> {
    V::downcast(node)
}

/// Asserting conversion for call sites that already checked [`is`].
///
/// # Panics
///
/// Panics if `node` does not have capability `V`. This is a contract
/// violation, never a recoverable condition.
#[must_use]
pub fn to_checked<V: NodeVariant>(node: &Node) -> &V::Data {
    match V::downcast(node) {
        Some(data) => data,
        None => panic!(
            "invalid downcast: expected {} node, found {} node",
            V::NAME,
            node.kind()
        ),
    }
}
