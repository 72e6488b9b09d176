//! Document node types.
//!
//! [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)

use std::collections::{HashMap, HashSet};

use strum_macros::{Display, IntoStaticStr};

use crate::tree::TreeIndex;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the document tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// Every node lives in exactly one [`Document`](crate::Document) arena, so
/// a `NodeId` doubles as the back-reference to its owning document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl TreeIndex for NodeId {
    fn from_index(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// Cached, generation-checked reference from a document node to its
/// current box-tree counterpart.
///
/// The box tree stamps every build with a new generation. A handle from an
/// older generation never resolves, so a stale cache can be detected
/// instead of silently pointing at a discarded layout node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutHandle {
    generation: u32,
    index: usize,
}

impl LayoutHandle {
    /// Create a handle for slot `index` of the box tree built in `generation`.
    #[must_use]
    pub const fn new(generation: u32, index: usize) -> Self {
        Self { generation, index }
    }

    /// The box-tree generation this handle belongs to.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// The box-tree slot this handle points at.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Per-node dirty state driving the pull-based layout pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum StyleState {
    /// Style and geometry are up to date.
    #[default]
    Clean,
    /// Geometry must be recomputed, the resolved style is still valid.
    LayoutDirty,
    /// Style must be re-resolved and the box tree rebuilt.
    StyleDirty,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#dom-node-nodetype)
///
/// The bare type discriminant of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum NodeKind {
    /// `ELEMENT_NODE`
    #[strum(serialize = "element")]
    Element,
    /// `TEXT_NODE`
    #[strum(serialize = "text")]
    Text,
    /// `COMMENT_NODE`
    #[strum(serialize = "comment")]
    Comment,
    /// `DOCUMENT_NODE`
    #[strum(serialize = "document")]
    Document,
    /// `DOCUMENT_TYPE_NODE`
    #[strum(serialize = "doctype")]
    DocumentType,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType(DoctypeData),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// "Text nodes are known as text."
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// "Comment nodes are known as comments."
    Comment(String),
}

impl NodeType {
    /// The discriminant of this node type.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Document => NodeKind::Document,
            Self::DocumentType(_) => NodeKind::DocumentType,
            Self::Element(_) => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Comment(_) => NodeKind::Comment,
        }
    }
}

/// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
///
/// "Doctypes have an associated name, public ID, and system ID."
///
/// Only the name is kept; the layout engine never looks at the IDs.
#[derive(Debug, Clone, Default)]
pub struct DoctypeData {
    /// The doctype name, e.g. `html`.
    pub name: String,
}

/// Element-specific data.
///
/// NOTE: We only store `tag_name` (local name) and attrs. Namespaces and
/// custom element state play no part in layout.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with the given local name and no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: AttributesMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        let _ = self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// The value of an attribute, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Returns the set of class names from the class attribute.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attr("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// A document node: its variant payload plus the bookkeeping the layout
/// pipeline hangs off it.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,
    style_state: StyleState,
    layout_node: Option<LayoutHandle>,
}

impl Node {
    /// Create a node of the given type with clean style and no layout node.
    #[must_use]
    pub const fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            style_state: StyleState::Clean,
            layout_node: None,
        }
    }

    /// The node's type discriminant.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.node_type.kind()
    }

    /// True for element nodes.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element(_))
    }

    /// True for text nodes.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.node_type, NodeType::Text(_))
    }

    /// True for comment nodes.
    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self.node_type, NodeType::Comment(_))
    }

    /// True for the document node.
    #[must_use]
    pub const fn is_document(&self) -> bool {
        matches!(self.node_type, NodeType::Document)
    }

    /// True for doctype nodes.
    #[must_use]
    pub const fn is_document_type(&self) -> bool {
        matches!(self.node_type, NodeType::DocumentType(_))
    }

    /// [§ 4.10 Interface CharacterData](https://dom.spec.whatwg.org/#interface-characterdata)
    ///
    /// Text and comments carry character data.
    #[must_use]
    pub const fn is_character_data(&self) -> bool {
        self.is_text() || self.is_comment()
    }

    /// [§ 4.2.6 Mixin ParentNode](https://dom.spec.whatwg.org/#interface-parentnode)
    ///
    /// Elements and documents may have children.
    #[must_use]
    pub const fn is_parent_node(&self) -> bool {
        self.is_element() || self.is_document()
    }

    /// Element data if this node is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Text data if this node is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The node's current dirty state.
    #[must_use]
    pub const fn style_state(&self) -> StyleState {
        self.style_state
    }

    pub(crate) const fn set_style_state(&mut self, state: StyleState) {
        self.style_state = state;
    }

    /// The cached handle to this node's box-tree counterpart.
    ///
    /// Only meaningful when resolved against the box tree of the same
    /// generation.
    #[must_use]
    pub const fn layout_node(&self) -> Option<LayoutHandle> {
        self.layout_node
    }

    pub(crate) const fn set_layout_node(&mut self, handle: Option<LayoutHandle>) {
        self.layout_node = handle;
    }
}
