//! JSON document descriptions.
//!
//! ```json
//! {
//!   "doctype": "html",
//!   "root": {
//!     "tag": "html",
//!     "children": [
//!       { "tag": "body", "style": { "padding": 8 }, "children": [
//!         { "text": "Hello, " },
//!         { "tag": "a", "attrs": { "href": "/" }, "hover": { "color": "red" },
//!           "children": [{ "text": "world" }] }
//!       ] }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use trellis_dom::{Document, ElementData, NodeId};
use trellis_layout::{StyleDeclarations, StyleMap};

/// A whole document: an optional doctype and the document element.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSpec {
    /// Name of the doctype node, if any.
    #[serde(default)]
    pub doctype: Option<String>,
    /// The document element.
    pub root: ElementSpec,
}

/// One child node.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// A text node.
    Text {
        /// Its data.
        text: String,
    },
    /// A comment node.
    Comment {
        /// Its data.
        comment: String,
    },
    /// An element.
    Element(ElementSpec),
}

/// An element with its attributes, declarations and children.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    /// Local name.
    pub tag: String,
    /// Attributes, e.g. `id` or `href`.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Declarations that always apply.
    #[serde(default)]
    pub style: Option<StyleDeclarations>,
    /// Declarations that apply while the element matches `:hover`.
    #[serde(default)]
    pub hover: Option<StyleDeclarations>,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl DocumentSpec {
    /// Parse a description from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid document description")
    }

    /// Build the document and the style map holding its declarations.
    pub fn build(&self) -> Result<(Document, StyleMap)> {
        let mut document = Document::new();
        let mut styles = StyleMap::new();

        if let Some(name) = &self.doctype {
            let doctype = document.create_doctype(name);
            document
                .append_child(document.root(), doctype)
                .context("cannot insert doctype")?;
        }
        let root = document.root();
        build_element(&mut document, &mut styles, root, &self.root)?;
        Ok((document, styles))
    }
}

fn build_element(
    document: &mut Document,
    styles: &mut StyleMap,
    parent: NodeId,
    spec: &ElementSpec,
) -> Result<NodeId> {
    let data = spec
        .attrs
        .iter()
        .fold(ElementData::new(&spec.tag), |data, (name, value)| data.with_attr(name, value));
    let element = document.create_element_with(data);
    document
        .append_child(parent, element)
        .with_context(|| format!("cannot insert <{}>", spec.tag))?;

    if let Some(style) = &spec.style {
        let _ = styles.set(element, style.clone());
    }
    if let Some(hover) = &spec.hover {
        let _ = styles.set_hover(element, hover.clone());
    }

    for child in &spec.children {
        match child {
            NodeSpec::Text { text } => {
                let node = document.create_text(text);
                document
                    .append_child(element, node)
                    .with_context(|| format!("cannot insert text into <{}>", spec.tag))?;
            }
            NodeSpec::Comment { comment } => {
                let node = document.create_comment(comment);
                document
                    .append_child(element, node)
                    .with_context(|| format!("cannot insert comment into <{}>", spec.tag))?;
            }
            NodeSpec::Element(child) => {
                let _ = build_element(document, styles, element, child)?;
            }
        }
    }
    Ok(element)
}
