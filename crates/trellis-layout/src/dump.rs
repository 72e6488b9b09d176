//! Text dump of a laid-out box tree, for debugging and golden tests.
//!
//! ```text
//! LayoutBlock #document at (0,0) size 800x20
//!   LayoutBlock <body> at (0,0) size 800x20
//!     line 0 at (0,0) size 60x19.2
//!       "hello" at (0,0) size 30x19.2
//!     LayoutText #text
//! ```

use std::fmt::Write;

use trellis_dom::{Document, Node};

use crate::box_model::{BoxDimensions, Rect};
use crate::box_tree::BoxTree;
use crate::layout_node::{BoxKind, LayoutId};

/// Render `tree` as an indented outline: one line per box with its class,
/// its tag (or `(anonymous)`) and its border box, followed by the line
/// boxes of every block in an inline formatting context.
#[must_use]
pub fn dump_tree(tree: &BoxTree, document: &Document) -> String {
    let mut out = String::new();
    dump_node(tree, document, tree.root(), 0, &mut out);
    out
}

fn dump_node(tree: &BoxTree, document: &Document, id: LayoutId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);

    let name = match node.node {
        None => "(anonymous)".to_string(),
        Some(dom) if document.get(dom).is_some_and(Node::is_element) => {
            format!("<{}>", document.tag_name(dom))
        }
        Some(dom) => document.tag_name(dom).to_string(),
    };

    let _ = write!(out, "{indent}{} {name}", node.kind.class_name());
    if let Some(rect) = node.box_model().map(BoxDimensions::border_box) {
        let _ = write!(out, " {}", format_rect(rect));
    }
    if !node.visible {
        out.push_str(" hidden");
    }
    let _ = writeln!(out);

    for (index, line) in node.line_boxes.iter().enumerate() {
        let _ = writeln!(out, "{indent}  line {index} {}", format_rect(line.bounds));
        for fragment in &line.fragments {
            let label = match tree.get(fragment.layout_node).map(|n| &n.kind) {
                Some(BoxKind::LineBreak) => "<br>".to_string(),
                _ => format!("{:?}", tree.fragment_text(fragment)),
            };
            let _ = writeln!(out, "{indent}    {label} {}", format_rect(fragment.bounds));
        }
    }

    for &child in tree.children(id) {
        dump_node(tree, document, child, depth + 1, out);
    }
}

fn format_rect(rect: Rect) -> String {
    format!("at ({},{}) size {}x{}", rect.x, rect.y, rect.width, rect.height)
}
