//! Integration tests for box tree construction and flow layout.

use trellis_dom::{Document, NodeId};
use trellis_layout::{
    AutoOr, BoxKind, BoxTree, Frame, LayoutId, Rect, StyleDeclarations, StyleMap, dump_tree,
};

/// Build `<html><body></body></html>` and return (doc, body).
fn skeleton() -> (Document, NodeId) {
    let mut doc = Document::new();
    let html = doc.create_element("html");
    let body = doc.create_element("body");
    doc.append_child(NodeId::ROOT, html).unwrap();
    doc.append_child(html, body).unwrap();
    (doc, body)
}

fn append_element(doc: &mut Document, parent: NodeId, tag: &str) -> NodeId {
    let id = doc.create_element(tag);
    doc.append_child(parent, id).unwrap();
    id
}

fn append_text(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
    let id = doc.create_text(text);
    doc.append_child(parent, id).unwrap();
    id
}

fn laid_out(doc: Document, styles: StyleMap, width: f32) -> Frame<StyleMap> {
    let mut frame = Frame::new(doc, styles, width, 600.0);
    frame.layout();
    frame
}

fn box_of(frame: &Frame<StyleMap>, node: NodeId) -> LayoutId {
    frame.layout_node_for(node).expect("node should have a box")
}

fn border_box(frame: &Frame<StyleMap>, node: NodeId) -> Rect {
    frame
        .box_tree()
        .and_then(|tree| tree.get(box_of(frame, node)))
        .and_then(|n| n.box_model())
        .map(|b| b.border_box())
        .expect("node should have a box model")
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

// ---------------------------------------------------------------------------
// Block layout
//
// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
// ---------------------------------------------------------------------------

#[test]
fn test_block_heights_stack() {
    let (mut doc, body) = skeleton();
    let mut styles = StyleMap::new();
    for height in [10.0, 20.0, 30.0] {
        let div = append_element(&mut doc, body, "div");
        let _ = styles.set(div, StyleDeclarations::new().height(height));
    }

    let frame = laid_out(doc, styles, 800.0);
    let body_box = border_box(&frame, body);
    assert_close(body_box.height, 60.0);
    assert_close(body_box.width, 800.0);
}

#[test]
fn test_blocks_stack_in_document_order() {
    let (mut doc, body) = skeleton();
    let mut styles = StyleMap::new();
    let first = append_element(&mut doc, body, "div");
    let second = append_element(&mut doc, body, "div");
    let _ = styles.set(first, StyleDeclarations::new().height(10.0));
    let _ = styles.set(second, StyleDeclarations::new().height(20.0));

    let frame = laid_out(doc, styles, 800.0);
    assert_close(border_box(&frame, first).y, 0.0);
    assert_close(border_box(&frame, second).y, 10.0);
}

#[test]
fn test_sibling_margins_collapse_to_larger() {
    // [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    let (mut doc, body) = skeleton();
    let mut styles = StyleMap::new();
    let a = append_element(&mut doc, body, "div");
    let b = append_element(&mut doc, body, "div");
    let _ = styles.set(a, StyleDeclarations::new().margin(10.0).height(10.0));
    let _ = styles.set(b, StyleDeclarations::new().margin(20.0).height(10.0));

    let frame = laid_out(doc, styles, 800.0);
    let gap = border_box(&frame, b).y - border_box(&frame, a).bottom();
    assert_close(gap, 20.0);
}

#[test]
fn test_padding_and_border_grow_border_box() {
    let (mut doc, body) = skeleton();
    let mut styles = StyleMap::new();
    let div = append_element(&mut doc, body, "div");
    let _ = styles.set(
        div,
        StyleDeclarations::new().padding(5.0).border_width(2.0).height(10.0),
    );

    let frame = laid_out(doc, styles, 800.0);
    let div_box = border_box(&frame, div);
    assert_close(div_box.width, 800.0);
    assert_close(div_box.height, 24.0);
    assert_close(border_box(&frame, body).height, 24.0);
}

#[test]
fn test_auto_margins_center_fixed_width_block() {
    // [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    let (mut doc, body) = skeleton();
    let mut styles = StyleMap::new();
    let div = append_element(&mut doc, body, "div");
    let _ = styles.set(div, StyleDeclarations::new().width(200.0).margin_auto());

    let frame = laid_out(doc, styles, 800.0);
    let div_box = border_box(&frame, div);
    assert_close(div_box.x, 300.0);
    assert_close(div_box.width, 200.0);
}

#[test]
fn test_overconstrained_auto_margins_become_zero() {
    let (mut doc, body) = skeleton();
    let mut styles = StyleMap::new();
    let div = append_element(&mut doc, body, "div");
    let _ = styles.set(div, StyleDeclarations::new().width(1000.0).margin_auto());

    let frame = laid_out(doc, styles, 800.0);
    assert_close(border_box(&frame, div).x, 0.0);
}

#[test]
fn test_explicit_height_wins_over_content() {
    let (mut doc, body) = skeleton();
    let mut styles = StyleMap::new();
    let outer = append_element(&mut doc, body, "div");
    let inner = append_element(&mut doc, outer, "div");
    let _ = styles.set(outer, StyleDeclarations::new().height(5.0));
    let _ = styles.set(inner, StyleDeclarations::new().height(50.0));

    let frame = laid_out(doc, styles, 800.0);
    assert_close(border_box(&frame, outer).height, 5.0);
    assert_close(border_box(&frame, inner).height, 50.0);
}

// ---------------------------------------------------------------------------
// Box tree construction
//
// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
// ---------------------------------------------------------------------------

#[test]
fn test_inline_run_wrapped_in_anonymous_block() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "a");
    let span = append_element(&mut doc, body, "span");
    let _ = append_text(&mut doc, span, "b");
    let div = append_element(&mut doc, body, "div");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let tree = frame.box_tree().unwrap();
    let children = tree.children(box_of(&frame, body));

    assert_eq!(children.len(), 2);
    let anonymous = tree.get(children[0]).unwrap();
    assert!(anonymous.is_anonymous());
    assert!(anonymous.is_block());
    assert_eq!(tree.children(children[0]).len(), 2);
    assert_eq!(children[1], box_of(&frame, div));
}

#[test]
fn test_whitespace_only_run_between_blocks_dropped() {
    let (mut doc, body) = skeleton();
    let _ = append_element(&mut doc, body, "div");
    let whitespace = append_text(&mut doc, body, "\n    ");
    let _ = append_element(&mut doc, body, "div");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let tree = frame.box_tree().unwrap();
    assert_eq!(tree.children(box_of(&frame, body)).len(), 2);
    assert_eq!(frame.layout_node_for(whitespace), None);
}

#[test]
fn test_children_homogeneous_after_build() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "lead");
    let div = append_element(&mut doc, body, "div");
    let _ = append_text(&mut doc, div, "inside");
    let p = append_element(&mut doc, div, "p");
    let _ = append_text(&mut doc, p, "para");
    let _ = append_element(&mut doc, body, "em");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let tree = frame.box_tree().unwrap();
    for (id, node) in tree.tree().iter() {
        if !node.is_block() {
            continue;
        }
        let kinds: Vec<bool> = tree
            .children(id)
            .iter()
            .map(|&c| tree.get(c).unwrap().inline)
            .collect();
        assert!(
            kinds.iter().all(|&inline| inline) || kinds.iter().all(|&inline| !inline),
            "mixed children under {id:?}"
        );
    }
}

#[test]
fn test_display_none_generates_no_box() {
    let mut doc = Document::new();
    let html = append_element(&mut doc, NodeId::ROOT, "html");
    let head = append_element(&mut doc, html, "head");
    let title = append_element(&mut doc, head, "title");
    let body = append_element(&mut doc, html, "body");
    let mut styles = StyleMap::new();
    let hidden = append_element(&mut doc, body, "div");
    let _ = styles.set(hidden, StyleDeclarations::new().display("none"));

    let frame = laid_out(doc, styles, 800.0);
    assert_eq!(frame.layout_node_for(head), None);
    assert_eq!(frame.layout_node_for(title), None);
    assert_eq!(frame.layout_node_for(hidden), None);
    assert!(frame.layout_node_for(body).is_some());
}

#[test]
fn test_block_inside_inline_is_demoted() {
    let (mut doc, body) = skeleton();
    let span = append_element(&mut doc, body, "span");
    let div = append_element(&mut doc, span, "div");
    let _ = append_text(&mut doc, div, "nested");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let tree = frame.box_tree().unwrap();
    let div_box = tree.get(box_of(&frame, div)).unwrap();
    assert_eq!(div_box.kind, BoxKind::Inline);
    assert!(div_box.inline);
    assert!(tree.children_are_inline(box_of(&frame, body)));
}

#[test]
fn test_comments_generate_no_box() {
    let (mut doc, body) = skeleton();
    let comment = doc.create_comment("note");
    doc.append_child(body, comment).unwrap();

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    assert_eq!(frame.layout_node_for(comment), None);
}

#[test]
fn test_text_shares_parent_style() {
    let (mut doc, body) = skeleton();
    let span = append_element(&mut doc, body, "span");
    let text = append_text(&mut doc, span, "styled");
    let mut styles = StyleMap::new();
    let _ = styles.set(span, StyleDeclarations::new().font_size(30.0));

    let frame = laid_out(doc, styles, 800.0);
    let tree = frame.box_tree().unwrap();
    let span_style = tree.get(box_of(&frame, span)).unwrap().own_style().unwrap();
    let text_style = tree.get(box_of(&frame, text)).unwrap().own_style().unwrap();
    assert!(std::rc::Rc::ptr_eq(span_style, text_style));
}

#[test]
fn test_build_links_handles_for_generation() {
    let (mut doc, body) = skeleton();
    let text = append_text(&mut doc, body, "x");
    let tree = BoxTree::build(&mut doc, &StyleMap::new(), 7);

    let handle = doc.layout_node(text).unwrap();
    assert_eq!(handle.generation(), 7);
    let id = tree.resolve(handle).unwrap();
    assert_eq!(tree.get(id).unwrap().node, Some(text));
}

// ---------------------------------------------------------------------------
// Inline layout
//
// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
// ---------------------------------------------------------------------------

#[test]
fn test_inline_height_is_sum_of_line_heights() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "hello world");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let tree = frame.box_tree().unwrap();
    let body_node = tree.get(box_of(&frame, body)).unwrap();
    assert_eq!(body_node.line_boxes.len(), 1);
    // 16px font: 1.2 × 16 line height.
    assert_close(border_box(&frame, body).height, 19.2);
}

#[test]
fn test_long_text_wraps_within_width() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "aaaa bbbb cccc");
    let mut styles = StyleMap::new();
    let _ = styles.set(body, StyleDeclarations::new().font_size(10.0));

    // Words are 24px, spaces 6px: "aaaa bbbb" fits in 60, "cccc" does not.
    let frame = laid_out(doc, styles, 60.0);
    let tree = frame.box_tree().unwrap();
    let lines = &tree.get(box_of(&frame, body)).unwrap().line_boxes;

    assert_eq!(lines.len(), 2);
    for line in lines {
        for fragment in &line.fragments {
            assert!(fragment.bounds.right() <= 60.0 + 1e-3);
        }
    }
    assert_eq!(tree.fragment_text(&lines[0].fragments[0]), "aaaa bbbb");
    assert_eq!(tree.fragment_text(&lines[1].fragments[0]), "cccc");
    assert_close(border_box(&frame, body).height, 24.0);
}

#[test]
fn test_line_break_starts_new_line() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "a");
    let _ = append_element(&mut doc, body, "br");
    let _ = append_text(&mut doc, body, "b");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let tree = frame.box_tree().unwrap();
    let lines = &tree.get(box_of(&frame, body)).unwrap().line_boxes;
    assert_eq!(lines.len(), 2);
    assert!(lines[1].bounds.y > lines[0].bounds.y);
}

#[test]
fn test_consecutive_line_breaks_leave_empty_line() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "a");
    let _ = append_element(&mut doc, body, "br");
    let _ = append_element(&mut doc, body, "br");
    let _ = append_text(&mut doc, body, "b");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let tree = frame.box_tree().unwrap();
    let lines = &tree.get(box_of(&frame, body)).unwrap().line_boxes;
    assert_eq!(lines.len(), 3);
    assert_close(border_box(&frame, body).height, 3.0 * 19.2);
}

#[test]
fn test_inline_element_padding_advances_text() {
    let (mut doc, body) = skeleton();
    let span = append_element(&mut doc, body, "span");
    let text = append_text(&mut doc, span, "x");
    let mut styles = StyleMap::new();
    let _ = styles.set(span, StyleDeclarations::new().padding(8.0));

    let frame = laid_out(doc, styles, 800.0);
    let tree = frame.box_tree().unwrap();
    let lines = &tree.get(box_of(&frame, body)).unwrap().line_boxes;
    let fragment = &lines[0].fragments[0];
    assert_eq!(fragment.layout_node, box_of(&frame, text));
    assert_close(fragment.bounds.x, 8.0);

    // The span's border box wraps its fragment plus padding.
    let span_box = border_box(&frame, span);
    assert_close(span_box.x, 0.0);
    assert_close(span_box.width, 8.0 + 9.6 + 8.0);
}

#[test]
fn test_inline_element_padding_wraps_with_its_text() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "aaaa ");
    let span = append_element(&mut doc, body, "span");
    let text = append_text(&mut doc, span, "bbbb");
    let mut styles = StyleMap::new();
    let _ = styles.set(body, StyleDeclarations::new().font_size(10.0));
    let _ = styles.set(span, StyleDeclarations::new().padding(8.0));

    // "aaaa" is 24px; the span's left padding plus "bbbb" (8 + 6 + 24) overflow 40.
    let frame = laid_out(doc, styles, 40.0);
    let tree = frame.box_tree().unwrap();
    let lines = &tree.get(box_of(&frame, body)).unwrap().line_boxes;
    assert_eq!(lines.len(), 2);
    assert_close(lines[0].bounds.width, 24.0);

    let fragment = &lines[1].fragments[0];
    assert_eq!(fragment.layout_node, box_of(&frame, text));
    assert_close(fragment.bounds.x, 8.0);

    let span_box = border_box(&frame, span);
    assert_close(span_box.x, 0.0);
    assert_close(span_box.width, 8.0 + 24.0 + 8.0);
}

// ---------------------------------------------------------------------------
// Dump
// ---------------------------------------------------------------------------

#[test]
fn test_dump_tree_outline() {
    let (mut doc, body) = skeleton();
    let _ = append_text(&mut doc, body, "hi");
    let _ = append_element(&mut doc, body, "div");

    let frame = laid_out(doc, StyleMap::new(), 800.0);
    let dump = dump_tree(frame.box_tree().unwrap(), frame.document());

    assert!(dump.starts_with("LayoutBlock #document at (0,0) size 800x"));
    assert!(dump.contains("  LayoutBlock <html>"));
    assert!(dump.contains("LayoutBlock (anonymous)"));
    assert!(dump.contains("LayoutText #text"));
    assert!(dump.contains("\"hi\""));
}

#[test]
fn test_style_declarations_from_json() {
    let json = r##"{
        "display": "block",
        "margin": "auto",
        "padding-left": 4,
        "background-color": "#ff0000",
        "color": "navy",
        "visibility": "hidden"
    }"##;
    let decls: StyleDeclarations = serde_json::from_str(json).unwrap();

    assert_eq!(decls.display.as_deref(), Some("block"));
    assert_eq!(decls.margin, Some(AutoOr::Auto));
    assert_eq!(decls.padding_left, Some(4.0));
    assert_eq!(decls.background_color.map(|c| c.to_hex_string()), Some("#ff0000".to_string()));
    assert!(decls.color.is_some());

    assert!(serde_json::from_str::<StyleDeclarations>(r#"{"float": "left"}"#).is_err());
}
