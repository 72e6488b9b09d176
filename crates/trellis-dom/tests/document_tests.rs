//! Tests for document structure, validation, id lookup and invalidation.

use trellis_dom::{
    DomError, Element, ElementData, LayoutHandle, NodeId, NodeKind, StyleState, Text, TreeError,
    is, to, to_checked,
};
use trellis_dom::{Document, DocumentType};

/// Build `<!DOCTYPE html><html><body></body></html>` and return (doc, html, body).
fn skeleton() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let doctype = doc.create_doctype("html");
    let html = doc.create_element("html");
    let body = doc.create_element("body");
    doc.append_child(NodeId::ROOT, doctype).unwrap();
    doc.append_child(NodeId::ROOT, html).unwrap();
    doc.append_child(html, body).unwrap();
    (doc, html, body)
}

// ========== structure ==========

#[test]
fn test_document_element_and_body() {
    let (doc, html, body) = skeleton();
    assert_eq!(doc.document_element(), Some(html));
    assert_eq!(doc.body(), Some(body));
    assert!(doc.is_connected(body));
}

#[test]
fn test_tag_name_per_variant() {
    let (mut doc, _, body) = skeleton();
    let text = doc.create_text("hi");
    let comment = doc.create_comment("note");
    doc.append_child(body, text).unwrap();
    doc.append_child(body, comment).unwrap();

    assert_eq!(doc.tag_name(NodeId::ROOT), "#document");
    assert_eq!(doc.tag_name(body), "body");
    assert_eq!(doc.tag_name(text), "#text");
    assert_eq!(doc.tag_name(comment), "#comment");
    assert_eq!(doc.tag_name(doc.first_child(NodeId::ROOT).unwrap()), "#doctype");
}

#[test]
fn test_tag_name_is_lowercased() {
    let mut doc = Document::new();
    let div = doc.create_element("DIV");
    assert_eq!(doc.tag_name(div), "div");
}

#[test]
fn test_text_content_concatenates_descendants() {
    let (mut doc, _, body) = skeleton();
    let p = doc.create_element("p");
    let a = doc.create_text("Hello, ");
    let b = doc.create_element("b");
    let c = doc.create_text("world");
    let note = doc.create_comment("ignored");
    doc.append_child(body, p).unwrap();
    doc.append_child(p, a).unwrap();
    doc.append_child(p, b).unwrap();
    doc.append_child(b, c).unwrap();
    doc.append_child(p, note).unwrap();

    assert_eq!(doc.text_content(p), "Hello, world");
    assert_eq!(doc.text_content(c), "world");
    assert_eq!(doc.text_content(note), "ignored");
}

#[test]
fn test_element_siblings_skip_text() {
    let (mut doc, _, body) = skeleton();
    let a = doc.create_element("div");
    let gap = doc.create_text(" ");
    let b = doc.create_element("div");
    doc.append_child(body, a).unwrap();
    doc.append_child(body, gap).unwrap();
    doc.append_child(body, b).unwrap();

    assert_eq!(doc.next_element_sibling(a), Some(b));
    assert_eq!(doc.previous_element_sibling(b), Some(a));
    assert_eq!(doc.next_element_sibling(b), None);
    assert_eq!(doc.previous_element_sibling(a), None);
}

#[test]
fn test_first_child_and_ancestor_of_type() {
    let (mut doc, html, body) = skeleton();
    let text = doc.create_text("x");
    doc.append_child(body, text).unwrap();

    assert_eq!(doc.first_child_of::<Element>(NodeId::ROOT), Some(html));
    assert!(doc.first_child_of::<DocumentType>(NodeId::ROOT).is_some());
    assert_eq!(doc.first_child_of::<Text>(body), Some(text));
    assert_eq!(doc.first_ancestor_of::<Element>(text), Some(body));
}

// ========== validation ==========

#[test]
fn test_document_accepts_one_element_only() {
    let (mut doc, _, _) = skeleton();
    let second = doc.create_element("html");
    let err = doc.append_child(NodeId::ROOT, second).unwrap_err();
    assert_eq!(
        err,
        DomError::HierarchyRequest {
            parent: NodeId::ROOT,
            parent_kind: NodeKind::Document,
            child: second,
            child_kind: NodeKind::Element,
        }
    );
    assert_eq!(doc.parent(second), None);
}

#[test]
fn test_document_rejects_text_and_second_doctype() {
    let (mut doc, _, _) = skeleton();
    let text = doc.create_text("stray");
    let doctype = doc.create_doctype("html");
    assert!(!doc.is_child_allowed(NodeId::ROOT, text));
    assert!(!doc.is_child_allowed(NodeId::ROOT, doctype));
    assert!(doc.append_child(NodeId::ROOT, text).is_err());
}

#[test]
fn test_document_accepts_comments() {
    let (mut doc, _, _) = skeleton();
    let comment = doc.create_comment("trailer");
    doc.append_child(NodeId::ROOT, comment).unwrap();
    assert_eq!(doc.last_child(NodeId::ROOT), Some(comment));
}

#[test]
fn test_character_data_takes_no_children() {
    let (mut doc, _, body) = skeleton();
    let text = doc.create_text("a");
    let span = doc.create_element("span");
    doc.append_child(body, text).unwrap();
    assert!(matches!(
        doc.append_child(text, span),
        Err(DomError::HierarchyRequest { .. })
    ));
}

#[test]
fn test_element_rejects_doctype() {
    let (mut doc, _, body) = skeleton();
    let doctype = doc.create_doctype("html");
    assert!(!doc.is_child_allowed(body, doctype));
}

#[test]
fn test_append_rejects_cycle() {
    let (mut doc, html, body) = skeleton();
    let err = doc.append_child(body, html).unwrap_err();
    assert_eq!(
        err,
        DomError::Tree(TreeError::WouldCycle {
            parent: body.0,
            child: html.0,
        })
    );
    assert_eq!(doc.parent(body), Some(html));
}

#[test]
fn test_remove_child_requires_parent() {
    let (mut doc, html, body) = skeleton();
    let div = doc.create_element("div");
    doc.append_child(body, div).unwrap();

    assert!(matches!(
        doc.remove_child(html, div),
        Err(DomError::Tree(TreeError::NotAChild { .. }))
    ));
    doc.remove_child(body, div).unwrap();
    assert_eq!(doc.parent(div), None);
    assert!(doc.children(body).is_empty());
}

#[test]
fn test_append_moves_node_between_parents() {
    let (mut doc, _, body) = skeleton();
    let a = doc.create_element("div");
    let b = doc.create_element("div");
    let child = doc.create_element("span");
    doc.append_child(body, a).unwrap();
    doc.append_child(body, b).unwrap();
    doc.append_child(a, child).unwrap();
    doc.append_child(b, child).unwrap();

    assert!(doc.children(a).is_empty());
    assert_eq!(doc.children(b), &[child]);
}

// ========== id index ==========

#[test]
fn test_get_element_by_id_tracks_connection() {
    let (mut doc, _, body) = skeleton();
    let div = doc.create_element_with(ElementData::new("div").with_attr("id", "main"));

    // Detached elements are not indexed.
    assert_eq!(doc.get_element_by_id("main"), None);

    doc.append_child(body, div).unwrap();
    assert_eq!(doc.get_element_by_id("main"), Some(div));

    doc.remove_child(body, div).unwrap();
    assert_eq!(doc.get_element_by_id("main"), None);
}

#[test]
fn test_get_element_by_id_registers_subtree() {
    let (mut doc, _, body) = skeleton();
    let wrapper = doc.create_element("section");
    let inner = doc.create_element_with(ElementData::new("p").with_attr("id", "deep"));
    doc.append_child(wrapper, inner).unwrap();
    assert_eq!(doc.get_element_by_id("deep"), None);

    doc.append_child(body, wrapper).unwrap();
    assert_eq!(doc.get_element_by_id("deep"), Some(inner));
}

#[test]
fn test_get_element_by_id_first_in_tree_order_wins() {
    let (mut doc, _, body) = skeleton();
    let first = doc.create_element_with(ElementData::new("div").with_attr("id", "dup"));
    let second = doc.create_element_with(ElementData::new("div").with_attr("id", "dup"));
    doc.append_child(body, first).unwrap();
    doc.append_child(body, second).unwrap();
    assert_eq!(doc.get_element_by_id("dup"), Some(first));
}

#[test]
fn test_get_element_by_id_falls_back_after_duplicate_removed() {
    let (mut doc, _, body) = skeleton();
    let first = doc.create_element_with(ElementData::new("div").with_attr("id", "dup"));
    let second = doc.create_element_with(ElementData::new("div").with_attr("id", "dup"));
    doc.append_child(body, first).unwrap();
    doc.append_child(body, second).unwrap();

    doc.remove_child(body, first).unwrap();
    assert_eq!(doc.get_element_by_id("dup"), Some(second));

    doc.remove_child(body, second).unwrap();
    assert_eq!(doc.get_element_by_id("dup"), None);
}

#[test]
fn test_get_element_by_id_prefers_tree_order_over_insertion_order() {
    let (mut doc, _, body) = skeleton();
    let section_a = doc.create_element("div");
    let section_b = doc.create_element("div");
    doc.append_child(body, section_a).unwrap();
    doc.append_child(body, section_b).unwrap();

    let late = doc.create_element_with(ElementData::new("p").with_attr("id", "dup"));
    let early = doc.create_element_with(ElementData::new("p").with_attr("id", "dup"));
    doc.append_child(section_b, late).unwrap();
    doc.append_child(section_a, early).unwrap();
    assert_eq!(doc.get_element_by_id("dup"), Some(early));
}

#[test]
fn test_get_element_by_id_follows_moved_element() {
    let (mut doc, _, body) = skeleton();
    let section_a = doc.create_element("div");
    let section_b = doc.create_element("div");
    doc.append_child(body, section_a).unwrap();
    doc.append_child(body, section_b).unwrap();

    let first = doc.create_element_with(ElementData::new("p").with_attr("id", "dup"));
    let second = doc.create_element_with(ElementData::new("p").with_attr("id", "dup"));
    doc.append_child(section_a, first).unwrap();
    doc.append_child(section_b, second).unwrap();

    // Moving `first` after `second` hands the id over.
    doc.append_child(section_b, first).unwrap();
    assert_eq!(doc.get_element_by_id("dup"), Some(second));
}

// ========== links and hover ==========

#[test]
fn test_enclosing_link_element() {
    let (mut doc, _, body) = skeleton();
    let link = doc.create_element_with(ElementData::new("a").with_attr("href", "/next"));
    let em = doc.create_element("em");
    let text = doc.create_text("next page");
    let anchor = doc.create_element("a");
    doc.append_child(body, link).unwrap();
    doc.append_child(link, em).unwrap();
    doc.append_child(em, text).unwrap();
    doc.append_child(body, anchor).unwrap();

    assert_eq!(doc.enclosing_link_element(text), Some(link));
    assert_eq!(doc.enclosing_link_element(link), Some(link));
    // An <a> without href is not a link.
    assert_eq!(doc.enclosing_link_element(anchor), None);
}

#[test]
fn test_set_hovered_node_reports_change() {
    let (mut doc, _, body) = skeleton();
    doc.mark_clean();

    assert!(doc.set_hovered_node(Some(body)));
    assert_eq!(doc.hovered_node(), Some(body));
    assert!(doc.needs_style_update());

    doc.mark_clean();
    assert!(!doc.set_hovered_node(Some(body)));
    assert!(!doc.needs_style_update());
}

#[test]
fn test_removing_hovered_subtree_clears_hover() {
    let (mut doc, _, body) = skeleton();
    let div = doc.create_element("div");
    let span = doc.create_element("span");
    doc.append_child(body, div).unwrap();
    doc.append_child(div, span).unwrap();
    let _ = doc.set_hovered_node(Some(span));

    doc.remove_child(body, div).unwrap();
    assert_eq!(doc.hovered_node(), None);
}

// ========== invalidation ==========

#[test]
fn test_invalidate_style_marks_subtree() {
    let (mut doc, html, body) = skeleton();
    let p = doc.create_element("p");
    doc.append_child(body, p).unwrap();
    doc.mark_clean();
    assert!(!doc.needs_layout());

    doc.invalidate_style(body);
    assert!(doc.needs_style_update());
    assert!(doc.needs_layout());
    assert_eq!(doc.get(body).unwrap().style_state(), StyleState::StyleDirty);
    assert_eq!(doc.get(p).unwrap().style_state(), StyleState::StyleDirty);
    assert_eq!(doc.get(html).unwrap().style_state(), StyleState::Clean);
}

#[test]
fn test_invalidate_layout_keeps_style() {
    let (mut doc, _, _) = skeleton();
    doc.mark_clean();
    doc.invalidate_layout();
    assert!(doc.needs_layout());
    assert!(!doc.needs_style_update());
}

#[test]
fn test_mutation_flags_style_update() {
    let (mut doc, _, body) = skeleton();
    doc.mark_clean();
    let div = doc.create_element("div");
    doc.append_child(body, div).unwrap();
    assert!(doc.needs_style_update());
}

#[test]
fn test_layout_node_cache() {
    let (mut doc, _, body) = skeleton();
    let handle = LayoutHandle::new(3, 7);
    doc.set_layout_node(body, handle);
    assert_eq!(doc.layout_node(body), Some(handle));

    doc.clear_layout_nodes();
    assert_eq!(doc.layout_node(body), None);
}

// ========== downcasts ==========

#[test]
fn test_downcast_matches_variant() {
    let (mut doc, _, body) = skeleton();
    let text = doc.create_text("data");
    doc.append_child(body, text).unwrap();

    let node = doc.get(text).unwrap();
    assert!(is::<Text>(Some(node)));
    assert!(!is::<Element>(Some(node)));
    assert!(!is::<Element>(None));
    assert_eq!(to::<Text>(node), Some("data"));
    assert!(to::<Element>(node).is_none());
    assert_eq!(to_checked::<Element>(doc.get(body).unwrap()).tag_name, "body");
}

#[test]
#[should_panic(expected = "invalid downcast: expected Element node, found text node")]
fn test_to_checked_panics_on_mismatch() {
    let mut doc = Document::new();
    let text = doc.create_text("not an element");
    let _ = to_checked::<Element>(doc.get(text).unwrap());
}
