//! Tests for the arena tree: mutation, sibling links and traversal.

use trellis_dom::{Tree, TreeError, TreeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Id(usize);

impl TreeIndex for Id {
    fn from_index(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// root -> [a, b, c]
fn three_children() -> (Tree<Id, char>, Id, [Id; 3]) {
    let mut tree = Tree::new();
    let root = tree.alloc('r');
    let a = tree.alloc('a');
    let b = tree.alloc('b');
    let c = tree.alloc('c');
    tree.append_child(root, a).unwrap();
    tree.append_child(root, b).unwrap();
    tree.append_child(root, c).unwrap();
    (tree, root, [a, b, c])
}

// ========== remove_child ==========

#[test]
fn test_remove_child_first_of_three() {
    let (mut tree, root, [a, b, c]) = three_children();
    tree.remove_child(root, a).unwrap();

    assert_eq!(tree.children(root), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.parent(a), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let (mut tree, root, [a, b, c]) = three_children();
    tree.remove_child(root, b).unwrap();

    assert_eq!(tree.children(root), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_last_of_three() {
    let (mut tree, root, [a, b, c]) = three_children();
    tree.remove_child(root, c).unwrap();

    assert_eq!(tree.children(root), &[a, b]);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.last_child(root), Some(b));
}

#[test]
fn test_remove_child_wrong_parent() {
    let (mut tree, _, [a, b, _]) = three_children();
    assert_eq!(
        tree.remove_child(a, b),
        Err(TreeError::NotAChild { parent: 1, child: 2 })
    );
}

// ========== append_child ==========

#[test]
fn test_append_unknown_node() {
    let (mut tree, root, _) = three_children();
    assert_eq!(
        tree.append_child(root, Id(99)),
        Err(TreeError::UnknownNode(99))
    );
}

#[test]
fn test_append_self_is_cycle() {
    let (mut tree, _, [a, _, _]) = three_children();
    assert!(matches!(
        tree.append_child(a, a),
        Err(TreeError::WouldCycle { .. })
    ));
}

#[test]
fn test_append_reparents() {
    let (mut tree, root, [a, b, c]) = three_children();
    tree.append_child(a, c).unwrap();

    assert_eq!(tree.children(root), &[a, b]);
    assert_eq!(tree.children(a), &[c]);
    assert_eq!(tree.parent(c), Some(a));
    assert_eq!(tree.prev_sibling(c), None);
}

// ========== queries ==========

#[test]
fn test_first_child_matching() {
    let (tree, root, [_, b, _]) = three_children();
    assert_eq!(tree.first_child_matching(root, |_, &ch| ch == 'b'), Some(b));
    assert_eq!(tree.first_child_matching(root, |_, &ch| ch == 'z'), None);
}

#[test]
fn test_first_ancestor_matching_skips_self() {
    let (mut tree, root, [a, _, _]) = three_children();
    let leaf = tree.alloc('a');
    tree.append_child(a, leaf).unwrap();

    assert_eq!(tree.first_ancestor_matching(leaf, |_, &ch| ch == 'a'), Some(a));
    assert_eq!(tree.first_ancestor_matching(leaf, |_, &ch| ch == 'r'), Some(root));
    assert_eq!(tree.first_ancestor_matching(root, |_, _| true), None);
}

#[test]
fn test_is_descendant_of() {
    let (tree, root, [a, b, _]) = three_children();
    assert!(tree.is_descendant_of(a, root));
    assert!(!tree.is_descendant_of(root, a));
    assert!(!tree.is_descendant_of(a, b));
    assert!(!tree.is_descendant_of(a, a));
}

#[test]
fn test_descendants_of_leaf_is_empty() {
    let (tree, _, [a, _, _]) = three_children();
    assert_eq!(tree.descendants(a).count(), 0);
}
