use screenwire::element::element_model::{ElementKind, ParentRef};
use screenwire::router::diff::{diff_trees, tree_digest};
use screenwire::wire::wire_model::{WireElement, WireTree};

fn label(text: &str, parent: Option<u64>) -> WireElement {
    WireElement {
        kind: ElementKind::Label { text: text.into() },
        parent: parent.map(ParentRef::Element),
        visible: true,
        name: None,
    }
}

fn container(children: Vec<u64>) -> WireElement {
    WireElement {
        kind: ElementKind::Container {
            children,
            layout: None,
        },
        parent: None,
        visible: true,
        name: None,
    }
}

// =========================================================================
// change-set computation
// =========================================================================

#[test]
fn added_changed_removed_are_classified() {
    let mut before = WireTree::new();
    before.insert(1, container(vec![2, 3]));
    before.insert(2, label("old text", Some(1)));
    before.insert(3, label("stays", Some(1)));

    let mut after = WireTree::new();
    after.insert(1, container(vec![2, 4]));
    after.insert(2, label("new text", Some(1)));
    after.insert(4, label("fresh", Some(1)));

    let diff = diff_trees(&before, &after);

    assert_eq!(diff.added, vec![4]);
    assert_eq!(diff.changed, vec![1, 2], "container child list changed too");
    assert_eq!(diff.removed, vec![3]);

    assert_eq!(diff.changes.len(), 4);
    assert_eq!(diff.changes.get(3), Some(&None), "removal marker is null");
    assert!(
        matches!(diff.changes.get(4), Some(Some(_))),
        "added elements carry their full payload"
    );
    assert_eq!(diff.changes.removed_count(), 1);
}

#[test]
fn unchanged_elements_are_omitted() {
    let mut before = WireTree::new();
    before.insert(1, container(vec![2]));
    before.insert(2, label("same", Some(1)));

    let after = before.clone();
    let diff = diff_trees(&before, &after);

    assert!(diff.changes.is_empty(), "identical snapshots diff to nothing");
}

#[test]
fn diff_against_empty_before_adds_everything() {
    let before = WireTree::new();
    let mut after = WireTree::new();
    after.insert(1, container(vec![2]));
    after.insert(2, label("hello", Some(1)));

    let diff = diff_trees(&before, &after);
    assert_eq!(diff.added, vec![1, 2]);
    assert_eq!(diff.changes.removed_count(), 0);
}

#[test]
fn visibility_flip_counts_as_a_change() {
    let mut before = WireTree::new();
    before.insert(9, label("x", None));

    let mut hidden = label("x", None);
    hidden.visible = false;
    let mut after = WireTree::new();
    after.insert(9, hidden);

    let diff = diff_trees(&before, &after);
    assert_eq!(diff.changed, vec![9]);
}

// =========================================================================
// digests
// =========================================================================

#[test]
fn digests_are_stable_and_discriminating() {
    let mut a = WireTree::new();
    a.insert(1, label("same", None));
    let b = a.clone();

    let mut c = WireTree::new();
    c.insert(1, label("different", None));

    assert_eq!(tree_digest(&a), tree_digest(&b));
    assert_ne!(tree_digest(&a), tree_digest(&c));
    assert!(tree_digest(&a).is_some());
}
