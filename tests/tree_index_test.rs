//! Tests for TreeIndex structural operations and metadata invariants

mod common;

use rstest::rstest;

use common::{assert_meta_consistent, menu, meta};
use treeindex::domain::{
    DomainError, DuplicatePolicy, ItemPatch, SequentialIdGenerator, Tree, TreeIndex, TreeItem,
    UuidIdGenerator,
};
use treeindex::util::testing;

fn menu_index() -> TreeIndex {
    testing::init_test_setup();
    TreeIndex::with_generator(menu(), SequentialIdGenerator::new("n"))
}

// ============================================================
// add_item
// ============================================================

#[test]
fn given_empty_tree_when_adding_top_level_item_then_find_returns_it_at_level_zero() {
    let mut index = TreeIndex::new();

    let added = index.add_item(TreeItem::new("n1", "New"), "").unwrap();

    assert_eq!(added.as_deref(), Some("n1"));
    let found = index.find_item("n1").expect("added item");
    assert_eq!(found.name, "New");
    assert_eq!(found.level, 0);
    assert_eq!(found.pos, 0);
    assert_eq!(found.parent_id, "");
}

#[test]
fn given_item_without_id_when_adding_then_id_is_synthesized() {
    let mut index = TreeIndex::new();

    let first = index.add_item(TreeItem::new("", "a"), "").unwrap();
    let second = index.add_item(TreeItem::new("", "b"), "").unwrap();

    assert_eq!(first.as_deref(), Some("item-1"));
    assert_eq!(second.as_deref(), Some("item-2"));
    assert_eq!(index.find_item("item-2").map(|i| i.pos), Some(1));
}

#[rstest]
#[case::top_level("", 2, 0)]
#[case::first_level("docs", 2, 1)]
#[case::second_level("guide", 1, 2)]
#[case::leaf_parent("setup", 0, 3)]
fn given_parent_when_adding_then_item_is_appended_last(
    #[case] parent_id: &str,
    #[case] expected_pos: usize,
    #[case] expected_level: usize,
) {
    let mut index = menu_index();

    index.add_item(TreeItem::new("new", "New"), parent_id).unwrap();

    let added = index.find_item("new").expect("added item");
    assert_eq!(added.pos, expected_pos);
    assert_eq!(added.level, expected_level);
    assert_eq!(added.parent_id, parent_id);
    assert_meta_consistent(index.tree());
}

#[test]
fn given_collapsed_leaf_parent_when_adding_child_then_parent_is_opened() {
    let mut index = menu_index();
    assert_eq!(index.find_item("setup").unwrap().is_open, None);

    index.add_item(TreeItem::new("step", "Step"), "setup").unwrap();

    let parent = index.find_item("setup").unwrap();
    assert_eq!(parent.is_open, Some(true));
    assert_eq!(parent.children.len(), 1);
}

#[test]
fn given_unknown_parent_when_adding_then_tree_is_unchanged() {
    let mut index = menu_index();
    let before = index.tree().clone();

    let added = index.add_item(TreeItem::new("x", "X"), "nope").unwrap();

    assert_eq!(added, None);
    assert_eq!(index.tree(), &before);
}

#[test]
fn given_item_with_stale_metadata_when_adding_then_metadata_is_recomputed() {
    let mut index = menu_index();
    let mut item = TreeItem::new("x", "X").with_children(vec![TreeItem::new("y", "Y")]);
    item.level = 9;
    item.pos = 9;
    item.parent_id = "bogus".into();

    index.add_item(item, "guide").unwrap();

    let y = index.find_item("y").unwrap();
    assert_eq!((y.level, y.parent_id.as_str()), (3, "x"));
    assert_meta_consistent(index.tree());
}

#[test]
fn given_reject_policy_when_adding_subtree_with_known_id_then_fails() {
    let mut index = menu_index().with_policy(DuplicatePolicy::Reject);
    let item = TreeItem::new("fresh", "Fresh").with_children(vec![TreeItem::new("intro", "Again")]);

    let result = index.add_item(item, "api");

    assert_eq!(result, Err(DomainError::DuplicateId("intro".into())));
    assert!(index.find_item("fresh").is_none());
}

#[test]
fn given_allow_policy_when_adding_duplicate_id_then_first_match_in_preorder_wins() {
    let mut index = menu_index();

    index.add_item(TreeItem::new("intro", "Second intro"), "").unwrap();

    assert_eq!(index.find_item("intro").unwrap().name, "Intro");
}

#[test]
fn given_uuid_generator_when_adding_without_id_then_id_is_uuid() {
    let mut index = TreeIndex::with_generator(Tree::new(), UuidIdGenerator);

    let id = index.add_item(TreeItem::new("", "a"), "").unwrap().unwrap();

    assert_eq!(id.len(), 36);
    assert!(index.find_item(&id).is_some());
}

// ============================================================
// delete_item
// ============================================================

#[test]
fn given_parent_with_child_when_deleting_parent_then_both_are_gone() {
    let mut index = TreeIndex::new();
    index.add_item(TreeItem::new("p", "Parent"), "").unwrap();
    index.add_item(TreeItem::new("c", "Child"), "p").unwrap();

    index.delete_item("p");

    assert!(index.find_item("p").is_none());
    assert!(index.find_item("c").is_none());
    assert!(index.tree().is_empty());
}

#[test]
fn given_nested_item_when_deleting_then_subtree_removed_and_siblings_renumbered() {
    let mut index = menu_index();

    let removed = index.delete_item("intro").expect("removed");

    assert_eq!(removed.id, "intro");
    assert_eq!(index.find_item("guide").unwrap().pos, 0);
    assert_eq!(index.find_item("setup").unwrap().level, 2);
    assert_meta_consistent(index.tree());
}

#[test]
fn given_subtree_when_deleting_then_returned_subtree_keeps_children() {
    let mut index = menu_index();

    let removed = index.delete_item("guide").unwrap();

    assert_eq!(removed.children[0].id, "setup");
    assert!(index.find_item("setup").is_none());
    assert_eq!(index.tree().len(), 3);
}

#[test]
fn given_unknown_id_when_deleting_then_tree_is_unchanged() {
    let mut index = menu_index();
    let before = index.tree().clone();

    assert!(index.delete_item("nope").is_none());
    assert_eq!(index.tree(), &before);
}

// ============================================================
// update_item
// ============================================================

#[test]
fn given_item_with_children_when_updating_name_then_children_are_preserved() {
    let child = TreeItem::new("c", "child");
    let mut index = TreeIndex::with_generator(
        Tree::from_items(vec![TreeItem::new("a", "x").with_children(vec![child])]),
        SequentialIdGenerator::default(),
    );
    let children_before = index.find_item("a").unwrap().children.clone();

    let updated = index.update_item(ItemPatch::new("a").name("y"));

    assert!(updated);
    let a = index.find_item("a").unwrap();
    assert_eq!(a.name, "y");
    assert_eq!(a.children, children_before);
}

#[test]
fn given_patch_with_payload_when_updating_then_only_patched_fields_change() {
    let mut index = menu_index();
    let before = index.find_item("guide").unwrap().clone();

    index.update_item(
        ItemPatch::new("guide")
            .icon(Some("book".into()))
            .info(Some(serde_json::json!({"route": "/guide"}))),
    );

    let after = index.find_item("guide").unwrap();
    assert_eq!(after.icon.as_deref(), Some("book"));
    assert_eq!(after.info, Some(serde_json::json!({"route": "/guide"})));
    assert_eq!(after.name, before.name);
    assert_eq!(after.children, before.children);
    assert_eq!((after.pos, after.level), (before.pos, before.level));
}

#[test]
fn given_unknown_id_when_updating_then_nothing_changes() {
    let mut index = menu_index();
    let before = index.tree().clone();

    assert!(!index.update_item(ItemPatch::new("nope").name("x")));
    assert_eq!(index.tree(), &before);
}

#[test]
fn given_patch_replacing_children_when_updating_then_new_children_get_metadata() {
    let mut index = menu_index();

    index.update_item(
        ItemPatch::new("guide")
            .children(vec![TreeItem::new("v1", "v1"), TreeItem::new("v2", "v2")]),
    );

    assert_meta_consistent(index.tree());
    let v2 = index.find_item("v2").unwrap();
    assert_eq!((v2.pos, v2.level, v2.parent_id.as_str()), (1, 2, "guide"));
    assert!(index.find_item("setup").is_none());
}

#[test]
fn given_nested_item_when_renaming_then_subtree_and_position_are_kept() {
    let mut index = menu_index();
    let before = meta(index.tree());

    assert!(index.update_item(ItemPatch::new("guide").name("Guide 2")));

    assert_meta_consistent(index.tree());
    assert_eq!(meta(index.tree()), before);
    let guide = index.find_item("guide").unwrap();
    assert_eq!(guide.name, "Guide 2");
    assert_eq!(guide.children.len(), 1);
    assert_eq!(guide.children[0].id, "setup");
}

// ============================================================
// set_meta / direct field access
// ============================================================

#[test]
fn given_corrupted_metadata_when_recomputing_twice_then_results_are_identical() {
    let mut index = menu_index();
    if let Some(setup) = index.find_item_mut("setup") {
        setup.pos = 42;
        setup.level = 42;
        setup.parent_id = "wrong".into();
    }

    index.set_meta();
    let first = meta(index.tree());
    index.set_meta();
    let second = meta(index.tree());

    assert_eq!(first, second);
    assert_meta_consistent(index.tree());
}

#[test]
fn given_ui_toggle_when_writing_is_open_directly_then_item_reflects_it() {
    let mut index = menu_index();

    if let Some(docs) = index.tree_mut().find_item_mut("docs") {
        docs.is_open = Some(true);
    }

    assert!(index.find_item("docs").unwrap().is_expanded());
}

#[test]
fn given_sequence_of_mutations_when_done_then_invariants_hold() {
    let mut index = menu_index();

    index.add_item(TreeItem::new("", "a"), "docs").unwrap();
    index.add_item(TreeItem::new("", "b"), "n1").unwrap();
    index.delete_item("intro");
    index.add_item(TreeItem::new("", "c"), "").unwrap();
    index.delete_item("api");
    index.add_item(TreeItem::new("", "d"), "setup").unwrap();

    assert_meta_consistent(index.tree());
    assert_eq!(
        index.tree().ids(),
        vec!["docs", "guide", "setup", "n4", "n1", "n2", "n3"]
    );
}
