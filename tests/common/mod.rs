//! Shared fixtures for integration tests

#![allow(dead_code)]

use treeindex::domain::{Tree, TreeItem};

/// Assert `parent_id`, `pos` and `level` match the actual tree shape.
pub fn assert_meta_consistent(tree: &Tree) {
    fn check(items: &[TreeItem], parent_id: &str, level: usize) {
        for (pos, item) in items.iter().enumerate() {
            assert_eq!(item.pos, pos, "pos of {}", item.id);
            assert_eq!(item.level, level, "level of {}", item.id);
            assert_eq!(item.parent_id, parent_id, "parent_id of {}", item.id);
            check(&item.children, &item.id, level + 1);
        }
    }
    check(&tree.items, "", 0);
}

/// Two-level menu:
///
/// ```text
/// docs
/// ├── intro
/// └── guide
///     └── setup
/// api
/// ```
pub fn menu() -> Tree {
    Tree::from_items(vec![
        TreeItem::new("docs", "Docs").with_children(vec![
            TreeItem::new("intro", "Intro"),
            TreeItem::new("guide", "Guide").with_children(vec![TreeItem::new("setup", "Setup")]),
        ]),
        TreeItem::new("api", "API"),
    ])
}

/// (id, pos, level, parent_id) for every item in pre-order.
pub fn meta(tree: &Tree) -> Vec<(String, usize, usize, String)> {
    tree.iter()
        .map(|i| (i.id.clone(), i.pos, i.level, i.parent_id.clone()))
        .collect()
}
