use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::item::{Tree, TreeItem};

/// Conversion into a printable `termtree` structure.
pub trait TreeRender {
    fn to_tree_string(&self) -> TermTree<String>;
}

fn label(item: &TreeItem) -> String {
    let marker = match (item.is_leaf(), item.is_expanded()) {
        (true, _) => "",
        (false, true) => "- ",
        (false, false) => "+ ",
    };
    format!("{}{} [{}]", marker, item.name, item.id)
}

impl TreeRender for TreeItem {
    fn to_tree_string(&self) -> TermTree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        TermTree::new(label(self)).with_leaves(leaves)
    }
}

impl TreeRender for Tree {
    /// The forest hangs under a synthetic `.` root.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> TermTree<String> {
        if self.is_empty() {
            return TermTree::new("Empty tree".to_string());
        }
        let leaves: Vec<_> = self.items.iter().map(|i| i.to_tree_string()).collect();
        TermTree::new(".".to_string()).with_leaves(leaves)
    }
}
