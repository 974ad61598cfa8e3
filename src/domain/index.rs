//! Tree index: lookup, structural mutation and metadata recompute.
//!
//! Every structural mutation ends with a full [`Tree::set_meta`] pass instead of
//! patching `parent_id`/`pos`/`level` incrementally.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::flat::{convert_from_flat, FlatFields, FlatRecord};
use crate::domain::id::{IdGenerator, SequentialIdGenerator};
use crate::domain::item::{ItemPatch, Tree, TreeItem};
use crate::domain::traverse::PreOrderIter;

/// What to do when an id is already present in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Unchecked: lookups return the first match in pre-order
    #[default]
    Allow,
    /// Refuse inserts and conversions that would duplicate an id
    Reject,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(DuplicatePolicy::Allow),
            "reject" => Ok(DuplicatePolicy::Reject),
            other => Err(format!("unknown duplicate policy: {other}")),
        }
    }
}

/// Derive `parent_id`, `pos` and `level` for `items` and everything below them.
fn set_level(items: &mut [TreeItem], parent_id: &str, level: usize) {
    for (pos, item) in items.iter_mut().enumerate() {
        item.parent_id = parent_id.to_string();
        item.pos = pos;
        item.level = level;
        set_level(&mut item.children, &item.id, level + 1);
    }
}

impl Tree {
    /// Recompute `parent_id`, `pos` and `level` for every item.
    #[instrument(level = "trace", skip(self))]
    pub fn set_meta(&mut self) {
        set_level(&mut self.items, "", 0);
    }

    /// First item with `id` in pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn find_item(&self, id: &str) -> Option<&TreeItem> {
        self.iter().find(|item| item.id == id)
    }

    /// Mutable access to the first item with `id` in pre-order.
    ///
    /// Field writes through this reference (e.g. toggling `is_open`) bypass
    /// metadata recompute; use the structural operations to move items.
    #[instrument(level = "trace", skip(self))]
    pub fn find_item_mut(&mut self, id: &str) -> Option<&mut TreeItem> {
        fn find_in<'a>(items: &'a mut [TreeItem], id: &str) -> Option<&'a mut TreeItem> {
            for item in items.iter_mut() {
                if item.id == id {
                    return Some(item);
                }
                if let Some(found) = find_in(&mut item.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&mut self.items, id)
    }

    /// The item whose children contain `id`; `None` for top-level or unknown ids.
    #[instrument(level = "trace", skip(self))]
    pub fn find_parent(&self, id: &str) -> Option<&TreeItem> {
        let item = self.find_item(id)?;
        if item.parent_id.is_empty() {
            return None;
        }
        self.iter()
            .find(|parent| parent.children.iter().any(|child| child.id == id))
    }

    /// Detach the first item with `id` (and its subtree) from its container.
    fn remove_item(&mut self, id: &str) -> Option<TreeItem> {
        fn remove_from(items: &mut Vec<TreeItem>, id: &str) -> Option<TreeItem> {
            for i in 0..items.len() {
                if items[i].id == id {
                    return Some(items.remove(i));
                }
                if let Some(removed) = remove_from(&mut items[i].children, id) {
                    return Some(removed);
                }
            }
            None
        }
        remove_from(&mut self.items, id)
    }

    /// Fails with the first id seen twice in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn validate_unique_ids(&self) -> TreeResult<()> {
        let mut seen = HashSet::new();
        for item in self.iter() {
            if !seen.insert(item.id.as_str()) {
                return Err(DomainError::DuplicateId(item.id.clone()));
            }
        }
        Ok(())
    }
}

/// Owner of a [`Tree`] together with the id source used for new items.
#[derive(Debug, Clone)]
pub struct TreeIndex<G = SequentialIdGenerator> {
    tree: Tree,
    ids: G,
    duplicates: DuplicatePolicy,
}

impl Default for TreeIndex<SequentialIdGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeIndex<SequentialIdGenerator> {
    pub fn new() -> Self {
        Self::with_generator(Tree::new(), SequentialIdGenerator::default())
    }
}

impl<G: IdGenerator> TreeIndex<G> {
    /// Take ownership of `tree` and derive its metadata.
    pub fn with_generator(mut tree: Tree, ids: G) -> Self {
        tree.set_meta();
        Self {
            tree,
            ids,
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn with_policy(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.duplicates
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Direct access for UI-side field writes such as toggling `is_open`.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn set_meta(&mut self) {
        self.tree.set_meta();
    }

    pub fn find_item(&self, id: &str) -> Option<&TreeItem> {
        self.tree.find_item(id)
    }

    pub fn find_item_mut(&mut self, id: &str) -> Option<&mut TreeItem> {
        self.tree.find_item_mut(id)
    }

    /// Append `item` as the last child of `parent_id`, or at top level when
    /// `parent_id` is empty.
    ///
    /// Returns the id of the inserted item (synthesized when `item.id` is
    /// empty), or `None` when the parent is unknown and nothing changed.
    #[instrument(level = "debug", skip(self, item), fields(item_id = %item.id))]
    pub fn add_item(&mut self, mut item: TreeItem, parent_id: &str) -> TreeResult<Option<String>> {
        if !parent_id.is_empty() && self.tree.find_item(parent_id).is_none() {
            warn!("add_item: parent not found: {}", parent_id);
            return Ok(None);
        }

        if item.id.is_empty() {
            item.id = self.ids.next_id();
            debug!("synthesized id: {}", item.id);
        }
        if self.duplicates == DuplicatePolicy::Reject {
            self.check_insertable(&item)?;
        }

        let container = if parent_id.is_empty() {
            &mut self.tree.items
        } else {
            match self.tree.find_item_mut(parent_id) {
                Some(parent) => {
                    parent.is_open = Some(true);
                    &mut parent.children
                }
                None => return Ok(None),
            }
        };
        let id = item.id.clone();
        container.push(item);

        self.tree.set_meta();
        Ok(Some(id))
    }

    /// Remove the item with `id` together with its whole subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_item(&mut self, id: &str) -> Option<TreeItem> {
        let removed = self.tree.remove_item(id)?;
        self.tree.set_meta();
        Some(removed)
    }

    /// Shallow merge of `patch` onto the existing item with the same id.
    ///
    /// The item keeps its place in the tree. Replaced children get their
    /// metadata derived below it; nothing else is recomputed.
    #[instrument(level = "debug", skip(self, patch), fields(item_id = %patch.id))]
    pub fn update_item(&mut self, patch: ItemPatch) -> bool {
        let Some(existing) = self.tree.find_item_mut(&patch.id) else {
            debug!("update_item: not found: {}", patch.id);
            return false;
        };
        let replaces_children = patch.children.is_some();
        patch.apply(existing);
        if replaces_children {
            set_level(&mut existing.children, &existing.id, existing.level + 1);
        }
        true
    }

    /// Replace the tree with one converted from flat records.
    ///
    /// Under [`DuplicatePolicy::Reject`] a conversion containing duplicate ids
    /// fails and the current tree is kept.
    #[instrument(level = "debug", skip(self, records))]
    pub fn load_flat<R: FlatRecord>(&mut self, records: &[R], fields: &FlatFields) -> TreeResult<()> {
        let tree = convert_from_flat(records, fields);
        if self.duplicates == DuplicatePolicy::Reject {
            tree.validate_unique_ids()?;
        }
        self.tree = tree;
        Ok(())
    }

    fn check_insertable(&self, item: &TreeItem) -> TreeResult<()> {
        let mut seen = HashSet::new();
        for candidate in PreOrderIter::new(std::slice::from_ref(item)) {
            if !seen.insert(candidate.id.as_str()) || self.tree.find_item(&candidate.id).is_some() {
                return Err(DomainError::DuplicateId(candidate.id.clone()));
            }
        }
        Ok(())
    }
}
