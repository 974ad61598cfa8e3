//! Tree entities: items, the top-level forest, and partial updates

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::traverse::{PostOrderIter, PreOrderIter};

/// Single hierarchical entry of a navigable structure (menu entry, listing row).
///
/// `parent_id`, `pos` and `level` are derived: they are rewritten by
/// [`Tree::set_meta`] and whatever a caller puts there is overwritten by the
/// next structural operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeItem {
    pub id: String,
    pub name: String,
    /// Ordered children; sibling order is the order of this vector
    #[serde(default)]
    pub children: Vec<TreeItem>,
    /// UI expansion flag, toggled by the renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    /// Opaque icon handle of the embedding application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Opaque payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,

    /// Id of the containing item, empty for top-level items
    #[serde(default)]
    pub parent_id: String,
    /// Zero-based index within the parent's children
    #[serde(default)]
    pub pos: usize,
    /// Depth from the root, top-level items are 0
    #[serde(default)]
    pub level: usize,
}

impl TreeItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<TreeItem>) -> Self {
        self.children = children;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_info(mut self, info: Value) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether the renderer should show this item's children.
    pub fn is_expanded(&self) -> bool {
        self.is_open.unwrap_or(false)
    }
}

/// Field-by-field partial update for an existing item.
///
/// Every `Some` field overwrites the target; `None` leaves it untouched.
/// `icon` and `info` are doubly optional so a patch can clear them explicitly.
/// The derived `parent_id`, `pos` and `level` are not patchable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemPatch {
    pub id: String,
    pub name: Option<String>,
    pub children: Option<Vec<TreeItem>>,
    pub is_open: Option<bool>,
    pub icon: Option<Option<String>>,
    pub info: Option<Option<Value>>,
}

impl ItemPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn children(mut self, children: Vec<TreeItem>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn is_open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    pub fn icon(mut self, icon: Option<String>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn info(mut self, info: Option<Value>) -> Self {
        self.info = Some(info);
        self
    }

    /// Overwrite the fields present on this patch onto `target`.
    pub fn apply(self, target: &mut TreeItem) {
        target.id = self.id;
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(children) = self.children {
            target.children = children;
        }
        if let Some(is_open) = self.is_open {
            target.is_open = Some(is_open);
        }
        if let Some(icon) = self.icon {
            target.icon = icon;
        }
        if let Some(info) = self.info {
            target.info = info;
        }
    }
}

/// Ordered forest: the root container of top-level items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub items: Vec<TreeItem>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing items and derive their metadata.
    pub fn from_items(items: Vec<TreeItem>) -> Self {
        let mut tree = Self { items };
        tree.set_meta();
        tree
    }

    /// Total number of items at all levels.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pre-order traversal, the same order lookups search in.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(&self.items)
    }

    pub fn iter_postorder(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(&self.items)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|item| item.id.as_str()).collect()
    }

    /// Number of items on the longest root-to-leaf path, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        fn item_depth(item: &TreeItem) -> usize {
            1 + item.children.iter().map(item_depth).max().unwrap_or(0)
        }
        self.items.iter().map(item_depth).max().unwrap_or(0)
    }

    /// Ids of all items without children, in pre-order.
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|item| item.is_leaf())
            .map(|item| item.id.clone())
            .collect()
    }
}
