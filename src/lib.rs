//! In-memory ordered forest backing navigable UI structures (menus, nested
//! listings).
//!
//! The [`domain`] layer holds the tree index: items with derived `parent_id`,
//! `pos` and `level` metadata, pre-order lookup, append-only insertion, subtree
//! deletion, shallow field updates and conversion from flat parent-linked rows.
//!
//! ```
//! use treeindex::domain::{convert_from_flat, FlatFields};
//! use serde_json::json;
//!
//! let rows = vec![
//!     json!({"id": 1, "title": "Root"}),
//!     json!({"id": 2, "title": "Child", "id_parent": 1}),
//! ];
//! let tree = convert_from_flat(&rows, &FlatFields::default());
//! assert_eq!(tree.find_item("2").map(|item| item.level), Some(1));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
