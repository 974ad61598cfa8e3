//! Conversion from flat relational rows (id + parent id columns) to a [`Tree`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, instrument};

use crate::domain::item::{Tree, TreeItem};

/// Column names used to read a flat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatFields {
    /// Column holding the item id (default: `id`)
    pub id_field: String,
    /// Column holding the display label (default: `title`)
    pub label_field: String,
    /// Column holding the parent id (default: `id_parent`)
    pub parent_field: String,
}

impl Default for FlatFields {
    fn default() -> Self {
        Self {
            id_field: "id".into(),
            label_field: "title".into(),
            parent_field: "id_parent".into(),
        }
    }
}

impl FlatFields {
    pub fn new(
        id_field: impl Into<String>,
        label_field: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        Self {
            id_field: id_field.into(),
            label_field: label_field.into(),
            parent_field: parent_field.into(),
        }
    }
}

/// A row of arbitrary shape that can be read column by column.
pub trait FlatRecord {
    /// The column value as a string, `None` when absent or not a scalar.
    fn field(&self, name: &str) -> Option<String>;

    /// Whether the column holds a meaningful value. Empty strings do not.
    fn has_value(&self, name: &str) -> bool {
        self.field(name).is_some_and(|value| !value.is_empty())
    }
}

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Numbers compare by value: `1.0` and `1` read as the same key.
fn number_key(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// JSON truthiness: `null`, `""`, `0` and `false` count as unset.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl FlatRecord for Map<String, Value> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).and_then(scalar)
    }

    fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(truthy)
    }
}

impl FlatRecord for Value {
    fn field(&self, name: &str) -> Option<String> {
        self.as_object().and_then(|object| object.field(name))
    }

    fn has_value(&self, name: &str) -> bool {
        self.as_object().is_some_and(|object| object.has_value(name))
    }
}

impl FlatRecord for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl FlatRecord for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Build a tree from `records` in a single pass.
///
/// A record without a parent value becomes a top-level item. Any other record is
/// attached to an item already built from an earlier record; if its parent has
/// not been built yet the record is dropped.
#[instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn convert_from_flat<R: FlatRecord>(records: &[R], fields: &FlatFields) -> Tree {
    let mut tree = Tree::new();

    for (row, record) in records.iter().enumerate() {
        let item = TreeItem {
            id: record.field(&fields.id_field).unwrap_or_default(),
            name: record.field(&fields.label_field).unwrap_or_default(),
            ..TreeItem::default()
        };

        if !record.has_value(&fields.parent_field) {
            tree.items.push(item);
            continue;
        }

        let parent_id = record.field(&fields.parent_field).unwrap_or_default();
        if parent_id.is_empty() {
            debug!(row, "dropping record: parent value is not a scalar");
            continue;
        }
        match tree.find_item_mut(&parent_id) {
            Some(parent) => parent.children.push(item),
            None => debug!(row, parent = %parent_id, "dropping record: parent not converted yet"),
        }
    }

    tree.set_meta();
    tree
}
