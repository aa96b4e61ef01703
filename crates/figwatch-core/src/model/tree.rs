//! Snapshot tree model.
//!
//! A snapshot is the JSON document the revision API returns for one named
//! version. It is held as a closed variant so the resolver and flattener can
//! match exhaustively on the node shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Leaf value of a snapshot tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for Scalar {
    /// Strings render verbatim, everything else in its JSON spelling.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// Immutable nested document: maps, ordered sequences and scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SnapshotTree {
    Map(BTreeMap<String, SnapshotTree>),
    Sequence(Vec<SnapshotTree>),
    Scalar(Scalar),
}

impl SnapshotTree {
    /// Convenience constructor for string leaves.
    pub fn string(s: impl Into<String>) -> Self {
        SnapshotTree::Scalar(Scalar::String(s.into()))
    }

    /// Child under `key` when this node is a map.
    pub fn get(&self, key: &str) -> Option<&SnapshotTree> {
        match self {
            SnapshotTree::Map(entries) => entries.get(key),
            SnapshotTree::Sequence(_) | SnapshotTree::Scalar(_) => None,
        }
    }

    /// Element at `index` when this node is a sequence.
    pub fn at(&self, index: usize) -> Option<&SnapshotTree> {
        match self {
            SnapshotTree::Sequence(items) => items.get(index),
            SnapshotTree::Map(_) | SnapshotTree::Scalar(_) => None,
        }
    }

    /// Borrow the text of a string leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SnapshotTree::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// String-valued field of a map node.
    pub fn string_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SnapshotTree::as_str)
    }

    /// Shape name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SnapshotTree::Map(_) => "map",
            SnapshotTree::Sequence(_) => "sequence",
            SnapshotTree::Scalar(_) => "scalar",
        }
    }

    /// Human rendering for report lines: scalars via [`Scalar`]'s `Display`,
    /// compound values as compact JSON.
    pub fn render_text(&self) -> String {
        match self {
            SnapshotTree::Scalar(s) => s.to_string(),
            SnapshotTree::Map(_) | SnapshotTree::Sequence(_) => {
                Value::from(self.clone()).to_string()
            }
        }
    }
}

impl From<Value> for SnapshotTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SnapshotTree::Scalar(Scalar::Null),
            Value::Bool(b) => SnapshotTree::Scalar(Scalar::Bool(b)),
            Value::Number(n) => SnapshotTree::Scalar(Scalar::Number(n)),
            Value::String(s) => SnapshotTree::Scalar(Scalar::String(s)),
            Value::Array(items) => {
                SnapshotTree::Sequence(items.into_iter().map(SnapshotTree::from).collect())
            }
            Value::Object(entries) => SnapshotTree::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, SnapshotTree::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<SnapshotTree> for Value {
    fn from(tree: SnapshotTree) -> Self {
        match tree {
            SnapshotTree::Scalar(Scalar::Null) => Value::Null,
            SnapshotTree::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            SnapshotTree::Scalar(Scalar::Number(n)) => Value::Number(n),
            SnapshotTree::Scalar(Scalar::String(s)) => Value::String(s),
            SnapshotTree::Sequence(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            SnapshotTree::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<JsonMap<String, Value>>(),
            ),
        }
    }
}
