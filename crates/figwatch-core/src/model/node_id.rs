//! Node identities.
//!
//! The revision API spells node ids `12:34`; design links spell them `12-34`.
//! Both spellings name the same node.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Shape of a node-id token: digits, a `:` or `-`, digits.
pub const NODE_ID_PATTERN: &str = r"\d+[-:]\d+";

static NODE_ID_RE: OnceLock<Regex> = OnceLock::new();

/// Compiled [`NODE_ID_PATTERN`].
pub fn node_id_regex() -> &'static Regex {
    NODE_ID_RE.get_or_init(|| Regex::new(NODE_ID_PATTERN).expect("node id pattern is valid"))
}

/// `12:34` / `12-34` → `12-34`
pub fn to_dash_form(id: &str) -> String {
    id.replace(':', "-")
}

/// `12-34` / `12:34` → `12:34`
pub fn to_colon_form(id: &str) -> String {
    id.replace('-', ":")
}

/// Last node-id shaped token inside `text`, if any.
pub fn last_node_id_in(text: &str) -> Option<&str> {
    node_id_regex().find_iter(text).last().map(|m| m.as_str())
}

/// Node identifier, normalised to the `-` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    pub fn new(raw: &str) -> Self {
        Self(to_dash_form(raw))
    }

    /// `-` form, as used in design links.
    pub fn as_dash(&self) -> &str {
        &self.0
    }

    /// `:` form, as used by the revision API.
    pub fn to_colon(&self) -> String {
        to_colon_form(&self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NodeId {
    fn from(raw: String) -> Self {
        NodeId::new(&raw)
    }
}

impl From<&str> for NodeId {
    fn from(raw: &str) -> Self {
        NodeId::new(raw)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
