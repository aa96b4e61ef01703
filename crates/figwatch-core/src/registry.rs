//! Node registry: node id → display label, built per event.

use crate::model::node_id::{to_colon_form, to_dash_form};
use crate::model::ComponentEntry;
use std::collections::BTreeMap;

/// Labels for the components named by one publish event.
///
/// Every id is stored under both its `:` and `-` spelling, so a token found
/// in a breadcrumb resolves whichever way the API spelled it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRegistry {
    labels: BTreeMap<String, String>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register created entries, then modified entries.
    ///
    /// Modified entries are registered last and win when both lists name the
    /// same node.
    pub fn from_components(created: &[ComponentEntry], modified: &[ComponentEntry]) -> Self {
        let mut registry = Self::new();
        for entry in created.iter().chain(modified) {
            registry.register(entry.node_id.as_dash(), entry.label.clone());
        }
        registry
    }

    /// Insert `label` under both spellings of `id`, overwriting earlier labels.
    pub fn register(&mut self, id: &str, label: impl Into<String>) {
        let label = label.into();
        self.labels.insert(to_colon_form(id), label.clone());
        self.labels.insert(to_dash_form(id), label);
    }

    /// Label for `token` exactly as given.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.labels.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.labels.contains_key(token)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
