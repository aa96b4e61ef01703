//! Publish event payload and component entries.

use crate::errors::FigwatchError;
use crate::model::node_id::NodeId;
use serde::{Deserialize, Serialize};

/// Event type the design tool sends when a webhook is first registered.
pub const PING_EVENT_TYPE: &str = "PING";

/// Who triggered the publish.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggeredBy {
    #[serde(default)]
    pub handle: String,
}

/// Reference to a published component; resolved through the revision API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub key: String,
}

/// Library publish webhook payload.
///
/// Unknown fields are ignored; everything but `file_key` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub file_key: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub triggered_by: TriggeredBy,
    #[serde(default)]
    pub created_components: Vec<ComponentRef>,
    #[serde(default)]
    pub modified_components: Vec<ComponentRef>,
}

impl PublishEvent {
    /// Registration handshake; acknowledged without producing a report.
    pub fn is_ping(&self) -> bool {
        self.event_type.as_deref() == Some(PING_EVENT_TYPE)
    }

    /// # Errors
    ///
    /// `InvalidEvent` when `file_key` is absent or blank.
    pub fn validate(&self) -> Result<(), FigwatchError> {
        if self.file_key.trim().is_empty() {
            return Err(FigwatchError::InvalidEvent {
                reason: "`file_key` is required".to_string(),
            });
        }
        Ok(())
    }

    /// Description text, unless absent or empty.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Component metadata as returned by the revision API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub node_id: String,
    pub name: String,
    #[serde(default)]
    pub containing_frame_name: Option<String>,
}

impl ComponentInfo {
    /// `"<frame>, <name>"` when the component sits in a named frame.
    pub fn label(&self) -> String {
        match &self.containing_frame_name {
            Some(frame) => format!("{}, {}", frame, self.name),
            None => self.name.clone(),
        }
    }

    pub fn into_entry(self) -> ComponentEntry {
        ComponentEntry {
            label: self.label(),
            node_id: NodeId::new(&self.node_id),
        }
    }
}

/// One created or modified component, as listed in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub node_id: NodeId,
    pub label: String,
}

impl ComponentEntry {
    pub fn new(node_id: &str, label: impl Into<String>) -> Self {
        Self {
            node_id: NodeId::new(node_id),
            label: label.into(),
        }
    }
}
