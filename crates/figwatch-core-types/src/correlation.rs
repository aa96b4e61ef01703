//! Correlation types for request tracking
//!
//! Every inbound publish event gets its own [`RequestContext`]; the request id
//! is attached to the tracing span of that event and to the archived payload
//! file names so a delivered report can be traced back to its webhook call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single inbound event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one event's processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// Design file the event refers to, once known
    pub file_key: Option<String>,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            file_key: None,
        }
    }

    /// Create a context with an existing RequestId
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            file_key: None,
        }
    }

    /// Attach the design file key
    pub fn with_file_key(mut self, file_key: impl Into<String>) -> Self {
        self.file_key = Some(file_key.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
