use figwatch_core_types::RequestId;
use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in log events and in the
/// webhook's error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input validation
    InvalidInput,
    /// Webhook payload failed data validation (e.g. missing `file_key`)
    InvalidEvent,
    /// A diff path could not be parsed from its textual form
    InvalidPath,

    // Data quality
    /// A diff record's value carries no node identity by any rule
    MissingIdentity,

    // Upstream collaborators
    /// Revision API unreachable or returned an unusable body
    UpstreamUnavailable,
    /// Revision API answered with a non-success status
    UpstreamStatus,
    Timeout,
    /// Notification endpoint rejected or failed the delivery
    DeliveryFailed,

    // Integration/IO
    Io,
    Serialization,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidEvent => "ERR_INVALID_EVENT",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::MissingIdentity => "ERR_MISSING_IDENTITY",
            ExErrorKind::UpstreamUnavailable => "ERR_UPSTREAM_UNAVAILABLE",
            ExErrorKind::UpstreamStatus => "ERR_UPSTREAM_STATUS",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::DeliveryFailed => "ERR_DELIVERY_FAILED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds caused by the payload the caller sent us
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput | ExErrorKind::InvalidEvent | ExErrorKind::InvalidPath
        )
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (file key, component key, node id, version id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by the pure report pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FigwatchError {
    /// Added or changed subtree has no identifier field and none in its path
    #[error("No node identity for value at path `{path}`")]
    MissingIdentity { path: String },

    /// Textual diff path is malformed (e.g. `[x]` index step)
    #[error("Invalid diff path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Publish event payload failed validation
    #[error("Invalid publish event: {reason}")]
    InvalidEvent { reason: String },

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<FigwatchError> for ExError {
    fn from(err: FigwatchError) -> Self {
        match err {
            FigwatchError::MissingIdentity { path } => ExError::new(ExErrorKind::MissingIdentity)
                .with_op("flatten_value")
                .with_entity_id(path)
                .with_message("value carries no node identity"),

            FigwatchError::InvalidPath { path, reason } => ExError::new(ExErrorKind::InvalidPath)
                .with_op("parse_path")
                .with_entity_id(path)
                .with_message(reason),

            FigwatchError::InvalidEvent { reason } => {
                ExError::new(ExErrorKind::InvalidEvent).with_message(reason)
            }

            FigwatchError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for FigwatchError {
    fn from(err: serde_json::Error) -> Self {
        FigwatchError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        FigwatchError::from(err).into()
    }
}
