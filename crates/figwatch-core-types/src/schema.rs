//! Field and event names of figwatch's structured log events
//!
//! Emitting code spells field names as `tracing` identifiers; these are the
//! same names as read back from captured or JSON-formatted events.

// Fields set by the facility macros and call sites
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_FILE_KEY: &str = "file_key";
pub const FIELD_PATH: &str = "path";

// Collection sizes
pub const FIELD_RECORD_COUNT: &str = "record_count";
pub const FIELD_COMPONENT_COUNT: &str = "component_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Degraded-path signals
pub const EVENT_IDENTITY_FALLBACK: &str = "identity_fallback";
pub const EVENT_RECORD_SKIPPED: &str = "record_skipped";
pub const EVENT_RESOLUTION_DEGRADED: &str = "resolution_degraded";
pub const EVENT_UPSTREAM_UNAVAILABLE: &str = "upstream_unavailable";
pub const EVENT_DELIVERY_FAILED: &str = "delivery_failed";
