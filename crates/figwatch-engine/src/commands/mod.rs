//! Per-event orchestration.
//!
//! Coordinates the revision API, the pure report pipeline in `figwatch-core`
//! and notification delivery.

pub mod publish;
