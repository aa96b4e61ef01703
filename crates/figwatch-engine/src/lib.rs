//! Figwatch Engine - Orchestration layer
//!
//! Handles one publish event end to end: resolves components through the
//! revision API, fetches the two newest named versions, compiles the report
//! with `figwatch-core` and hands it to the notifier.

pub mod api;
pub mod commands;
pub mod notify;

pub use api::{ApiConfig, FigmaClient, RevisionApi};
pub use commands::publish::{DeliveryStatus, EventOutcome, PublishPipeline};
pub use notify::{CodexBotNotifier, MessageFormat, Notifier};
