//! Figwatch Core - publish-event diff reporting
//!
//! This crate turns a design-tool publish event plus two snapshots of the
//! document into a short rich-text change report:
//! - Snapshot tree, path and node-id models
//! - Structural differ producing raw diff records
//! - Node registry, path resolver, value flattener and link annotator
//! - Report compiler with per-section truncation
//!
//! Everything here is synchronous and free of I/O; fetching and delivery live
//! in `figwatch-engine`.

pub mod annotate;
pub mod diff;
pub mod errors;
pub mod flatten;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod report;
pub mod resolve;

pub use figwatch_core_types as core_types;

// Re-export commonly used types
pub use annotate::{annotate, escape_html, DocumentLinks};
pub use diff::{compute_diff, Differ, RawDiffRecord, StructuralDiffer};
pub use errors::{ExError, ExErrorKind, FigwatchError, Result};
pub use flatten::{flatten, FlatValue};
pub use model::{ComponentEntry, NodeId, Path, PublishEvent, SnapshotTree};
pub use registry::NodeRegistry;
pub use report::{compile_report, HistoryDiff, Report, ReportLimits, ReportSettings};
pub use resolve::{resolve, resolve_breadcrumb};
