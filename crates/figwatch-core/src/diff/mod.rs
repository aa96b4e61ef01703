//! Structural diff between two snapshot trees.
//!
//! ## Entry point
//!
//! ```
//! use figwatch_core::diff::{compute_diff, RawDiffRecord};
//! use figwatch_core::model::SnapshotTree;
//! use serde_json::json;
//!
//! let before = SnapshotTree::from(json!({"opacity": 1}));
//! let after = SnapshotTree::from(json!({"opacity": 0.5}));
//! let records = compute_diff(&before, &after);
//! assert!(matches!(records[0], RawDiffRecord::ValueChange { .. }));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical record order.
//! - **Directional paths**: value changes carry both a left and a right path;
//!   additions only a right path, removals only a left path.

pub mod engine;
pub mod model;

pub use engine::{compute_diff, Differ, StructuralDiffer};
pub use model::{ChangeCategory, RawDiffRecord};
