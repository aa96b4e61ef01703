//! Report compiler: publish event + components + history diff → report text.
//!
//! ```
//! use figwatch_core::model::{ComponentEntry, PublishEvent};
//! use figwatch_core::report::{compile_report, ReportSettings};
//!
//! let event: PublishEvent = serde_json::from_str(
//!     r#"{"file_key":"FILE1","file_name":"Kit","triggered_by":{"handle":"alex"}}"#,
//! ).unwrap();
//! let created = vec![ComponentEntry::new("10:20", "Buttons, Primary")];
//! let report = compile_report(&event, &created, &[], None, &ReportSettings::default());
//! assert!(report.render().contains("node-id=10-20'>Buttons, Primary</a>"));
//! ```

pub mod compiler;
pub mod model;

pub use compiler::{compile_report, render_change, resolve_changes, ReportContext};
pub use model::{
    is_noise_field, more_marker, HistoryDiff, Report, ReportLimits, ReportSection, ReportSettings,
    ReportStats, ResolvedChange, SectionKind, NOISE_FIELDS,
};
