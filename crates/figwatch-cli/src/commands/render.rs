//! Render command
//!
//! Usage: figwatch render --event <FILE> [--before <FILE> --after <FILE>]
//!        [--components <FILE>] [--output <FILE>]

use super::{emit, read_json, read_snapshot};
use anyhow::Result;
use clap::Args;
use figwatch_core::annotate::DEFAULT_WEB_BASE;
use figwatch_core::diff::StructuralDiffer;
use figwatch_core::model::{ComponentEntry, PublishEvent};
use figwatch_core::report::model::{DEFAULT_CHANGE_LIMIT, DEFAULT_COMPONENT_LIMIT};
use figwatch_core::report::{compile_report, HistoryDiff, ReportLimits, ReportSettings};
use figwatch_core::ExError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Publish event payload (JSON)
    #[arg(long)]
    pub event: PathBuf,

    /// Older snapshot; without both snapshots the report has no changes
    #[arg(long, requires = "after")]
    pub before: Option<PathBuf>,

    /// Newer snapshot
    #[arg(long, requires = "before")]
    pub after: Option<PathBuf>,

    /// Resolved components: {"created": [[id, label]], "modified": [[id, label]]}
    #[arg(long)]
    pub components: Option<PathBuf>,

    #[arg(long, env = "LIMIT", default_value_t = DEFAULT_COMPONENT_LIMIT)]
    pub limit: usize,

    #[arg(long, env = "CHANGES_LIMIT", default_value_t = DEFAULT_CHANGE_LIMIT)]
    pub changes_limit: usize,

    #[arg(long, env = "FIGWATCH_WEB_BASE", default_value = DEFAULT_WEB_BASE)]
    pub web_base: String,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentsFile {
    #[serde(default)]
    created: Vec<(String, String)>,
    #[serde(default)]
    modified: Vec<(String, String)>,
}

fn entries(pairs: &[(String, String)]) -> Vec<ComponentEntry> {
    pairs
        .iter()
        .map(|(id, label)| ComponentEntry::new(id, label.as_str()))
        .collect()
}

pub fn execute(args: RenderArgs) -> Result<()> {
    let event: PublishEvent = read_json(&args.event)?;
    event.validate().map_err(ExError::from)?;

    let components = match &args.components {
        Some(path) => read_json::<ComponentsFile>(path)?,
        None => ComponentsFile::default(),
    };

    let history = match (&args.before, &args.after) {
        (Some(before), Some(after)) => Some(HistoryDiff::compute(
            read_snapshot(before)?,
            read_snapshot(after)?,
            &StructuralDiffer,
        )),
        _ => None,
    };

    let settings = ReportSettings {
        web_base: args.web_base,
        limits: ReportLimits {
            component_limit: args.limit,
            change_limit: args.changes_limit,
        },
    };
    let report = compile_report(
        &event,
        &entries(&components.created),
        &entries(&components.modified),
        history.as_ref(),
        &settings,
    );

    emit(&report.render(), args.output.as_deref())
}
