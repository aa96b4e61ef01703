//! Diff command
//!
//! Usage: figwatch diff --before <FILE> --after <FILE> [--output <FILE>]

use super::{emit, read_snapshot};
use anyhow::Result;
use clap::Args;
use figwatch_core::diff::compute_diff;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Older snapshot (left side)
    #[arg(long)]
    pub before: PathBuf,

    /// Newer snapshot (right side)
    #[arg(long)]
    pub after: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: DiffArgs) -> Result<()> {
    let before = read_snapshot(&args.before)?;
    let after = read_snapshot(&args.after)?;

    let records = compute_diff(&before, &after);
    tracing::debug!(record_count = records.len(), "diff computed");

    emit(&serde_json::to_string_pretty(&records)?, args.output.as_deref())
}
