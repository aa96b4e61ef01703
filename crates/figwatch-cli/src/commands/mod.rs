pub mod diff;
pub mod render;
pub mod serve;

use anyhow::{Context, Result};
use figwatch_core::model::SnapshotTree;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn read_snapshot(path: &Path) -> Result<SnapshotTree> {
    read_json::<serde_json::Value>(path).map(SnapshotTree::from)
}

/// Write to `output`, or to stdout when absent.
pub fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Written to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
