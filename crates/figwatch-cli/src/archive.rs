//! Payload archive.
//!
//! Each request gets a `<timestamp>-<request id>` prefix; the raw payload is
//! written as `<prefix>-event.json` and the report as `<prefix>-message.txt`.

use chrono::Utc;
use figwatch_core::errors::{ExError, ExErrorKind, Result};
use figwatch_core_types::RequestId;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Archive {
    dir: PathBuf,
}

impl Archive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn entry(&self, request_id: &RequestId) -> ArchiveEntry {
        ArchiveEntry {
            dir: self.dir.clone(),
            prefix: format!("{}-{}", Utc::now().format("%Y%m%d%H%M%S"), request_id),
        }
    }
}

/// Files of one request.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    dir: PathBuf,
    prefix: String,
}

impl ArchiveEntry {
    pub async fn save_event(&self, payload: &[u8]) -> Result<PathBuf> {
        self.write("event.json", payload).await
    }

    pub async fn save_message(&self, message: &str) -> Result<PathBuf> {
        self.write("message.txt", message.as_bytes()).await
    }

    async fn write(&self, suffix: &str, contents: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}-{}", self.prefix, suffix));
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| io_error(&path, e))?;
        Ok(path)
    }
}

fn io_error(path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op("archive")
        .with_entity_id(path.display().to_string())
        .with_message(err.to_string())
}
