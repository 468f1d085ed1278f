//! Append-only acquisition log shared by concurrent units.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::operation::UnitId;

/// One completed acquisition, serialized as a single JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionRecord {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub success: bool,
    pub unit: UnitId,
}

impl AcquisitionRecord {
    /// A record stamped with the current time.
    pub fn new(source: impl Into<String>, success: bool, unit: UnitId) -> Self {
        Self {
            timestamp: Utc::now(),
            source: source.into(),
            success,
            unit,
        }
    }
}

/// Exclusive-access writer over one append-only log file.
///
/// Each [`append`](SharedLogWriter::append) holds the lock for exactly one
/// `write_all` + `flush` of a complete line, so records from concurrent units
/// never interleave. The guard is scoped to the call and released on every
/// exit path, including a failed write.
#[derive(Debug)]
pub struct SharedLogWriter {
    path: PathBuf,
    file: Mutex<File>,
}

impl SharedLogWriter {
    /// Open (or create) the log at `path` in append mode.
    pub async fn open(path: &Path) -> vs_core::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        tracing::debug!(path = %path.display(), "Opened acquisition log");
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line.
    pub async fn append(&self, record: &AcquisitionRecord) -> vs_core::Result<()> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| vs_core::Error::Internal(format!("failed to encode log record: {e}")))?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
