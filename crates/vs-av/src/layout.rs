//! Deterministic artifact locations for a work item.
//!
//! Every artifact of an item lives in `<data_dir>/<display_name>/` and is
//! named after the display name, so a later stage (or a later run) can find
//! what an earlier stage wrote.

use std::path::{Path, PathBuf};

use vs_core::{StageKind, WorkItem};

/// File layout for one item's artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    folder: PathBuf,
    name: String,
}

impl ArtifactLayout {
    /// Layout for a new item under `data_dir`.
    pub fn new(data_dir: &Path, display_name: &str) -> Self {
        Self {
            folder: data_dir.join(display_name),
            name: display_name.to_string(),
        }
    }

    /// Layout recorded on an item by the acquisition stage.
    ///
    /// Fails with a prerequisite-missing error when acquisition never set the
    /// folder or display name.
    pub fn for_item(item: &WorkItem, stage: StageKind) -> vs_core::Result<Self> {
        Ok(Self {
            folder: item.require_folder(stage)?.to_path_buf(),
            name: item.require_display_name(stage)?.to_string(),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn video(&self) -> PathBuf {
        self.file(".mp4")
    }

    pub fn audio(&self) -> PathBuf {
        self.file(".wav")
    }

    pub fn transcript(&self) -> PathBuf {
        self.file(".txt")
    }

    pub fn sentiment(&self) -> PathBuf {
        self.file("_sentiment.txt")
    }

    /// Translated transcript, suffixed with the target language's name.
    pub fn translation(&self, language_name: &str) -> PathBuf {
        self.file(&format!("_{language_name}.txt"))
    }

    pub fn emotions(&self) -> PathBuf {
        self.file("_emotions.txt")
    }

    /// Create the item folder if it does not exist yet.
    pub async fn ensure_folder(&self) -> vs_core::Result<()> {
        tokio::fs::create_dir_all(&self.folder).await?;
        Ok(())
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.folder.join(format!("{}{suffix}", self.name))
    }
}

/// Write `text` to `path`, replacing any previous content.
pub async fn write_text(path: &Path, text: &str) -> vs_core::Result<()> {
    tokio::fs::write(path, text).await?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "Text has been written");
    Ok(())
}
