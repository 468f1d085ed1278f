//! Source acquisition operations.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use vs_av::{ArtifactLayout, SourceFetcher};
use vs_core::item::display_name_from_title;
use vs_core::{StageKind, WorkItem};

use crate::log_writer::{AcquisitionRecord, SharedLogWriter};
use crate::operation::{StageOperation, StageOutput, UnitId};

/// Resolve the title, lay out the item folder, and download the media.
pub struct AcquireOperation {
    fetcher: Arc<dyn SourceFetcher>,
    data_dir: PathBuf,
}

impl AcquireOperation {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, data_dir: PathBuf) -> Self {
        Self { fetcher, data_dir }
    }
}

#[async_trait]
impl StageOperation for AcquireOperation {
    fn stage(&self) -> StageKind {
        StageKind::Acquire
    }

    async fn run(&self, item: &mut WorkItem, unit: UnitId) -> vs_core::Result<StageOutput> {
        let title = self.fetcher.title(item.source()).await?;
        let name = display_name_from_title(&title, item.id());
        let layout = ArtifactLayout::new(&self.data_dir, &name);
        layout.ensure_folder().await?;

        item.title = Some(title.clone());
        item.display_name = Some(name);
        item.folder = Some(layout.folder().to_path_buf());

        tracing::info!(unit = %unit, "Downloading video titled: {title}");
        let video = layout.video();
        self.fetcher.download(item.source(), &video).await?;
        item.video_path = Some(video.clone());

        Ok(StageOutput::new(format!("Download completed to {}", video.display()))
            .with_artifact(video))
    }
}

/// [`AcquireOperation`] that also appends one record per attempt to a
/// shared log.
///
/// Only the append is serialized; downloads still run concurrently. A failed
/// acquisition is logged with `success: false` and still reported as the
/// item's failure.
pub struct LoggedAcquireOperation {
    inner: AcquireOperation,
    log: Arc<SharedLogWriter>,
}

impl LoggedAcquireOperation {
    pub fn new(inner: AcquireOperation, log: Arc<SharedLogWriter>) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl StageOperation for LoggedAcquireOperation {
    fn stage(&self) -> StageKind {
        StageKind::Acquire
    }

    async fn run(&self, item: &mut WorkItem, unit: UnitId) -> vs_core::Result<StageOutput> {
        let result = self.inner.run(item, unit).await;
        let record = AcquisitionRecord::new(item.source(), result.is_ok(), unit);

        match (result, self.log.append(&record).await) {
            (Ok(output), Ok(())) => Ok(output),
            (Ok(_), Err(log_err)) => Err(log_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(log_err)) => {
                tracing::warn!(unit = %unit, "Failed to log acquisition: {log_err}");
                Err(e)
            }
        }
    }
}
