//! Audio extraction operation.

use std::sync::Arc;

use async_trait::async_trait;
use vs_av::{ArtifactLayout, AudioExtractor};
use vs_core::{StageKind, WorkItem};

use crate::operation::{StageOperation, StageOutput, UnitId};

/// Extract the audio track of the downloaded video into `<name>.wav`.
pub struct ExtractOperation {
    extractor: Arc<dyn AudioExtractor>,
}

impl ExtractOperation {
    pub fn new(extractor: Arc<dyn AudioExtractor>) -> Self {
        Self { extractor }
    }
}

#[async_trait]
impl StageOperation for ExtractOperation {
    fn stage(&self) -> StageKind {
        StageKind::Extract
    }

    async fn run(&self, item: &mut WorkItem, _unit: UnitId) -> vs_core::Result<StageOutput> {
        let video = item.require_video(StageKind::Extract)?.to_path_buf();
        let layout = ArtifactLayout::for_item(item, StageKind::Extract)?;
        let wav = layout.audio();

        tracing::info!("Extracting audio from {}", item.label());
        self.extractor.extract(&video, &wav).await?;
        item.audio_path = Some(wav.clone());

        Ok(StageOutput::new(format!("Extraction completed for {}", item.label())).with_artifact(wav))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::fakes::FakeExtractor;

    #[tokio::test]
    async fn missing_video_is_prerequisite_failure() {
        let op = ExtractOperation::new(Arc::new(FakeExtractor));
        let mut item = WorkItem::new("never-downloaded");
        let err = op.run(&mut item, UnitId::new(0)).await.unwrap_err();
        assert!(err.is_prerequisite_missing());
        assert!(err.to_string().contains("video file"), "got: {err}");
    }

    #[tokio::test]
    async fn extract_sets_audio_path() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Clip_one");
        std::fs::create_dir_all(&folder).unwrap();
        let video = folder.join("Clip_one.mp4");
        std::fs::write(&video, "v").unwrap();

        let mut item = WorkItem::new("src");
        item.display_name = Some("Clip_one".into());
        item.folder = Some(folder.clone());
        item.video_path = Some(video);

        let op = ExtractOperation::new(Arc::new(FakeExtractor));
        op.run(&mut item, UnitId::new(0)).await.unwrap();
        assert_eq!(item.audio_path, Some(folder.join("Clip_one.wav")));
        assert!(folder.join("Clip_one.wav").exists());
    }
}
