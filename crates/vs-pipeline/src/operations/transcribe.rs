//! Speech-to-text operation.

use std::sync::Arc;

use async_trait::async_trait;
use vs_av::{write_text, ArtifactLayout, SpeechToText};
use vs_core::{StageKind, WorkItem};

use crate::operation::{StageOperation, StageOutput, UnitId};

/// Transcribe the extracted audio, caching the text on the item and
/// persisting it to `<name>.txt` for later stages and later runs.
pub struct TranscribeOperation {
    speech: Arc<dyn SpeechToText>,
}

impl TranscribeOperation {
    pub fn new(speech: Arc<dyn SpeechToText>) -> Self {
        Self { speech }
    }
}

#[async_trait]
impl StageOperation for TranscribeOperation {
    fn stage(&self) -> StageKind {
        StageKind::Transcribe
    }

    async fn run(&self, item: &mut WorkItem, _unit: UnitId) -> vs_core::Result<StageOutput> {
        let audio = item.require_audio(StageKind::Transcribe)?.to_path_buf();
        let layout = ArtifactLayout::for_item(item, StageKind::Transcribe)?;

        tracing::info!("Transcribing audio from {}", audio.display());
        let text = self.speech.transcribe(&audio).await?;

        let path = layout.transcript();
        write_text(&path, &text).await?;
        let words = text.split_whitespace().count();
        item.set_transcript(text, path.clone());

        Ok(StageOutput::new(format!("Transcribed {words} words")).with_artifact(path))
    }
}
