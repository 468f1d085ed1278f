//! Translation operation.

use std::sync::Arc;

use async_trait::async_trait;
use vs_av::{write_text, ArtifactLayout};
use vs_core::config::TranslationConfig;
use vs_core::{StageKind, WorkItem};
use vs_text::Translator;

use crate::operation::{StageOperation, StageOutput, UnitId};

/// Translate the transcript and persist `<name>_<Language>.txt`.
pub struct TranslateOperation {
    translator: Arc<dyn Translator>,
    source_lang: String,
    target_lang: String,
    target_name: String,
}

impl TranslateOperation {
    pub fn new(translator: Arc<dyn Translator>, config: &TranslationConfig) -> Self {
        Self {
            translator,
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            target_name: config.target_name.clone(),
        }
    }
}

#[async_trait]
impl StageOperation for TranslateOperation {
    fn stage(&self) -> StageKind {
        StageKind::Translate
    }

    async fn run(&self, item: &mut WorkItem, _unit: UnitId) -> vs_core::Result<StageOutput> {
        let text = item.load_transcript(StageKind::Translate).await?;
        let layout = ArtifactLayout::for_item(item, StageKind::Translate)?;

        tracing::info!("Translating the video {} to {}", item.label(), self.target_name);
        let translated = self
            .translator
            .translate(&text, &self.source_lang, &self.target_lang)
            .await?;

        let path = layout.translation(&self.target_name);
        write_text(&path, &translated).await?;
        item.translated_path = Some(path.clone());

        Ok(StageOutput::new(format!("Translated to {}", self.target_name)).with_artifact(path))
    }
}
