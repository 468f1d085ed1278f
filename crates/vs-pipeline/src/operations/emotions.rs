//! Emotion extraction operation.

use std::fmt::Write as _;

use async_trait::async_trait;
use vs_av::{write_text, ArtifactLayout};
use vs_core::{EmotionFrequencies, StageKind, WorkItem};
use vs_text::EmotionAnalyzer;

use crate::operation::{StageOperation, StageOutput, UnitId};

/// Compute affect frequencies over the transcript and persist
/// `<name>_emotions.txt`.
#[derive(Debug, Default)]
pub struct EmotionsOperation {
    analyzer: EmotionAnalyzer,
}

impl EmotionsOperation {
    pub fn new(analyzer: EmotionAnalyzer) -> Self {
        Self { analyzer }
    }
}

fn render(title: &str, freq: &EmotionFrequencies) -> String {
    let mut out = format!("Title: {title}\n");
    if freq.is_empty() {
        out.push_str("No emotion words found\n");
        return out;
    }
    for (emotion, value) in freq.iter() {
        let _ = writeln!(out, "{emotion}: {value:.4}");
    }
    out
}

#[async_trait]
impl StageOperation for EmotionsOperation {
    fn stage(&self) -> StageKind {
        StageKind::Emotions
    }

    async fn run(&self, item: &mut WorkItem, _unit: UnitId) -> vs_core::Result<StageOutput> {
        let text = item.load_transcript(StageKind::Emotions).await?;
        let layout = ArtifactLayout::for_item(item, StageKind::Emotions)?;

        let freq = self.analyzer.analyze(&text);
        let summary = match freq.dominant() {
            Some((emotion, value)) => format!("dominant emotion {emotion} ({value:.2})"),
            None => "no emotion words found".to_string(),
        };
        tracing::info!("Emotions and frequencies for the video {}: {summary}", item.label());

        let path = layout.emotions();
        write_text(&path, &render(item.label(), &freq)).await?;
        item.emotions = Some(freq);

        Ok(StageOutput::new(summary).with_artifact(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::fakes::transcribed_item;

    #[tokio::test]
    async fn writes_frequencies() {
        let dir = tempfile::tempdir().unwrap();
        let mut item = transcribed_item(dir.path(), "I love my friend. We were afraid!");

        let out = EmotionsOperation::default()
            .run(&mut item, UnitId::new(0))
            .await
            .unwrap();

        let freq = item.emotions.as_ref().unwrap();
        assert_eq!(freq.len(), 5);
        let written = std::fs::read_to_string(out.artifact.unwrap()).unwrap();
        assert!(written.contains("joy: 0.2857"), "got: {written}");
    }

    #[test]
    fn render_without_hits() {
        let text = render("T", &EmotionFrequencies::default());
        assert_eq!(text, "Title: T\nNo emotion words found\n");
    }

    #[tokio::test]
    async fn no_transcript_is_prerequisite_failure() {
        let mut item = WorkItem::new("src");
        let err = EmotionsOperation::default()
            .run(&mut item, UnitId::new(0))
            .await
            .unwrap_err();
        assert!(err.is_prerequisite_missing());
    }
}
