//! Sentiment analysis operation.

use async_trait::async_trait;
use vs_av::{write_text, ArtifactLayout};
use vs_core::{StageKind, WorkItem};
use vs_text::SentimentAnalyzer;

use crate::operation::{StageOperation, StageOutput, UnitId};

/// Score the transcript and persist `<name>_sentiment.txt`.
#[derive(Debug, Default)]
pub struct SentimentOperation {
    analyzer: SentimentAnalyzer,
}

impl SentimentOperation {
    pub fn new(analyzer: SentimentAnalyzer) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl StageOperation for SentimentOperation {
    fn stage(&self) -> StageKind {
        StageKind::Sentiment
    }

    async fn run(&self, item: &mut WorkItem, _unit: UnitId) -> vs_core::Result<StageOutput> {
        let text = item.load_transcript(StageKind::Sentiment).await?;
        let layout = ArtifactLayout::for_item(item, StageKind::Sentiment)?;

        let score = self.analyzer.analyze(&text);
        tracing::info!(
            "Polarity measure of the video {} is: {:.4}",
            item.label(),
            score.polarity
        );
        tracing::info!(
            "Subjectivity measure of the video {} is: {:.4}",
            item.label(),
            score.subjectivity
        );

        let path = layout.sentiment();
        let report = format!(
            "Title: {}\nPolarity: {:.4}\nSubjectivity: {:.4}\n",
            item.label(),
            score.polarity,
            score.subjectivity
        );
        write_text(&path, &report).await?;
        item.sentiment = Some(score);

        Ok(StageOutput::new(score.to_string()).with_artifact(path))
    }
}
