//! The fixed set of pipeline stages and their execution order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One phase of the fixed pipeline.
///
/// Stages always run in [`StageKind::ALL`] order; each is applied to the
/// whole batch before the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Fetch the remote media and persist it locally.
    Acquire,
    /// Extract the audio track from the downloaded video.
    Extract,
    /// Convert the audio track to text.
    Transcribe,
    /// Score the transcript's polarity and subjectivity.
    Sentiment,
    /// Translate the transcript into the target language.
    Translate,
    /// Score the transcript's emotion frequencies.
    Emotions,
}

impl StageKind {
    /// Every stage, in execution order.
    pub const ALL: [StageKind; 6] = [
        StageKind::Acquire,
        StageKind::Extract,
        StageKind::Transcribe,
        StageKind::Sentiment,
        StageKind::Translate,
        StageKind::Emotions,
    ];

    /// Stable snake_case name, used in config keys, logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Acquire => "acquire",
            StageKind::Extract => "extract",
            StageKind::Transcribe => "transcribe",
            StageKind::Sentiment => "sentiment",
            StageKind::Translate => "translate",
            StageKind::Emotions => "emotions",
        }
    }

    /// Verb phrase for stage summaries ("Time took to {verb} the videos").
    pub fn verb(&self) -> &'static str {
        match self {
            StageKind::Acquire => "download",
            StageKind::Extract => "extract audio from",
            StageKind::Transcribe => "transcribe audio from",
            StageKind::Sentiment => "perform sentiment analysis on",
            StageKind::Translate => "translate",
            StageKind::Emotions => "extract emotions from",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StageKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| crate::Error::Config(format!("unknown stage '{s}'")))
    }
}
