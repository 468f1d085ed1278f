//! The per-source unit of pipeline state.
//!
//! A [`WorkItem`] is created once per source reference before the first stage
//! and mutated in place by exactly one stage operation per stage. Fields are
//! filled progressively; a stage that needs an artifact an earlier stage never
//! produced gets [`Error::PrerequisiteMissing`] from the `require_*`
//! accessors instead of panicking.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::ItemId;
use crate::stage::StageKind;

/// Polarity / subjectivity pair produced by the sentiment stage.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Negative to positive, in `[-1.0, 1.0]`.
    pub polarity: f64,
    /// Objective to subjective, in `[0.0, 1.0]`.
    pub subjectivity: f64,
}

impl fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "polarity={:.4} subjectivity={:.4}",
            self.polarity, self.subjectivity
        )
    }
}

/// Relative frequency of each detected emotion.
///
/// Frequencies sum to 1.0 whenever at least one emotion word was found.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionFrequencies(BTreeMap<String, f64>);

impl EmotionFrequencies {
    /// Build frequencies from raw per-emotion counts.
    pub fn from_counts(counts: &BTreeMap<String, usize>) -> Self {
        let total: usize = counts.values().sum();
        if total == 0 {
            return Self::default();
        }
        Self(
            counts
                .iter()
                .filter(|(_, &n)| n > 0)
                .map(|(k, &n)| (k.clone(), n as f64 / total as f64))
                .collect(),
        )
    }

    /// Frequency for one emotion, `0.0` when absent.
    pub fn get(&self, emotion: &str) -> f64 {
        self.0.get(emotion).copied().unwrap_or(0.0)
    }

    /// The most frequent emotion, ties broken alphabetically.
    pub fn dominant(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (k, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((k.as_str(), v)),
            })
    }

    /// Iterate emotions in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Derive the artifact base name from a media title.
///
/// Takes the first two whitespace-separated words joined with `_`; characters
/// that are unsafe in file names become `_`. An empty title falls back to the
/// item's short id.
pub fn display_name_from_title(title: &str, id: ItemId) -> String {
    let joined = title.split_whitespace().take(2).collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        format!("item_{}", id.short())
    } else {
        trimmed.to_string()
    }
}

/// Pipeline state for a single source reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    id: ItemId,
    source: String,
    /// Title reported by the source host.
    pub title: Option<String>,
    /// Base name for every artifact of this item.
    pub display_name: Option<String>,
    /// Directory holding this item's artifacts.
    pub folder: Option<PathBuf>,
    /// Downloaded media file.
    pub video_path: Option<PathBuf>,
    /// Extracted `.wav` audio track.
    pub audio_path: Option<PathBuf>,
    /// In-memory transcript cache. Not persisted; see [`WorkItem::load_transcript`].
    #[serde(skip)]
    pub transcript: Option<String>,
    /// Persisted transcript text file.
    pub transcript_path: Option<PathBuf>,
    pub sentiment: Option<SentimentScore>,
    /// Translated transcript file.
    pub translated_path: Option<PathBuf>,
    pub emotions: Option<EmotionFrequencies>,
}

impl WorkItem {
    /// Create an item with only its identity set.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            source: source.into(),
            title: None,
            display_name: None,
            folder: None,
            video_path: None,
            audio_path: None,
            transcript: None,
            transcript_path: None,
            sentiment: None,
            translated_path: None,
            emotions: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// The immutable source reference (e.g. a URL).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Human-friendly label for logs: the title when known, else the source.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.source)
    }

    pub fn require_display_name(&self, stage: StageKind) -> Result<&str> {
        self.display_name
            .as_deref()
            .ok_or_else(|| self.missing(stage, "display name"))
    }

    pub fn require_folder(&self, stage: StageKind) -> Result<&Path> {
        self.folder
            .as_deref()
            .ok_or_else(|| self.missing(stage, "artifact folder"))
    }

    pub fn require_video(&self, stage: StageKind) -> Result<&Path> {
        self.video_path
            .as_deref()
            .ok_or_else(|| self.missing(stage, "video file"))
    }

    pub fn require_audio(&self, stage: StageKind) -> Result<&Path> {
        self.audio_path
            .as_deref()
            .ok_or_else(|| self.missing(stage, "audio track"))
    }

    /// Whether a transcript is available in either storage form.
    pub fn has_transcript(&self) -> bool {
        self.transcript.is_some() || self.transcript_path.is_some()
    }

    /// Retrieve the transcript, preferring the in-memory cache.
    ///
    /// Falls back to reading [`WorkItem::transcript_path`]. Fails with
    /// [`Error::PrerequisiteMissing`] when neither form is present.
    pub async fn load_transcript(&self, stage: StageKind) -> Result<String> {
        if let Some(text) = &self.transcript {
            return Ok(text.clone());
        }
        let Some(path) = &self.transcript_path else {
            return Err(self.missing(stage, "transcript"));
        };
        let text = tokio::fs::read_to_string(path).await?;
        tracing::debug!(source = %self.source, path = %path.display(), "Retrieved transcript from file");
        Ok(text)
    }

    /// Record a transcript in both storage forms.
    pub fn set_transcript(&mut self, text: String, path: PathBuf) {
        self.transcript = Some(text);
        self.transcript_path = Some(path);
    }

    /// Drop the in-memory transcript, keeping the persisted path.
    pub fn evict_transcript(&mut self) {
        self.transcript = None;
    }

    fn missing(&self, stage: StageKind, artifact: &str) -> Error {
        Error::prerequisite(stage.as_str(), artifact, self.source.as_str())
    }
}
