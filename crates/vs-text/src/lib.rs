//! # vs-text
//!
//! Text analysis for transcripts: lexicon-based sentiment and emotion
//! scoring, plus an HTTP machine-translation client.
//!
//! The lexicons are compiled into the binary and loaded once per process
//! (see [`lexicon::lexicon`]); analyzers only ever read them, so any number
//! of concurrent stage units may share them.

pub mod emotion;
pub mod lexicon;
pub mod sentiment;
pub mod translate;

pub use emotion::{EmotionAnalyzer, EMOTIONS};
pub use sentiment::SentimentAnalyzer;
pub use translate::{HttpTranslator, Translator};

/// Lowercased word tokens of `text`, keeping inner apostrophes.
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
}
