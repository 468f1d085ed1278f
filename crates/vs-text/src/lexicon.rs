//! Built-in word lists for sentiment and emotion scoring.
//!
//! The tables are small, hand-curated English lexicons in the spirit of the
//! pattern/TextBlob adjective lexicon and the NRC emotion lexicon. They are
//! indexed into hash maps on first use and shared for the lifetime of the
//! process.

use std::collections::HashMap;
use std::sync::OnceLock;

/// `(word, polarity, subjectivity)`.
const SENTIMENT_WORDS: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("boring", -1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("broken", -0.4, 0.4),
    ("clean", 0.37, 0.69),
    ("clear", 0.1, 0.38),
    ("cool", 0.35, 0.65),
    ("crazy", -0.6, 0.9),
    ("cruel", -1.0, 1.0),
    ("dangerous", -0.6, 0.9),
    ("difficult", -0.5, 1.0),
    ("dirty", -0.6, 0.8),
    ("disappointing", -0.6, 0.7),
    ("easy", 0.43, 0.83),
    ("excellent", 1.0, 1.0),
    ("exciting", 0.3, 0.8),
    ("fantastic", 0.4, 0.9),
    ("fast", 0.2, 0.6),
    ("fine", 0.42, 0.5),
    ("free", 0.4, 0.8),
    ("fun", 0.3, 0.2),
    ("funny", 0.25, 1.0),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("hard", -0.29, 0.54),
    ("helpful", 0.5, 0.6),
    ("horrible", -1.0, 1.0),
    ("important", 0.4, 1.0),
    ("impossible", -0.67, 1.0),
    ("interesting", 0.5, 0.5),
    ("lovely", 0.5, 0.75),
    ("love", 0.5, 0.6),
    ("lucky", 0.33, 1.0),
    ("nasty", -1.0, 1.0),
    ("nice", 0.6, 1.0),
    ("perfect", 1.0, 1.0),
    ("pleasant", 0.73, 0.97),
    ("poor", -0.4, 0.6),
    ("powerful", 0.3, 1.0),
    ("rich", 0.38, 0.75),
    ("sad", -0.5, 1.0),
    ("safe", 0.5, 0.5),
    ("scary", -0.5, 1.0),
    ("simple", 0.0, 0.36),
    ("slow", -0.3, 0.39),
    ("smart", 0.21, 0.64),
    ("strange", -0.05, 0.15),
    ("strong", 0.43, 0.73),
    ("stupid", -0.8, 1.0),
    ("terrible", -1.0, 1.0),
    ("ugly", -0.7, 1.0),
    ("useful", 0.3, 0.0),
    ("useless", -0.5, 0.2),
    ("weak", -0.38, 0.63),
    ("weird", -0.5, 1.0),
    ("wonderful", 1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

/// `(word, multiplier)` applied to the next sentiment word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.4),
    ("too", 1.2),
    ("totally", 1.4),
    ("very", 1.3),
    ("pretty", 1.1),
    ("quite", 1.1),
    ("somewhat", 0.8),
    ("slightly", 0.6),
    ("barely", 0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "nothing", "don't", "doesn't", "didn't", "isn't",
    "aren't", "wasn't", "weren't", "won't", "can't", "cannot", "couldn't", "shouldn't",
    "wouldn't",
];

/// `(word, emotion categories)`.
const EMOTION_WORDS: &[(&str, &[&str])] = &[
    ("abandon", &["fear", "negative", "sadness"]),
    ("accident", &["fear", "negative", "sadness", "surprise"]),
    ("admire", &["positive", "trust"]),
    ("afraid", &["fear", "negative"]),
    ("anger", &["anger", "negative"]),
    ("angry", &["anger", "disgust", "negative"]),
    ("anxious", &["anticipation", "fear", "negative"]),
    ("attack", &["anger", "fear", "negative"]),
    ("bad", &["anger", "disgust", "fear", "negative", "sadness"]),
    ("beautiful", &["joy", "positive"]),
    ("believe", &["trust"]),
    ("betray", &["anger", "disgust", "negative", "sadness", "surprise"]),
    ("birthday", &["anticipation", "joy", "positive", "surprise"]),
    ("celebrate", &["anticipation", "joy", "positive"]),
    ("cheat", &["anger", "disgust", "negative"]),
    ("confident", &["joy", "positive", "trust"]),
    ("crash", &["fear", "negative", "sadness", "surprise"]),
    ("cry", &["negative", "sadness"]),
    ("danger", &["fear", "negative"]),
    ("death", &["anger", "anticipation", "disgust", "fear", "negative", "sadness", "surprise"]),
    ("disaster", &["anger", "disgust", "fear", "negative", "sadness", "surprise"]),
    ("disgusting", &["anger", "disgust", "fear", "negative"]),
    ("doubt", &["fear", "negative", "sadness", "trust"]),
    ("excited", &["anticipation", "joy", "positive", "surprise", "trust"]),
    ("fail", &["disgust", "fear", "negative", "sadness"]),
    ("failure", &["disgust", "fear", "negative", "sadness"]),
    ("faith", &["anticipation", "joy", "positive", "trust"]),
    ("fear", &["anger", "fear", "negative"]),
    ("fight", &["anger", "fear", "negative"]),
    ("friend", &["joy", "positive", "trust"]),
    ("fun", &["anticipation", "joy", "positive"]),
    ("gift", &["anticipation", "joy", "positive", "surprise"]),
    ("good", &["anticipation", "joy", "positive", "surprise", "trust"]),
    ("grief", &["negative", "sadness"]),
    ("happy", &["anticipation", "joy", "positive", "trust"]),
    ("hate", &["anger", "disgust", "fear", "negative", "sadness"]),
    ("help", &["positive", "trust"]),
    ("hope", &["anticipation", "joy", "positive", "surprise", "trust"]),
    ("horrible", &["anger", "disgust", "fear", "negative"]),
    ("hurt", &["anger", "fear", "negative", "sadness"]),
    ("joy", &["joy", "positive"]),
    ("kill", &["fear", "negative", "sadness"]),
    ("laugh", &["joy", "positive", "surprise"]),
    ("lonely", &["anger", "disgust", "negative", "sadness"]),
    ("lose", &["anger", "disgust", "fear", "negative", "sadness", "surprise"]),
    ("love", &["joy", "positive"]),
    ("lucky", &["joy", "positive", "surprise"]),
    ("money", &["anger", "anticipation", "joy", "positive", "surprise", "trust"]),
    ("nasty", &["anger", "disgust", "fear", "negative"]),
    ("panic", &["fear", "negative"]),
    ("peace", &["anticipation", "joy", "positive", "trust"]),
    ("perfect", &["anticipation", "joy", "positive", "trust"]),
    ("promise", &["joy", "positive", "trust"]),
    ("proud", &["anticipation", "joy", "positive", "trust"]),
    ("rotten", &["disgust", "negative"]),
    ("sad", &["negative", "sadness"]),
    ("scream", &["anger", "disgust", "fear", "negative", "surprise"]),
    ("shock", &["anger", "fear", "negative", "surprise"]),
    ("sick", &["disgust", "negative", "sadness"]),
    ("smile", &["joy", "positive", "surprise", "trust"]),
    ("sudden", &["surprise"]),
    ("surprise", &["fear", "joy", "positive", "surprise"]),
    ("teacher", &["positive", "trust"]),
    ("terrible", &["anger", "disgust", "fear", "negative", "sadness"]),
    ("threat", &["anger", "fear", "negative"]),
    ("true", &["joy", "positive", "trust"]),
    ("trust", &["trust"]),
    ("truth", &["positive", "trust"]),
    ("wait", &["anticipation", "negative"]),
    ("war", &["fear", "negative"]),
    ("win", &["anticipation", "joy", "positive", "surprise"]),
    ("wonderful", &["joy", "positive", "surprise", "trust"]),
    ("worry", &["anticipation", "fear", "negative", "sadness"]),
];

/// Indexed word lists.
#[derive(Debug)]
pub struct Lexicon {
    sentiment: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
    negations: Vec<&'static str>,
    emotions: HashMap<&'static str, &'static [&'static str]>,
}

impl Lexicon {
    fn build() -> Self {
        let lexicon = Self {
            sentiment: SENTIMENT_WORDS
                .iter()
                .map(|&(w, p, s)| (w, (p, s)))
                .collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
            negations: NEGATIONS.to_vec(),
            emotions: EMOTION_WORDS.iter().copied().collect(),
        };
        tracing::debug!(
            sentiment_words = lexicon.sentiment.len(),
            emotion_words = lexicon.emotions.len(),
            "Lexicon loaded"
        );
        lexicon
    }

    /// Polarity and subjectivity for a word, if it carries sentiment.
    pub fn sentiment(&self, word: &str) -> Option<(f64, f64)> {
        self.sentiment.get(word).copied()
    }

    pub fn intensity(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(&word)
    }

    /// Emotion categories for a word, trying a few inflection strips when the
    /// exact form is unknown.
    pub fn emotions(&self, word: &str) -> Option<&'static [&'static str]> {
        if let Some(&cats) = self.emotions.get(word) {
            return Some(cats);
        }
        ["ing", "ed", "es", "s", "d"]
            .iter()
            .filter_map(|suffix| word.strip_suffix(suffix))
            .filter(|stem| stem.len() > 2)
            .find_map(|stem| self.emotions.get(stem).copied())
    }
}

/// The process-wide lexicon, built on first access.
pub fn lexicon() -> &'static Lexicon {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    LEXICON.get_or_init(Lexicon::build)
}
