//! Lexicon-based polarity and subjectivity scoring.

use vs_core::SentimentScore;

use crate::lexicon::{lexicon, Lexicon};
use crate::tokenize;

/// Number of words a negation stays active for.
const NEGATION_WINDOW: usize = 3;

/// Negated polarity is flipped and damped, so "not good" is mildly negative
/// rather than as negative as "bad".
const NEGATION_FACTOR: f64 = -0.5;

/// Scores text by averaging the polarity and subjectivity of every sentiment
/// word it contains.
///
/// A preceding intensifier ("very", "slightly") scales the next sentiment
/// word; a negation within the last few words flips it. Text with no
/// sentiment words scores neutral and objective.
#[derive(Debug, Clone, Copy)]
pub struct SentimentAnalyzer {
    lexicon: &'static Lexicon,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self { lexicon: lexicon() }
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze(&self, text: &str) -> SentimentScore {
        let mut matched = 0usize;
        let mut polarity = 0.0;
        let mut subjectivity = 0.0;
        let mut negation_left = 0usize;
        let mut boost = 1.0;

        for word in tokenize(text) {
            if self.lexicon.is_negation(&word) {
                negation_left = NEGATION_WINDOW;
                continue;
            }
            if let Some(m) = self.lexicon.intensity(&word) {
                boost *= m;
                continue;
            }
            if let Some((p, s)) = self.lexicon.sentiment(&word) {
                let mut p = p * boost;
                if negation_left > 0 {
                    p *= NEGATION_FACTOR;
                }
                polarity += p.clamp(-1.0, 1.0);
                subjectivity += (s * boost).clamp(0.0, 1.0);
                matched += 1;
                negation_left = 0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
            boost = 1.0;
        }

        if matched == 0 {
            return SentimentScore::default();
        }
        SentimentScore {
            polarity: polarity / matched as f64,
            subjectivity: subjectivity / matched as f64,
        }
    }
}
