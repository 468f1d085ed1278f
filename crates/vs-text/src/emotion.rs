//! Affect frequencies over the ten NRC emotion categories.

use std::collections::BTreeMap;

use vs_core::EmotionFrequencies;

use crate::lexicon::{lexicon, Lexicon};
use crate::tokenize;

/// The emotion categories an analysis can report.
pub const EMOTIONS: [&str; 10] = [
    "fear",
    "anger",
    "anticipation",
    "trust",
    "surprise",
    "positive",
    "negative",
    "sadness",
    "disgust",
    "joy",
];

/// Counts emotion-bearing words per category.
#[derive(Debug, Clone, Copy)]
pub struct EmotionAnalyzer {
    lexicon: &'static Lexicon,
}

impl Default for EmotionAnalyzer {
    fn default() -> Self {
        Self { lexicon: lexicon() }
    }
}

impl EmotionAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw hit counts per category, sentence by sentence.
    pub fn count(&self, text: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for sentence in sentences(text) {
            for word in tokenize(sentence) {
                let Some(categories) = self.lexicon.emotions(&word) else {
                    continue;
                };
                for cat in categories {
                    *counts.entry((*cat).to_string()).or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Relative frequency of each category among all hits.
    pub fn analyze(&self, text: &str) -> EmotionFrequencies {
        EmotionFrequencies::from_counts(&self.count(text))
    }
}

/// Split text into trimmed sentences on `.`, `!` or `?` followed by
/// whitespace or end of input.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            None => true,
            Some(&(_, next)) => next.is_whitespace(),
        };
        if at_boundary {
            let end = i + c.len_utf8();
            let s = text[start..end].trim();
            if !s.is_empty() {
                out.push(s);
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_segmentation() {
        let s = sentences("Hello there. Version 1.5 is out! Is it good?  trailing words");
        assert_eq!(
            s,
            vec!["Hello there.", "Version 1.5 is out!", "Is it good?", "trailing words"]
        );
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn frequencies_over_hits() {
        let freq = EmotionAnalyzer::new().analyze("I love my friend. We were afraid!");
        assert!((freq.get("joy") - 2.0 / 7.0).abs() < 1e-9);
        assert!((freq.get("positive") - 2.0 / 7.0).abs() < 1e-9);
        assert!((freq.get("trust") - 1.0 / 7.0).abs() < 1e-9);
        assert!((freq.get("fear") - 1.0 / 7.0).abs() < 1e-9);
        assert_eq!(freq.get("anger"), 0.0);

        let total: f64 = freq.iter().map(|(_, v)| v).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_emotion_words() {
        let freq = EmotionAnalyzer::new().analyze("The quarterly figures are attached.");
        assert!(freq.is_empty());
    }

    #[test]
    fn only_known_categories() {
        let counts = EmotionAnalyzer::new().count("death and disaster, hope and money");
        assert!(counts.keys().all(|k| EMOTIONS.contains(&k.as_str())));
    }
}
