//! Sentiment scoring for hunter opinions
//!
//! Flavor only: nothing in the simulation reads these scores.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Scores text polarity in [-1, 1]
pub trait SentimentAnalyzer {
    fn polarity(&self, text: &str) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
}

/// A scored statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub text: String,
    pub polarity: f32,
    pub mood: Mood,
}

impl Opinion {
    pub fn new(text: &str, polarity: f32) -> Self {
        let polarity = polarity.clamp(-1.0, 1.0);
        let mood = if polarity > 0.05 {
            Mood::Positive
        } else if polarity < -0.05 {
            Mood::Negative
        } else {
            Mood::Neutral
        };
        Self {
            text: text.to_string(),
            polarity,
            mood,
        }
    }
}

/// Word-list scorer with simple negation handling
#[derive(Debug, Clone)]
pub struct LexiconAnalyzer {
    weights: AHashMap<&'static str, f32>,
}

const NEGATIONS: [&str; 5] = ["not", "never", "no", "isn't", "don't"];

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        let entries: [(&'static str, f32); 22] = [
            ("love", 0.5),
            ("great", 0.8),
            ("good", 0.7),
            ("happy", 0.8),
            ("helping", 0.3),
            ("found", 0.2),
            ("treasure", 0.1),
            ("rich", 0.4),
            ("safe", 0.5),
            ("recover", 0.3),
            ("rested", 0.4),
            ("okay", 0.5),
            ("bad", -0.7),
            ("exhausted", -0.6),
            ("scared", -0.6),
            ("afraid", -0.6),
            ("collapsing", -0.7),
            ("lost", -0.4),
            ("tired", -0.4),
            ("hate", -0.8),
            ("detained", -0.5),
            ("knights", -0.1),
        ];
        Self {
            weights: entries.into_iter().collect(),
        }
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn polarity(&self, text: &str) -> f32 {
        let mut total = 0.0;
        let mut hits = 0;
        let mut negate = false;

        for raw in text.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase();
            if NEGATIONS.contains(&word.as_str()) {
                negate = true;
                continue;
            }
            if let Some(weight) = self.weights.get(word.as_str()) {
                total += if negate { -weight * 0.5 } else { *weight };
                hits += 1;
            }
            negate = false;
        }

        if hits == 0 {
            return 0.0;
        }
        (total / hits as f32).clamp(-1.0, 1.0)
    }
}
