//! # mg-sentiment-lexicon
//!
//! Lexicon-backed implementation of `SentimentClassifier`.
//!
//! Scores a text by summing signed word weights, turns the two masses into
//! pseudo-probabilities, and labels the text `neutral` whenever
//! `|P(pos) - P(neg)|` falls under the configured threshold. A trained
//! statistical model would slot in behind the same port; this plugin is the
//! deterministic stand-in that ships with the workspace.

use mg_core::models::Sentiment;
use mg_core::traits::SentimentClassifier;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Default gap between P(pos) and P(neg) under which a text is `neutral`.
pub const DEFAULT_NEUTRAL_THRESHOLD: f64 = 0.3;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word pattern"));

// (word, weight) — positive weights vote pos, negative vote neg.
// General social-media vocabulary; callers with a domain of their own
// should build the classifier from their own pairs.
const DEFAULT_WEIGHTS: [(&str, f64); 40] = [
    ("love", 0.8),
    ("great", 0.7),
    ("good", 0.5),
    ("happy", 0.7),
    ("best", 0.7),
    ("amazing", 0.8),
    ("awesome", 0.8),
    ("wonderful", 0.8),
    ("beautiful", 0.6),
    ("excited", 0.6),
    ("win", 0.6),
    ("thanks", 0.5),
    ("glad", 0.5),
    ("fun", 0.5),
    ("nice", 0.4),
    ("cool", 0.4),
    ("enjoy", 0.5),
    ("perfect", 0.7),
    ("brilliant", 0.7),
    ("proud", 0.5),
    ("hate", -0.8),
    ("awful", -0.8),
    ("terrible", -0.8),
    ("worst", -0.8),
    ("bad", -0.5),
    ("sad", -0.6),
    ("angry", -0.6),
    ("annoying", -0.5),
    ("fail", -0.6),
    ("broken", -0.5),
    ("ugly", -0.5),
    ("boring", -0.4),
    ("disappointing", -0.7),
    ("horrible", -0.8),
    ("useless", -0.6),
    ("scam", -0.9),
    ("wrong", -0.4),
    ("lose", -0.5),
    ("lost", -0.4),
    ("never", -0.3),
];

pub struct LexiconClassifier {
    weights: HashMap<String, f64>,
    neutral_threshold: f64,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    /// A classifier over the built-in general-purpose word list.
    pub fn new() -> Self {
        Self::from_pairs(DEFAULT_WEIGHTS)
    }

    /// A classifier over a caller-supplied `(word, weight)` list.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self {
            weights: pairs
                .into_iter()
                .map(|(word, weight)| (word.to_string(), weight))
                .collect(),
            neutral_threshold: DEFAULT_NEUTRAL_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, neutral_threshold: f64) -> Self {
        self.neutral_threshold = neutral_threshold;
        self
    }

    /// `(P(pos), P(neg))` for a text. Texts that hit neither word list come
    /// out dead even at `(0.5, 0.5)`.
    pub fn probabilities(&self, text: &str) -> (f64, f64) {
        let mut pos_mass = 0.0;
        let mut neg_mass = 0.0;
        for token in WORD.find_iter(&text.to_lowercase()) {
            match self.weights.get(token.as_str()) {
                Some(w) if *w > 0.0 => pos_mass += w,
                Some(w) => neg_mass += -w,
                None => {}
            }
        }

        if pos_mass + neg_mass == 0.0 {
            return (0.5, 0.5);
        }
        let p_pos = pos_mass / (pos_mass + neg_mass);
        (p_pos, 1.0 - p_pos)
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<Sentiment> {
        let (p_pos, p_neg) = self.probabilities(text);
        if (p_pos - p_neg).abs() < self.neutral_threshold {
            Ok(Sentiment::Neutral)
        } else if p_pos > p_neg {
            Ok(Sentiment::Pos)
        } else {
            Ok(Sentiment::Neg)
        }
    }
}
