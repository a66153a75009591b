//! Word and phrase lists used by the scorer.
//!
//! The lists are plain data so they can be swapped per deployment (for
//! example a per-locale file) without touching the scoring code. A lexicon
//! file is TOML:
//!
//! ```toml
//! positive_words = ["great", "tasty"]
//! negative_words = ["bland"]
//! positive_phrases = ["highly recommend"]
//! negative_phrases = ["never again"]
//! ```
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "excellent", "fantastic", "friendly", "great", "good", "wonderful",
    "delicious", "love", "loved", "lovely", "perfect", "best", "nice", "clean", "fresh",
    "helpful", "cozy", "outstanding", "superb", "tasty", "pleasant", "beautiful", "incredible",
    "brilliant", "enjoyed", "favorite", "happy", "welcoming",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "worst", "rude", "dirty", "slow", "cold",
    "disgusting", "poor", "bland", "overpriced", "disappointing", "disappointed", "mediocre",
    "stale", "noisy", "unfriendly", "hate", "hated", "gross", "nasty", "broken", "greasy",
    "unprofessional", "crowded", "boring", "avoid",
];

const POSITIVE_PHRASES: &[&str] = &[
    "highly recommend",
    "would recommend",
    "will be back",
    "coming back",
];

const NEGATIVE_PHRASES: &[&str] = &[
    "not good",
    "would not",
    "never again",
    "waste of time",
    "not worth",
    "do not recommend",
];

/// Immutable scoring vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    #[serde(default)]
    pub positive_words: BTreeSet<String>,
    #[serde(default)]
    pub negative_words: BTreeSet<String>,
    #[serde(default)]
    pub positive_phrases: Vec<String>,
    #[serde(default)]
    pub negative_phrases: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            positive_words: to_set(POSITIVE_WORDS),
            negative_words: to_set(NEGATIVE_WORDS),
            positive_phrases: to_vec(POSITIVE_PHRASES),
            negative_phrases: to_vec(NEGATIVE_PHRASES),
        }
    }
}

impl Lexicon {
    /// Parses a lexicon from TOML. Entries are lower-cased and blank ones
    /// dropped. Words are also reduced to [`word_form`], so "must-try" is
    /// stored as "must try".
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: Lexicon = toml::from_str(raw)?;
        Ok(parsed.normalized())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let lexicon = Self::from_toml_str(&raw)?;
        info!(
            "Loaded lexicon from {} ({} positive / {} negative words, {} / {} phrases)",
            path.display(),
            lexicon.positive_words.len(),
            lexicon.negative_words.len(),
            lexicon.positive_phrases.len(),
            lexicon.negative_phrases.len()
        );
        Ok(lexicon)
    }

    fn normalized(self) -> Self {
        let clean = |s: String| {
            let s = s.trim().to_lowercase();
            (!s.is_empty()).then_some(s)
        };
        // Words are matched against `word_form` of the review text.
        let clean_word = |s: String| {
            let s = word_form(&s.to_lowercase());
            (!s.is_empty()).then_some(s)
        };
        Self {
            positive_words: self.positive_words.into_iter().filter_map(clean_word).collect(),
            negative_words: self.negative_words.into_iter().filter_map(clean_word).collect(),
            positive_phrases: self.positive_phrases.into_iter().filter_map(clean).collect(),
            negative_phrases: self.negative_phrases.into_iter().filter_map(clean).collect(),
        }
    }
}

/// Reduces text to its words separated by single spaces. Anything other
/// than a letter or digit separates words, except an apostrophe sitting
/// between two letters or digits ("don't").
pub fn word_form(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mapped: String = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let inner_apostrophe = c == '\''
                && i > 0
                && chars[i - 1].is_alphanumeric()
                && chars.get(i + 1).is_some_and(|next| next.is_alphanumeric());
            if c.is_alphanumeric() || inner_apostrophe {
                c
            } else {
                ' '
            }
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn to_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn to_vec(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_string()).collect()
}
