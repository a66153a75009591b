//! Lexicon-and-phrase review scoring.
//!
//! A review starts at a neutral 50. Every lexicon word present in the text
//! moves the score by 15 points and every phrase present moves it by 30.
//! Presence is what counts, so repeating a word does not move the score
//! further.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lexicon::{word_form, Lexicon};

const NEUTRAL_SCORE: i32 = 50;
const HIT_WEIGHT: i32 = 15;
const PHRASE_WEIGHT: i32 = 2;
const POSITIVE_THRESHOLD: u8 = 65;
const NEUTRAL_THRESHOLD: u8 = 40;
const MAX_KEYWORDS: usize = 5;
const MIN_KEYWORD_CHARS: usize = 5;
const KEYWORD_TRIM: &[char] = &['.', ',', '!', '?', ';', ':'];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn from_score(vibe_score: u8) -> Self {
        if vibe_score >= POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if vibe_score >= NEUTRAL_THRESHOLD {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment '{other}'")),
        }
    }
}

/// Outcome of scoring a single review.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VibeResult {
    pub vibe_score: u8,
    pub sentiment: Sentiment,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    lexicon: Lexicon,
}

impl Scorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Scores review text. Never fails: empty or symbol-only text scores a
    /// neutral 50 with no keywords.
    pub fn score(&self, text: &str) -> VibeResult {
        let lowered = text.to_lowercase();
        let padded = pad_words(&lowered);

        let positive = count_words(&padded, self.lexicon.positive_words.iter())
            + PHRASE_WEIGHT * count_phrases(&lowered, &self.lexicon.positive_phrases);
        let negative = count_words(&padded, self.lexicon.negative_words.iter())
            + PHRASE_WEIGHT * count_phrases(&lowered, &self.lexicon.negative_phrases);

        let raw = NEUTRAL_SCORE + HIT_WEIGHT * positive - HIT_WEIGHT * negative;
        let vibe_score = raw.clamp(0, 100) as u8;

        VibeResult {
            vibe_score,
            sentiment: Sentiment::from_score(vibe_score),
            keywords: extract_keywords(text),
        }
    }
}

/// First five whitespace tokens longer than four characters once the
/// surrounding punctuation is stripped, lower-cased, in text order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| token.trim_matches(KEYWORD_TRIM))
        .filter(|token| token.chars().count() >= MIN_KEYWORD_CHARS)
        .take(MAX_KEYWORDS)
        .map(str::to_lowercase)
        .collect()
}

// Wrapped in spaces so " word " only matches an isolated word.
fn pad_words(lowered: &str) -> String {
    format!(" {} ", word_form(lowered))
}

fn count_words<'a>(padded: &str, words: impl Iterator<Item = &'a String>) -> i32 {
    words
        .filter(|word| padded.contains(&format!(" {word} ")))
        .count() as i32
}

fn count_phrases(lowered: &str, phrases: &[String]) -> i32 {
    phrases
        .iter()
        .filter(|phrase| lowered.contains(phrase.as_str()))
        .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> VibeResult {
        Scorer::default().score(text)
    }

    #[test]
    fn empty_text_is_neutral() {
        let result = score("");
        assert_eq!(result.vibe_score, 50);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn punctuation_only_text_is_neutral() {
        let result = score("?!... ;;");
        assert_eq!(result.vibe_score, 50);
        assert!(result.keywords.is_empty());
    }

    #[test]
    fn positive_words_add_fifteen_each() {
        let result = score("This place was amazing and the staff were friendly");
        assert_eq!(result.vibe_score, 80);
        assert_eq!(result.sentiment, Sentiment::Positive);
    }

    #[test]
    fn negative_words_and_phrase_sink_the_score() {
        let result = score("The food was bad and the service was terrible, would not recommend");
        assert!(result.vibe_score < 40);
        assert_eq!(result.vibe_score, 0);
        assert_eq!(result.sentiment, Sentiment::Negative);
    }

    #[test]
    fn positive_phrase_carries_double_weight() {
        let result = score("highly recommend this place");
        assert_eq!(result.vibe_score, 80);
        assert_eq!(result.sentiment, Sentiment::Positive);
    }

    #[test]
    fn negated_phrase_outweighs_bare_word() {
        // "good" +15, "not good" -30
        let result = score("honestly it was not good");
        assert_eq!(result.vibe_score, 35);
        assert_eq!(result.sentiment, Sentiment::Negative);
    }

    #[test]
    fn repetition_does_not_inflate_score() {
        assert_eq!(score("great").vibe_score, 65);
        assert_eq!(score("great great great great").vibe_score, 65);
    }

    #[test]
    fn words_match_only_whole_tokens() {
        // "goods" and "badly" contain lexicon words but are not lexicon words
        let result = score("they sell goods badly");
        assert_eq!(result.vibe_score, 50);
    }

    #[test]
    fn punctuation_does_not_hide_words() {
        assert_eq!(score("Terrible!").vibe_score, 35);
        assert_eq!(score("(amazing)").vibe_score, 65);
    }

    #[test]
    fn quoted_words_still_match() {
        assert_eq!(score("The food was 'amazing'").vibe_score, 65);
        assert_eq!(score("The food was \"amazing\"").vibe_score, 65);
        assert_eq!(score("they said it's 'terrible'").vibe_score, 35);
    }

    #[test]
    fn hyphenated_lexicon_words_match() {
        let lexicon = Lexicon::from_toml_str(r#"positive_words = ["must-try"]"#).unwrap();
        let scorer = Scorer::new(lexicon);

        assert_eq!(scorer.score("a must-try spot").vibe_score, 65);
        assert_eq!(scorer.score("A MUST--TRY!").vibe_score, 65);
        assert_eq!(scorer.score("you must try it").vibe_score, 65);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(score("AMAZING").vibe_score, 65);
        assert_eq!(score("Highly Recommend").vibe_score, 80);
    }

    #[test]
    fn score_is_clamped_to_range() {
        let glowing = score(
            "amazing excellent fantastic friendly great wonderful delicious perfect, highly recommend",
        );
        assert_eq!(glowing.vibe_score, 100);

        let scathing = score("awful horrible rude dirty bland stale, never again, waste of time");
        assert_eq!(scathing.vibe_score, 0);
    }

    #[test]
    fn sentiment_thresholds() {
        assert_eq!(Sentiment::from_score(100), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(65), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(64), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(40), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(39), Sentiment::Negative);
        assert_eq!(Sentiment::from_score(0), Sentiment::Negative);
    }

    #[test]
    fn sentiment_round_trips_through_text() {
        for sentiment in [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative] {
            assert_eq!(sentiment.as_str().parse::<Sentiment>(), Ok(sentiment));
        }
        assert!("meh".parse::<Sentiment>().is_err());
        assert_eq!(
            serde_json::to_string(&Sentiment::Negative).unwrap(),
            "\"negative\""
        );
    }

    #[test]
    fn keywords_keep_long_tokens_in_order() {
        assert_eq!(
            extract_keywords("I absolutely loved the delicious pastries here"),
            vec!["absolutely", "loved", "delicious", "pastries"]
        );
    }

    #[test]
    fn keywords_strip_punctuation_before_length_check() {
        // "good!!" is four characters once stripped
        assert_eq!(
            extract_keywords("Good!! Lovely, WONDERFUL; coffee..."),
            vec!["lovely", "wonderful", "coffee"]
        );
    }

    #[test]
    fn keywords_are_capped_at_five() {
        let keywords = extract_keywords("alpha bravo charlie delta echoes foxtrot golfer");
        assert_eq!(
            keywords,
            vec!["alpha", "bravo", "charlie", "delta", "echoes"]
        );
    }

    #[test]
    fn custom_lexicon_replaces_default() {
        let lexicon = Lexicon::from_toml_str(
            r#"
            positive_words = ["gezellig"]
            negative_phrases = ["nooit meer"]
            "#,
        )
        .unwrap();
        let scorer = Scorer::new(lexicon);

        assert_eq!(scorer.score("zo gezellig").vibe_score, 65);
        assert_eq!(scorer.score("nooit meer").vibe_score, 20);
        assert_eq!(scorer.score("amazing").vibe_score, 50);
    }

    #[test]
    fn score_stays_in_range_for_assorted_inputs() {
        let inputs = [
            "",
            "   ",
            "ünïcödé ✨ café",
            "bad bad bad",
            "not good not good, would not, never again",
            "great good nice best, highly recommend, would recommend",
        ];
        for input in inputs {
            let result = score(input);
            assert!(result.vibe_score <= 100, "{input}");
            assert_eq!(result.sentiment, Sentiment::from_score(result.vibe_score));
        }
    }
}
