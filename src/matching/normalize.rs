// src/matching/normalize.rs
// Text normalization shared by identifiers, candidate titles and curated tokens.

use once_cell::sync::Lazy;
use regex::Regex;

// Words this short are prepositions and particles ("в", "на", "of"), not discriminators.
const MAX_DISCARDED_WORD_LENGTH: usize = 2;

static SEPARATOR_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-]+").expect("separator pattern is valid"));

/// Hyphens become spaces, whitespace runs collapse, everything is lower-cased and trimmed.
///
/// Used on both sides of a comparison so that `"breast-ultrasound"` and
/// `"Breast  Ultrasound"` normalize identically.
pub fn normalize_text(text: &str) -> String {
    SEPARATOR_RUNS
        .replace_all(text, " ")
        .to_lowercase()
        .trim()
        .to_string()
}

/// Splits normalized text into words, dropping the ones too short to discriminate.
/// Length is counted in characters so Cyrillic words are not over-counted.
pub fn significant_words(normalized: &str) -> Vec<String> {
    normalized
        .split_whitespace()
        .filter(|word| word.chars().count() > MAX_DISCARDED_WORD_LENGTH)
        .map(str::to_string)
        .collect()
}

/// Normalized title and subtitle of one candidate plus their significant words,
/// computed once per scoring pass.
#[derive(Debug, Clone, Default)]
pub struct CandidateText {
    pub title: String,
    pub subtitle: String,
    pub title_words: Vec<String>,
    pub subtitle_words: Vec<String>,
}

impl CandidateText {
    pub fn new(title: &str, subtitle: Option<&str>) -> Self {
        let title = normalize_text(title);
        let subtitle = subtitle.map(normalize_text).unwrap_or_default();
        Self {
            title_words: significant_words(&title),
            subtitle_words: significant_words(&subtitle),
            title,
            subtitle,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.title.contains(token) || self.subtitle.contains(token)
    }
}
