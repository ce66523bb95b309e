// src/matching/scoring.rs
// Fuzzy keyword scoring for slug identifiers and the minimum-confidence gate applied to it.

use log::debug;

use super::normalize::CandidateText;
use super::tables::KeywordEntry;

// Empirically tuned values. They are defaults, not architecture; see ScoringWeights.
pub const MIN_CONFIDENT_SCORE: i32 = 5;
pub const ALL_KEYWORDS_BONUS: i32 = 50;
pub const PER_KEYWORD_BONUS: i32 = 10;
pub const TITLE_TOKEN_BONUS: i32 = 3;
pub const SUBTITLE_TOKEN_BONUS: i32 = 1;
pub const CONTAINMENT_BONUS: i32 = 10;
pub const CONFLICT_PENALTY: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub min_confident_score: i32,
    pub all_keywords_bonus: i32,
    pub per_keyword_bonus: i32,
    pub title_token_bonus: i32,
    pub subtitle_token_bonus: i32,
    pub containment_bonus: i32,
    pub conflict_penalty: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            min_confident_score: MIN_CONFIDENT_SCORE,
            all_keywords_bonus: ALL_KEYWORDS_BONUS,
            per_keyword_bonus: PER_KEYWORD_BONUS,
            title_token_bonus: TITLE_TOKEN_BONUS,
            subtitle_token_bonus: SUBTITLE_TOKEN_BONUS,
            containment_bonus: CONTAINMENT_BONUS,
            conflict_penalty: CONFLICT_PENALTY,
        }
    }
}

/// Normalized identifier plus everything derived from it that scoring needs.
#[derive(Debug, Clone)]
pub struct ScoringQuery<'a> {
    pub normalized: String,
    pub words: Vec<String>,
    pub keywords: Option<&'a KeywordEntry>,
}

/// Per-component breakdown, kept so debug logs can explain a winner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub keyword: i32,
    pub token_overlap: i32,
    pub containment: i32,
    pub conflict: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.keyword
            .saturating_add(self.token_overlap)
            .saturating_add(self.containment)
            .saturating_sub(self.conflict)
    }
}

pub fn score_candidate(
    query: &ScoringQuery<'_>,
    text: &CandidateText,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    if let Some(entry) = query.keywords {
        breakdown.keyword = keyword_bonus(entry, text, weights);
        let conflicting = entry.conflict_tokens.iter().any(|t| text.contains(t));
        if conflicting {
            breakdown.conflict = weights.conflict_penalty;
        }
    }

    let mut overlap: i32 = 0;
    for word in &query.words {
        if shares_word(&text.title_words, word) {
            overlap = overlap.saturating_add(weights.title_token_bonus);
        }
        if shares_word(&text.subtitle_words, word) {
            overlap = overlap.saturating_add(weights.subtitle_token_bonus);
        }
    }
    breakdown.token_overlap = overlap;

    if overlaps(&text.title, &query.normalized) {
        breakdown.containment = weights.containment_bonus;
    }

    breakdown
}

// A candidate carrying every curated keyword outranks any pile of partial hits.
fn keyword_bonus(
    entry: &KeywordEntry,
    text: &CandidateText,
    weights: &ScoringWeights,
) -> i32 {
    if entry.positive_tokens.is_empty() {
        return 0;
    }
    let found = entry
        .positive_tokens
        .iter()
        .filter(|token| text.contains(token))
        .count();
    if found == entry.positive_tokens.len() {
        weights.all_keywords_bonus
    } else {
        let found = i32::try_from(found).unwrap_or(i32::MAX);
        weights.per_keyword_bonus.saturating_mul(found)
    }
}

/// Word-level overlap: some candidate word contains `word` or is contained in it.
/// Candidate words are already stripped of short particles.
fn shares_word(candidate_words: &[String], word: &str) -> bool {
    candidate_words
        .iter()
        .any(|w| w.contains(word) || word.contains(w.as_str()))
}

/// Substring containment in either direction. Empty text never overlaps.
fn overlaps(text: &str, fragment: &str) -> bool {
    if text.is_empty() || fragment.is_empty() {
        return false;
    }
    text.contains(fragment) || fragment.contains(text)
}

/// The only gate between a fuzzy winner and the caller.
pub fn is_confident(score: i32, weights: &ScoringWeights) -> bool {
    let confident = score >= weights.min_confident_score;
    if !confident {
        debug!(
            "Rejecting fuzzy winner with score {} (minimum {})",
            score, weights.min_confident_score
        );
    }
    confident
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::normalize::{normalize_text, significant_words};

    fn query<'a>(raw: &str, keywords: Option<&'a KeywordEntry>) -> ScoringQuery<'a> {
        let normalized = normalize_text(raw);
        let words = significant_words(&normalized);
        ScoringQuery {
            normalized,
            words,
            keywords,
        }
    }

    #[test]
    fn test_all_keywords_dominate_partial_hits() {
        let entry = KeywordEntry::new(&["узи", "молочн"], &[]);
        let q = query("breast-ultrasound", Some(&entry));
        let weights = ScoringWeights::default();

        let text = CandidateText::new("УЗИ молочных желез", None);
        let full = score_candidate(&q, &text, &weights);
        assert_eq!(full.keyword, 50);

        let partial = score_candidate(&q, &CandidateText::new("УЗИ сосудов", None), &weights);
        assert_eq!(partial.keyword, 10);
        assert!(full.total() > partial.total());
    }

    #[test]
    fn test_conflict_penalty() {
        let entry = KeywordEntry::new(&["узи", "молочн"], &["малого", "таза"]);
        let q = query("breast-ultrasound", Some(&entry));
        let weights = ScoringWeights::default();

        let text = CandidateText::new("УЗИ органов малого таза", None);
        let pelvic = score_candidate(&q, &text, &weights);
        assert_eq!(
            pelvic,
            ScoreBreakdown {
                keyword: 10,
                token_overlap: 0,
                containment: 0,
                conflict: 20,
            }
        );
        assert_eq!(pelvic.total(), -10);
    }

    #[test]
    fn test_conflict_in_subtitle_counts() {
        let entry = KeywordEntry::new(&[], &["таза"]);
        let q = query("breast-ultrasound", Some(&entry));
        let text = CandidateText::new("Ультразвуковое исследование", Some("органов малого таза"));
        let breakdown = score_candidate(&q, &text, &ScoringWeights::default());
        assert_eq!(breakdown.conflict, 20);
    }

    #[test]
    fn test_token_overlap_weights_title_over_subtitle() {
        let q = query("colposcopy-extended", None);
        let weights = ScoringWeights::default();

        let in_title = score_candidate(&q, &CandidateText::new("Colposcopy", None), &weights);
        // "colposcopy" hits the title (+3); the title is also contained in the identifier (+10)
        assert_eq!(in_title.token_overlap, 3);
        assert_eq!(in_title.containment, 10);

        let text = CandidateText::new("Осмотр", Some("colposcopy"));
        let in_subtitle = score_candidate(&q, &text, &weights);
        assert_eq!(in_subtitle.token_overlap, 1);
        assert_eq!(in_subtitle.containment, 0);
    }

    #[test]
    fn test_token_overlap_is_word_level() {
        let weights = ScoringWeights::default();
        let text = CandidateText::new("Mammo screening", None);

        // Identifier words contain the shorter title words
        let q = query("mammography", None);
        assert_eq!(score_candidate(&q, &text, &weights).token_overlap, 3);

        let q = query("mammography-screenings", None);
        let breakdown = score_candidate(&q, &text, &weights);
        assert_eq!(
            breakdown,
            ScoreBreakdown {
                keyword: 0,
                token_overlap: 6,
                containment: 0,
                conflict: 0,
            }
        );
        assert!(is_confident(breakdown.total(), &weights));

        // Title word contains the identifier word
        let q = query("mammo", None);
        let text = CandidateText::new("Mammography of both sides", None);
        assert_eq!(score_candidate(&q, &text, &weights).token_overlap, 3);
    }

    #[test]
    fn test_short_candidate_words_never_overlap() {
        let weights = ScoringWeights::default();
        // "и" and "в" sit inside both identifier words but are too short to count
        let q = query("анализ-крови", None);
        let text = CandidateText::new("Осмотр и массаж", Some("в кабинете"));
        assert_eq!(score_candidate(&q, &text, &weights).token_overlap, 0);
    }

    #[test]
    fn test_huge_weights_saturate() {
        let weights = ScoringWeights {
            per_keyword_bonus: i32::MAX,
            title_token_bonus: i32::MAX,
            ..ScoringWeights::default()
        };
        let entry = KeywordEntry::new(&["узи", "молочн", "желез"], &["таза"]);
        let q = query("узи-молочных", Some(&entry));
        let text = CandidateText::new("УЗИ молочных", None);

        let breakdown = score_candidate(&q, &text, &weights);
        assert_eq!(breakdown.keyword, i32::MAX);
        assert_eq!(breakdown.token_overlap, i32::MAX);
        assert_eq!(breakdown.total(), i32::MAX);

        let pelvic = CandidateText::new("УЗИ малого таза", None);
        let breakdown = score_candidate(&q, &pelvic, &weights);
        assert_eq!(breakdown.total(), i32::MAX - CONFLICT_PENALTY);
    }

    #[test]
    fn test_containment_either_direction() {
        let weights = ScoringWeights::default();
        let q = query("smear", None);
        let longer_title = score_candidate(&q, &CandidateText::new("Smear test", None), &weights);
        assert_eq!(longer_title.containment, 10);

        let q = query("smear-test-online", None);
        let shorter_title = score_candidate(&q, &CandidateText::new("Smear test", None), &weights);
        assert_eq!(shorter_title.containment, 10);
    }

    #[test]
    fn test_empty_title_earns_nothing() {
        let q = query("anything-here", None);
        let text = CandidateText::new("   ", None);
        let breakdown = score_candidate(&q, &text, &ScoringWeights::default());
        assert_eq!(breakdown.total(), 0);
    }

    #[test]
    fn test_short_words_are_ignored() {
        let q = query("x-of-a", None);
        assert!(q.words.is_empty());
        let text = CandidateText::new("Экспресс анализ", None);
        let breakdown = score_candidate(&q, &text, &ScoringWeights::default());
        assert_eq!(breakdown.total(), 0);
    }

    #[test]
    fn test_threshold() {
        let weights = ScoringWeights::default();
        assert!(is_confident(5, &weights));
        assert!(is_confident(50, &weights));
        assert!(!is_confident(4, &weights));
        assert!(!is_confident(-10, &weights));
    }
}
