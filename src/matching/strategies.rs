// src/matching/strategies.rs
// The individual resolution stages. Each is a pure function over an in-memory candidate set that
// either produces a decisive result or yields None so the pipeline can move to the next stage.

use log::{debug, warn};
use std::cmp::Ordering;
use strsim::jaro_winkler;

use super::normalize::{normalize_text, significant_words, CandidateText};
use super::scoring::{score_candidate, ScoringQuery, ScoringWeights};
use super::tables::CuratedTables;
use crate::models::{Category, MatchResult, MatchScore, MatchStrategy, ServiceCandidate};

/// Stage 0: primary key lookup restricted to the resolved category.
pub fn match_by_id(
    id: i64,
    category: &Category,
    candidates: &[&ServiceCandidate],
) -> Option<MatchResult> {
    candidates
        .iter()
        .find(|c| i64::from(c.id) == id && c.category_id == category.id)
        .map(|c| MatchResult {
            candidate: (*c).clone(),
            score: MatchScore::Absolute,
            strategy: MatchStrategy::Id,
        })
}

/// Stage 1: curated slug -> canonical title, compared verbatim.
/// A mapping whose title no longer exists in the data is reported and skipped.
pub fn match_by_mapping(
    slug: &str,
    category: &Category,
    candidates: &[&ServiceCandidate],
    tables: &CuratedTables,
) -> Option<MatchResult> {
    let canonical_title = tables.canonical_title(&category.slug, slug)?;

    if let Some(candidate) = candidates.iter().find(|c| c.title == canonical_title) {
        return Some(MatchResult {
            candidate: (*candidate).clone(),
            score: MatchScore::Absolute,
            strategy: MatchStrategy::Mapping,
        });
    }

    match closest_title(canonical_title, candidates) {
        Some((title, similarity)) => warn!(
            "Stale mapping {}/{}: no service titled '{}' (closest: '{}', similarity {:.3})",
            category.slug, slug, canonical_title, title, similarity
        ),
        None => warn!(
            "Stale mapping {}/{}: no service titled '{}' (category is empty)",
            category.slug, slug, canonical_title
        ),
    }
    None
}

fn closest_title<'a>(target: &str, candidates: &[&'a ServiceCandidate]) -> Option<(&'a str, f64)> {
    candidates
        .iter()
        .copied()
        .map(|c| (c.title.as_str(), jaro_winkler(target, &c.title)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
}

/// Stage 2: case-insensitive equality against title or subtitle. Only an unambiguous hit counts.
pub fn match_by_exact_text(slug: &str, candidates: &[&ServiceCandidate]) -> Option<MatchResult> {
    let needle = slug.to_lowercase();
    let mut hits = candidates.iter().filter(|c| {
        c.title.to_lowercase() == needle
            || c.subtitle.as_deref().map(str::to_lowercase).as_deref() == Some(needle.as_str())
    });

    let first = hits.next()?;
    if hits.next().is_some() {
        debug!(
            "Exact text '{}' matches several services; deferring to scoring",
            slug
        );
        return None;
    }
    Some(MatchResult {
        candidate: (*first).clone(),
        score: MatchScore::Absolute,
        strategy: MatchStrategy::ExactText,
    })
}

/// Stage 3: scores every candidate and returns the single best one with its score.
/// Ties keep the first candidate seen. The caller decides whether the score is good enough.
pub fn best_fuzzy_candidate<'a>(
    slug: &str,
    candidates: &[&'a ServiceCandidate],
    tables: &CuratedTables,
    weights: &ScoringWeights,
) -> Option<(&'a ServiceCandidate, i32)> {
    let normalized = normalize_text(slug);
    let query = ScoringQuery {
        words: significant_words(&normalized),
        normalized,
        keywords: tables.keyword_entry(slug),
    };
    debug!(
        "Fuzzy scoring '{}' over {} candidates (words: {:?}, curated keywords: {})",
        slug,
        candidates.len(),
        query.words,
        query.keywords.is_some()
    );

    let mut best: Option<(&'a ServiceCandidate, i32)> = None;
    for candidate in candidates.iter().copied() {
        let text = CandidateText::new(&candidate.title, candidate.subtitle.as_deref());
        let breakdown = score_candidate(&query, &text, weights);
        let score = breakdown.total();
        debug!(
            "  [{}] '{}' -> {} {:?}",
            candidate.id, candidate.title, score, breakdown
        );

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::tables::KeywordEntry;
    use std::collections::HashMap;

    fn candidate(id: i32, title: &str, subtitle: Option<&str>) -> ServiceCandidate {
        ServiceCandidate {
            id,
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
            category_id: 1,
        }
    }

    fn category() -> Category {
        Category {
            id: 1,
            slug: "ultrasound".to_string(),
        }
    }

    #[test]
    fn test_match_by_id_requires_same_category() {
        let own = candidate(10, "УЗИ молочных желез", None);
        let mut foreign = candidate(20, "Кольпоскопия", None);
        foreign.category_id = 2;
        let candidates = vec![&own, &foreign];

        let hit = match_by_id(10, &category(), &candidates).unwrap();
        assert_eq!(hit.service_id(), 10);
        assert_eq!(hit.strategy, MatchStrategy::Id);
        assert_eq!(hit.score, MatchScore::Absolute);

        assert!(match_by_id(20, &category(), &candidates).is_none());
        assert!(match_by_id(99, &category(), &candidates).is_none());
    }

    #[test]
    fn test_mapping_is_case_sensitive_and_scoped() {
        let mut mappings = HashMap::new();
        mappings.insert(
            "ultrasound".to_string(),
            HashMap::from([("breast".to_string(), "УЗИ молочных желез".to_string())]),
        );
        let tables = CuratedTables::from_parts(HashMap::new(), mappings);

        let exact = candidate(10, "УЗИ молочных желез", None);
        let hit = match_by_mapping("breast", &category(), &[&exact], &tables).unwrap();
        assert_eq!(hit.strategy, MatchStrategy::Mapping);

        let lowercase = candidate(10, "узи молочных желез", None);
        let miss = match_by_mapping("breast", &category(), &[&lowercase], &tables);
        assert!(miss.is_none());

        let other_category = Category {
            id: 1,
            slug: "gynecology".to_string(),
        };
        let miss = match_by_mapping("breast", &other_category, &[&exact], &tables);
        assert!(miss.is_none());
    }

    #[test]
    fn test_exact_text_matches_title_or_subtitle() {
        let a = candidate(1, "Colposcopy", None);
        let b = candidate(2, "Осмотр шейки матки", Some("Smear-Test"));
        let candidates = vec![&a, &b];

        let by_title = match_by_exact_text("colposcopy", &candidates).unwrap();
        assert_eq!(by_title.service_id(), 1);
        let by_subtitle = match_by_exact_text("smear-test", &candidates).unwrap();
        assert_eq!(by_subtitle.service_id(), 2);
        assert_eq!(by_subtitle.strategy, MatchStrategy::ExactText);
        assert!(match_by_exact_text("smear", &candidates).is_none());
    }

    #[test]
    fn test_exact_text_ambiguity_falls_through() {
        let a = candidate(1, "Colposcopy", None);
        let b = candidate(2, "Extended exam", Some("colposcopy"));
        assert!(match_by_exact_text("colposcopy", &[&a, &b]).is_none());
    }

    #[test]
    fn test_fuzzy_prefers_curated_candidate_over_confusable_ones() {
        let keywords = HashMap::from([(
            "breast-ultrasound".to_string(),
            KeywordEntry::new(&["узи", "молочн"], &["малого", "таза", "щитовид"]),
        )]);
        let tables = CuratedTables::from_parts(keywords, HashMap::new());
        let pelvic = candidate(11, "УЗИ органов малого таза", None);
        let breast = candidate(10, "УЗИ молочных желез", None);
        let thyroid = candidate(12, "УЗИ щитовидной железы", None);

        let (winner, score) = best_fuzzy_candidate(
            "breast-ultrasound",
            &[&pelvic, &breast, &thyroid],
            &tables,
            &ScoringWeights::default(),
        )
        .unwrap();
        assert_eq!(winner.id, 10);
        assert_eq!(score, 50);
    }

    #[test]
    fn test_fuzzy_ties_keep_first_seen() {
        let tables = CuratedTables::empty();
        let first = candidate(1, "Анализ крови", None);
        let second = candidate(2, "Анализ мочи", None);

        let (winner, score) = best_fuzzy_candidate(
            "nothing-matches",
            &[&first, &second],
            &tables,
            &ScoringWeights::default(),
        )
        .unwrap();
        assert_eq!(winner.id, 1);
        assert_eq!(score, 0);
    }

    #[test]
    fn test_fuzzy_on_empty_category() {
        let tables = CuratedTables::empty();
        let weights = ScoringWeights::default();
        let best = best_fuzzy_candidate("anything", &[], &tables, &weights);
        assert!(best.is_none());
    }
}
