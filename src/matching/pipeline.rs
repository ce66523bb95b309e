// src/matching/pipeline.rs
// Ordered strategy chain: id > mapping > exact text > fuzzy scoring.
// Pure and synchronous; the category and its candidates are fetched by the caller.

use log::{debug, warn};

use super::scoring::{is_confident, ScoringWeights};
use super::strategies::{best_fuzzy_candidate, match_by_exact_text, match_by_id, match_by_mapping};
use super::tables::CuratedTables;
use crate::error::ResolveError;
use crate::models::{
    Category, ExternalIdentifier, MatchResult, MatchScore, MatchStrategy, ServiceCandidate,
};

/// Resolves `identifier` to at most one candidate of `category`.
///
/// A numeric identifier that misses is terminal: it is never reinterpreted as text.
/// Slugs go through mapping, exact text and finally fuzzy scoring, whose winner must
/// clear the confidence threshold in `weights`.
pub fn resolve_in_category(
    category: &Category,
    candidates: &[ServiceCandidate],
    identifier: &ExternalIdentifier,
    tables: &CuratedTables,
    weights: &ScoringWeights,
) -> Result<MatchResult, ResolveError> {
    let in_category: Vec<&ServiceCandidate> = candidates
        .iter()
        .filter(|c| c.category_id == category.id)
        .collect();
    if in_category.len() != candidates.len() {
        warn!(
            "Ignoring {} candidates outside category '{}'",
            candidates.len() - in_category.len(),
            category.slug
        );
    }

    let slug = match identifier {
        ExternalIdentifier::NumericId(id) => {
            return match_by_id(*id, category, &in_category).ok_or_else(|| {
                ResolveError::NumericIdNotFound {
                    category: category.slug.clone(),
                    id: *id,
                }
            });
        }
        ExternalIdentifier::SlugToken(slug) => slug.as_str(),
    };

    if let Some(hit) = match_by_mapping(slug, category, &in_category, tables) {
        debug!("'{}' resolved by canonical mapping", slug);
        return Ok(hit);
    }

    if let Some(hit) = match_by_exact_text(slug, &in_category) {
        debug!("'{}' resolved by exact text", slug);
        return Ok(hit);
    }

    match best_fuzzy_candidate(slug, &in_category, tables, weights) {
        Some((candidate, score)) if is_confident(score, weights) => Ok(MatchResult {
            candidate: candidate.clone(),
            score: MatchScore::Scored(score),
            strategy: MatchStrategy::Fuzzy,
        }),
        best => Err(ResolveError::NoConfidentMatch {
            identifier: slug.to_string(),
            best_score: best.map(|(_, score)| score),
        }),
    }
}
