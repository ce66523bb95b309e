// src/utils/resolver_config.rs
use anyhow::Result;
use log::{info, warn};
use std::env;
use std::path::PathBuf;

use crate::matching::{CuratedTables, ScoringWeights};

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub tables_path: Option<PathBuf>,
    pub weights: ScoringWeights,
}

fn weight_from_env(key: &str, default: i32) -> i32 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<i32>().unwrap_or_else(|_| {
            warn!(
                "Ignoring {}={:?}: not an integer, using {}",
                key, raw, default
            );
            default
        }),
        Err(_) => default,
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        let tables_path = env::var("RESOLVER_TABLES_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let defaults = ScoringWeights::default();
        let weights = ScoringWeights {
            min_confident_score: weight_from_env(
                "RESOLVER_MIN_SCORE",
                defaults.min_confident_score,
            ),
            all_keywords_bonus: weight_from_env(
                "RESOLVER_WEIGHT_ALL_KEYWORDS",
                defaults.all_keywords_bonus,
            ),
            per_keyword_bonus: weight_from_env(
                "RESOLVER_WEIGHT_KEYWORD",
                defaults.per_keyword_bonus,
            ),
            title_token_bonus: weight_from_env(
                "RESOLVER_WEIGHT_TITLE_TOKEN",
                defaults.title_token_bonus,
            ),
            subtitle_token_bonus: weight_from_env(
                "RESOLVER_WEIGHT_SUBTITLE_TOKEN",
                defaults.subtitle_token_bonus,
            ),
            containment_bonus: weight_from_env(
                "RESOLVER_WEIGHT_CONTAINMENT",
                defaults.containment_bonus,
            ),
            conflict_penalty: weight_from_env(
                "RESOLVER_CONFLICT_PENALTY",
                defaults.conflict_penalty,
            ),
        };

        Self {
            tables_path,
            weights,
        }
    }

    /// Curated tables from `RESOLVER_TABLES_PATH`, or the compiled-in set.
    pub fn load_tables(&self) -> Result<CuratedTables> {
        match &self.tables_path {
            Some(path) => CuratedTables::load_from_file(path),
            None => Ok(CuratedTables::builtin()),
        }
    }

    pub fn log_config(&self) {
        match &self.tables_path {
            Some(path) => info!("📚 Curated tables: {}", path.display()),
            None => info!("📚 Curated tables: built-in"),
        }
        if self.weights == ScoringWeights::default() {
            info!(
                "⚖️ Scoring weights: defaults (min score {})",
                self.weights.min_confident_score
            );
        } else {
            warn!("⚖️ Scoring weights OVERRIDDEN: {:?}", self.weights);
        }
    }
}
