// src/models/stats_models.rs

use std::collections::HashMap;
use std::fmt;

use crate::error::ResolveError;
use crate::models::resolution::{MatchResult, MatchStrategy};

/// Tally of resolution outcomes over a batch of lookups (used by the table audit).
#[derive(Debug, Default, Clone)]
pub struct ResolutionStats {
    pub attempts: usize,
    pub found_by_strategy: HashMap<MatchStrategy, usize>,
    pub category_misses: usize,
    pub numeric_misses: usize,
    pub low_confidence_misses: usize,
    pub catalog_failures: usize,
}

impl ResolutionStats {
    pub fn record(&mut self, outcome: &Result<MatchResult, ResolveError>) {
        self.attempts += 1;
        match outcome {
            Ok(result) => *self.found_by_strategy.entry(result.strategy).or_insert(0) += 1,
            Err(ResolveError::CategoryNotFound { .. }) => self.category_misses += 1,
            Err(ResolveError::NumericIdNotFound { .. }) => self.numeric_misses += 1,
            Err(ResolveError::NoConfidentMatch { .. }) => self.low_confidence_misses += 1,
            Err(ResolveError::Catalog(_)) => self.catalog_failures += 1,
        }
    }

    pub fn found(&self) -> usize {
        self.found_by_strategy.values().sum()
    }

    pub fn found_with(&self, strategy: MatchStrategy) -> usize {
        self.found_by_strategy.get(&strategy).copied().unwrap_or(0)
    }

    pub fn not_found(&self) -> usize {
        self.category_misses + self.numeric_misses + self.low_confidence_misses
    }
}

impl fmt::Display for ResolutionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolutions attempted: {}", self.attempts)?;
        writeln!(f, "  Found: {}", self.found())?;
        for strategy in [
            MatchStrategy::Id,
            MatchStrategy::Mapping,
            MatchStrategy::ExactText,
            MatchStrategy::Fuzzy,
        ] {
            let count = self.found_with(strategy);
            writeln!(f, "    {}: {}", strategy.as_str(), count)?;
        }
        writeln!(f, "  Not found: {}", self.not_found())?;
        writeln!(f, "    category missing: {}", self.category_misses)?;
        writeln!(f, "    numeric id missing: {}", self.numeric_misses)?;
        writeln!(f, "    no confident match: {}", self.low_confidence_misses)?;
        write!(f, "  Catalog failures: {}", self.catalog_failures)
    }
}
