// src/resolver.rs
// Entry point for callers: category lookup, candidate load, then the pure matching pipeline.

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::catalog::ServiceCatalog;
use crate::error::ResolveError;
use crate::matching::{resolve_in_category, CuratedTables, ScoringWeights};
use crate::models::{ExternalIdentifier, MatchResult, ServiceId};

/// Resolves `(category slug, external identifier)` pairs against a catalog.
///
/// Holds no per-request state: the tables are shared read-only and every call
/// fetches its category and candidates fresh.
pub struct ServiceResolver<C> {
    catalog: C,
    tables: Arc<CuratedTables>,
    weights: ScoringWeights,
}

impl<C: ServiceCatalog> ServiceResolver<C> {
    pub fn new(
        catalog: C,
        tables: Arc<CuratedTables>,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            catalog,
            tables,
            weights,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn tables(&self) -> &CuratedTables {
        &self.tables
    }

    /// `Ok(None)` is the not-found outcome (render a 404); `Err` is a catalog failure.
    pub async fn resolve_service(
        &self,
        category_slug: &str,
        external_id: &str,
    ) -> Result<Option<ServiceId>> {
        let outcome = self
            .resolve_with_diagnostics(category_slug, external_id)
            .await;
        match outcome {
            Ok(result) => Ok(Some(result.service_id())),
            Err(ResolveError::Catalog(e)) => Err(e),
            Err(_) => Ok(None),
        }
    }

    /// Same resolution, keeping the winning strategy and score or the precise miss reason.
    pub async fn resolve_with_diagnostics(
        &self,
        category_slug: &str,
        external_id: &str,
    ) -> Result<MatchResult, ResolveError> {
        let outcome = self.run(category_slug, external_id).await;
        match &outcome {
            Ok(result) => debug!(
                "Resolved {}/{} -> service {} via {} (score {})",
                category_slug,
                external_id,
                result.service_id(),
                result.strategy.as_str(),
                result.score
            ),
            Err(e) => debug!("Could not resolve {}/{}: {}", category_slug, external_id, e),
        }
        outcome
    }

    async fn run(
        &self,
        category_slug: &str,
        external_id: &str,
    ) -> Result<MatchResult, ResolveError> {
        let category = self
            .catalog
            .resolve_category(category_slug)
            .await?
            .ok_or_else(|| ResolveError::CategoryNotFound {
                slug: category_slug.to_string(),
            })?;

        let candidates = self.catalog.load_candidates(category.id).await?;
        debug!(
            "Category '{}' (id {}) has {} candidate services",
            category.slug,
            category.id,
            candidates.len()
        );

        let identifier = ExternalIdentifier::parse(external_id);
        resolve_in_category(
            &category,
            &candidates,
            &identifier,
            &self.tables,
            &self.weights,
        )
    }
}
