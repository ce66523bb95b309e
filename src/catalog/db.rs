// src/catalog/db.rs
use anyhow::{Context, Result};
use log::{debug, info};

use super::ServiceCatalog;
use crate::models::{Category, CategoryId, ServiceCandidate};
use crate::utils::db_connect::PgPool;

const SCHEMA_CHECK_SQL: &str = "
    SELECT to_regclass('public.service_category') IS NOT NULL AS has_categories,
           to_regclass('public.service') IS NOT NULL AS has_services";

const CATEGORY_BY_SLUG_SQL: &str = "
    SELECT id, slug
    FROM public.service_category
    WHERE slug = $1";

// Ordered by id so the fuzzy tie-break (first seen wins) is stable across calls.
const SERVICES_BY_CATEGORY_SQL: &str = "
    SELECT id, title, subtitle, category_id
    FROM public.service
    WHERE category_id = $1
    ORDER BY id";

/// Catalog backed by the clinic's PostgreSQL database.
#[derive(Clone)]
pub struct PgServiceCatalog {
    pool: PgPool,
}

impl PgServiceCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Fails unless both catalog tables are reachable through the pool.
    pub async fn check_schema(&self) -> Result<()> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for schema check")?;
        let row = conn
            .query_one(SCHEMA_CHECK_SQL, &[])
            .await
            .context("Schema check query failed")?;

        let has_categories: bool = row.get("has_categories");
        let has_services: bool = row.get("has_services");
        if !has_categories || !has_services {
            anyhow::bail!(
                "Catalog tables missing (service_category: {}, service: {})",
                has_categories,
                has_services
            );
        }
        info!("Catalog schema check passed");
        Ok(())
    }
}

impl ServiceCatalog for PgServiceCatalog {
    async fn resolve_category(&self, slug: &str) -> Result<Option<Category>> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for resolve_category")?;

        let row = conn
            .query_opt(CATEGORY_BY_SLUG_SQL, &[&slug])
            .await
            .with_context(|| format!("Failed to query category '{}'", slug))?;

        Ok(row.map(|row| Category {
            id: row.get("id"),
            slug: row.get("slug"),
        }))
    }

    async fn load_candidates(&self, category_id: CategoryId) -> Result<Vec<ServiceCandidate>> {
        let conn = self
            .pool
            .get()
            .await
            .context("Failed to get DB connection for load_candidates")?;

        let rows = conn
            .query(SERVICES_BY_CATEGORY_SQL, &[&category_id])
            .await
            .with_context(|| format!("Failed to load services for {category_id}"))?;
        debug!(
            "Loaded {} services for category {}",
            rows.len(),
            category_id
        );

        Ok(rows
            .iter()
            .map(|row| ServiceCandidate {
                id: row.get("id"),
                title: row.get("title"),
                subtitle: row.get("subtitle"),
                category_id: row.get("category_id"),
            })
            .collect())
    }
}
