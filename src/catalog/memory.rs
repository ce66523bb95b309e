// src/catalog/memory.rs
// Fixture-backed catalog for offline checks and tests.

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::path::Path;

use super::ServiceCatalog;
use crate::models::{Category, CategoryId, ServiceCandidate};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    services: Vec<ServiceCandidate>,
}

impl InMemoryCatalog {
    pub fn new(categories: Vec<Category>, services: Vec<ServiceCandidate>) -> Self {
        Self {
            categories,
            services,
        }
    }

    /// Reads `{ "categories": [...], "services": [...] }`.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| {
                format!("Failed to read catalog fixture {}", path.display())
            })?;
        let catalog: InMemoryCatalog = serde_json::from_str(&json)
            .with_context(|| format!("Invalid catalog fixture {}", path.display()))?;
        info!(
            "Loaded fixture catalog: {} categories, {} services",
            catalog.categories.len(),
            catalog.services.len()
        );
        Ok(catalog)
    }
}

impl ServiceCatalog for InMemoryCatalog {
    async fn resolve_category(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn load_candidates(&self, category_id: CategoryId) -> Result<Vec<ServiceCandidate>> {
        Ok(self
            .services
            .iter()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect())
    }
}
