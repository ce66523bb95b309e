// src/catalog/mod.rs
//! Read-only collaborators the resolver depends on: category lookup and candidate loading.

pub mod db;
pub mod memory;

use anyhow::Result;

use crate::models::{Category, CategoryId, ServiceCandidate};

pub use db::PgServiceCatalog;
pub use memory::InMemoryCatalog;

/// Source of categories and their services.
///
/// `Ok(None)` from `resolve_category` means the slug is unknown; `Err` is reserved for
/// failures of the backing store. An empty candidate list is a valid answer.
#[allow(async_fn_in_trait)]
pub trait ServiceCatalog {
    async fn resolve_category(&self, slug: &str) -> Result<Option<Category>>;

    async fn load_candidates(&self, category_id: CategoryId) -> Result<Vec<ServiceCandidate>>;
}
