//! Resolution failures.
//!
//! The first three variants all mean "no canonical service for this identifier"
//! and collapse to a single not-found outcome for callers; they stay distinct
//! for logging and the table audit. `Catalog` is a collaborator failure and is
//! not a not-found.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("category '{slug}' not found")]
    CategoryNotFound { slug: String },

    #[error("service id {id} not found in category '{category}'")]
    NumericIdNotFound { category: String, id: i64 },

    #[error("no confident match for '{identifier}' (best score: {best_score:?})")]
    NoConfidentMatch {
        identifier: String,
        best_score: Option<i32>,
    },

    #[error("catalog error: {0:#}")]
    Catalog(#[from] anyhow::Error),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        !matches!(self, ResolveError::Catalog(_))
    }

    pub fn reason(&self) -> &'static str {
        match self {
            ResolveError::CategoryNotFound { .. } => "category_not_found",
            ResolveError::NumericIdNotFound { .. } => "numeric_id_not_found",
            ResolveError::NoConfidentMatch { .. } => "no_confident_match",
            ResolveError::Catalog(_) => "catalog_error",
        }
    }
}
