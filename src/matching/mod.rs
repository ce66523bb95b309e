// src/matching/mod.rs

pub mod normalize;
pub mod pipeline;
pub mod scoring;
pub mod strategies;
pub mod tables;

pub use pipeline::resolve_in_category;
pub use scoring::ScoringWeights;
pub use tables::{CuratedTables, KeywordEntry};
