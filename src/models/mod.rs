pub mod resolution;
pub mod stats_models;

pub use resolution::{
    Category, CategoryId, ExternalIdentifier, MatchResult, MatchScore, MatchStrategy,
    ServiceCandidate, ServiceId,
};
pub use stats_models::ResolutionStats;
