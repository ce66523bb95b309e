// src/models/resolution.rs
// Read-only projections of catalog rows plus the identifier and result types used by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type CategoryId = i32;
pub type ServiceId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
}

/// Projection of a service row. Only the text fields and the id take part in matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCandidate {
    pub id: ServiceId,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub category_id: CategoryId,
}

/// Identifier as it arrives from a URL path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalIdentifier {
    NumericId(i64),
    SlugToken(String),
}

impl ExternalIdentifier {
    /// Anything `i64` accepts is a numeric id; everything else is an opaque slug.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(id) => ExternalIdentifier::NumericId(id),
            Err(_) => ExternalIdentifier::SlugToken(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    Id,
    Mapping,
    ExactText,
    Fuzzy,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Id => "id",
            MatchStrategy::Mapping => "mapping",
            MatchStrategy::ExactText => "exact-text",
            MatchStrategy::Fuzzy => "fuzzy",
        }
    }
}

/// Decisive strategies carry absolute confidence; only fuzzy scoring yields a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScore {
    Absolute,
    Scored(i32),
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchScore::Absolute => write!(f, "inf"),
            MatchScore::Scored(score) => write!(f, "{}", score),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub candidate: ServiceCandidate,
    pub score: MatchScore,
    pub strategy: MatchStrategy,
}

impl MatchResult {
    pub fn service_id(&self) -> ServiceId {
        self.candidate.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_parsing() {
        use ExternalIdentifier::{NumericId, SlugToken};

        assert_eq!(ExternalIdentifier::parse("11"), NumericId(11));
        assert_eq!(ExternalIdentifier::parse("007"), NumericId(7));
        assert_eq!(
            ExternalIdentifier::parse("breast-ultrasound"),
            SlugToken("breast-ultrasound".to_string())
        );
        let mixed = ExternalIdentifier::parse("11a");
        assert_eq!(mixed, SlugToken("11a".to_string()));
        // Overflowing digits cannot be a primary key, so they stay a slug
        assert!(matches!(
            ExternalIdentifier::parse("99999999999999999999999"),
            SlugToken(_)
        ));
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(MatchStrategy::ExactText.as_str(), "exact-text");
        let json = serde_json::to_string(&MatchStrategy::ExactText).unwrap();
        assert_eq!(json, "\"exact-text\"");
        assert_eq!(MatchScore::Absolute.to_string(), "inf");
        assert_eq!(MatchScore::Scored(50).to_string(), "50");
    }
}
