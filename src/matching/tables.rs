// src/matching/tables.rs
// Hand-curated lookup data: per-identifier keyword entries and per-category canonical titles.
// Both tables are immutable once built; a JSON file can replace the compiled-in set at startup.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::normalize::normalize_text;

/// Search tokens curated for one external identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    #[serde(default, rename = "positive")]
    pub positive_tokens: Vec<String>,
    /// Tokens that identify a different, easily confused service.
    #[serde(default, rename = "conflict")]
    pub conflict_tokens: Vec<String>,
}

impl KeywordEntry {
    pub fn new(positive: &[&str], conflict: &[&str]) -> Self {
        Self {
            positive_tokens: positive.iter().map(|t| t.to_string()).collect(),
            conflict_tokens: conflict.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn normalized(&self) -> Self {
        Self {
            positive_tokens: self.positive_tokens.iter().map(|t| normalize_text(t)).collect(),
            conflict_tokens: self.conflict_tokens.iter().map(|t| normalize_text(t)).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CuratedTables {
    /// external id -> keyword entry
    #[serde(default)]
    keywords: HashMap<String, KeywordEntry>,
    /// category slug -> external id -> canonical title (verbatim, case-sensitive)
    #[serde(default)]
    mappings: HashMap<String, HashMap<String, String>>,
}

// Ultrasound menu slugs share "УЗИ" and overlapping prefixes; conflict tokens keep them apart.
const BUILTIN_KEYWORDS: &[(&str, &[&str], &[&str])] = &[
    ("breast-ultrasound", &["узи", "молочн"], &["малого", "таза", "щитовид"]),
    ("pelvic-ultrasound", &["узи", "малого таза"], &["молочн", "щитовид"]),
    ("thyroid-ultrasound", &["узи", "щитовид"], &["молочн", "малого", "таза"]),
    ("abdominal-ultrasound", &["узи", "брюшной"], &[]),
    ("fetal-ultrasound", &["узи", "плод"], &[]),
    ("gynecologist-consultation", &["консультац", "гинеколог"], &[]),
    ("colposcopy", &["кольпоскоп"], &[]),
    ("cervical-biopsy", &["биопси", "шейки"], &[]),
    ("smear-test", &["мазок"], &[]),
    ("pregnancy-management", &["ведение", "беременност"], &[]),
];

const BUILTIN_MAPPINGS: &[(&str, &str, &str)] = &[
    ("ultrasound", "breast-ultrasound", "УЗИ молочных желез"),
    ("ultrasound", "pelvic-ultrasound", "УЗИ органов малого таза"),
    ("ultrasound", "thyroid-ultrasound", "УЗИ щитовидной железы"),
    ("ultrasound", "abdominal-ultrasound", "УЗИ органов брюшной полости"),
    ("gynecology", "gynecologist-consultation", "Консультация гинеколога"),
    ("gynecology", "colposcopy", "Кольпоскопия"),
    ("gynecology", "pregnancy-management", "Ведение беременности"),
];

static BUILTIN_TABLES: Lazy<CuratedTables> = Lazy::new(|| {
    let keywords = BUILTIN_KEYWORDS
        .iter()
        .map(|(id, positive, conflict)| {
            (id.to_string(), KeywordEntry::new(positive, conflict))
        })
        .collect();
    let mut mappings: HashMap<String, HashMap<String, String>> = HashMap::new();
    for (category, id, title) in BUILTIN_MAPPINGS {
        mappings
            .entry(category.to_string())
            .or_default()
            .insert(id.to_string(), title.to_string());
    }
    CuratedTables::from_parts(keywords, mappings)
});

impl CuratedTables {
    /// Builds tables from raw parts.
    /// Keyword tokens are normalized; canonical titles are kept verbatim.
    pub fn from_parts(
        keywords: HashMap<String, KeywordEntry>,
        mappings: HashMap<String, HashMap<String, String>>,
    ) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|(id, entry)| (id, entry.normalized()))
            .collect();
        Self { keywords, mappings }
    }

    pub fn builtin() -> Self {
        BUILTIN_TABLES.clone()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: CuratedTables =
            serde_json::from_str(json).context("Failed to parse curated tables JSON")?;
        let tables = Self::from_parts(raw.keywords, raw.mappings);
        tables.validate()?;
        Ok(tables)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading curated resolver tables from {}", path.display());
        let json = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read curated tables from {}", path.display())
        })?;
        let tables = Self::from_json_str(&json)
            .with_context(|| format!("Invalid curated tables in {}", path.display()))?;
        info!(
            "Loaded {} keyword entries and {} mapping entries",
            tables.keywords.len(),
            tables.mapping_count()
        );
        Ok(tables)
    }

    /// Rejects curation mistakes that would make scoring meaningless.
    pub fn validate(&self) -> Result<()> {
        for (id, entry) in &self.keywords {
            if id.trim().is_empty() {
                bail!("Keyword entry with an empty identifier");
            }
            if entry
                .positive_tokens
                .iter()
                .chain(entry.conflict_tokens.iter())
                .any(|token| token.is_empty())
            {
                bail!("Keyword entry '{}' contains an empty token", id);
            }
            if let Some(token) = entry
                .positive_tokens
                .iter()
                .find(|token| entry.conflict_tokens.contains(token))
            {
                bail!(
                    "Keyword entry '{}' lists '{}' as both positive and conflicting",
                    id,
                    token
                );
            }
        }
        for (category, entries) in &self.mappings {
            for (id, title) in entries {
                if title.trim().is_empty() {
                    bail!(
                        "Mapping '{}'/'{}' has an empty canonical title",
                        category,
                        id
                    );
                }
            }
        }
        debug!("Curated tables passed validation");
        Ok(())
    }

    pub fn keyword_entry(&self, external_id: &str) -> Option<&KeywordEntry> {
        self.keywords.get(external_id)
    }

    pub fn canonical_title(&self, category_slug: &str, external_id: &str) -> Option<&str> {
        self.mappings
            .get(category_slug)
            .and_then(|entries| entries.get(external_id))
            .map(String::as_str)
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.values().map(HashMap::len).sum()
    }

    /// All mapping entries as (category slug, external id, canonical title), in a stable order.
    pub fn mapping_entries(&self) -> Vec<(&str, &str, &str)> {
        let ordered: BTreeMap<(&str, &str), &str> = self
            .mappings
            .iter()
            .flat_map(|(category, entries)| {
                entries.iter().map(move |(id, title)| {
                    ((category.as_str(), id.as_str()), title.as_str())
                })
            })
            .collect();
        ordered
            .into_iter()
            .map(|((category, id), title)| (category, id, title))
            .collect()
    }
}
