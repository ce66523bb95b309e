// src/bin/audit_tables.rs
// Checks every curated mapping entry against the live catalog: does the canonical title still
// exist verbatim, and which strategy does the full pipeline actually use for that slug?

use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use resolver_lib::{
    catalog::{InMemoryCatalog, PgServiceCatalog, ServiceCatalog},
    models::{MatchStrategy, ResolutionStats},
    utils::{db_connect::connect, env::load_env, resolver_config::ResolverConfig},
    ServiceResolver,
};

#[derive(Parser, Debug)]
#[command(name = "audit_tables", version)]
struct Args {
    /// Audit against a JSON fixture of categories and services instead of the database
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Exit with an error if any mapping entry is stale
    #[arg(long)]
    strict: bool,
}

#[derive(Debug)]
struct StaleMapping {
    category: String,
    external_id: String,
    canonical_title: String,
    outcome: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    info!("Starting curated table audit");
    load_env();
    let args = Args::parse();

    let config = ResolverConfig::from_env();
    config.log_config();
    let tables = config
        .load_tables()
        .context("Failed to load curated tables")?;
    let tables = Arc::new(tables);
    tables
        .validate()
        .context("Curated tables failed validation")?;

    let stale = match &args.fixture {
        Some(path) => {
            let catalog = InMemoryCatalog::load_from_file(path)?;
            audit(&ServiceResolver::new(catalog, tables, config.weights)).await?
        }
        None => {
            let pool = connect().await.context("Failed to connect to database")?;
            let catalog = PgServiceCatalog::new(pool);
            catalog.check_schema().await?;
            audit(&ServiceResolver::new(catalog, tables, config.weights)).await?
        }
    };

    if stale.is_empty() {
        info!("✅ All mapping entries point at existing services");
        return Ok(());
    }

    warn!("⚠️ {} stale mapping entries:", stale.len());
    for entry in &stale {
        warn!(
            "   {}/{} -> '{}' is missing; pipeline outcome: {}",
            entry.category, entry.external_id, entry.canonical_title, entry.outcome
        );
    }
    if args.strict {
        anyhow::bail!("{} stale mapping entries", stale.len());
    }
    Ok(())
}

async fn audit<C: ServiceCatalog>(resolver: &ServiceResolver<C>) -> Result<Vec<StaleMapping>> {
    let start = Instant::now();
    let entries = resolver.tables().mapping_entries();
    info!(
        "Auditing {} mapping entries ({} keyword entries loaded)",
        entries.len(),
        resolver.tables().keyword_count()
    );

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Failed to set progress bar style for audit")?
            .progress_chars("#>-"),
    );

    let mut stats = ResolutionStats::default();
    let mut stale = Vec::new();

    for (category, external_id, canonical_title) in entries {
        pb.set_message(format!("{}/{}", category, external_id));
        let outcome = resolver
            .resolve_with_diagnostics(category, external_id)
            .await;

        let is_stale = match &outcome {
            Ok(result) => result.strategy != MatchStrategy::Mapping,
            Err(e) if e.is_not_found() => true,
            Err(e) => {
                pb.abandon_with_message("Catalog failure");
                anyhow::bail!(
                    "Catalog failure while auditing {}/{}: {}",
                    category,
                    external_id,
                    e
                );
            }
        };
        if is_stale {
            stale.push(StaleMapping {
                category: category.to_string(),
                external_id: external_id.to_string(),
                canonical_title: canonical_title.to_string(),
                outcome: match &outcome {
                    Ok(result) => format!(
                        "service {} via {} (score {})",
                        result.service_id(),
                        result.strategy.as_str(),
                        result.score
                    ),
                    Err(e) => e.to_string(),
                },
            });
        }

        stats.record(&outcome);
        pb.inc(1);
    }

    pb.finish_with_message("Audit complete");
    info!("=== Curated Table Audit ({:.2?}) ===", start.elapsed());
    for line in stats.to_string().lines() {
        info!("{}", line);
    }
    Ok(stale)
}
