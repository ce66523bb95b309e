use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use resolver_lib::{
    catalog::{InMemoryCatalog, PgServiceCatalog, ServiceCatalog},
    utils::{
        db_connect::{connect, get_pool_status},
        env::load_env,
        resolver_config::ResolverConfig,
    },
    ServiceResolver,
};
use serde_json::json;

/// Resolve a service menu identifier (numeric id or slug) within a category.
#[derive(Parser, Debug)]
#[command(name = "resolve_service", version)]
struct Args {
    /// Category slug, e.g. "ultrasound"
    category: String,

    /// Service id or menu slug, e.g. "11" or "breast-ultrasound"
    identifier: String,

    /// Resolve against a JSON fixture of categories and services instead of the database
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();
    let args = Args::parse();

    let config = ResolverConfig::from_env();
    config.log_config();
    let tables = config
        .load_tables()
        .context("Failed to load curated tables")?;
    let tables = Arc::new(tables);

    match &args.fixture {
        Some(path) => {
            let catalog = InMemoryCatalog::load_from_file(path)?;
            let resolver = ServiceResolver::new(catalog, tables, config.weights);
            report(&resolver, &args).await
        }
        None => {
            let pool = connect().await.context("Failed to connect to database")?;
            let catalog = PgServiceCatalog::new(pool);
            catalog.check_schema().await?;
            let resolver = ServiceResolver::new(catalog, tables, config.weights);
            let outcome = report(&resolver, &args).await;
            let (size, idle) = get_pool_status(resolver.catalog().pool());
            info!("DB Connection Pool Status: Total: {}, Idle: {}", size, idle);
            outcome
        }
    }
}

async fn report<C: ServiceCatalog>(resolver: &ServiceResolver<C>, args: &Args) -> Result<()> {
    let start = Instant::now();
    let outcome = resolver
        .resolve_with_diagnostics(&args.category, &args.identifier)
        .await;
    info!("Resolution finished in {:.2?}", start.elapsed());

    match outcome {
        Ok(result) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "found": true,
                        "service_id": result.service_id(),
                        "title": result.candidate.title,
                        "strategy": result.strategy,
                        "score": result.score,
                    }))?
                );
            } else {
                println!(
                    "{}/{} -> service {} \"{}\" (strategy: {}, score: {})",
                    args.category,
                    args.identifier,
                    result.service_id(),
                    result.candidate.title,
                    result.strategy.as_str(),
                    result.score
                );
            }
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "found": false,
                        "reason": e.reason(),
                        "detail": e.to_string(),
                    }))?
                );
            } else {
                println!("{}/{} -> not found ({})", args.category, args.identifier, e);
            }
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e)).context("Service resolution failed"),
    }
}
