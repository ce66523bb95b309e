// src/utils/db_connect.rs

use anyhow::{Context, Result};
use bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use log::info;
use std::env;
use std::time::Duration;
use tokio_postgres::{Config, NoTls};

pub type PgPool = Pool<PostgresConnectionManager<NoTls>>;

const DEFAULT_POOL_SIZE: u32 = 8;

/// Connection settings for the clinic database, read from `POSTGRES_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub pool_size: u32,
}

impl DbSettings {
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());
        Self {
            host: var("POSTGRES_HOST", "127.0.0.1"),
            port: var("POSTGRES_PORT", "5432").parse().unwrap_or(5432),
            dbname: var("POSTGRES_DB", "clinic"),
            user: var("POSTGRES_USER", "postgres"),
            password: env::var("POSTGRES_PASSWORD").unwrap_or_default(),
            // Each resolution holds a connection for two short reads
            pool_size: env::var("RESOLVER_DB_POOL_SIZE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_POOL_SIZE),
        }
    }

    fn pg_config(&self) -> Config {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password)
            .application_name("service_resolver")
            .connect_timeout(Duration::from_secs(10));
        config
    }
}

/// Builds the pool. Connections are opened lazily; call
/// `PgServiceCatalog::check_schema` to verify the database is usable.
pub async fn connect() -> Result<PgPool> {
    let settings = DbSettings::from_env();
    info!(
        "DB Config: Host={}, Port={}, DB={}, User={}, Pool={}",
        settings.host, settings.port, settings.dbname, settings.user, settings.pool_size
    );

    let manager = PostgresConnectionManager::new(settings.pg_config(), NoTls);
    Pool::builder()
        .max_size(settings.pool_size)
        .idle_timeout(Some(Duration::from_secs(180)))
        .connection_timeout(Duration::from_secs(15))
        .build(manager)
        .await
        .context("Failed to build database connection pool")
}

/// Returns (total connections, idle connections) for logging.
pub fn get_pool_status(pool: &PgPool) -> (u32, u32) {
    let state = pool.state();
    (state.connections, state.idle_connections)
}
