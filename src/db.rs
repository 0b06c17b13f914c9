use anyhow::{Context, Result, anyhow};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

// Embed migrations into the binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

/// Create a connection pool and verify that a connection can be opened
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(&config.url);
    Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(Duration::from_secs(10))
        .build(manager)
        .context("Failed to create PostgreSQL connection pool")
}

/// Create a pool without opening any connection up front
///
/// Connections are established on first checkout, so a server that is down
/// only fails the requests that need it.
pub fn create_lazy_pool(config: &DatabaseConfig) -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new(&config.url);
    Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(Duration::from_secs(10))
        .build_unchecked(manager)
}

/// Apply any pending embedded migrations
pub async fn run_migrations(pool: &PgPool) -> Result<Vec<String>> {
    let pool = pool.clone();

    tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
        let mut pooled = pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!("Failed to run database migrations: {e}"))?;
        let versions: Vec<String> = applied.iter().map(|v| v.to_string()).collect();
        info!("Applied {} migration(s)", versions.len());
        Ok(versions)
    })
    .await?
}
