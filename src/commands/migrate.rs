use anyhow::Result;
use ftth_planner::config::AppConfig;
use ftth_planner::db;
use tracing::info;

pub async fn handle_migrate(config: &AppConfig) -> Result<()> {
    sentry::configure_scope(|scope| {
        scope.set_tag("operation", "migrate");
    });

    let pool = db::create_pool(&config.database)?;
    let applied = db::run_migrations(&pool).await?;

    if applied.is_empty() {
        info!("Database schema is up to date");
    } else {
        for version in &applied {
            info!("Applied migration {}", version);
        }
    }

    Ok(())
}
