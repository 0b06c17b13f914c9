use anyhow::{Context, Result};
use ftth_planner::config::AppConfig;
use ftth_planner::web::{AppState, start_web_server};
use ftth_planner::{db, metrics};
use std::time::Duration;
use tracing::{info, warn};

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn handle_web(config: AppConfig, interface: String, port: u16) -> Result<()> {
    let metrics_handle = if config.metrics_enabled {
        let handle = metrics::init_metrics()?;
        metrics::initialize_metrics();
        Some(handle)
    } else {
        None
    };

    if config.cohere.api_key.is_none() {
        warn!("COHERE_API_KEY is not set, /api/ai/generate will return fallback responses");
    }
    if config.arcgis.api_key.is_none() {
        warn!("ARCGIS_API_KEY is not set, elevation profiles will be zero-filled");
    }
    if let Some(dir) = &config.frontend_dir {
        info!("Serving frontend from {}", dir.display());
    }

    let pool = db::create_pool(&config.database)?;
    let http = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let state = AppState::from_config(pool, config, http, metrics_handle);
    start_web_server(interface, port, state).await
}
