use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};

use crate::error::json_error;
use crate::web::AppState;

/// Install the Prometheus recorder
/// Returns a handle used to render metrics for scraping
pub fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        // Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 30s, 60s
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
            ],
        )
        .context("failed to set buckets for http_request_duration_seconds")?
        .set_buckets_for_metric(
            Matcher::Full("elevation_batch_duration_seconds".to_string()),
            &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
        )
        .context("failed to set buckets for elevation_batch_duration_seconds")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register counters at zero so they show up before the first event
pub fn initialize_metrics() {
    metrics::counter!("elevation_batches_failed_total").absolute(0);
    metrics::counter!("route_records_stored_total").absolute(0);
    metrics::counter!("recommendations_generated_total").absolute(0);
    metrics::counter!("recommendations_fallback_total").absolute(0);
    metrics::gauge!("process.is_up").set(1.0);
}

/// Background task that keeps process gauges fresh and drains histogram buffers
pub async fn process_metrics_task(handle: PrometheusHandle) {
    let start_time = Instant::now();

    loop {
        metrics::gauge!("process.uptime.seconds").set(start_time.elapsed().as_secs() as f64);
        handle.run_upkeep();

        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}

/// GET /metrics
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Metrics are disabled"),
    }
}
