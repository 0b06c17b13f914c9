//! Liveness endpoint

use axum::{Json, response::IntoResponse};
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

/// Server start time, set when the web server starts
static SERVER_START_TIME: OnceLock<Instant> = OnceLock::new();

pub fn init_server_start_time() {
    SERVER_START_TIME.get_or_init(Instant::now);
}

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub ok: bool,
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    let start_time = SERVER_START_TIME.get_or_init(Instant::now);

    Json(HealthInfo {
        ok: true,
        status: "alive",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: start_time.elapsed().as_secs(),
    })
}
