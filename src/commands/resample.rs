use anyhow::{Context, Result};
use ftth_planner::actions::ResampleResponse;
use ftth_planner::geometry::{Route, resample_route};
use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::info;

/// Resample a GeoJSON LineString file and print the result as JSON
pub async fn handle_resample(file: &Path, step_m: f64) -> Result<()> {
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let geojson: JsonValue = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;

    let route = Route::from_geojson(&geojson)?;
    let resampled = resample_route(&route, step_m)?;
    info!(
        "Resampled {} vertices into {} samples ({:.2} m)",
        route.vertex_count(),
        resampled.samples.len(),
        resampled.length_m
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&ResampleResponse::from(&resampled))?
    );
    Ok(())
}
