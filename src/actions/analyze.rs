//! Route resampling handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::actions::rejection_response;
use crate::elevation::ElevationProfile;
use crate::error::AppError;
use crate::geometry::{ResampledRoute, Route, Sample, resample_route, round_to};
use crate::web::AppState;

/// Body shared by the resampling endpoints
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub geojson: JsonValue,
    #[serde(default = "default_step_m")]
    pub step_m: f64,
}

fn default_step_m() -> f64 {
    20.0
}

#[derive(Debug, Serialize)]
pub struct ResampleResponse {
    pub original_length_m: f64,
    pub n_samples: usize,
    pub samples: Vec<Sample>,
}

impl From<&ResampledRoute> for ResampleResponse {
    fn from(route: &ResampledRoute) -> Self {
        Self {
            original_length_m: round_to(route.length_m, 2),
            n_samples: route.samples.len(),
            samples: route.samples.iter().map(|s| s.rounded(6)).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub route: ResampleResponse,
    #[serde(flatten)]
    pub profile: ElevationProfile,
}

fn resample_request(req: &RouteRequest) -> Result<ResampledRoute, AppError> {
    let route = Route::from_geojson(&req.geojson)?;
    let resampled = resample_route(&route, req.step_m)?;
    debug!(
        vertices = route.vertex_count(),
        samples = resampled.samples.len(),
        step_m = req.step_m,
        "Resampled route"
    );
    Ok(resampled)
}

/// POST /api/analyze/submit - Resample a route at a fixed step
pub async fn submit_route(payload: Result<Json<RouteRequest>, JsonRejection>) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    match resample_request(&req) {
        Ok(resampled) => Json(ResampleResponse::from(&resampled)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/analyze/profile - Resample a route and look up elevation at every sample
pub async fn profile_route(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let resampled = match resample_request(&req) {
        Ok(resampled) => resampled,
        Err(e) => return e.into_response(),
    };

    let profile = state.elevation.profile(&resampled.samples).await;

    Json(ProfileResponse {
        route: ResampleResponse::from(&resampled),
        profile,
    })
    .into_response()
}
