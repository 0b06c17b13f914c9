//! Route record ingestion

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

use crate::actions::rejection_response;
use crate::error::{AppError, ValidationError};
use crate::geometry::Route;
use crate::route_records::CollectRequest;
use crate::route_records_repo::RouteRecordRepository;
use crate::web::AppState;

fn validate(req: &CollectRequest) -> Result<(), ValidationError> {
    if !req.step_m.is_finite() || req.step_m <= 0.0 {
        return Err(ValidationError::InvalidStep(req.step_m));
    }
    Route::from_geojson(&req.geojson)?;
    Ok(())
}

/// POST /api/data/collect - Store a route with its sampling step and metadata
pub async fn collect_route(
    State(state): State<AppState>,
    payload: Result<Json<CollectRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    if let Err(e) = validate(&req) {
        return AppError::from(e).into_response();
    }

    let repo = RouteRecordRepository::new(state.pool);

    match repo.insert(req.into()).await {
        Ok(id) => {
            info!(id, "Stored route record");
            metrics::counter!("route_records_stored_total").increment(1);
            Json(json!({ "ok": true, "id": id })).into_response()
        }
        Err(e) => AppError::Persistence(e).into_response(),
    }
}
