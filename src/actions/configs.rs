use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

use crate::actions::rejection_response;
use crate::configs::DeploymentConfig;
use crate::configs_repo::ConfigRepository;
use crate::error::AppError;
use crate::web::AppState;

/// POST /api/config/save - Save a deployment configuration
pub async fn save_config(
    State(state): State<AppState>,
    payload: Result<Json<DeploymentConfig>, JsonRejection>,
) -> Response {
    let Json(config) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let repo = ConfigRepository::new(state.pool);

    match repo.insert(config).await {
        Ok(id) => {
            info!(id, "Saved deployment configuration");
            Json(json!({ "ok": true, "id": id })).into_response()
        }
        Err(e) => AppError::Persistence(e).into_response(),
    }
}
