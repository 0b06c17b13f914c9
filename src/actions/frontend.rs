//! Planner UI entry page
//!
//! Static assets under `/frontend` are served straight from the configured
//! directory by the router; this module only handles `/`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::debug;

use crate::actions::json_error;
use crate::web::AppState;

/// GET / - Serve `index.html` from the frontend directory
pub async fn index(State(state): State<AppState>) -> Response {
    let Some(dir) = state.config.frontend_dir.as_ref() else {
        return json_error(StatusCode::NOT_FOUND, "Frontend directory is not configured");
    };

    let path = dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Frontend index not readable");
            json_error(StatusCode::NOT_FOUND, "index.html not found")
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found")
}
