//! Error kinds shared by the geometry core and the HTTP boundary
//!
//! Validation failures reject a request outright, analysis failures are soft
//! results the caller decides how to surface, and collaborator failures carry
//! whatever the database or third-party client reported.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Input that can never be processed, no matter how often it is retried
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("A LineString GeoJSON geometry is required, got {0}")]
    NotALineString(String),

    #[error("A LineString needs at least 2 coordinates, got {0}")]
    TooFewPoints(usize),

    #[error("Coordinate {index} is invalid: {reason}")]
    InvalidCoordinate { index: usize, reason: String },

    #[error("step_m must be a positive number of meters, got {0}")]
    InvalidStep(f64),

    #[error("Coordinate {index} has latitude {lat}, outside the Web Mercator range")]
    OutsideProjection { index: usize, lat: f64 },

    #[error("step_m {step_m} would produce {samples} samples, the limit is {limit}")]
    TooManySamples {
        step_m: f64,
        samples: usize,
        limit: usize,
    },
}

/// Failure while deriving route statistics
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("route geometry is not usable: {0}")]
    InvalidGeometry(#[from] ValidationError),

    #[error("route geometry has no coordinates")]
    EmptyGeometry,
}

/// Request-scoped error returned by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("{0:#}")]
    Persistence(anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(_) | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error body used by every endpoint
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        json_error(status, &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::from(ValidationError::TooFewPoints(1));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "A LineString needs at least 2 coordinates, got 1"
        );
    }

    #[test]
    fn test_analysis_maps_to_server_error() {
        let err = AppError::from(AnalysisError::EmptyGeometry);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Analysis error"));
    }

    #[test]
    fn test_persistence_keeps_underlying_message() {
        let err = AppError::Persistence(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "connection refused");
    }
}
