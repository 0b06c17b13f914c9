//! Recommendation generation and collaborator diagnostics

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use tracing::{info, warn};

use crate::actions::rejection_response;
use crate::analysis::{RouteAnalysis, analyze_geojson};
use crate::error::AppError;
use crate::geometry::Sample;
use crate::recommendations::{FALLBACK_RECOMMENDATIONS, ProjectSettings, build_prompt};
use crate::route_records_repo::RouteRecordRepository;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub data_id: i32,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data_id: i32,
    pub route_analysis: RouteAnalysis,
    /// Metadata stored with the route record
    pub configuration: JsonValue,
    pub ai_recommendations: String,
    /// When the route record was collected
    pub timestamp: String,
    pub model_used: String,
    pub prompt_length: usize,
}

/// Degraded answer returned with HTTP 200 whenever recommendations can't be produced
#[derive(Debug, Serialize)]
pub struct FallbackResponse {
    pub success: bool,
    pub error: String,
    pub fallback_recommendations: &'static str,
    pub data_id: i32,
}

impl FallbackResponse {
    fn new(data_id: i32, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            fallback_recommendations: FALLBACK_RECOMMENDATIONS,
            data_id,
        }
    }
}

/// POST /api/ai/generate - Generate deployment recommendations for a stored route
pub async fn generate_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let Json(GenerateRequest { data_id }) = match payload {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    if !state.recommender.is_configured() {
        warn!(data_id, "Recommendation model has no API key, returning fallback");
        metrics::counter!("recommendations_fallback_total").increment(1);
        return Json(FallbackResponse::new(data_id, "COHERE_API_KEY is not configured"))
            .into_response();
    }

    let repo = RouteRecordRepository::new(state.pool.clone());
    let record = match repo.get_by_id(data_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            warn!(data_id, "Route record not found, returning fallback");
            metrics::counter!("recommendations_fallback_total").increment(1);
            return Json(FallbackResponse::new(
                data_id,
                format!("Route record {} not found", data_id),
            ))
            .into_response();
        }
        Err(e) => return AppError::Persistence(e).into_response(),
    };

    let analysis = match analyze_geojson(&record.geojson, &state.config.region) {
        Ok(analysis) => analysis,
        Err(e) => return AppError::from(e).into_response(),
    };

    let settings = ProjectSettings::from_metadata(&record.metadata);
    let prompt = build_prompt(&settings, &analysis, &state.config.region.name);
    let prompt_length = prompt.chars().count();

    info!(data_id, prompt_length, "Requesting recommendations");

    match state.recommender.recommend(&prompt).await {
        Ok(text) => {
            info!(data_id, "Recommendations generated");
            metrics::counter!("recommendations_generated_total").increment(1);
            Json(GenerateResponse {
                success: true,
                data_id,
                route_analysis: analysis,
                configuration: record.metadata,
                ai_recommendations: text,
                timestamp: record.created_at.to_rfc3339(),
                model_used: state.recommender.model().to_string(),
                prompt_length,
            })
            .into_response()
        }
        Err(e) => {
            warn!(data_id, error = %e, "Recommendation request failed, returning fallback");
            metrics::counter!("recommendations_fallback_total").increment(1);
            Json(FallbackResponse::new(data_id, e.to_string())).into_response()
        }
    }
}

/// GET /api/ai/test - Check that the recommendation model answers
pub async fn test_recommendations(State(state): State<AppState>) -> Json<JsonValue> {
    if !state.recommender.is_configured() {
        return Json(json!({
            "status": "error",
            "message": "COHERE_API_KEY no configurada"
        }));
    }

    match state.recommender.ping().await {
        Ok(text) => Json(json!({
            "status": "success",
            "message": "Conexión con Cohere exitosa",
            "response": text
        })),
        Err(e) => {
            warn!(error = %e, "Recommendation model connectivity check failed");
            Json(json!({
                "status": "error",
                "message": format!("Error conectando con Cohere: {}", e)
            }))
        }
    }
}

/// GET /api/ai/test-arcgis - Probe the elevation service at the region center
pub async fn test_arcgis(State(state): State<AppState>) -> Json<JsonValue> {
    let region = &state.config.region;
    let probe = Sample::new(region.center_lat, region.center_lon);
    let report = state.elevation.test_connection(probe).await;

    if report.connected {
        Json(json!({
            "status": "success",
            "message": "Conexión con ArcGIS exitosa",
            "details": report
        }))
    } else {
        warn!(error = ?report.error, "Elevation service connectivity check failed");
        Json(json!({
            "status": "error",
            "message": "No se pudo conectar a ArcGIS",
            "error": report.error
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_body() {
        let body = serde_json::to_value(FallbackResponse::new(42, "timeout")).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "timeout",
                "fallback_recommendations": FALLBACK_RECOMMENDATIONS,
                "data_id": 42
            })
        );
    }
}
