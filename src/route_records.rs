//! Route records collected from the planner UI
//!
//! A record keeps the raw GeoJSON exactly as submitted together with the
//! sampling step and free-form metadata (usually the chosen deployment
//! settings). Records are only ever inserted and read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRouteRecord {
    pub id: i32,
    pub config_id: Option<i32>,
    pub geojson: JsonValue,
    pub step_m: f64,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRouteRecord {
    pub config_id: Option<i32>,
    pub geojson: JsonValue,
    pub step_m: f64,
    pub metadata: JsonValue,
}

/// Body of `POST /api/data/collect`
///
/// Collected routes are never linked to a saved configuration, so any
/// `config_id` sent by the client is ignored.
#[derive(Debug, Deserialize)]
pub struct CollectRequest {
    pub geojson: JsonValue,
    #[serde(default = "default_collect_step")]
    pub step_m: f64,
    #[serde(default = "empty_object")]
    pub meta: JsonValue,
}

fn default_collect_step() -> f64 {
    20.0
}

fn empty_object() -> JsonValue {
    JsonValue::Object(Default::default())
}

impl From<CollectRequest> for NewRouteRecord {
    fn from(req: CollectRequest) -> Self {
        Self {
            config_id: None,
            geojson: req.geojson,
            step_m: req.step_m,
            metadata: req.meta,
        }
    }
}
