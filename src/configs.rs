//! Saved deployment configurations
//!
//! Field names on the wire follow the planner UI (`estudio_factibilidad`,
//! `split`, `enfoque`, `arquitectura`, `subconfig`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Deployment parameters chosen by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Estimated number of clients from the feasibility study
    #[serde(rename = "estudio_factibilidad")]
    pub client_estimate: i32,
    #[serde(rename = "split", default)]
    pub split_ratio: Option<String>,
    #[serde(rename = "enfoque", default)]
    pub construction_approach: Option<String>,
    #[serde(rename = "arquitectura", default)]
    pub architecture: Option<String>,
    #[serde(rename = "subconfig", default)]
    pub sub_configuration: Option<String>,
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredConfig {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: Option<String>,
    pub config: JsonValue,
    pub created_at: DateTime<Utc>,
}
