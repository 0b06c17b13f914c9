use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConnectionReport, ElevationSource};
use crate::config::ArcGisConfig;
use crate::geometry::Sample;

const WGS84_WKID: u32 = 4326;

// Request geometry for the at-many-points operation
#[derive(Debug, Serialize)]
struct Multipoint {
    points: Vec<EsriPoint>,
}

#[derive(Debug, Serialize)]
struct EsriPoint {
    x: f64,
    y: f64,
    #[serde(rename = "spatialReference")]
    spatial_reference: SpatialReference,
}

#[derive(Debug, Serialize)]
struct SpatialReference {
    wkid: u32,
}

// at-many-points response structure
#[derive(Debug, Deserialize)]
struct AtManyPointsResponse {
    result: Option<AtManyPointsResult>,
    error: Option<ArcGisError>,
}

#[derive(Debug, Deserialize)]
struct AtManyPointsResult {
    points: Vec<ResultPoint>,
}

#[derive(Debug, Deserialize)]
struct ResultPoint {
    #[serde(default)]
    z: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ArcGisError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the ArcGIS Location Platform elevation service
#[derive(Clone)]
pub struct ArcGisElevationClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl ArcGisElevationClient {
    pub fn new(client: reqwest::Client, config: &ArcGisConfig) -> Self {
        Self {
            client,
            url: config.elevation_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn query(&self, points: &[Sample]) -> Result<Vec<f64>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("ARCGIS_API_KEY is not configured"))?;

        // ArcGIS expects x = longitude, y = latitude
        let geometry = Multipoint {
            points: points
                .iter()
                .map(|p| EsriPoint {
                    x: p.lon,
                    y: p.lat,
                    spatial_reference: SpatialReference { wkid: WGS84_WKID },
                })
                .collect(),
        };
        let geometry = serde_json::to_string(&geometry)?;

        let params = [
            ("f", "json"),
            ("token", api_key),
            ("geometry", geometry.as_str()),
            ("geometryType", "esriGeometryMultipoint"),
        ];

        let response = self
            .client
            .post(&self.url)
            .form(&params)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send elevation request: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            bail!("ArcGIS elevation request failed with HTTP {}", status.as_u16());
        }

        let body: AtManyPointsResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse elevation response: {}", e))?;

        if let Some(err) = body.error {
            bail!(
                "ArcGIS elevation error {}: {}",
                err.code.unwrap_or_default(),
                err.message.unwrap_or_default()
            );
        }

        let result = body
            .result
            .ok_or_else(|| anyhow!("Elevation response has no result points"))?;

        debug!("ArcGIS returned {} elevations", result.points.len());

        Ok(result
            .points
            .into_iter()
            .map(|p| p.z.unwrap_or(0.0))
            .collect())
    }
}

#[async_trait]
impl ElevationSource for ArcGisElevationClient {
    async fn fetch_batch(&self, points: &[Sample]) -> Result<Vec<f64>> {
        self.query(points).await
    }

    async fn test_connection(&self, probe: Sample) -> ConnectionReport {
        let has_key = self.api_key.is_some();
        let error = if !has_key {
            Some("ARCGIS_API_KEY is not configured".to_string())
        } else {
            self.query(&[probe]).await.err().map(|e| e.to_string())
        };

        ConnectionReport {
            connected: error.is_none(),
            api_url: self.url.clone(),
            has_key,
            error,
        }
    }
}
