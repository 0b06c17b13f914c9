//! Elevation profiles for resampled routes
//!
//! Points are sent to the elevation source in fixed-size batches. A batch that
//! fails for any reason is filled with zeros so the rest of the profile still
//! comes back.

mod arcgis;

pub use arcgis::ArcGisElevationClient;

use anyhow::Result;
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::geometry::{Sample, round_to};

/// A service that can look up ground elevation for WGS84 points
#[async_trait]
pub trait ElevationSource: Send + Sync {
    /// Elevation in meters for each point, in the same order
    async fn fetch_batch(&self, points: &[Sample]) -> Result<Vec<f64>>;

    /// Check that the service is reachable using a single probe point
    async fn test_connection(&self, probe: Sample) -> ConnectionReport;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionReport {
    pub connected: bool,
    pub api_url: String,
    pub has_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationStatistics {
    pub average_elevation_m: f64,
    pub max_elevation_m: f64,
    pub min_elevation_m: f64,
    /// Difference between the highest and lowest point
    pub total_relief_m: f64,
}

impl ElevationStatistics {
    pub fn from_elevations(elevations: &[f64]) -> Option<Self> {
        if elevations.is_empty() {
            return None;
        }
        let max = elevations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = elevations.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = elevations.iter().sum::<f64>() / elevations.len() as f64;

        Some(Self {
            average_elevation_m: round_to(mean, 2),
            max_elevation_m: round_to(max, 2),
            min_elevation_m: round_to(min, 2),
            total_relief_m: round_to(max - min, 2),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationProfile {
    pub success: bool,
    pub elevations: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ElevationStatistics>,
    /// Batches that were replaced by zeros
    pub failed_batches: usize,
}

#[derive(Clone)]
pub struct ElevationService {
    source: Arc<dyn ElevationSource>,
    batch_size: usize,
}

impl ElevationService {
    pub fn new(source: Arc<dyn ElevationSource>, batch_size: usize) -> Self {
        Self {
            source,
            batch_size: batch_size.max(1),
        }
    }

    /// Look up elevations for every point, batch by batch
    pub async fn profile(&self, points: &[Sample]) -> ElevationProfile {
        if points.is_empty() {
            return ElevationProfile {
                success: false,
                elevations: Vec::new(),
                statistics: None,
                failed_batches: 0,
            };
        }

        let mut elevations = Vec::with_capacity(points.len());
        let mut failed_batches = 0;

        for (index, batch) in points.chunks(self.batch_size).enumerate() {
            let start = Instant::now();
            let result = self.source.fetch_batch(batch).await;
            histogram!("elevation_batch_duration_seconds").record(start.elapsed().as_secs_f64());

            match result {
                Ok(values) if values.len() == batch.len() => {
                    debug!(batch = index, points = batch.len(), "Elevation batch fetched");
                    elevations.extend(values);
                }
                Ok(values) => {
                    warn!(
                        batch = index,
                        expected = batch.len(),
                        received = values.len(),
                        "Elevation batch returned the wrong number of points, using zeros"
                    );
                    counter!("elevation_batches_failed_total").increment(1);
                    failed_batches += 1;
                    elevations.extend(std::iter::repeat_n(0.0, batch.len()));
                }
                Err(e) => {
                    warn!(batch = index, error = %e, "Elevation batch failed, using zeros");
                    counter!("elevation_batches_failed_total").increment(1);
                    failed_batches += 1;
                    elevations.extend(std::iter::repeat_n(0.0, batch.len()));
                }
            }
        }

        let statistics = ElevationStatistics::from_elevations(&elevations);
        ElevationProfile {
            success: true,
            elevations,
            statistics,
            failed_batches,
        }
    }

    pub async fn test_connection(&self, probe: Sample) -> ConnectionReport {
        self.source.test_connection(probe).await
    }
}
