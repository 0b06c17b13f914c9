//! Coarse route statistics used to condition deployment recommendations
//!
//! Everything here works in raw degree units. Length uses a flat
//! 111 km-per-degree factor, which is intentionally approximate.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::config::RegionConfig;
use crate::error::AnalysisError;
use crate::geometry::{Route, round_to};

/// Kilometers per degree used for the length estimate
pub const KM_PER_DEGREE: f64 = 111.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneType {
    CentroUrbano,
    Urbano,
    Suburbano,
    Rural,
}

impl ZoneType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::CentroUrbano => "centro_urbano",
            ZoneType::Urbano => "urbano",
            ZoneType::Suburbano => "suburbano",
            ZoneType::Rural => "rural",
        }
    }

    /// Classify by distance (degrees) from the region center
    pub fn from_distance(distance: f64, thresholds: &[f64; 3]) -> Self {
        if distance < thresholds[0] {
            ZoneType::CentroUrbano
        } else if distance < thresholds[1] {
            ZoneType::Urbano
        } else if distance < thresholds[2] {
            ZoneType::Suburbano
        } else {
            ZoneType::Rural
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainComplexity {
    Bajo,
    Medio,
    Alto,
}

impl TerrainComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerrainComplexity::Bajo => "bajo",
            TerrainComplexity::Medio => "medio",
            TerrainComplexity::Alto => "alto",
        }
    }

    /// Classify by the latitude and longitude spans of the route's bounding box
    pub fn from_spans(lat_span: f64, lon_span: f64, thresholds: &[f64; 2]) -> Self {
        if lat_span < thresholds[0] && lon_span < thresholds[0] {
            TerrainComplexity::Bajo
        } else if lat_span < thresholds[1] && lon_span < thresholds[1] {
            TerrainComplexity::Medio
        } else {
            TerrainComplexity::Alto
        }
    }
}

impl fmt::Display for TerrainComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary statistics for a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    pub length_km: f64,
    pub total_points: usize,
    pub zone_type: ZoneType,
    pub terrain_complexity: TerrainComplexity,
    /// Vertex centroid as `(lat, lon)`, rounded to 4 decimals
    pub center_coordinates: (f64, f64),
}

/// Analyze a route
pub fn analyze_route(route: &Route, region: &RegionConfig) -> Result<RouteAnalysis, AnalysisError> {
    let coords = route.coords();
    if coords.is_empty() {
        return Err(AnalysisError::EmptyGeometry);
    }
    let total_points = coords.len();
    let count = total_points as f64;

    let length_deg: f64 = coords
        .windows(2)
        .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
        .sum();

    let center_lat = coords.iter().map(|c| c.y).sum::<f64>() / count;
    let center_lon = coords.iter().map(|c| c.x).sum::<f64>() / count;

    let dist_to_center = (center_lat - region.center_lat).hypot(center_lon - region.center_lon);
    let zone_type = ZoneType::from_distance(dist_to_center, &region.zone_thresholds);

    let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
    for c in coords {
        min_lat = min_lat.min(c.y);
        max_lat = max_lat.max(c.y);
        min_lon = min_lon.min(c.x);
        max_lon = max_lon.max(c.x);
    }
    let terrain_complexity =
        TerrainComplexity::from_spans(max_lat - min_lat, max_lon - min_lon, &region.terrain_thresholds);

    Ok(RouteAnalysis {
        length_km: round_to(length_deg * KM_PER_DEGREE, 2),
        total_points,
        zone_type,
        terrain_complexity,
        center_coordinates: (round_to(center_lat, 4), round_to(center_lon, 4)),
    })
}

/// Analyze a stored GeoJSON geometry
///
/// Geometry that no longer parses as a valid LineString is reported as an
/// analysis failure rather than a validation failure.
pub fn analyze_geojson(
    geojson: &JsonValue,
    region: &RegionConfig,
) -> Result<RouteAnalysis, AnalysisError> {
    let route = Route::from_geojson(geojson)?;
    analyze_route(&route, region)
}
