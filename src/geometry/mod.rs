//! Route geometry: validated polylines, projection, and arc-length resampling

pub mod projection;
pub mod resample;

use geo::{Coord, LineString, coord};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ValidationError;

pub use resample::{ResampledRoute, resample_route};

/// An open polyline in WGS84 degrees (`x` = longitude, `y` = latitude)
///
/// Always holds at least two vertices. Vertices may repeat and the line may
/// cross itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    line: LineString<f64>,
}

impl Route {
    pub fn new(coords: Vec<Coord<f64>>) -> Result<Self, ValidationError> {
        if coords.len() < 2 {
            return Err(ValidationError::TooFewPoints(coords.len()));
        }

        for (index, c) in coords.iter().enumerate() {
            if !c.x.is_finite() || !c.y.is_finite() {
                return Err(ValidationError::InvalidCoordinate {
                    index,
                    reason: "coordinates must be finite numbers".to_string(),
                });
            }
            if !(-180.0..=180.0).contains(&c.x) {
                return Err(ValidationError::InvalidCoordinate {
                    index,
                    reason: format!("longitude {} is outside -180..180", c.x),
                });
            }
            if !(-90.0..=90.0).contains(&c.y) {
                return Err(ValidationError::InvalidCoordinate {
                    index,
                    reason: format!("latitude {} is outside -90..90", c.y),
                });
            }
        }

        Ok(Self {
            line: LineString::new(coords),
        })
    }

    /// Parse a GeoJSON LineString geometry, or a Feature wrapping one
    pub fn from_geojson(value: &JsonValue) -> Result<Self, ValidationError> {
        let geojson: GeoJson = serde_json::from_value(value.clone())
            .map_err(|e| ValidationError::InvalidGeoJson(e.to_string()))?;

        let geometry = match geojson {
            GeoJson::Geometry(geometry) => geometry,
            GeoJson::Feature(feature) => feature.geometry.ok_or_else(|| {
                ValidationError::NotALineString("a Feature without geometry".to_string())
            })?,
            GeoJson::FeatureCollection(_) => {
                return Err(ValidationError::NotALineString(
                    "FeatureCollection".to_string(),
                ));
            }
        };

        let positions = match geometry.value {
            geojson::Value::LineString(positions) => positions,
            other => return Err(ValidationError::NotALineString(geometry_type(&other).to_string())),
        };

        let mut coords = Vec::with_capacity(positions.len());
        for (index, position) in positions.iter().enumerate() {
            if position.len() < 2 {
                return Err(ValidationError::InvalidCoordinate {
                    index,
                    reason: "a position needs both longitude and latitude".to_string(),
                });
            }
            coords.push(coord! { x: position[0], y: position[1] });
        }

        Self::new(coords)
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.line.0
    }

    pub fn vertex_count(&self) -> usize {
        self.line.0.len()
    }

    pub fn start(&self) -> Coord<f64> {
        self.line.0[0]
    }

    pub fn end(&self) -> Coord<f64> {
        self.line.0[self.line.0.len() - 1]
    }
}

fn geometry_type(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// A geographic point produced by resampling a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
}

impl Sample {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Round both components to the given number of decimal places
    pub fn rounded(self, places: i32) -> Self {
        Self {
            lat: round_to(self.lat, places),
            lon: round_to(self.lon, places),
        }
    }
}

impl From<Coord<f64>> for Sample {
    fn from(c: Coord<f64>) -> Self {
        Self { lat: c.y, lon: c.x }
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
