//! Spherical Web Mercator (EPSG:3857) transforms
//!
//! Coordinates use `x` = longitude / easting and `y` = latitude / northing.

use geo::{Coord, coord};
use std::f64::consts::FRAC_PI_4;

/// Sphere radius used by EPSG:3857, in meters
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which the projection becomes a square, in degrees
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// WGS84 degrees to Web Mercator meters
pub fn to_web_mercator(c: Coord<f64>) -> Coord<f64> {
    let x = EARTH_RADIUS_M * c.x.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + c.y.to_radians() / 2.0).tan().ln();
    coord! { x: x, y: y }
}

/// Web Mercator meters to WGS84 degrees
pub fn from_web_mercator(c: Coord<f64>) -> Coord<f64> {
    let lon = (c.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    coord! { x: lon, y: lat }
}

pub fn is_projectable(c: Coord<f64>) -> bool {
    c.y.abs() <= MAX_LATITUDE
}
