//! Uniform arc-length resampling of routes
//!
//! Routes are projected to Web Mercator, walked at a fixed step along the
//! projected polyline, and the resulting points are mapped back to degrees.

use geo::{Coord, LineString, coord};

use super::projection::{from_web_mercator, is_projectable, to_web_mercator};
use super::{Route, Sample};
use crate::error::ValidationError;

/// Upper bound on samples produced for a single route
pub const MAX_SAMPLES: usize = 200_000;

/// A route expressed in Web Mercator meters
#[derive(Debug, Clone)]
pub(crate) struct ProjectedRoute {
    line: LineString<f64>,
    segment_lengths: Vec<f64>,
    length_m: f64,
}

impl ProjectedRoute {
    pub fn from_route(route: &Route) -> Result<Self, ValidationError> {
        let mut projected = Vec::with_capacity(route.vertex_count());
        for (index, c) in route.coords().iter().enumerate() {
            if !is_projectable(*c) {
                return Err(ValidationError::OutsideProjection { index, lat: c.y });
            }
            projected.push(to_web_mercator(*c));
        }

        let segment_lengths: Vec<f64> = projected
            .windows(2)
            .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
            .collect();
        let length_m = segment_lengths.iter().sum();

        Ok(Self {
            line: LineString::new(projected),
            segment_lengths,
            length_m,
        })
    }

    /// Total planar length in meters
    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn start(&self) -> Coord<f64> {
        self.line.0[0]
    }

    pub fn end(&self) -> Coord<f64> {
        self.line.0[self.line.0.len() - 1]
    }

    /// Points at each of `distances` along the line
    ///
    /// `distances` must be non-decreasing. Anything at or beyond the total
    /// length resolves to the terminal vertex exactly.
    fn points_at(&self, distances: &[f64]) -> Vec<Coord<f64>> {
        let coords = &self.line.0;
        let last_segment = self.segment_lengths.len() - 1;
        let mut points = Vec::with_capacity(distances.len());
        let mut segment = 0;
        let mut walked = 0.0;

        for &distance in distances {
            if distance >= self.length_m {
                points.push(self.end());
                continue;
            }
            if distance <= 0.0 {
                points.push(self.start());
                continue;
            }

            while segment < last_segment && walked + self.segment_lengths[segment] < distance {
                walked += self.segment_lengths[segment];
                segment += 1;
            }

            let seg_len = self.segment_lengths[segment];
            let (a, b) = (coords[segment], coords[segment + 1]);
            if seg_len == 0.0 {
                points.push(a);
                continue;
            }

            let t = ((distance - walked) / seg_len).clamp(0.0, 1.0);
            points.push(coord! { x: a.x + t * (b.x - a.x), y: a.y + t * (b.y - a.y) });
        }

        points
    }
}

/// Resampling output
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledRoute {
    /// Planar (Web Mercator) length of the route in meters
    pub length_m: f64,
    pub samples: Vec<Sample>,
}

/// Arc-length positions for a route of `length_m` sampled every `step_m`
fn sample_positions(length_m: f64, step_m: f64) -> Vec<f64> {
    let n = ((length_m / step_m).ceil() as usize + 1).max(2);
    (0..n).map(|i| (i as f64 * step_m).min(length_m)).collect()
}

fn sample_count(length_m: f64, step_m: f64) -> f64 {
    ((length_m / step_m).ceil() + 1.0).max(2.0)
}

/// Resample `route` every `step_m` meters of planar arc length
///
/// The first sample is the route's start and the last is its true end. A route
/// whose vertices all coincide yields no samples.
pub fn resample_route(route: &Route, step_m: f64) -> Result<ResampledRoute, ValidationError> {
    if !step_m.is_finite() || step_m <= 0.0 {
        return Err(ValidationError::InvalidStep(step_m));
    }

    let projected = ProjectedRoute::from_route(route)?;
    let length_m = projected.length_m();
    if length_m == 0.0 {
        return Ok(ResampledRoute {
            length_m,
            samples: Vec::new(),
        });
    }

    let expected = sample_count(length_m, step_m);
    if expected > MAX_SAMPLES as f64 {
        return Err(ValidationError::TooManySamples {
            step_m,
            samples: expected as usize,
            limit: MAX_SAMPLES,
        });
    }

    let mut points = projected.points_at(&sample_positions(length_m, step_m));
    let end = projected.end();
    if points.last() != Some(&end) {
        points.push(end);
    }

    let samples = points
        .into_iter()
        .map(|p| Sample::from(from_web_mercator(p)))
        .collect();

    Ok(ResampledRoute { length_m, samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn route(coords: &[(f64, f64)]) -> Route {
        Route::new(coords.iter().map(|&(x, y)| coord! { x: x, y: y }).collect()).unwrap()
    }

    #[test]
    fn test_straight_line_scenario() {
        let r = route(&[(-79.9, -2.17), (-79.91, -2.18)]);
        let resampled = resample_route(&r, 500.0).unwrap();

        assert!(resampled.samples.len() >= 2);
        let first = resampled.samples[0];
        let last = resampled.samples[resampled.samples.len() - 1];
        assert_abs_diff_eq!(first.lat, -2.17, epsilon = 1e-6);
        assert_abs_diff_eq!(first.lon, -79.9, epsilon = 1e-6);
        assert_abs_diff_eq!(last.lat, -2.18, epsilon = 1e-6);
        assert_abs_diff_eq!(last.lon, -79.91, epsilon = 1e-6);
    }

    #[test]
    fn test_sample_count_follows_step() {
        let r = route(&[(-79.9, -2.17), (-79.91, -2.18)]);
        let resampled = resample_route(&r, 500.0).unwrap();

        let expected = (resampled.length_m / 500.0).ceil() as usize + 1;
        assert_eq!(resampled.samples.len(), expected);
        // ~1.57 km of mercator distance near the equator
        assert!(resampled.length_m > 1500.0 && resampled.length_m < 1600.0);
    }

    #[test]
    fn test_degenerate_route_has_no_samples() {
        let r = route(&[(-79.9, -2.17), (-79.9, -2.17)]);
        let resampled = resample_route(&r, 20.0).unwrap();

        assert_eq!(resampled.length_m, 0.0);
        assert!(resampled.samples.is_empty());
    }

    #[test]
    fn test_short_route_still_has_two_samples() {
        let r = route(&[(-79.9, -2.17), (-79.90001, -2.17)]);
        let resampled = resample_route(&r, 1000.0).unwrap();

        assert_eq!(resampled.samples.len(), 2);
        assert_abs_diff_eq!(resampled.samples[1].lon, -79.90001, epsilon = 1e-9);
    }

    #[test]
    fn test_ends_on_true_terminal_vertex() {
        let r = route(&[(-79.9, -2.17), (-79.905, -2.171), (-79.91, -2.18)]);
        let resampled = resample_route(&r, 37.0).unwrap();

        let last = resampled.samples[resampled.samples.len() - 1];
        assert_abs_diff_eq!(last.lat, -2.18, epsilon = 1e-9);
        assert_abs_diff_eq!(last.lon, -79.91, epsilon = 1e-9);
    }

    #[test]
    fn test_positions_are_monotonic_and_capped() {
        let positions = sample_positions(1234.5, 100.0);

        assert_eq!(positions.len(), 14);
        assert_eq!(positions[0], 0.0);
        assert_eq!(positions[positions.len() - 1], 1234.5);
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_samples_advance_along_straight_route() {
        let r = route(&[(-79.9, -2.17), (-79.95, -2.17)]);
        let resampled = resample_route(&r, 250.0).unwrap();

        // Heading west: longitude must never move back east
        assert!(
            resampled
                .samples
                .windows(2)
                .all(|w| w[1].lon <= w[0].lon)
        );
    }

    #[test]
    fn test_spacing_around_a_corner() {
        let r = route(&[(0.0, 0.0), (0.01, 0.0), (0.01, 0.01)]);
        let step = 100.0;
        let resampled = resample_route(&r, step).unwrap();

        let projected: Vec<Coord<f64>> = resampled
            .samples
            .iter()
            .map(|s| to_web_mercator(coord! { x: s.lon, y: s.lat }))
            .collect();

        // Chords never exceed the arc length step
        for pair in projected.windows(2) {
            let chord = (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y);
            assert!(chord <= step + 1e-6, "chord {} exceeds step", chord);
        }

        let expected = (resampled.length_m / step).ceil() as usize + 1;
        assert_eq!(resampled.samples.len(), expected);
    }

    #[test]
    fn test_repeated_vertices_mid_route() {
        let r = route(&[(0.0, 0.0), (0.001, 0.0), (0.001, 0.0), (0.002, 0.0)]);
        let resampled = resample_route(&r, 50.0).unwrap();

        assert!(resampled.samples.iter().all(|s| s.lat.is_finite() && s.lon.is_finite()));
        assert_abs_diff_eq!(
            resampled.samples[resampled.samples.len() - 1].lon,
            0.002,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_rejects_bad_steps() {
        let r = route(&[(0.0, 0.0), (0.01, 0.0)]);

        assert_eq!(
            resample_route(&r, 0.0).unwrap_err(),
            ValidationError::InvalidStep(0.0)
        );
        assert!(matches!(
            resample_route(&r, -5.0),
            Err(ValidationError::InvalidStep(_))
        ));
        assert!(matches!(
            resample_route(&r, f64::NAN),
            Err(ValidationError::InvalidStep(_))
        ));
        assert!(matches!(
            resample_route(&r, 0.0001),
            Err(ValidationError::TooManySamples { .. })
        ));
    }

    #[test]
    fn test_rejects_polar_routes() {
        let r = route(&[(0.0, 80.0), (0.0, 89.0)]);
        assert_eq!(
            resample_route(&r, 100.0).unwrap_err(),
            ValidationError::OutsideProjection { index: 1, lat: 89.0 }
        );
    }
}
