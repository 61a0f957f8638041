//! Axis-aligned bounding boxes in longitude/latitude.
//!
//! Longitude tests ignore antimeridian wraparound and the cosine
//! correction blows up near the poles. Both are fine within the operating
//! range (Sweden, 55-69N / 11-24E) and are deliberately left as-is so
//! query results stay reproducible.

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::models::record::RecordGeometry;
use crate::models::types::{QueryError, Result};

/// Kilometers per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Axis-aligned rectangle scoping region queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Build a box from explicit corners, enforcing min <= max per axis.
    ///
    /// Written as `!(min <= max)` so NaN corners fail the invariant instead
    /// of slipping past a `min > max` comparison.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        if !(min_lon <= max_lon) || !(min_lat <= max_lat) {
            return Err(QueryError::InvalidRegion(format!(
                "bounding box must have min <= max: [{min_lon},{min_lat},{max_lon},{max_lat}]"
            )));
        }
        Ok(Self { min_lon, min_lat, max_lon, max_lat })
    }

    /// Approximate a square region of `radius_km` around `center`.
    ///
    /// Latitude degrees-per-km is constant; longitude is corrected by the
    /// cosine of the center latitude for meridian convergence. The min/max
    /// invariant is not enforced here (a pathological center near the
    /// antimeridian can produce a wrapped box).
    pub fn from_center(center: Point, radius_km: f64) -> Self {
        let delta_lat = radius_km / KM_PER_DEGREE_LAT;
        let delta_lon =
            radius_km / (KM_PER_DEGREE_LAT * (center.y() * std::f64::consts::PI / 180.0).cos());

        Self {
            min_lon: center.x() - delta_lon,
            min_lat: center.y() - delta_lat,
            max_lon: center.x() + delta_lon,
            max_lat: center.y() + delta_lat,
        }
    }

    /// Inclusive range test on both axes independently.
    pub fn contains(&self, point: Point) -> bool {
        point.x() >= self.min_lon
            && point.x() <= self.max_lon
            && point.y() >= self.min_lat
            && point.y() <= self.max_lat
    }
}

/// True when a geometry intersects the box.
///
/// For a polyline this tests whether any *vertex* falls inside; a line
/// passing through the box without a vertex inside is classified as
/// non-intersecting. Callers depend on this exact behavior, so it is not
/// a full segment-clipping test.
pub fn geometry_intersects_bbox(geometry: &RecordGeometry, bbox: &BoundingBox) -> bool {
    match geometry {
        RecordGeometry::Point(p) => bbox.contains(*p),
        RecordGeometry::Line(line) => line.points().any(|p| bbox.contains(p)),
    }
}
