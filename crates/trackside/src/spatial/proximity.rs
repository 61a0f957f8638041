//! Point-to-polyline proximity and proximity-based track association.
//!
//! Distances are planar degrees, consistent with the simplification
//! tolerances. Proximity association replaces the missing parent-track
//! foreign key for point-type records (stations, switches, yards, access
//! restrictions).

use geo::{Coord, LineString, Point};

use crate::geometry::simplify::simplify_polyline;

/// Tolerance for the one-time pre-simplification of a parent polyline
/// before repeated proximity tests (~1 km).
pub const ASSOCIATION_TOLERANCE_DEG: f64 = 0.01;

/// Default distance under which a point record is considered to sit on a
/// track (~1 km at the operating latitudes).
pub const NEAR_TRACK_THRESHOLD_DEG: f64 = 0.01;

/// Distance from `point` to the closest position on the finite segment
/// `start`..`end`, via vector projection clamped to [0, 1].
pub fn point_to_segment_distance(point: Point, start: Coord, end: Coord) -> f64 {
    let ab = Coord { x: end.x - start.x, y: end.y - start.y };
    let ap = Coord { x: point.x() - start.x, y: point.y() - start.y };

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;
    let t = if ab_len_sq > 0.0 {
        ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let dx = point.x() - (start.x + t * ab.x);
    let dy = point.y() - (start.y + t * ab.y);
    (dx * dx + dy * dy).sqrt()
}

/// Minimum distance from `point` to any segment of `line`.
///
/// Degenerates to direct point distance for a one-point polyline and
/// +infinity for an empty one.
pub fn point_to_polyline_distance(point: Point, line: &LineString) -> f64 {
    match line.0.len() {
        0 => f64::INFINITY,
        1 => {
            let c = line.0[0];
            let dx = point.x() - c.x;
            let dy = point.y() - c.y;
            (dx * dx + dy * dy).sqrt()
        }
        _ => line
            .0
            .windows(2)
            .map(|pair| point_to_segment_distance(point, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

pub fn is_near_polyline(point: Point, line: &LineString, threshold_deg: f64) -> bool {
    point_to_polyline_distance(point, line) <= threshold_deg
}

/// Indices of `candidates` lying within `threshold_deg` of `parent`.
///
/// The parent polyline is simplified once (at [`ASSOCIATION_TOLERANCE_DEG`])
/// and that corridor is reused for every candidate test. For a typical
/// track this cuts segment-distance computations from O(10^4) to O(10^2)
/// per polyline, which is what makes associating hundreds of points
/// against one track affordable.
pub fn associate_by_proximity(
    candidates: &[Point],
    parent: &LineString,
    threshold_deg: f64,
) -> Vec<usize> {
    if parent.0.is_empty() {
        return Vec::new();
    }

    let corridor = LineString::new(simplify_polyline(&parent.0, ASSOCIATION_TOLERANCE_DEG));

    candidates
        .iter()
        .enumerate()
        .filter(|(_, point)| is_near_polyline(**point, &corridor, threshold_deg))
        .map(|(i, _)| i)
        .collect()
}
