//! Douglas-Peucker polyline simplification and precision truncation.
//!
//! All distances are planar degrees in the (lon, lat) plane. No
//! great-circle correction is applied; at the tolerances used here
//! (0.005-0.01 degrees, roughly 500 m to 1 km at Swedish latitudes) the
//! planar approximation is well within the noise.

use geo::Coord;

/// Perpendicular distance from `point` to the infinite line through
/// `start` and `end`, via the cross-product formula. Falls back to direct
/// point distance when the chord is degenerate.
pub fn perpendicular_distance(point: Coord, start: Coord, end: Coord) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let chord_len = (dx * dx + dy * dy).sqrt();

    if chord_len == 0.0 {
        let ex = point.x - start.x;
        let ey = point.y - start.y;
        return (ex * ex + ey * ey).sqrt();
    }

    ((end.x - start.x) * (start.y - point.y) - (start.x - point.x) * (end.y - start.y)).abs()
        / chord_len
}

/// Simplify a polyline with the Douglas-Peucker algorithm.
///
/// Finds the point with maximum perpendicular distance from the chord
/// between the first and last point; if it exceeds `tolerance_deg`, the
/// two halves are simplified recursively and concatenated (dropping the
/// duplicated junction point), otherwise the whole run collapses to its
/// endpoints.
///
/// The output is always a subsequence of the input, always contains the
/// first and last input point, and is never longer than the input.
/// Sequences of length <= 2 are returned unchanged.
pub fn simplify_polyline(points: &[Coord], tolerance_deg: f64) -> Vec<Coord> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_distance = 0.0;
    let mut max_index = 0;
    for (i, point) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let distance = perpendicular_distance(*point, first, last);
        if distance > max_distance {
            max_distance = distance;
            max_index = i;
        }
    }

    if max_distance > tolerance_deg {
        let mut left = simplify_polyline(&points[..=max_index], tolerance_deg);
        let right = simplify_polyline(&points[max_index..], tolerance_deg);
        left.pop(); // junction point reappears as right[0]
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Round each coordinate to `decimals` decimal digits.
///
/// Six decimals is roughly 0.1 m, enough to shrink serialized payloads
/// without visibly altering shape.
pub fn truncate_precision(points: &[Coord], decimals: u32) -> Vec<Coord> {
    let factor = 10f64.powi(decimals as i32);
    points
        .iter()
        .map(|c| Coord {
            x: (c.x * factor).round() / factor,
            y: (c.y * factor).round() / factor,
        })
        .collect()
}
