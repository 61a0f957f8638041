//! Detail-level dispatch for record geometry.

use geo::LineString;

use crate::geometry::simplify::{simplify_polyline, truncate_precision};
use crate::models::record::RecordGeometry;
use crate::models::types::{DetailLevel, ShapeRole};

/// Simplification tolerance for corridor-level long paths, in degrees
/// (~500 m at Swedish latitudes).
pub const CORRIDOR_TOLERANCE_DEG: f64 = 0.005;

/// Decimal digits kept after corridor-level truncation (~0.1 m).
pub const COORD_DECIMALS: u32 = 6;

/// Produce the detail-appropriate representation of a record's geometry.
///
/// `None` means the geometry is omitted from output entirely (metadata
/// level). Precise output preserves the original coordinates byte-for-value;
/// no truncation is applied at that level. Never fails on well-formed input;
/// zero-length polylines are the caller's responsibility.
pub fn reduce_to_detail(
    geometry: &RecordGeometry,
    level: DetailLevel,
    role: ShapeRole,
) -> Option<RecordGeometry> {
    match level {
        DetailLevel::Metadata => None,
        DetailLevel::Precise => Some(geometry.clone()),
        DetailLevel::Corridor => Some(match geometry {
            RecordGeometry::Point(p) => RecordGeometry::Point(*p),
            RecordGeometry::Line(line) => RecordGeometry::Line(reduce_line(line, role)),
        }),
    }
}

fn reduce_line(line: &LineString, role: ShapeRole) -> LineString {
    match role {
        ShapeRole::LongPath => {
            let simplified = simplify_polyline(&line.0, CORRIDOR_TOLERANCE_DEG);
            LineString::new(truncate_precision(&simplified, COORD_DECIMALS))
        }
        // Short structures (and the odd line on a point-site record) are
        // short enough that interior shape is not load-bearing information.
        ShapeRole::ShortStructure | ShapeRole::PointSite => {
            if line.0.len() <= 2 {
                line.clone()
            } else {
                LineString::new(vec![line.0[0], line.0[line.0.len() - 1]])
            }
        }
    }
}
