//! Geometry-detail reduction: polyline simplification, precision
//! truncation and detail-level dispatch.

pub mod detail;
pub mod simplify;

pub use detail::{reduce_to_detail, CORRIDOR_TOLERANCE_DEG, COORD_DECIMALS};
pub use simplify::{perpendicular_distance, simplify_polyline, truncate_precision};
