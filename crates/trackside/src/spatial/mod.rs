//! Spatial filtering: bounding-box tests and point-to-polyline proximity.
//!
//! The dataset is small (low thousands of records), so everything here is
//! a linear scan with cheap per-record tests. The query contract does not
//! depend on that; a spatial index could be slotted in behind the provider
//! later without changing these signatures.

pub mod bbox;
pub mod proximity;

pub use bbox::{geometry_intersects_bbox, BoundingBox, KM_PER_DEGREE_LAT};
pub use proximity::{
    associate_by_proximity, is_near_polyline, point_to_polyline_distance,
    point_to_segment_distance, ASSOCIATION_TOLERANCE_DEG, NEAR_TRACK_THRESHOLD_DEG,
};
