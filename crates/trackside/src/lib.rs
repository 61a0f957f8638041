//! # trackside
//!
//! Railway-infrastructure queries over small in-memory datasets.
//!
//! ## Features
//!
//! - **Detail levels**: metadata / corridor / precise geometry in responses
//! - **Geometry reduction**: Douglas-Peucker simplification + precision truncation
//! - **Spatial filtering**: bounding-box and point-to-track proximity tests
//! - **Result caching**: TTL-based cache over raw query results
//! - **Pluggable datasets**: implement [`provider::DatasetProvider`] for your source
//!
//! ## Example
//!
//! ```
//! use trackside::prelude::*;
//! use std::sync::Arc;
//!
//! let track = InfraRecord::new(Category::Track, "182")
//!     .with_geometry(RecordGeometry::line(vec![[18.07, 59.33], [17.85, 59.50]]))
//!     .with_attribute("speedLimit", serde_json::json!(200));
//!
//! let provider = StaticDatasetProvider::from_records(vec![track]);
//! let engine = QueryEngine::new(
//!     Arc::new(provider),
//!     Arc::new(SystemClock),
//!     chrono::Duration::hours(DEFAULT_CACHE_TTL_HOURS),
//! );
//!
//! let context = engine.track_context("182", DetailLevel::Corridor).unwrap();
//! assert!(context.track.is_some());
//! ```

pub use geo;

pub mod cache;
pub mod geometry;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod query;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::cache::{Clock, ManualClock, SystemClock, TtlCache};
    pub use crate::geometry::{reduce_to_detail, simplify_polyline, truncate_precision};
    pub use crate::identifiers::RecordId;
    pub use crate::models::{
        AssociationMode, Category, DetailLevel, InfraRecord, QueryError, RecordGeometry,
        Result, ShapeRole, SyncMetadata,
    };
    pub use crate::provider::{static_provider::StaticDatasetProvider, DatasetProvider};
    pub use crate::query::{
        CategoryMatches, QueryEngine, RecordView, RegionResponse, TrackContextResponse,
        DEFAULT_CACHE_TTL_HOURS, DEFAULT_REGION_LIMIT,
    };
    pub use crate::spatial::{
        associate_by_proximity, geometry_intersects_bbox, is_near_polyline, BoundingBox,
    };
}

pub use prelude::*;
