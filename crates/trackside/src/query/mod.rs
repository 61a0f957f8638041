//! Query orchestration: dataset access, filtering, geometry reduction and
//! result caching.

pub mod engine;
pub mod response;

pub use engine::{QueryEngine, DEFAULT_CACHE_TTL_HOURS, DEFAULT_REGION_LIMIT};
pub use response::{CategoryMatches, RecordView, RegionResponse, TrackContextResponse};
