//! The segment/region query engine.
//!
//! Raw (full-precision) query results are cached with a 24-hour TTL;
//! detail-level reduction is applied fresh on every call, so one cached
//! raw computation serves all three detail levels without redoing the
//! expensive filter/association step.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use geo::Point;
use tracing::{debug, warn};

use crate::cache::{Clock, TtlCache};
use crate::models::{
    AssociationMode, Category, DetailLevel, InfraRecord, RecordGeometry, Result,
};
use crate::provider::DatasetProvider;
use crate::query::response::{
    CategoryMatches, RecordView, RegionResponse, TrackContextResponse,
};
use crate::spatial::{
    associate_by_proximity, geometry_intersects_bbox, BoundingBox, NEAR_TRACK_THRESHOLD_DEG,
};

/// Default TTL for cached raw query results.
pub const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

/// Default cap on records returned by a region query.
pub const DEFAULT_REGION_LIMIT: usize = 100;

/// Raw result of an identifier query: the owner track and everything
/// associated with it, at full precision.
struct TrackBundle {
    owner: Option<InfraRecord>,
    associated: BTreeMap<Category, Vec<InfraRecord>>,
}

#[derive(Clone)]
enum CachedValue {
    Context(Arc<TrackBundle>),
    Region(Arc<Vec<InfraRecord>>),
}

pub struct QueryEngine {
    provider: Arc<dyn DatasetProvider>,
    cache: TtlCache<String, CachedValue>,
}

impl QueryEngine {
    pub fn new(provider: Arc<dyn DatasetProvider>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { provider, cache: TtlCache::new(ttl, clock) }
    }

    /// All infrastructure associated with the track whose id or designation
    /// equals `id`. An unknown identifier yields an empty bundle, not an
    /// error.
    pub fn track_context(&self, id: &str, detail: DetailLevel) -> Result<TrackContextResponse> {
        let key = format!("context:{id}");
        let bundle = match self.cache.get(&key) {
            Some(CachedValue::Context(bundle)) => {
                debug!(%id, "track context cache hit");
                bundle
            }
            _ => {
                let bundle = Arc::new(self.compute_track_bundle(id)?);
                self.cache.insert(key, CachedValue::Context(bundle.clone()));
                bundle
            }
        };

        let associated = bundle
            .associated
            .iter()
            .map(|(category, records)| {
                let views =
                    records.iter().map(|r| RecordView::render(r, detail)).collect::<Vec<_>>();
                (*category, CategoryMatches { count: views.len(), records: views })
            })
            .collect();

        Ok(TrackContextResponse {
            track: bundle.owner.as_ref().map(|r| RecordView::render(r, detail)),
            associated,
            last_sync: self.last_sync(),
        })
    }

    /// Records of `category` intersecting `bbox`, truncated to `limit`
    /// *before* geometry reduction (reduction is the expensive step).
    pub fn records_in_region(
        &self,
        category: Category,
        bbox: BoundingBox,
        limit: usize,
        detail: DetailLevel,
    ) -> Result<RegionResponse> {
        let key = format!(
            "region:{}:{},{},{},{}:{limit}",
            category, bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat
        );
        let raw = match self.cache.get(&key) {
            Some(CachedValue::Region(records)) => {
                debug!(%category, "region cache hit");
                records
            }
            _ => {
                let records = Arc::new(self.compute_region(category, &bbox, limit)?);
                self.cache.insert(key, CachedValue::Region(records.clone()));
                records
            }
        };

        let records: Vec<RecordView> =
            raw.iter().map(|r| RecordView::render(r, detail)).collect();

        Ok(RegionResponse { count: records.len(), records, last_sync: self.last_sync() })
    }

    /// Administrative cache eviction.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn sync_status(&self) -> Option<DateTime<Utc>> {
        self.last_sync()
    }

    fn last_sync(&self) -> Option<DateTime<Utc>> {
        match self.provider.sync_metadata() {
            Ok(metadata) => metadata.last_sync,
            Err(e) => {
                warn!(error = %e, "sync metadata unavailable");
                None
            }
        }
    }

    fn compute_track_bundle(&self, id: &str) -> Result<TrackBundle> {
        let tracks = self.provider.load_records(Category::Track)?;
        let owner = tracks.iter().find(|r| r.matches_identifier(id)).cloned();

        let mut associated = BTreeMap::new();
        for category in Category::ALL {
            if category == Category::Track {
                continue;
            }

            let matched = match &owner {
                None => Vec::new(),
                Some(owner) => match category.association() {
                    AssociationMode::ParentReference => self
                        .provider
                        .load_records(category)?
                        .iter()
                        .filter(|r| r.refers_to(owner))
                        .cloned()
                        .collect(),
                    AssociationMode::Proximity => {
                        self.associate_near_owner(category, owner)?
                    }
                    AssociationMode::None => Vec::new(),
                },
            };
            associated.insert(category, matched);
        }

        Ok(TrackBundle { owner, associated })
    }

    /// Spatial association for categories without a reliable parent
    /// reference. Candidates without a point geometry are skipped, never
    /// fatal.
    fn associate_near_owner(
        &self,
        category: Category,
        owner: &InfraRecord,
    ) -> Result<Vec<InfraRecord>> {
        let owner_line = match owner.geometry.as_ref().and_then(RecordGeometry::as_line) {
            Some(line) => line,
            None => return Ok(Vec::new()),
        };

        let records = self.provider.load_records(category)?;
        let mut candidates: Vec<&InfraRecord> = Vec::new();
        let mut points: Vec<Point> = Vec::new();
        let mut skipped = 0usize;
        for record in records.iter() {
            match record.geometry.as_ref().and_then(RecordGeometry::as_point) {
                Some(point) => {
                    candidates.push(record);
                    points.push(point);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(%category, skipped, "records without point geometry skipped during association");
        }

        let near = associate_by_proximity(&points, owner_line, NEAR_TRACK_THRESHOLD_DEG);
        Ok(near.into_iter().map(|i| candidates[i].clone()).collect())
    }

    fn compute_region(
        &self,
        category: Category,
        bbox: &BoundingBox,
        limit: usize,
    ) -> Result<Vec<InfraRecord>> {
        let records = self.provider.load_records(category)?;
        Ok(records
            .iter()
            .filter(|r| match &r.geometry {
                Some(geometry) => geometry_intersects_bbox(geometry, bbox),
                None => false,
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
