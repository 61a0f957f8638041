//! Query responses with geometry already reduced to the caller's
//! requested detail level.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::geometry::reduce_to_detail;
use crate::models::{Category, DetailLevel, InfraRecord};

/// One record as seen by the caller: flattened attributes plus an optional
/// `geometry` field, depending on the detail level.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct RecordView {
    fields: Map<String, Value>,
}

impl RecordView {
    pub fn render(record: &InfraRecord, detail: DetailLevel) -> Self {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::String(record.id.as_str().to_owned()));
        if let Some(designation) = &record.designation {
            fields.insert("designation".into(), Value::String(designation.to_string()));
        }
        if let Some(track) = &record.parent_track {
            fields.insert("track".into(), Value::String(track.as_str().to_owned()));
        }
        // Snapshot decoding already lifts these keys out of the attribute
        // map, but records built in code could still carry them; the typed
        // fields win.
        const RESERVED: [&str; 4] = ["id", "designation", "track", "geometry"];
        for (key, value) in &record.attributes {
            if RESERVED.contains(&key.as_str()) {
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }
        if let Some(geometry) = &record.geometry {
            if let Some(reduced) =
                reduce_to_detail(geometry, detail, record.category.shape_role())
            {
                fields.insert("geometry".into(), reduced.to_json());
            }
        }
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn has_geometry(&self) -> bool {
        self.fields.contains_key("geometry")
    }
}

/// Matches of one associated category, with the count the tool surface
/// reports.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryMatches {
    pub count: usize,
    pub records: Vec<RecordView>,
}

/// Everything associated with one identified track.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackContextResponse {
    /// The owner record, absent when the identifier matched nothing
    /// ("no results" is success, not failure).
    pub track: Option<RecordView>,
    pub associated: BTreeMap<Category, CategoryMatches>,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Records of one category intersecting a queried region.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionResponse {
    pub count: usize,
    pub records: Vec<RecordView>,
    pub last_sync: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordGeometry;
    use serde_json::json;

    #[test]
    fn test_render_metadata_omits_geometry_keeps_attributes() {
        let record = InfraRecord::new(Category::Track, "182")
            .with_geometry(RecordGeometry::line(vec![[18.07, 59.33], [17.85, 59.50]]))
            .with_attribute("speedLimit", json!(200));

        let view = RecordView::render(&record, DetailLevel::Metadata);
        assert!(!view.has_geometry());
        assert_eq!(view.get("speedLimit"), Some(&json!(200)));
        assert_eq!(view.get("id"), Some(&json!("182")));
    }

    #[test]
    fn test_render_precise_serializes_geometry() {
        let record = InfraRecord::new(Category::Station, "Cst")
            .with_geometry(RecordGeometry::point(18.0589, 59.3303));

        let view = RecordView::render(&record, DetailLevel::Precise);
        assert_eq!(
            view.get("geometry"),
            Some(&json!({"type": "Point", "coordinates": [18.0589, 59.3303]}))
        );
    }

    #[test]
    fn test_attributes_cannot_shadow_typed_fields() {
        let record = InfraRecord::new(Category::Track, "182")
            .with_attribute("id", json!("spoofed"))
            .with_attribute("track", json!("spoofed"))
            .with_attribute("geometry", json!("spoofed"))
            .with_attribute("name", json!("Ostkustbanan"));

        let view = RecordView::render(&record, DetailLevel::Metadata);
        assert_eq!(view.get("id"), Some(&json!("182")));
        assert_eq!(view.get("track"), None);
        assert!(!view.has_geometry());
        assert_eq!(view.get("name"), Some(&json!("Ostkustbanan")));
    }

    #[test]
    fn test_view_serializes_as_flat_object() {
        let record = InfraRecord::new(Category::Bridge, "b1")
            .with_parent_track("182")
            .with_attribute("name", json!("Årstabron"));

        let value = serde_json::to_value(RecordView::render(&record, DetailLevel::Corridor))
            .unwrap();
        assert_eq!(value, json!({"id": "b1", "track": "182", "name": "Årstabron"}));
    }
}
