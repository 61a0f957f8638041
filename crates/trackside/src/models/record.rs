//! Infrastructure records and their geometry.
//!
//! Records arrive as JSON objects from a dataset snapshot. Known fields
//! (`id`, `designation`, `track`, `geometry`) are lifted into typed fields;
//! everything else stays in an open attribute map so descriptive properties
//! (names, speed limits, electrification voltage, ...) pass through to the
//! caller untouched.

use std::sync::Arc;

use geo::{Coord, LineString, Point};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::identifiers::RecordId;
use crate::models::types::{Category, QueryError, Result};

// ============================================================================
// Geometry
// ============================================================================

/// The single geometry a record owns: a point or an ordered path.
///
/// Coordinates are (longitude, latitude) in WGS84 degrees; path order is
/// semantically the path order and is never reordered.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordGeometry {
    Point(Point),
    Line(LineString),
}

impl RecordGeometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        RecordGeometry::Point(Point::new(lon, lat))
    }

    pub fn line(coordinates: Vec<[f64; 2]>) -> Self {
        RecordGeometry::Line(LineString::new(
            coordinates.into_iter().map(|[x, y]| Coord { x, y }).collect(),
        ))
    }

    pub fn as_line(&self) -> Option<&LineString> {
        match self {
            RecordGeometry::Line(line) => Some(line),
            RecordGeometry::Point(_) => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            RecordGeometry::Point(p) => Some(*p),
            RecordGeometry::Line(_) => None,
        }
    }

    /// JSON wire form: `{"type": "Point"|"Line", "coordinates": ...}`.
    pub fn to_json(&self) -> Value {
        match self {
            RecordGeometry::Point(p) => json!({
                "type": "Point",
                "coordinates": [p.x(), p.y()],
            }),
            RecordGeometry::Line(line) => json!({
                "type": "Line",
                "coordinates": line.0.iter().map(|c| [c.x, c.y]).collect::<Vec<_>>(),
            }),
        }
    }
}

/// Serde-facing representation of geometry in snapshot files.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub(crate) enum GeometryRepr {
    Point([f64; 2]),
    Line(Vec<[f64; 2]>),
}

impl TryFrom<GeometryRepr> for RecordGeometry {
    type Error = QueryError;

    fn try_from(repr: GeometryRepr) -> Result<Self> {
        match repr {
            GeometryRepr::Point([lon, lat]) => Ok(RecordGeometry::point(lon, lat)),
            GeometryRepr::Line(coordinates) => {
                if coordinates.is_empty() {
                    return Err(QueryError::MalformedGeometry(
                        "line geometry with no coordinates".into(),
                    ));
                }
                Ok(RecordGeometry::line(coordinates))
            }
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// One infrastructure record: a track segment, tunnel, bridge, switch,
/// electrified section, station, yard or access restriction.
///
/// Each record exclusively owns its geometry; snapshots are immutable and
/// replaced wholesale on reload, so records are freely cloneable.
#[derive(Clone, Debug)]
pub struct InfraRecord {
    pub category: Category,
    pub id: RecordId,
    /// Human-facing designation ("182", "Stambanan ...") when distinct
    /// from the id.
    pub designation: Option<Arc<str>>,
    /// Explicit parent-track reference, present for tunnels, bridges and
    /// electrification.
    pub parent_track: Option<RecordId>,
    pub geometry: Option<RecordGeometry>,
    /// Descriptive properties passed through verbatim (names, speed
    /// limits, physical dimensions, ...).
    pub attributes: Map<String, Value>,
}

#[derive(Deserialize)]
struct RecordDoc {
    id: String,
    #[serde(default)]
    designation: Option<String>,
    #[serde(default)]
    track: Option<String>,
    #[serde(default)]
    geometry: Option<GeometryRepr>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl InfraRecord {
    pub fn new(category: Category, id: impl Into<RecordId>) -> Self {
        Self {
            category,
            id: id.into(),
            designation: None,
            parent_track: None,
            geometry: None,
            attributes: Map::new(),
        }
    }

    pub fn with_designation(mut self, designation: impl AsRef<str>) -> Self {
        self.designation = Some(designation.as_ref().into());
        self
    }

    pub fn with_parent_track(mut self, track: impl Into<RecordId>) -> Self {
        self.parent_track = Some(track.into());
        self
    }

    pub fn with_geometry(mut self, geometry: RecordGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Parse one record object from a snapshot.
    ///
    /// A `null` geometry field means the record legitimately has none; an
    /// unparseable or empty geometry is a malformed record and the caller
    /// is expected to skip it.
    pub fn from_value(category: Category, value: Value) -> Result<Self> {
        let doc: RecordDoc =
            serde_json::from_value(value).map_err(|e| QueryError::Dataset(e.to_string()))?;
        let geometry = doc.geometry.map(RecordGeometry::try_from).transpose()?;

        Ok(Self {
            category,
            id: RecordId::new(doc.id),
            designation: doc.designation.map(|d| d.into()),
            parent_track: doc.track.map(RecordId::new),
            geometry,
            attributes: doc.attributes,
        })
    }

    /// True when `query` equals this record's id or designation.
    pub fn matches_identifier(&self, query: &str) -> bool {
        self.id == *query || self.designation.as_deref() == Some(query)
    }

    /// True when this record's parent reference points at `owner` (by id
    /// or designation).
    pub fn refers_to(&self, owner: &InfraRecord) -> bool {
        match &self.parent_track {
            Some(parent) => {
                *parent == owner.id
                    || owner.designation.as_deref() == Some(parent.as_str())
            }
            None => false,
        }
    }
}
