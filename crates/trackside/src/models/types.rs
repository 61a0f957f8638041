//! Core enums and error types for infrastructure data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// The eight infrastructure categories served by this adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Track,
    Tunnel,
    Bridge,
    Switch,
    Electrification,
    Station,
    Yard,
    AccessRestriction,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Track,
        Category::Tunnel,
        Category::Bridge,
        Category::Switch,
        Category::Electrification,
        Category::Station,
        Category::Yard,
        Category::AccessRestriction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Track => "track",
            Category::Tunnel => "tunnel",
            Category::Bridge => "bridge",
            Category::Switch => "switch",
            Category::Electrification => "electrification",
            Category::Station => "station",
            Category::Yard => "yard",
            Category::AccessRestriction => "access_restriction",
        }
    }

    /// How geometry of this category is reduced at corridor detail.
    ///
    /// Tracks and electrified sections are long paths worth simplifying;
    /// tunnels and bridges are short structures whose interior shape is not
    /// load-bearing information; everything else sits at a point.
    pub fn shape_role(&self) -> ShapeRole {
        match self {
            Category::Track | Category::Electrification => ShapeRole::LongPath,
            Category::Tunnel | Category::Bridge => ShapeRole::ShortStructure,
            Category::Switch
            | Category::Station
            | Category::Yard
            | Category::AccessRestriction => ShapeRole::PointSite,
        }
    }

    /// How records of this category are associated with an owning track.
    ///
    /// Tunnels, bridges and electrification carry an explicit parent
    /// reference in the source data; the point categories do not, and must
    /// be associated spatially.
    pub fn association(&self) -> AssociationMode {
        match self {
            Category::Track => AssociationMode::None,
            Category::Tunnel | Category::Bridge | Category::Electrification => {
                AssociationMode::ParentReference
            }
            Category::Switch
            | Category::Station
            | Category::Yard
            | Category::AccessRestriction => AssociationMode::Proximity,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometric role of a record, driving corridor-level reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeRole {
    /// A long path (track, electrified section): simplify + truncate.
    LongPath,
    /// A short structure (tunnel, bridge): collapse to its endpoints.
    ShortStructure,
    /// A point site (switch, station, yard, access restriction).
    PointSite,
}

/// How a category's records attach to an owning track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssociationMode {
    /// The owner category itself.
    None,
    /// Source data stores an explicit parent-track reference.
    ParentReference,
    /// No reliable reference; associate by distance to the track path.
    Proximity,
}

/// Caller-selected tier controlling how much coordinate data a response
/// carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Attributes only, geometry omitted entirely.
    Metadata,
    /// Simplified geometry retaining overall shape.
    #[default]
    Corridor,
    /// Full original coordinates, byte-for-value.
    Precise,
}

// ============================================================================
// Sync metadata
// ============================================================================

/// Freshness information for the loaded dataset.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// Timestamp of the last successful dataset refresh, if known.
    #[serde(rename = "lastSync")]
    pub last_sync: Option<DateTime<Utc>>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("dataset error: {0}")]
    Dataset(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
