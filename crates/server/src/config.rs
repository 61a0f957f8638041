//! Environment-driven server configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use eyre::{eyre, Result};

/// Latitude/longitude band the service accepts queries for.
///
/// Defaults to the Swedish rail network's extent; the spatial math in the
/// core degrades outside roughly this band (no antimeridian or pole
/// handling), so the range doubles as a guard rail.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateRange {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl CoordinateRange {
    pub const SWEDEN: CoordinateRange =
        CoordinateRange { min_lat: 55.0, max_lat: 69.0, min_lon: 10.0, max_lon: 25.0 };

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Directory holding `<category>.json` snapshots and `sync.json`.
    pub data_dir: PathBuf,
    pub cache_ttl_hours: i64,
    pub bounds: CoordinateRange,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("TRACKSIDE_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            PathBuf::from("data")
        });

        Ok(Self {
            data_dir,
            cache_ttl_hours: parse_env("TRACKSIDE_CACHE_TTL_HOURS", 24)?,
            bounds: CoordinateRange {
                min_lat: parse_env("TRACKSIDE_MIN_LAT", CoordinateRange::SWEDEN.min_lat)?,
                max_lat: parse_env("TRACKSIDE_MAX_LAT", CoordinateRange::SWEDEN.max_lat)?,
                min_lon: parse_env("TRACKSIDE_MIN_LON", CoordinateRange::SWEDEN.min_lon)?,
                max_lon: parse_env("TRACKSIDE_MAX_LON", CoordinateRange::SWEDEN.max_lon)?,
            },
        })
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|e| eyre!("invalid {name}={raw}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweden_range() {
        let range = CoordinateRange::SWEDEN;
        assert!(range.contains(18.0589, 59.3303)); // Stockholm C
        assert!(range.contains(20.26, 67.86)); // Kiruna
        assert!(!range.contains(-0.1276, 51.5074)); // London
        assert!(!range.contains(18.0, 54.0)); // south of the band
    }

    #[test]
    fn test_range_is_inclusive_at_edges() {
        let range = CoordinateRange::SWEDEN;
        assert!(range.contains(10.0, 55.0));
        assert!(range.contains(25.0, 69.0));
    }
}
