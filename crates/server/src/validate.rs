//! Query-parameter validation.
//!
//! Everything here rejects before the engine is invoked; the core assumes
//! well-formed numeric input.

use trackside::geo::Point;
use trackside::spatial::BoundingBox;

use crate::config::CoordinateRange;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed bounding box '{0}': expected 'minLon,minLat,maxLon,maxLat'")]
    MalformedBbox(String),

    #[error("{0}")]
    InvalidRegion(String),

    #[error("coordinates ({lon}, {lat}) outside the supported range")]
    OutOfRange { lon: f64, lat: f64 },

    #[error("radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),
}

/// Parse a `"minLon,minLat,maxLon,maxLat"` string into a bounding box,
/// checking finiteness and the configured coordinate range on both
/// corners.
pub fn parse_bbox(raw: &str, bounds: &CoordinateRange) -> Result<BoundingBox, ValidationError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(ValidationError::MalformedBbox(raw.to_owned()));
    }

    let mut values = [0.0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        let parsed: f64 = part
            .parse()
            .map_err(|_| ValidationError::MalformedBbox(raw.to_owned()))?;
        // f64::parse accepts "NaN" and "inf"; neither is a coordinate.
        if !parsed.is_finite() {
            return Err(ValidationError::MalformedBbox(raw.to_owned()));
        }
        *slot = parsed;
    }

    let [min_lon, min_lat, max_lon, max_lat] = values;
    for (lon, lat) in [(min_lon, min_lat), (max_lon, max_lat)] {
        if !bounds.contains(lon, lat) {
            return Err(ValidationError::OutOfRange { lon, lat });
        }
    }

    BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
        .map_err(|e| ValidationError::InvalidRegion(e.to_string()))
}

/// Check a center/radius pair against the configured coordinate range.
pub fn validate_center(
    lon: f64,
    lat: f64,
    radius_km: f64,
    bounds: &CoordinateRange,
) -> Result<Point, ValidationError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ValidationError::InvalidRadius(radius_km));
    }
    if !bounds.contains(lon, lat) {
        return Err(ValidationError::OutOfRange { lon, lat });
    }
    Ok(Point::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_bbox() {
        let bounds = CoordinateRange::SWEDEN;
        let bbox = parse_bbox("17.5,59.0,18.5,59.5", &bounds).unwrap();
        assert_eq!(bbox.min_lon, 17.5);
        assert_eq!(bbox.max_lat, 59.5);

        // Whitespace around components is tolerated.
        assert!(parse_bbox(" 17.5 , 59.0 , 18.5 , 59.5 ", &bounds).is_ok());
    }

    #[test]
    fn test_reject_malformed_bbox_strings() {
        let bounds = CoordinateRange::SWEDEN;
        for raw in ["", "17.5,59.0,18.5", "17.5,59.0,18.5,59.5,60.0", "a,b,c,d", "17.5;59.0;18.5;59.5"] {
            assert!(
                matches!(parse_bbox(raw, &bounds), Err(ValidationError::MalformedBbox(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_reject_non_finite_bbox_components() {
        let bounds = CoordinateRange::SWEDEN;
        // All of these parse as f64 but are not coordinates.
        for raw in [
            "NaN,NaN,NaN,NaN",
            "17.5,NaN,18.5,59.5",
            "17.5,59.0,inf,59.5",
            "-inf,59.0,18.5,59.5",
        ] {
            assert!(
                matches!(parse_bbox(raw, &bounds), Err(ValidationError::MalformedBbox(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn test_reject_bbox_outside_coordinate_range() {
        let bounds = CoordinateRange::SWEDEN;
        // A mathematically valid box far outside the configured range.
        assert!(matches!(
            parse_bbox("-180,-89,180,89", &bounds),
            Err(ValidationError::OutOfRange { .. })
        ));
        // One corner in range is not enough.
        assert!(matches!(
            parse_bbox("17.5,59.0,40.0,59.5", &bounds),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_reject_inverted_bbox() {
        assert!(matches!(
            parse_bbox("18.5,59.0,17.5,59.5", &CoordinateRange::SWEDEN),
            Err(ValidationError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_validate_center() {
        let bounds = CoordinateRange::SWEDEN;
        assert!(validate_center(18.06, 59.33, 5.0, &bounds).is_ok());
        assert!(matches!(
            validate_center(-0.13, 51.51, 5.0, &bounds),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_center(18.06, 59.33, 0.0, &bounds),
            Err(ValidationError::InvalidRadius(_))
        ));
        assert!(matches!(
            validate_center(18.06, 59.33, f64::NAN, &bounds),
            Err(ValidationError::InvalidRadius(_))
        ));
    }
}
