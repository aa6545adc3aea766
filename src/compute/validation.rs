//! Validation for geographic coordinates and organization records.

use crate::error::{FieldmapError, Result};
use fieldmap_types::bbox::WORLD_MAX_LATITUDE;
use fieldmap_types::organization::Organization;
use geo::Point;

/// Validates a 2D point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use fieldmap::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// let nyc = Point::new(-74.0060, 40.7128);
/// assert!(validate_geographic_point(&nyc).is_ok());
///
/// let invalid = Point::new(200.0, 40.0);
/// assert!(validate_geographic_point(&invalid).is_err());
///
/// let invalid = Point::new(-74.0, f64::NAN);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(FieldmapError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(FieldmapError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(FieldmapError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(FieldmapError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a point lies on the drawable map.
///
/// Queries never reach past latitude ±85°, so a record beyond that band could
/// be indexed but never shown.
///
/// # Examples
///
/// ```
/// use fieldmap::compute::validation::validate_map_point;
/// use geo::Point;
///
/// assert!(validate_map_point(&Point::new(15.0, 78.2)).is_ok());
/// assert!(validate_map_point(&Point::new(15.0, 86.5)).is_err());
/// ```
pub fn validate_map_point(point: &Point) -> Result<()> {
    validate_geographic_point(point)?;

    let y = point.y();
    if !(-WORLD_MAX_LATITUDE..=WORLD_MAX_LATITUDE).contains(&y) {
        return Err(FieldmapError::InvalidInput(format!(
            "Latitude outside the map range [-{m}, {m}]: {}",
            y,
            m = WORLD_MAX_LATITUDE
        )));
    }

    Ok(())
}

/// Validates an organization's position.
///
/// The error names the record and keeps the reason it was rejected.
pub fn validate_organization(org: &Organization) -> Result<()> {
    validate_map_point(&org.point()).map_err(|e| {
        let reason = match e {
            FieldmapError::InvalidInput(reason) => reason,
            other => other.to_string(),
        };
        FieldmapError::InvalidCoordinate {
            name: org.name.clone(),
            latitude: org.latitude,
            longitude: org.longitude,
            reason,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_geographic_point() {
        let nyc = Point::new(-74.0060, 40.7128);
        assert!(validate_geographic_point(&nyc).is_ok());

        let tokyo = Point::new(139.6917, 35.6895);
        assert!(validate_geographic_point(&tokyo).is_ok());

        // Edge cases
        assert!(validate_geographic_point(&Point::new(180.0, 0.0)).is_ok());
        assert!(validate_geographic_point(&Point::new(-180.0, 0.0)).is_ok());
        assert!(validate_geographic_point(&Point::new(0.0, 90.0)).is_ok());
        assert!(validate_geographic_point(&Point::new(0.0, -90.0)).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert!(validate_geographic_point(&Point::new(180.1, 40.0)).is_err());
        assert!(validate_geographic_point(&Point::new(-200.0, 40.0)).is_err());
        assert!(validate_geographic_point(&Point::new(-74.0, 90.1)).is_err());
        assert!(validate_geographic_point(&Point::new(-74.0, -95.0)).is_err());
    }

    #[test]
    fn test_non_finite_coordinates() {
        assert!(validate_geographic_point(&Point::new(f64::NAN, 40.0)).is_err());
        assert!(validate_geographic_point(&Point::new(-74.0, f64::NAN)).is_err());
        assert!(validate_geographic_point(&Point::new(f64::INFINITY, 40.0)).is_err());
        assert!(validate_geographic_point(&Point::new(-74.0, f64::NEG_INFINITY)).is_err());
    }

    #[test]
    fn test_validate_organization_names_record() {
        let org = Organization::new("Broken Row", f64::NAN, 12.0);
        match validate_organization(&org) {
            Err(FieldmapError::InvalidCoordinate { name, longitude, .. }) => {
                assert_eq!(name, "Broken Row");
                assert_eq!(longitude, 12.0);
            }
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_map_point_band() {
        assert!(validate_map_point(&Point::new(0.0, 85.0)).is_ok());
        assert!(validate_map_point(&Point::new(0.0, -85.0)).is_ok());
        assert!(validate_map_point(&Point::new(0.0, 85.1)).is_err());
        assert!(validate_map_point(&Point::new(0.0, -90.0)).is_err());
    }

    #[test]
    fn test_validate_organization_keeps_reason() {
        let polar = Organization::new("Polar Camp", 86.5, 15.0);
        let err = validate_organization(&polar).unwrap_err();
        assert!(err.to_string().contains("map range"), "{}", err);

        let broken = Organization::new("Broken Row", 1.0, f64::NAN);
        let err = validate_organization(&broken).unwrap_err();
        assert!(err.to_string().contains("Longitude must be finite"), "{}", err);
    }
}
