use geo::Point;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Base URL used to synthesize an identifier for records without a maps link.
pub const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// An organization tracked in the field, as delivered by the external data source.
///
/// Coordinates are WGS84 degrees. The record is identified by its maps link;
/// when that is missing, a map-search URL is synthesized from the coordinates.
///
/// # Examples
///
/// ```
/// use fieldmap_types::organization::Organization;
///
/// let org = Organization::new("Harbor Clinic", 40.7128, -74.0060)
///     .with_category("health")
///     .with_maps_url("https://maps.example/harbor");
///
/// assert_eq!(org.identifier().as_deref(), Some("https://maps.example/harbor"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Organization {
    /// Create a record with a name and position; every other field is empty.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            maps_url: None,
            latitude,
            longitude,
            name: name.into(),
            category: String::new(),
            status: String::new(),
            address: None,
            contact: None,
            notes: None,
        }
    }

    pub fn with_maps_url(mut self, url: impl Into<String>) -> Self {
        self.maps_url = Some(url.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Position as a `geo::Point` (x = longitude, y = latitude).
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    /// Whether both coordinates are finite numbers.
    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Resolve the record's unique identifier.
    ///
    /// Returns the maps link when it is present and non-blank, otherwise a
    /// map-search URL built from the coordinates. Records with neither a link
    /// nor finite coordinates have no identifier.
    pub fn identifier(&self) -> Option<Cow<'_, str>> {
        if let Some(url) = self.maps_url.as_deref() {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                return Some(Cow::Borrowed(trimmed));
            }
        }

        if !self.has_finite_coordinates() {
            return None;
        }

        Some(Cow::Owned(format!(
            "{}{},{}",
            MAP_SEARCH_URL, self.latitude, self.longitude
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_prefers_maps_url() {
        let org = Organization::new("Depot", 10.0, 20.0).with_maps_url("  https://m/1 ");
        assert_eq!(org.identifier().as_deref(), Some("https://m/1"));
    }

    #[test]
    fn test_identifier_synthesized_from_coordinates() {
        let org = Organization::new("Depot", 10.5, -20.25).with_maps_url("   ");
        assert_eq!(
            org.identifier().as_deref(),
            Some("https://www.google.com/maps/search/?api=1&query=10.5,-20.25")
        );
    }

    #[test]
    fn test_identifier_missing_without_url_or_coordinates() {
        let org = Organization::new("Ghost", f64::NAN, 1.0);
        assert!(org.identifier().is_none());

        let linked = Organization::new("Linked", f64::NAN, 1.0).with_maps_url("https://m/2");
        assert!(linked.identifier().is_some());
    }

    #[test]
    fn test_point_axis_order() {
        let org = Organization::new("Depot", 40.0, -74.0);
        assert_eq!(org.point().x(), -74.0);
        assert_eq!(org.point().y(), 40.0);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "mapsUrl": "https://m/3",
            "latitude": 1.5,
            "longitude": 2.5,
            "name": "Field Office",
            "status": "active"
        }"#;
        let org: Organization = serde_json::from_str(json).unwrap();
        assert_eq!(org.maps_url.as_deref(), Some("https://m/3"));
        assert_eq!(org.status, "active");
        assert!(org.category.is_empty());
        assert!(org.notes.is_none());
    }
}
