use geo::Point;
use serde::{Deserialize, Serialize};

/// The visible map region, expressed as a center and a span in degrees.
///
/// Matches the region shape reported by native map views.
///
/// # Examples
///
/// ```
/// use fieldmap_types::viewport::Viewport;
///
/// let downtown = Viewport::new(40.7128, -74.0060, 0.05, 0.05);
/// assert_eq!(downtown.center().y(), 40.7128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Viewport {
    pub fn new(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude,
            longitude,
            latitude_delta,
            longitude_delta,
        }
    }

    /// A viewport covering the whole Web-Mercator world at zoom 0.
    pub fn world() -> Self {
        Self::new(0.0, 0.0, 170.0, 360.0)
    }

    /// Center as a `geo::Point` (x = longitude, y = latitude).
    pub fn center(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude_delta.is_finite()
            && self.longitude_delta.is_finite()
    }
}
