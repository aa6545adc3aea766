//! Mapping from a map viewport to a cluster query window.
//!
//! A viewport is a center and a span. The query needs a bounding box and an
//! integer zoom where each level halves the visible longitude span, the same
//! convention web-map tiles use.

use fieldmap_types::bbox::{BoundingBox, WORLD_MAX_LATITUDE, WORLD_MAX_LONGITUDE};
use fieldmap_types::viewport::Viewport;

/// Smallest span, in degrees, used for either axis.
pub const MIN_DELTA: f64 = 0.01;

/// Bounding box and zoom level for one cluster query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryWindow {
    pub bbox: BoundingBox,
    pub zoom: u8,
}

impl QueryWindow {
    /// The whole world at zoom 0.
    pub fn world() -> Self {
        Self {
            bbox: BoundingBox::world(),
            zoom: 0,
        }
    }

    /// Compute the query window for a viewport, or the world for `None`.
    ///
    /// Spans are floored at [`MIN_DELTA`]. The box is clamped to
    /// `[-180, 180]` × `[-85, 85]` and the zoom to `[0, max_zoom]`.
    /// Non-finite viewports fall back to the world window.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldmap::compute::viewport::QueryWindow;
    /// use fieldmap::Viewport;
    ///
    /// let window = QueryWindow::from_viewport(Some(&Viewport::new(89.0, 0.0, 0.1, 0.1)), 20);
    /// assert_eq!(window.bbox.north(), 85.0);
    /// assert_eq!(window.zoom, 12);
    /// ```
    pub fn from_viewport(viewport: Option<&Viewport>, max_zoom: u8) -> Self {
        let Some(viewport) = viewport else {
            return Self::world();
        };

        if !viewport.is_finite() {
            log::warn!(
                "Non-finite viewport {:?}, querying the whole world instead",
                viewport
            );
            return Self::world();
        }

        let lat_delta = viewport.latitude_delta.max(MIN_DELTA);
        let lng_delta = viewport.longitude_delta.max(MIN_DELTA);

        let west = clamp_lng(viewport.longitude - lng_delta / 2.0);
        let south = clamp_lat(viewport.latitude - lat_delta / 2.0);
        let east = clamp_lng(viewport.longitude + lng_delta / 2.0);
        let north = clamp_lat(viewport.latitude + lat_delta / 2.0);

        Self {
            bbox: BoundingBox::new(west, south, east, north),
            zoom: zoom_for_span(lng_delta, max_zoom),
        }
    }
}

/// Zoom level showing `lng_delta` degrees of longitude: `round(log2(360 / delta))`.
pub fn zoom_for_span(lng_delta: f64, max_zoom: u8) -> u8 {
    let delta = lng_delta.max(MIN_DELTA);
    let zoom = (360.0 / delta).log2().round();
    zoom.clamp(0.0, f64::from(max_zoom)) as u8
}

fn clamp_lng(lng: f64) -> f64 {
    lng.clamp(-WORLD_MAX_LONGITUDE, WORLD_MAX_LONGITUDE)
}

fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-WORLD_MAX_LATITUDE, WORLD_MAX_LATITUDE)
}
