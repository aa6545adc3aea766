use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Longitude bound of the world extent.
pub const WORLD_MAX_LONGITUDE: f64 = 180.0;
/// Latitude bound of the world extent; Web-Mercator maps stop short of the poles.
pub const WORLD_MAX_LATITUDE: f64 = 85.0;

/// A geographic bounding box in `[west, south, east, north]` order.
///
/// This is a wrapper around `geo::Rect` with map-oriented accessors. The
/// rectangle is normalized by `geo`, so `west <= east` always holds; boxes that
/// cross the antimeridian must be split by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldmap_types::bbox::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(-74.0, 40.7, -73.9, 40.8);
    /// assert_eq!(bbox.to_array(), [-74.0, 40.7, -73.9, 40.8]);
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: west, y: south },
                geo::coord! { x: east, y: north },
            ),
        }
    }

    /// The full world extent `[-180, -85, 180, 85]`.
    pub fn world() -> Self {
        Self::new(
            -WORLD_MAX_LONGITUDE,
            -WORLD_MAX_LATITUDE,
            WORLD_MAX_LONGITUDE,
            WORLD_MAX_LATITUDE,
        )
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn west(&self) -> f64 {
        self.rect.min().x
    }

    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    pub fn east(&self) -> f64 {
        self.rect.max().x
    }

    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    pub fn width(&self) -> f64 {
        self.east() - self.west()
    }

    pub fn height(&self) -> f64 {
        self.north() - self.south()
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.west() + self.east()) / 2.0,
            (self.south() + self.north()) / 2.0,
        )
    }

    /// Check if a point is contained within this bounding box, edges included.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.west()
            && point.x() <= self.east()
            && point.y() >= self.south()
            && point.y() <= self.north()
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.west(), self.south(), self.east(), self.north()]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(edges: [f64; 4]) -> Self {
        Self::new(edges[0], edges[1], edges[2], edges[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_extent() {
        assert_eq!(BoundingBox::world().to_array(), [-180.0, -85.0, 180.0, 85.0]);
    }

    #[test]
    fn test_contains_point_edges() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains_point(&Point::new(0.0, 10.0)));
        assert!(bbox.contains_point(&Point::new(5.0, 5.0)));
        assert!(!bbox.contains_point(&Point::new(10.5, 5.0)));
    }

    #[test]
    fn test_center_and_size() {
        let bbox = BoundingBox::from([-10.0, -4.0, 10.0, 6.0]);
        assert_eq!(bbox.center(), Point::new(0.0, 1.0));
        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.height(), 10.0);
    }
}
