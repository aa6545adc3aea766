//! Pure computations behind the index and the viewport.
//!
//! - Web-Mercator projection used by the cluster levels
//! - Viewport to query-window mapping
//! - Coordinate validation
//! - GeoJSON export (with the `geojson` feature)

pub mod projection;
pub mod validation;
pub mod viewport;

#[cfg(feature = "geojson")]
pub mod geojson;
