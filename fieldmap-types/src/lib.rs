//! # fieldmap-types
//!
//! Core data types shared by the fieldmap clustering engine and its callers.
//!
//! - **Records**: `Organization`, the external entity placed on the map
//! - **Map state**: `Viewport`, the visible region as center plus span
//! - **Geometry**: `BoundingBox`, a `[west, south, east, north]` rectangle
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use fieldmap_types::bbox::BoundingBox;
//! use fieldmap_types::organization::Organization;
//!
//! let clinic = Organization::new("Harbor Clinic", 40.7128, -74.0060);
//! let manhattan = BoundingBox::new(-74.0479, 40.6829, -73.9067, 40.8820);
//! assert!(manhattan.contains_point(&clinic.point()));
//! ```

pub mod bbox;
pub mod organization;
pub mod viewport;

pub use geo::Point;
