//! Viewport-driven marker clustering for field-operations maps.
//!
//! Organizations are clustered once per distinct list into a zoom hierarchy;
//! each map viewport then maps to a bounding box and zoom level that select
//! the clusters and single organizations to draw. Tapping a cluster resolves
//! to one representative organization.
//!
//! ```rust
//! use fieldmap::{ClusterIndex, Organization, Viewport};
//! use fieldmap::compute::viewport::QueryWindow;
//!
//! let orgs = vec![
//!     Organization::new("Harbor Clinic", 40.7128, -74.0060),
//!     Organization::new("Harbor Pantry", 40.7130, -74.0062),
//!     Organization::new("Harbor Shelter", 40.7132, -74.0058),
//!     Organization::new("Bay Office", 37.7749, -122.4194),
//! ];
//! let index = ClusterIndex::new(&orgs)?;
//!
//! let window = QueryWindow::from_viewport(Some(&Viewport::new(40.71, -74.0, 0.2, 0.2)), 20);
//! let features = index.query(&window);
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].point_count(), 3);
//!
//! let id = features[0].cluster_id().unwrap();
//! let first = fieldmap::resolver::representative(&index, id).unwrap();
//! assert!(first.name.starts_with("Harbor"));
//! # Ok::<(), fieldmap::FieldmapError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod feature;
pub mod index;
pub mod marker;
pub mod pipeline;
pub mod resolver;

pub use builder::{BuildReport, ClusterIndexBuilder};
pub use config::{ClusterConfig, InvalidCoordinatePolicy};
pub use error::{FieldmapError, Result};
pub use feature::{ClusterFeature, ClusterId, Feature, FeatureKey, LeafFeature};
pub use index::ClusterIndex;
pub use marker::{Categorizer, MarkerDescriptor, MarkerKind};
pub use pipeline::MapClusterer;
pub use resolver::LeafHandler;

pub use compute::viewport::QueryWindow;

pub use fieldmap_types::bbox::BoundingBox;
pub use fieldmap_types::organization::Organization;
pub use fieldmap_types::viewport::Viewport;
pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterConfig, ClusterIndex, ClusterIndexBuilder, FieldmapError, Result};

    pub use crate::{ClusterId, Feature, MapClusterer};

    pub use crate::{BoundingBox, Organization, Viewport};

    pub use crate::{Categorizer, LeafHandler};
}
