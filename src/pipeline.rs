//! The map screen's clustering pipeline.
//!
//! [`MapClusterer`] keeps the index for the current organization list and
//! answers the three questions the map asks: what to draw for a viewport,
//! which markers that means, and which organization a cluster tap opens.
//! The index is rebuilt only when the list content actually changes: a
//! content hash is compared first, then the previous list field by field.
//!
//! ```rust
//! use fieldmap::{MapClusterer, Organization, Viewport};
//!
//! let mut map = MapClusterer::default();
//! let orgs = vec![
//!     Organization::new("Pier 1", 40.700, -74.010),
//!     Organization::new("Pier 2", 40.701, -74.011),
//!     Organization::new("Pier 3", 40.702, -74.012),
//! ];
//! assert!(map.set_organizations(&orgs)?);
//! assert!(!map.set_organizations(&orgs.clone())?);
//!
//! let features = map.features(Some(&Viewport::new(40.7, -74.0, 1.0, 1.0)));
//! assert_eq!(features.len(), 1);
//! # Ok::<(), fieldmap::FieldmapError>(())
//! ```

use crate::builder::ClusterIndexBuilder;
use crate::compute::viewport::QueryWindow;
use crate::config::ClusterConfig;
use crate::error::Result;
use crate::feature::{ClusterId, Feature};
use crate::index::ClusterIndex;
use crate::marker::{Categorizer, MarkerDescriptor, markers};
use crate::resolver::{LeafHandler, resolve_tap};
use fieldmap_types::organization::Organization;
use fieldmap_types::viewport::Viewport;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug)]
pub struct MapClusterer {
    builder: ClusterIndexBuilder,
    index: ClusterIndex,
    /// List the current index was built from, as given
    source: Vec<Organization>,
    fingerprint: Option<u64>,
}

impl MapClusterer {
    /// Create a pipeline with an empty index.
    pub fn new(config: ClusterConfig) -> Result<Self> {
        let builder = ClusterIndexBuilder::new().config(config);
        let index = builder.build(&[])?;
        Ok(Self {
            builder,
            index,
            source: Vec::new(),
            fingerprint: None,
        })
    }

    pub fn index(&self) -> &ClusterIndex {
        &self.index
    }

    /// Replace the organization list, rebuilding only if its content changed.
    ///
    /// Returns whether a rebuild happened. On error the previous index stays.
    pub fn set_organizations(&mut self, organizations: &[Organization]) -> Result<bool> {
        let fingerprint = fingerprint(organizations);
        if self.fingerprint == Some(fingerprint) && same_content(&self.source, organizations) {
            return Ok(false);
        }

        self.index = self.builder.build(organizations)?;
        self.source = organizations.to_vec();
        self.fingerprint = Some(fingerprint);
        Ok(true)
    }

    /// Features to draw for a viewport; `None` means the whole world.
    pub fn features(&self, viewport: Option<&Viewport>) -> Vec<Feature<'_>> {
        let window = QueryWindow::from_viewport(viewport, self.index.config().max_zoom);
        self.index.query(&window)
    }

    pub fn markers<C>(
        &self,
        viewport: Option<&Viewport>,
        categorizer: &C,
    ) -> Vec<MarkerDescriptor<C::Style>>
    where
        C: Categorizer + ?Sized,
    {
        markers(&self.features(viewport), categorizer)
    }

    /// Open a representative organization for a tapped cluster.
    pub fn resolve_tap<H>(&self, cluster_id: ClusterId, handler: &mut H) -> bool
    where
        H: LeafHandler + ?Sized,
    {
        resolve_tap(&self.index, cluster_id, handler)
    }
}

impl Default for MapClusterer {
    fn default() -> Self {
        Self {
            builder: ClusterIndexBuilder::new(),
            index: ClusterIndex::from_parts(
                ClusterConfig::default(),
                Vec::new(),
                Default::default(),
            ),
            source: Vec::new(),
            fingerprint: None,
        }
    }
}

/// Content hash of an organization list, order included.
fn fingerprint(organizations: &[Organization]) -> u64 {
    let mut hasher = FxHasher::default();
    organizations.len().hash(&mut hasher);
    for org in organizations {
        org.maps_url.hash(&mut hasher);
        org.latitude.to_bits().hash(&mut hasher);
        org.longitude.to_bits().hash(&mut hasher);
        org.name.hash(&mut hasher);
        org.category.hash(&mut hasher);
        org.status.hash(&mut hasher);
        org.address.hash(&mut hasher);
        org.contact.hash(&mut hasher);
        org.notes.hash(&mut hasher);
    }
    hasher.finish()
}

/// Exact list equality, comparing coordinates by bit pattern so NaN equals NaN.
fn same_content(previous: &[Organization], next: &[Organization]) -> bool {
    previous.len() == next.len()
        && previous.iter().zip(next).all(|(a, b)| {
            a.latitude.to_bits() == b.latitude.to_bits()
                && a.longitude.to_bits() == b.longitude.to_bits()
                && a.maps_url == b.maps_url
                && a.name == b.name
                && a.category == b.category
                && a.status == b.status
                && a.address == b.address
                && a.contact == b.contact
                && a.notes == b.notes
        })
}
