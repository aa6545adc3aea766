//! Query results: clusters and individual leaves.
//!
//! A query over the index yields a sequence of [`Feature`]s. Clusters carry an
//! id and a count; leaves borrow the organization they stand for. Both carry
//! a coordinate and a [`FeatureKey`] that is stable across rebuilds from equal
//! input, suitable as a rendering key.

use fieldmap_types::organization::Organization;
use geo::Point;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a cluster produced by a [`ClusterIndex`](crate::ClusterIndex).
///
/// The value encodes the level the cluster's children live on and the
/// position of the node that seeded it, offset by the number of leaves so it
/// never collides with a leaf index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u64);

impl ClusterId {
    pub(crate) fn encode(origin_index: usize, origin_zoom: u8, leaf_count: usize) -> Self {
        Self(((origin_index as u64) << 5) + u64::from(origin_zoom) + leaf_count as u64)
    }

    /// Split into `(origin_index, origin_zoom)`, or `None` if the id predates
    /// the leaf offset and cannot have come from this index.
    pub(crate) fn decode(self, leaf_count: usize) -> Option<(usize, u8)> {
        let raw = self.0.checked_sub(leaf_count as u64)?;
        Some(((raw >> 5) as usize, (raw % 32) as u8))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash identifying a feature for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey(pub u64);

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterFeature {
    pub id: ClusterId,
    /// Count-weighted centroid of the clustered points
    pub coordinate: Point,
    pub point_count: usize,
    pub point_count_abbreviated: String,
}

impl ClusterFeature {
    pub(crate) fn new(id: ClusterId, coordinate: Point, point_count: usize) -> Self {
        Self {
            id,
            coordinate,
            point_count,
            point_count_abbreviated: abbreviate_count(point_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafFeature<'a> {
    pub organization: &'a Organization,
    pub coordinate: Point,
}

/// A visible map feature: an aggregated cluster or a single organization.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature<'a> {
    Cluster(ClusterFeature),
    Leaf(LeafFeature<'a>),
}

impl<'a> Feature<'a> {
    pub fn coordinate(&self) -> Point {
        match self {
            Feature::Cluster(cluster) => cluster.coordinate,
            Feature::Leaf(leaf) => leaf.coordinate,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, Feature::Cluster(_))
    }

    /// Number of organizations this feature stands for.
    pub fn point_count(&self) -> usize {
        match self {
            Feature::Cluster(cluster) => cluster.point_count,
            Feature::Leaf(_) => 1,
        }
    }

    /// Count label for cluster markers; `None` for leaves.
    pub fn display_count(&self) -> Option<&str> {
        match self {
            Feature::Cluster(cluster) => Some(&cluster.point_count_abbreviated),
            Feature::Leaf(_) => None,
        }
    }

    pub fn cluster_id(&self) -> Option<ClusterId> {
        match self {
            Feature::Cluster(cluster) => Some(cluster.id),
            Feature::Leaf(_) => None,
        }
    }

    pub fn organization(&self) -> Option<&'a Organization> {
        match self {
            Feature::Cluster(_) => None,
            Feature::Leaf(leaf) => Some(leaf.organization),
        }
    }

    /// Stable rendering key.
    ///
    /// Hashes the variant, the coordinate bits, and either the cluster id or
    /// the organization's identifier and name. Records with no maps link still
    /// get a deterministic key from their content.
    pub fn key(&self) -> FeatureKey {
        let mut hasher = FxHasher::default();
        let coordinate = self.coordinate();
        match self {
            Feature::Cluster(cluster) => {
                0u8.hash(&mut hasher);
                cluster.id.hash(&mut hasher);
            }
            Feature::Leaf(leaf) => {
                1u8.hash(&mut hasher);
                leaf.organization.identifier().hash(&mut hasher);
                leaf.organization.name.hash(&mut hasher);
            }
        }
        coordinate.x().to_bits().hash(&mut hasher);
        coordinate.y().to_bits().hash(&mut hasher);
        FeatureKey(hasher.finish())
    }
}

/// Short count label: `1234` → `"1.2k"`, `25000` → `"25k"`, `42` → `"42"`.
pub fn abbreviate_count(count: usize) -> String {
    if count >= 10_000 {
        format!("{}k", (count as f64 / 1000.0).round())
    } else if count >= 1_000 {
        let tenths = (count as f64 / 100.0).round() / 10.0;
        format!("{}k", tenths)
    } else {
        count.to_string()
    }
}
