//! Hierarchical cluster index over organizations.
//!
//! Points are projected to unit Web-Mercator space and indexed once per zoom
//! level. The top level (`max_zoom + 1`) holds one node per organization;
//! every level below it is produced by greedily merging nodes of the level
//! above that fall within the zoom's neighbor radius.
//!
//! ## Building
//!
//! For each zoom `z` from `max_zoom` down to `min_zoom`, the nodes of level
//! `z + 1` are visited in order. An unvisited node collects every unvisited
//! neighbor within `radius / (extent * 2^z)`. When the collected count is
//! larger than the node's own count and reaches `min_points`, the group
//! becomes a cluster at its count-weighted centroid; otherwise the node and
//! its neighbors pass through to level `z` unchanged.
//!
//! Every level is an `rstar` R-tree bulk-loaded in node order, so queries
//! against one build always return the same features in the same order.
//!
//! ## Example
//!
//! ```rust
//! use fieldmap::{ClusterIndex, Organization};
//!
//! let orgs = vec![
//!     Organization::new("North Depot", 40.7128, -74.0060),
//!     Organization::new("South Depot", 40.7129, -74.0061),
//!     Organization::new("East Depot", 40.7130, -74.0059),
//! ];
//! let index = ClusterIndex::new(&orgs)?;
//!
//! let world = index.clusters([-180.0, -85.0, 180.0, 85.0], 3);
//! assert_eq!(world.len(), 1);
//! assert_eq!(world[0].point_count(), 3);
//! # Ok::<(), fieldmap::FieldmapError>(())
//! ```

use crate::builder::{BuildReport, ClusterIndexBuilder};
use crate::compute::projection::{lat_y, lng_x, wrap_lng, x_lng, y_lat};
use crate::compute::viewport::QueryWindow;
use crate::config::ClusterConfig;
use crate::error::{FieldmapError, Result};
use crate::feature::{ClusterFeature, ClusterId, Feature, LeafFeature};
use fieldmap_types::organization::Organization;
use geo::Point;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

type LevelEntry = GeomWithData<[f64; 2], usize>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeKind {
    /// Index into the index's organization list
    Leaf(usize),
    Cluster { id: ClusterId, count: usize },
}

#[derive(Debug, Clone)]
struct Node {
    x: f64,
    y: f64,
    kind: NodeKind,
    /// Cluster this node was merged into on the level below
    parent: Option<ClusterId>,
}

impl Node {
    fn count(&self) -> usize {
        match self.kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Cluster { count, .. } => count,
        }
    }

    fn passed_through(&self) -> Self {
        Self {
            parent: None,
            ..self.clone()
        }
    }
}

/// Nodes of one zoom level plus an R-tree over their positions.
#[derive(Debug)]
struct Level {
    nodes: Vec<Node>,
    tree: RTree<LevelEntry>,
}

impl Level {
    fn new(nodes: Vec<Node>) -> Self {
        let entries = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| GeomWithData::new([node.x, node.y], i))
            .collect();

        Self {
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Node indices within `radius` of `(x, y)`, ascending.
    fn within(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .tree
            .locate_within_distance([x, y], radius * radius)
            .map(|entry| entry.data)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Node indices inside the projected rectangle, ascending.
    fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<usize> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut ids: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .map(|entry| entry.data)
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Immutable clustered view of one organization list.
///
/// Built once per distinct input and queried any number of times. A changed
/// input needs a new index; nothing is patched in place.
#[derive(Debug)]
pub struct ClusterIndex {
    config: ClusterConfig,
    organizations: Vec<Organization>,
    /// `levels[z - min_zoom]` holds zoom `z`, up to `max_zoom + 1`
    levels: Vec<Level>,
    report: BuildReport,
}

impl ClusterIndex {
    /// Build an index with the default configuration.
    pub fn new(organizations: &[Organization]) -> Result<Self> {
        ClusterIndexBuilder::new().build(organizations)
    }

    /// Cluster an already validated, deduplicated and ordered record list.
    pub(crate) fn from_parts(
        config: ClusterConfig,
        organizations: Vec<Organization>,
        report: BuildReport,
    ) -> Self {
        let leaf_count = organizations.len();
        let leaves: Vec<Node> = organizations
            .iter()
            .enumerate()
            .map(|(i, org)| Node {
                x: lng_x(org.longitude),
                y: lat_y(org.latitude),
                kind: NodeKind::Leaf(i),
                parent: None,
            })
            .collect();

        let depth = usize::from(config.max_zoom - config.min_zoom) + 2;
        let mut levels = Vec::with_capacity(depth);
        let mut current = Level::new(leaves);

        for zoom in (config.min_zoom..=config.max_zoom).rev() {
            let nodes = cluster_level(&mut current, zoom, &config, leaf_count);
            log::trace!("zoom {}: {} nodes", zoom, nodes.len());
            levels.push(current);
            current = Level::new(nodes);
        }
        levels.push(current);
        levels.reverse();

        Self {
            config,
            organizations,
            levels,
            report,
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// What the builder accepted and excluded.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Indexed organizations in canonical (identifier) order.
    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }

    fn level(&self, zoom: u8) -> Option<&Level> {
        let offset = zoom.checked_sub(self.config.min_zoom)?;
        self.levels.get(usize::from(offset))
    }

    fn limit_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.config.min_zoom, self.config.max_zoom + 1)
    }

    fn node_feature(&self, node: &Node) -> Feature<'_> {
        match node.kind {
            NodeKind::Leaf(i) => {
                let organization = &self.organizations[i];
                Feature::Leaf(LeafFeature {
                    organization,
                    coordinate: organization.point(),
                })
            }
            NodeKind::Cluster { id, count } => Feature::Cluster(ClusterFeature::new(
                id,
                Point::new(x_lng(node.x), y_lat(node.y)),
                count,
            )),
        }
    }

    /// Features visible in a query window.
    pub fn query(&self, window: &QueryWindow) -> Vec<Feature<'_>> {
        self.clusters(window.bbox.to_array(), window.zoom)
    }

    /// Clusters and leaves inside `[west, south, east, north]` at `zoom`.
    ///
    /// Longitudes wrap, so a box with `west > east` after wrapping crosses the
    /// antimeridian and is answered as its eastern then western half. A box
    /// at least 360° wide covers every longitude. The zoom is clamped to the
    /// indexed levels; non-finite boxes yield no features.
    pub fn clusters(&self, bbox: [f64; 4], zoom: u8) -> Vec<Feature<'_>> {
        let [west, south, east, north] = bbox;
        if bbox.iter().any(|v| !v.is_finite()) {
            log::warn!("Rejecting cluster query with non-finite bounding box");
            return Vec::new();
        }

        let mut min_lng = if west == 180.0 { 180.0 } else { wrap_lng(west) };
        let mut max_lng = if east == 180.0 { 180.0 } else { wrap_lng(east) };
        let min_lat = south.clamp(-90.0, 90.0);
        let max_lat = north.clamp(-90.0, 90.0);

        if east - west >= 360.0 {
            min_lng = -180.0;
            max_lng = 180.0;
        } else if min_lng > max_lng {
            let mut features = self.clusters([min_lng, min_lat, 180.0, max_lat], zoom);
            features.extend(self.clusters([-180.0, min_lat, max_lng, max_lat], zoom));
            return features;
        }

        let Some(level) = self.level(self.limit_zoom(zoom)) else {
            return Vec::new();
        };

        level
            .range(lng_x(min_lng), lat_y(max_lat), lng_x(max_lng), lat_y(min_lat))
            .into_iter()
            .map(|i| self.node_feature(&level.nodes[i]))
            .collect()
    }

    /// Direct children of a cluster, one zoom level deeper.
    pub fn children(&self, cluster_id: ClusterId) -> Result<Vec<Feature<'_>>> {
        let unknown = || FieldmapError::UnknownCluster(cluster_id);

        let (origin_index, origin_zoom) = cluster_id.decode(self.len()).ok_or_else(unknown)?;
        if origin_zoom <= self.config.min_zoom || origin_zoom > self.config.max_zoom + 1 {
            return Err(unknown());
        }

        let level = self.level(origin_zoom).ok_or_else(unknown)?;
        let origin = level.nodes.get(origin_index).ok_or_else(unknown)?;
        let radius = self.config.radius_at(origin_zoom - 1);

        let children: Vec<Feature<'_>> = level
            .within(origin.x, origin.y, radius)
            .into_iter()
            .filter(|&i| level.nodes[i].parent == Some(cluster_id))
            .map(|i| self.node_feature(&level.nodes[i]))
            .collect();

        if children.is_empty() {
            return Err(unknown());
        }
        Ok(children)
    }

    /// Organizations beneath a cluster, depth-first, skipping `offset` and
    /// returning at most `limit`.
    pub fn leaves(
        &self,
        cluster_id: ClusterId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<&Organization>> {
        let mut leaves = Vec::new();
        if limit == 0 {
            // Still surface unknown ids.
            self.children(cluster_id)?;
            return Ok(leaves);
        }
        self.append_leaves(&mut leaves, cluster_id, limit, offset, 0)?;
        Ok(leaves)
    }

    fn append_leaves<'a>(
        &'a self,
        result: &mut Vec<&'a Organization>,
        cluster_id: ClusterId,
        limit: usize,
        offset: usize,
        mut skipped: usize,
    ) -> Result<usize> {
        for child in self.children(cluster_id)? {
            match child {
                Feature::Cluster(cluster) => {
                    if skipped + cluster.point_count <= offset {
                        skipped += cluster.point_count;
                    } else {
                        skipped = self.append_leaves(result, cluster.id, limit, offset, skipped)?;
                    }
                }
                Feature::Leaf(leaf) => {
                    if skipped < offset {
                        skipped += 1;
                    } else {
                        result.push(leaf.organization);
                    }
                }
            }

            if result.len() >= limit {
                break;
            }
        }
        Ok(skipped)
    }

    /// Zoom at which a cluster breaks apart into more than one feature.
    pub fn expansion_zoom(&self, cluster_id: ClusterId) -> Result<u8> {
        let (_, origin_zoom) = cluster_id
            .decode(self.len())
            .ok_or(FieldmapError::UnknownCluster(cluster_id))?;
        if origin_zoom == 0 {
            return Err(FieldmapError::UnknownCluster(cluster_id));
        }

        let mut zoom = origin_zoom - 1;
        let mut current = cluster_id;
        while zoom <= self.config.max_zoom {
            let children = self.children(current)?;
            zoom += 1;
            if children.len() != 1 {
                break;
            }
            match children[0].cluster_id() {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(zoom)
    }
}

/// Merge the nodes of `above` (level `zoom + 1`) into the nodes of level `zoom`.
///
/// Marks merged nodes in `above` with their new parent.
fn cluster_level(
    above: &mut Level,
    zoom: u8,
    config: &ClusterConfig,
    leaf_count: usize,
) -> Vec<Node> {
    let radius = config.radius_at(zoom);
    let mut visited = vec![false; above.nodes.len()];
    let mut next = Vec::new();

    for i in 0..above.nodes.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let (x, y) = (above.nodes[i].x, above.nodes[i].y);
        let own_count = above.nodes[i].count();
        let neighbors = above.within(x, y, radius);

        let total: usize = own_count
            + neighbors
                .iter()
                .filter(|&&n| !visited[n])
                .map(|&n| above.nodes[n].count())
                .sum::<usize>();

        if total > own_count && total >= config.min_points {
            let id = ClusterId::encode(i, zoom + 1, leaf_count);
            let mut wx = x * own_count as f64;
            let mut wy = y * own_count as f64;

            for &n in &neighbors {
                if visited[n] {
                    continue;
                }
                visited[n] = true;

                let neighbor = &mut above.nodes[n];
                let weight = neighbor.count() as f64;
                wx += neighbor.x * weight;
                wy += neighbor.y * weight;
                neighbor.parent = Some(id);
            }

            above.nodes[i].parent = Some(id);
            next.push(Node {
                x: wx / total as f64,
                y: wy / total as f64,
                kind: NodeKind::Cluster { id, count: total },
                parent: None,
            });
        } else {
            next.push(above.nodes[i].passed_through());

            if total > own_count {
                for &n in &neighbors {
                    if visited[n] {
                        continue;
                    }
                    visited[n] = true;
                    next.push(above.nodes[n].passed_through());
                }
            }
        }
    }

    next
}
