//! Resolving a tapped cluster to a single organization.
//!
//! A tap on a cluster opens the detail view of one representative record
//! instead of zooming in. The representative is the first leaf in the
//! cluster's depth-first order. Unknown or empty clusters resolve to nothing
//! and the tap is ignored.

use crate::feature::ClusterId;
use crate::index::ClusterIndex;
use fieldmap_types::organization::Organization;

/// Receives the organization a cluster tap resolved to.
pub trait LeafHandler {
    fn on_leaf_resolved(&mut self, organization: &Organization);
}

impl<F> LeafHandler for F
where
    F: FnMut(&Organization),
{
    fn on_leaf_resolved(&mut self, organization: &Organization) {
        self(organization)
    }
}

/// First leaf of a cluster, or `None` when the id is unknown.
pub fn representative(index: &ClusterIndex, cluster_id: ClusterId) -> Option<&Organization> {
    match index.leaves(cluster_id, 1, 0) {
        Ok(leaves) => leaves.into_iter().next(),
        Err(e) => {
            log::debug!("Ignoring tap: {}", e);
            None
        }
    }
}

/// Resolve a tap and hand the organization to `handler`.
///
/// Returns whether the handler was called.
pub fn resolve_tap<H: LeafHandler + ?Sized>(
    index: &ClusterIndex,
    cluster_id: ClusterId,
    handler: &mut H,
) -> bool {
    match representative(index, cluster_id) {
        Some(organization) => {
            handler.on_leaf_resolved(organization);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_index() -> ClusterIndex {
        let orgs: Vec<Organization> = (0..4)
            .map(|i| Organization::new(format!("site {}", i), 48.85 + i as f64 * 1e-4, 2.35))
            .collect();
        ClusterIndex::new(&orgs).unwrap()
    }

    #[test]
    fn test_resolve_calls_handler_once() {
        let index = cluster_index();
        let id = index.clusters([-180.0, -85.0, 180.0, 85.0], 0)[0]
            .cluster_id()
            .unwrap();

        let mut resolved = Vec::new();
        let mut record = |org: &Organization| resolved.push(org.name.clone());
        let called = resolve_tap(&index, id, &mut record);
        assert!(called);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].starts_with("site "));
    }

    #[test]
    fn test_unknown_cluster_is_noop() {
        let index = cluster_index();
        let mut calls = 0;
        let called = resolve_tap(&index, ClusterId(123_456), &mut |_: &Organization| calls += 1);
        assert!(!called);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_custom_handler() {
        struct Recorder(Option<String>);
        impl LeafHandler for Recorder {
            fn on_leaf_resolved(&mut self, organization: &Organization) {
                self.0 = Some(organization.name.clone());
            }
        }

        let index = cluster_index();
        let id = index.clusters([-180.0, -85.0, 180.0, 85.0], 3)[0]
            .cluster_id()
            .unwrap();
        let mut recorder = Recorder(None);
        assert!(resolve_tap(&index, id, &mut recorder));
        assert!(recorder.0.is_some());
    }
}
