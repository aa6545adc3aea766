//! Marker descriptors handed to the map UI.
//!
//! The core only decides what each marker stands for. Colors, shapes and
//! labels for single organizations come from a caller-supplied
//! [`Categorizer`]; clusters are labelled with their abbreviated count.

use crate::feature::{Feature, FeatureKey};
use fieldmap_types::organization::Organization;
use geo::Point;

/// Derives the visual style of a single-organization marker.
pub trait Categorizer {
    type Style;

    fn style(&self, organization: &Organization) -> Self::Style;

    fn label(&self, organization: &Organization) -> String {
        organization.name.clone()
    }
}

impl<F, S> Categorizer for F
where
    F: Fn(&Organization) -> S,
{
    type Style = S;

    fn style(&self, organization: &Organization) -> S {
        self(organization)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind<S> {
    Cluster { point_count: usize },
    Leaf { style: S },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor<S> {
    pub key: FeatureKey,
    pub coordinate: Point,
    pub label: String,
    pub kind: MarkerKind<S>,
}

impl<S> MarkerDescriptor<S> {
    pub fn from_feature<C>(feature: &Feature<'_>, categorizer: &C) -> Self
    where
        C: Categorizer<Style = S> + ?Sized,
    {
        let (label, kind) = match feature {
            Feature::Cluster(cluster) => (
                cluster.point_count_abbreviated.clone(),
                MarkerKind::Cluster {
                    point_count: cluster.point_count,
                },
            ),
            Feature::Leaf(leaf) => (
                categorizer.label(leaf.organization),
                MarkerKind::Leaf {
                    style: categorizer.style(leaf.organization),
                },
            ),
        };

        Self {
            key: feature.key(),
            coordinate: feature.coordinate(),
            label,
            kind,
        }
    }
}

pub fn markers<C>(features: &[Feature<'_>], categorizer: &C) -> Vec<MarkerDescriptor<C::Style>>
where
    C: Categorizer + ?Sized,
{
    features
        .iter()
        .map(|feature| MarkerDescriptor::from_feature(feature, categorizer))
        .collect()
}
