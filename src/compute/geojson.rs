//! GeoJSON conversion for query results.
//!
//! Clusters become point features with `cluster`, `cluster_id`, `point_count`
//! and `point_count_abbreviated` properties; leaves carry `cluster: false` and
//! the serialized organization.

use crate::error::{FieldmapError, Result};
use crate::feature::Feature;
use geojson::feature::Id;
use geojson::{FeatureCollection, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;

/// Converts one cluster or leaf to a GeoJSON feature.
pub fn feature_to_geojson(feature: &Feature<'_>) -> Result<geojson::Feature> {
    let coordinate = feature.coordinate();
    let geometry = Geometry::new(Value::Point(vec![coordinate.x(), coordinate.y()]));
    let mut properties = JsonObject::new();

    let id = match feature {
        Feature::Cluster(cluster) => {
            properties.insert("cluster".to_string(), JsonValue::Bool(true));
            properties.insert("cluster_id".to_string(), JsonValue::from(cluster.id.value()));
            properties.insert("point_count".to_string(), JsonValue::from(cluster.point_count));
            properties.insert(
                "point_count_abbreviated".to_string(),
                JsonValue::String(cluster.point_count_abbreviated.clone()),
            );
            Some(Id::Number(cluster.id.value().into()))
        }
        Feature::Leaf(leaf) => {
            let organization = serde_json::to_value(leaf.organization).map_err(|e| {
                FieldmapError::Serialization(format!("Failed to serialize organization: {}", e))
            })?;
            properties.insert("cluster".to_string(), JsonValue::Bool(false));
            properties.insert("organization".to_string(), organization);
            leaf.organization
                .identifier()
                .map(|identifier| Id::String(identifier.into_owned()))
        }
    };

    Ok(geojson::Feature {
        bbox: None,
        geometry: Some(geometry),
        id,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Converts a query result to a GeoJSON feature collection.
pub fn features_to_geojson(features: &[Feature<'_>]) -> Result<FeatureCollection> {
    let features = features
        .iter()
        .map(feature_to_geojson)
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Converts a query result to a GeoJSON string.
pub fn features_to_geojson_string(features: &[Feature<'_>]) -> Result<String> {
    let collection = features_to_geojson(features)?;
    serde_json::to_string(&collection).map_err(|e| {
        FieldmapError::Serialization(format!("Failed to serialize feature collection: {}", e))
    })
}
