use fieldmap::compute::viewport::QueryWindow;
use fieldmap::{
    BoundingBox, ClusterConfig, ClusterIndex, ClusterIndexBuilder, Feature, MapClusterer,
    Organization, Viewport,
};
use geo::{BoundingRect, MultiPoint};
use std::io::Write;
use tempfile::Builder;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn org(name: &str, lat: f64, lng: f64) -> Organization {
    Organization::new(name, lat, lng)
        .with_maps_url(format!("https://maps.example/{}", name))
        .with_category("outreach")
        .with_status("active")
}

/// Three tight groups in three cities plus a few scattered sites.
fn field_sites() -> Vec<Organization> {
    let mut orgs = Vec::new();
    for i in 0..12 {
        orgs.push(org(&format!("nyc-{}", i), 40.71 + i as f64 * 0.001, -74.00 - i as f64 * 0.001));
    }
    for i in 0..5 {
        orgs.push(org(&format!("sf-{}", i), 37.77 + i as f64 * 0.001, -122.42 + i as f64 * 0.001));
    }
    for i in 0..3 {
        orgs.push(org(&format!("chi-{}", i), 41.88 + i as f64 * 0.0005, -87.63));
    }
    orgs.push(org("anchorage", 61.2181, -149.9003));
    orgs.push(org("honolulu", 21.3069, -157.8583));
    orgs
}

fn total_points(features: &[Feature<'_>]) -> usize {
    features.iter().map(|f| f.point_count()).sum()
}

#[test]
fn test_pipeline_is_deterministic() {
    init_logging();
    let index = ClusterIndex::new(&field_sites()).unwrap();
    let viewport = Viewport::new(39.0, -95.0, 30.0, 60.0);
    let window = QueryWindow::from_viewport(Some(&viewport), 20);

    let first = index.query(&window);
    let second = index.query(&window);
    assert_eq!(first, second);

    let keys_a: Vec<_> = first.iter().map(|f| f.key()).collect();
    let keys_b: Vec<_> = second.iter().map(|f| f.key()).collect();
    assert_eq!(keys_a, keys_b);
}

#[test]
fn test_cluster_threshold() {
    let pair = vec![org("p0", 10.0, 10.0), org("p1", 10.00001, 10.00001)];
    let index = ClusterIndex::new(&pair).unwrap();
    let features = index.query(&QueryWindow::from_viewport(
        Some(&Viewport::new(10.0, 10.0, 0.35, 0.35)),
        20,
    ));
    assert_eq!(features.len(), 2);
    assert!(features.iter().all(|f| !f.is_cluster()));

    let trio = vec![
        org("t0", 10.0, 10.0),
        org("t1", 10.00001, 10.00001),
        org("t2", 10.00002, 10.00002),
    ];
    let index = ClusterIndex::new(&trio).unwrap();
    let features = index.query(&QueryWindow::from_viewport(
        Some(&Viewport::new(10.0, 10.0, 0.35, 0.35)),
        20,
    ));
    assert_eq!(features.len(), 1);
    match &features[0] {
        Feature::Cluster(cluster) => assert_eq!(cluster.point_count, 3),
        other => panic!("expected a cluster, got {:?}", other),
    }
}

#[test]
fn test_bbox_north_clamp() {
    let window = QueryWindow::from_viewport(Some(&Viewport::new(89.0, 0.0, 0.1, 0.1)), 20);
    assert_eq!(window.bbox.north(), 85.0);
}

#[test]
fn test_zoom_monotonicity() {
    let deltas = [360.0, 200.0, 90.0, 45.0, 10.0, 1.0, 0.5, 0.1, 0.02, 0.01, 0.001];
    let zooms: Vec<u8> = deltas
        .iter()
        .map(|&d| QueryWindow::from_viewport(Some(&Viewport::new(0.0, 0.0, d, d)), 20).zoom)
        .collect();
    assert!(zooms.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", zooms);
}

#[test]
fn test_world_view_fallback() {
    let mut map = MapClusterer::default();
    map.set_organizations(&field_sites()).unwrap();

    let none = map.features(None);
    let world = map.features(Some(&Viewport::world()));
    assert_eq!(none, world);
    assert_eq!(total_points(&none), field_sites().len());
}

#[test]
fn test_cluster_resolution_round_trip() {
    let sites = field_sites();
    let mut map = MapClusterer::default();
    map.set_organizations(&sites).unwrap();

    let viewport = Viewport::new(39.0, -95.0, 30.0, 60.0);
    let features = map.features(Some(&viewport));
    let clusters: Vec<_> = features.iter().filter_map(|f| f.cluster_id()).collect();
    assert!(!clusters.is_empty());

    for id in clusters {
        let mut resolved: Option<Organization> = None;
        let mut open = |o: &Organization| resolved = Some(o.clone());
        assert!(map.resolve_tap(id, &mut open));
        let resolved = resolved.unwrap();

        assert!(sites.contains(&resolved));
        let members = map.index().leaves(id, usize::MAX, 0).unwrap();
        assert!(members.contains(&&resolved));

        // The opened record lies inside the cluster's geographic extent.
        let extent = MultiPoint::from(members.iter().map(|o| o.point()).collect::<Vec<_>>())
            .bounding_rect()
            .map(BoundingBox::from_rect)
            .unwrap();
        assert!(extent.contains_point(&resolved.point()), "cluster {}", id);
    }
}

#[test]
fn test_stable_identity_across_rebuilds() {
    let viewport = Viewport::new(39.0, -95.0, 30.0, 60.0);

    let mut first = MapClusterer::default();
    first.set_organizations(&field_sites()).unwrap();

    // Same contents, fresh allocation, different order.
    let mut shuffled = field_sites();
    shuffled.reverse();
    let mut second = MapClusterer::default();
    second.set_organizations(&shuffled).unwrap();

    let a = first.features(Some(&viewport));
    let b = second.features(Some(&viewport));
    assert_eq!(a, b);
    assert_eq!(
        a.iter().map(|f| f.key()).collect::<Vec<_>>(),
        b.iter().map(|f| f.key()).collect::<Vec<_>>()
    );
}

#[test]
fn test_zooming_in_splits_clusters() {
    let index = ClusterIndex::new(&field_sites()).unwrap();
    let world = [-180.0, -85.0, 180.0, 85.0];

    let mut previous = 0;
    for zoom in 0..=21 {
        let features = index.clusters(world, zoom);
        assert_eq!(total_points(&features), 22, "zoom {}", zoom);
        assert!(features.len() >= previous, "zoom {}", zoom);
        previous = features.len();
    }
    assert_eq!(previous, 22);
}

#[test]
fn test_expansion_zoom_then_query() {
    let index = ClusterIndex::new(&field_sites()).unwrap();
    let world = [-180.0, -85.0, 180.0, 85.0];

    for feature in index.clusters(world, 2) {
        if let Feature::Cluster(cluster) = feature {
            let zoom = index.expansion_zoom(cluster.id).unwrap();
            let children = index.children(cluster.id).unwrap();
            assert!(children.len() > 1);
            assert!(zoom > 2);
        }
    }
}

#[test]
fn test_config_from_json_file() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"radius": 80.0, "max_zoom": 16, "min_points": 2}}"#).unwrap();

    let config = ClusterConfig::load(file.path()).unwrap();
    assert_eq!(config.radius, 80.0);
    assert_eq!(config.max_zoom, 16);

    let index = ClusterIndexBuilder::new()
        .config(config)
        .build(&[org("x", 1.0, 1.0), org("y", 1.00001, 1.0)])
        .unwrap();
    let features = index.clusters([-180.0, -85.0, 180.0, 85.0], 16);
    assert_eq!(features.len(), 1);
    assert!(features[0].is_cluster());
}

#[test]
fn test_config_unsupported_extension() {
    let file = Builder::new().suffix(".yaml").tempfile().unwrap();
    assert!(ClusterConfig::load(file.path()).is_err());
}

#[cfg(feature = "toml")]
#[test]
fn test_config_from_toml_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "radius = 40.0\ninvalid_coordinates = \"reject\"").unwrap();

    let config = ClusterConfig::load(file.path()).unwrap();
    assert_eq!(config.radius, 40.0);
    assert_eq!(
        config.invalid_coordinates,
        fieldmap::InvalidCoordinatePolicy::Reject
    );
}

#[cfg(feature = "geojson")]
#[test]
fn test_geojson_export_of_viewport() {
    use fieldmap::compute::geojson::features_to_geojson;

    let mut map = MapClusterer::default();
    map.set_organizations(&field_sites()).unwrap();
    let features = map.features(None);
    let collection = features_to_geojson(&features).unwrap();

    assert_eq!(collection.features.len(), features.len());
    let clustered = collection
        .features
        .iter()
        .filter(|f| f.property("cluster") == Some(&serde_json::Value::Bool(true)))
        .count();
    assert_eq!(clustered, features.iter().filter(|f| f.is_cluster()).count());
}
