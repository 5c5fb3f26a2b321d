//! Clustering integration tests.

mod common;

use std::collections::HashSet;

use anguli::core::math::{angle_diff, deg_to_rad};
use anguli::{Cluster, ClusteringConfig, ImageId, Minutia, MinutiaId, cluster, cluster_sample};

fn assert_partition(input: &[Minutia], clusters: &[Cluster]) {
    let mut seen = HashSet::new();
    for c in clusters {
        assert!(!c.members.is_empty(), "empty cluster {}", c.id);
        assert_eq!(c.centroid.id.0, c.id.0);
        for m in &c.members {
            assert_eq!(m.image_id, c.image_id);
            assert!(seen.insert(m.id), "minutia {} in two clusters", m.id);
        }
    }
    let expected: HashSet<MinutiaId> = input.iter().map(|m| m.id).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_partition_holds_across_strategies_and_seeds() {
    let configs = [
        ClusteringConfig::radius(20.0),
        ClusteringConfig::radius(48.0),
        ClusteringConfig::radius(500.0),
        ClusteringConfig::fixed_count(1),
        ClusteringConfig::fixed_count(3),
        ClusteringConfig::fixed_count(7),
    ];
    for seed in 0..5 {
        let input = common::synthetic_minutiae(1, 30, 10.0, seed, 1);
        for config in &configs {
            let clusters = cluster(&input, config).unwrap();
            assert_partition(&input, &clusters);
        }
    }
}

#[test]
fn test_huge_radius_gives_single_cluster() {
    let input = common::synthetic_minutiae(1, 15, 10.0, 9, 1);
    let clusters = cluster(&input, &ClusteringConfig::radius(10_000.0)).unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].len(), 15);
}

#[test]
fn test_blobs_found_by_both_strategies() {
    let sample = common::sample(1, common::blob_minutiae(1, 1));
    for config in [ClusteringConfig::default(), ClusteringConfig::fixed_count(3)] {
        let clusters = cluster_sample(&sample, &config).unwrap();
        assert_eq!(clusters.len(), 3);
        for c in &clusters {
            assert_eq!(c.len(), 4);
            for m in &c.members {
                assert!(m.distance_to_point(c.center) < 16.0);
            }
        }
    }
}

#[test]
fn test_centroid_orientation_wraps() {
    let members = vec![
        Minutia::new(MinutiaId(1), ImageId(4), 100, 100, deg_to_rad(1.0), true),
        Minutia::new(MinutiaId(2), ImageId(4), 104, 100, deg_to_rad(359.0), true),
        Minutia::new(MinutiaId(3), ImageId(4), 102, 103, deg_to_rad(0.0), false),
    ];
    let clusters = cluster(&members, &ClusteringConfig::default()).unwrap();
    assert_eq!(clusters.len(), 1);

    let centroid = clusters[0].centroid;
    assert!(angle_diff(centroid.theta, 0.0) < 1e-9);
    assert_eq!((centroid.x, centroid.y), (102, 101));
    assert!(centroid.is_termination);
    assert_eq!(centroid.image_id, ImageId(4));
}

#[test]
fn test_metrics_invariant_under_rigid_motion() {
    let a = common::sample(1, common::blob_minutiae(1, 1));
    let truth = common::pivot_transform(0.4, -10.0, 20.0);
    let b = common::sample(2, common::transformed_copy(a.minutiae(), 2, &truth, 0));

    let config = ClusteringConfig::default();
    let ca = cluster_sample(&a, &config).unwrap();
    let cb = cluster_sample(&b, &config).unwrap();
    assert_eq!(ca.len(), cb.len());

    for (x, y) in ca.iter().zip(&cb) {
        let (mx, my) = (x.metrics(), y.metrics());
        for (rx, ry) in mx.radial_distances.iter().zip(&my.radial_distances) {
            assert!((rx - ry).abs() < 1.5);
        }
        assert_eq!(mx.profile_overlap(&my, 1.5), 1.0);
    }
}

#[test]
fn test_inconsistent_input_rejected() {
    let mut input = common::synthetic_minutiae(1, 5, 10.0, 2, 1);
    input[3].id = input[0].id;
    assert!(cluster(&input, &ClusteringConfig::default()).unwrap_err().is_invalid_input());
}
