//! Clustering engine: leader clustering and deterministic k-means.

use log::debug;

use super::config::{ClusteringConfig, ClusteringStrategy};
use super::types::{Cluster, ClusterId};
use crate::core::{ImageId, Minutia, Point2D, Sample, mean_point, validate_minutiae};
use crate::error::{Error, Result};

/// Partition a minutia set into spatial clusters.
///
/// Every input minutia ends up in exactly one cluster. Empty input yields no
/// clusters. Inconsistent image ids, duplicate ids or non-finite orientations
/// are rejected with [`Error::InvalidInput`].
pub fn cluster(minutiae: &[Minutia], config: &ClusteringConfig) -> Result<Vec<Cluster>> {
    validate_minutiae(None, minutiae)?;
    let Some(first) = minutiae.first() else {
        return Ok(Vec::new());
    };
    cluster_validated(first.image_id, minutiae, config)
}

/// Cluster an already validated [`Sample`].
pub fn cluster_sample(sample: &Sample, config: &ClusteringConfig) -> Result<Vec<Cluster>> {
    cluster_validated(sample.image_id(), sample.minutiae(), config)
}

fn cluster_validated(
    image_id: ImageId,
    minutiae: &[Minutia],
    config: &ClusteringConfig,
) -> Result<Vec<Cluster>> {
    config.validate().map_err(Error::InvalidInput)?;
    if minutiae.is_empty() {
        return Ok(Vec::new());
    }

    let groups = match config.strategy {
        ClusteringStrategy::Radius { threshold } => leader_groups(minutiae, threshold),
        ClusteringStrategy::FixedCount {
            count,
            max_iterations,
        } => kmeans_groups(minutiae, count, max_iterations),
    };

    let clusters: Vec<Cluster> = groups
        .into_iter()
        .filter(|g| !g.is_empty())
        .enumerate()
        .filter_map(|(i, indices)| {
            let members = indices.into_iter().map(|k| minutiae[k]).collect();
            Cluster::from_members(ClusterId(i as u32), image_id, members)
        })
        .collect();

    debug!(
        "[Clustering] {}: {} minutiae -> {} clusters",
        image_id,
        minutiae.len(),
        clusters.len()
    );
    Ok(clusters)
}

/// Index of the nearest centre, ties to the lower index.
fn nearest(point: Point2D, centres: &[Point2D]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in centres.iter().enumerate() {
        let d = point.distance_squared(c);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best
}

/// Leader clustering in input order against running centroids.
fn leader_groups(minutiae: &[Minutia], threshold: f64) -> Vec<Vec<usize>> {
    let limit = threshold * threshold;
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut sums: Vec<(Point2D, usize)> = Vec::new();
    let mut centres: Vec<Point2D> = Vec::new();

    for (k, m) in minutiae.iter().enumerate() {
        let p = m.position();
        match nearest(p, &centres) {
            Some((i, d)) if d <= limit => {
                groups[i].push(k);
                let (sum, n) = &mut sums[i];
                *sum = *sum + p;
                *n += 1;
                centres[i] = *sum * (1.0 / *n as f64);
            }
            _ => {
                groups.push(vec![k]);
                sums.push((p, 1));
                centres.push(p);
            }
        }
    }
    groups
}

/// Farthest-point seeding followed by Lloyd iterations.
fn kmeans_groups(minutiae: &[Minutia], count: usize, max_iterations: usize) -> Vec<Vec<usize>> {
    let points: Vec<Point2D> = minutiae.iter().map(Minutia::position).collect();
    let k = count.min(points.len());

    let mut centres = seed_centres(&points, k);
    let mut assignment = assign(&points, &centres);

    for iteration in 0..max_iterations {
        for (c, centre) in centres.iter_mut().enumerate() {
            let members = points
                .iter()
                .zip(&assignment)
                .filter(|&(_, &a)| a == c)
                .map(|(p, _)| *p);
            // An emptied cluster keeps its previous centre
            if let Some(mean) = mean_point(members) {
                *centre = mean;
            }
        }

        let next = assign(&points, &centres);
        if next == assignment {
            debug!("[Clustering] k-means converged after {} iterations", iteration + 1);
            break;
        }
        assignment = next;
    }

    let mut groups = vec![Vec::new(); centres.len()];
    for (idx, &c) in assignment.iter().enumerate() {
        groups[c].push(idx);
    }
    groups
}

fn seed_centres(points: &[Point2D], k: usize) -> Vec<Point2D> {
    let mut centres = Vec::with_capacity(k);
    let Some(global) = mean_point(points.iter().copied()) else {
        return centres;
    };
    if k == 0 {
        return centres;
    }

    // First seed: the point nearest the global centroid
    if let Some((first, _)) = nearest(global, points) {
        centres.push(points[first]);
    }

    while centres.len() < k {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in points.iter().enumerate() {
            let d = nearest(*p, &centres).map_or(0.0, |(_, d)| d);
            if best.is_none_or(|(_, bd)| d > bd) {
                best = Some((i, d));
            }
        }
        match best {
            Some((i, _)) => centres.push(points[i]),
            None => break,
        }
    }
    centres
}

fn assign(points: &[Point2D], centres: &[Point2D]) -> Vec<usize> {
    points
        .iter()
        .map(|p| nearest(*p, centres).map_or(0, |(i, _)| i))
        .collect()
}
