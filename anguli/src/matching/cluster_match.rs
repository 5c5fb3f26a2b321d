//! Two-stage cluster-to-cluster matching.
//!
//! ```text
//!  Sample A ──cluster──▶ clusters A ─┐
//!                                    ├─▶ profile gate ─▶ coarse alignment ─▶ fine match
//!  Sample B ──cluster──▶ clusters B ─┘                   (centroid votes)     (members)
//! ```
//!
//! Every gated cluster pair proposes the rigid transform mapping one centroid
//! onto the other. Under each proposal the remaining centroids are paired
//! within tolerance; the cluster pairs that agree are its votes. The proposal
//! with the most votes (ties: lower residual, then first evaluated) becomes
//! the shared alignment, and it needs `min_cluster_pairs` votes including the
//! proposing pair. Members of every agreeing cluster pair are then matched
//! under that one transform.
//!
//! Agreeing cluster pairs are one-to-one and clusters partition each sample,
//! so the union of their member pairings stays one-to-one.

use log::debug;
use serde::{Deserialize, Serialize};

use super::assign::{assign, candidates, select};
use super::config::{ClusterMatchConfig, MatcherConfig};
use super::traits::MinutiaeMatcher;
use super::types::{MatchResult, Pairing};
use crate::clustering::{Cluster, ClusterId, ClusteringConfig, cluster_sample};
use crate::core::{Minutia, RigidTransform, Sample};
use crate::error::{Error, Result};

/// An accepted cluster correspondence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterPairing {
    /// Cluster of the first sample
    pub first: ClusterId,
    /// Cluster of the second sample
    pub second: ClusterId,
    /// Radial profile overlap that passed the coarse gate
    pub profile_overlap: f64,
    /// Fine match of the two clusters' members under the shared alignment
    pub result: MatchResult,
}

/// Outcome of a two-stage comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterMatchResult {
    /// Global result: union pairing, shared transform, score over the whole
    /// samples. `hypotheses` counts coarse alignment proposals.
    pub result: MatchResult,
    /// Accepted cluster pairs, strongest first
    pub cluster_pairs: Vec<ClusterPairing>,
    /// Number of clusters in the first sample
    pub first_clusters: usize,
    /// Number of clusters in the second sample
    pub second_clusters: usize,
    /// Cluster pairs agreeing with the chosen alignment
    pub supporting_pairs: usize,
    /// Cluster pairs whose members were matched
    pub fine_evaluations: usize,
}

/// Winning coarse hypothesis.
struct Alignment {
    transform: RigidTransform,
    /// Agreeing cluster index pairs
    support: Vec<(usize, usize)>,
    residual: f64,
}

/// Clusters both samples, aligns them on cluster votes, then matches
/// cluster members.
#[derive(Clone, Debug, Default)]
pub struct ClusterMatcher {
    clustering: ClusteringConfig,
    matcher: MatcherConfig,
    config: ClusterMatchConfig,
}

impl ClusterMatcher {
    /// Create a cluster matcher.
    pub fn new(
        clustering: ClusteringConfig,
        matcher: MatcherConfig,
        config: ClusterMatchConfig,
    ) -> Self {
        Self {
            clustering,
            matcher,
            config,
        }
    }

    /// Match two validated samples.
    pub fn match_clustered(&self, first: &Sample, second: &Sample) -> Result<ClusterMatchResult> {
        self.matcher.validate().map_err(Error::InvalidInput)?;
        self.config.validate().map_err(Error::InvalidInput)?;
        if first.is_empty() || second.is_empty() {
            return Err(Error::invalid(format!(
                "cannot match empty sample ({} has {}, {} has {} minutiae)",
                first.image_id(),
                first.len(),
                second.image_id(),
                second.len()
            )));
        }

        let clusters_a = cluster_sample(first, &self.clustering)?;
        let clusters_b = cluster_sample(second, &self.clustering)?;
        let overlaps = self.profile_gate(&clusters_a, &clusters_b);
        let (alignment, hypotheses) = self.coarse_alignment(&clusters_a, &clusters_b, &overlaps);

        let supporting_pairs = alignment.as_ref().map_or(0, |a| a.support.len());
        let alignment = alignment.filter(|a| a.support.len() >= self.config.min_cluster_pairs);

        let mut cluster_pairs = Vec::new();
        let mut pairing = Pairing::new();
        let mut fine_evaluations = 0usize;
        let transform = alignment
            .as_ref()
            .map_or_else(RigidTransform::identity, |a| a.transform);

        if let Some(alignment) = &alignment {
            let mut accepted: Vec<(usize, usize, MatchResult)> = Vec::new();
            for &(i, j) in &alignment.support {
                let (ca, cb) = (&clusters_a[i], &clusters_b[j]);
                let fine = assign(&ca.members, &cb.members, &transform, &self.matcher)
                    .into_pairing(&ca.members, &cb.members);
                let fine = MatchResult::new(fine, transform, 1, ca.members.len(), cb.members.len());
                fine_evaluations += 1;

                if fine.matched() > 0 && fine.score >= self.config.min_cluster_score {
                    accepted.push((i, j, fine));
                }
            }

            accepted.sort_by(|x, y| {
                y.2.score
                    .total_cmp(&x.2.score)
                    .then_with(|| y.2.matched().cmp(&x.2.matched()))
                    .then_with(|| x.0.cmp(&y.0))
                    .then_with(|| x.1.cmp(&y.1))
            });

            for (i, j, fine) in accepted {
                pairing.extend(fine.pairing.clone());
                cluster_pairs.push(ClusterPairing {
                    first: clusters_a[i].id,
                    second: clusters_b[j].id,
                    profile_overlap: overlaps[i][j].unwrap_or_default(),
                    result: fine,
                });
            }
        }

        let result = MatchResult::new(pairing, transform, hypotheses, first.len(), second.len());

        debug!(
            "[ClusterMatcher] {} vs {}: {}x{} clusters, {} proposals, {} votes, {} accepted, score {:.3}",
            first.image_id(),
            second.image_id(),
            clusters_a.len(),
            clusters_b.len(),
            hypotheses,
            supporting_pairs,
            cluster_pairs.len(),
            result.score
        );

        Ok(ClusterMatchResult {
            result,
            cluster_pairs,
            first_clusters: clusters_a.len(),
            second_clusters: clusters_b.len(),
            supporting_pairs,
            fine_evaluations,
        })
    }

    /// Validate raw minutia sets, then match them.
    pub fn match_minutiae(&self, first: &[Minutia], second: &[Minutia]) -> Result<ClusterMatchResult> {
        let a = sample_of(first)?;
        let b = sample_of(second)?;
        self.match_clustered(&a, &b)
    }

    /// Profile overlap per cluster pair, `None` where it misses the gate.
    fn profile_gate(&self, clusters_a: &[Cluster], clusters_b: &[Cluster]) -> Vec<Vec<Option<f64>>> {
        let metrics_b: Vec<_> = clusters_b.iter().map(Cluster::metrics).collect();
        clusters_a
            .iter()
            .map(|ca| {
                let metrics_a = ca.metrics();
                metrics_b
                    .iter()
                    .map(|mb| {
                        let overlap = metrics_a.profile_overlap(mb, self.matcher.distance_tolerance);
                        (overlap >= self.config.min_profile_overlap).then_some(overlap)
                    })
                    .collect()
            })
            .collect()
    }

    /// Best-supported alignment over all gated centroid pairs, and the number
    /// of proposals evaluated.
    fn coarse_alignment(
        &self,
        clusters_a: &[Cluster],
        clusters_b: &[Cluster],
        overlaps: &[Vec<Option<f64>>],
    ) -> (Option<Alignment>, usize) {
        let centroids_a: Vec<Minutia> = clusters_a.iter().map(|c| c.centroid).collect();
        let centroids_b: Vec<Minutia> = clusters_b.iter().map(|c| c.centroid).collect();

        let mut best: Option<Alignment> = None;
        let mut hypotheses = 0usize;

        for (i, ca) in centroids_a.iter().enumerate() {
            for (j, cb) in centroids_b.iter().enumerate() {
                if overlaps[i][j].is_none() {
                    continue;
                }
                if self.matcher.require_type_match && !ca.same_type(cb) {
                    continue;
                }

                let transform = RigidTransform::from_anchor(ca, cb);
                let mut votes = candidates(&centroids_a, &centroids_b, &transform, &self.matcher);
                votes.retain(|c| overlaps[c.a][c.b].is_some());
                let agreed = select(&centroids_a, &centroids_b, votes);
                hypotheses += 1;

                let improves = match &best {
                    None => true,
                    Some(current) => {
                        agreed.len() > current.support.len()
                            || (agreed.len() == current.support.len()
                                && agreed.residual < current.residual)
                    }
                };
                if improves {
                    best = Some(Alignment {
                        transform,
                        support: agreed.pairs.iter().map(|c| (c.a, c.b)).collect(),
                        residual: agreed.residual,
                    });
                }
            }
        }
        (best, hypotheses)
    }
}

fn sample_of(minutiae: &[Minutia]) -> Result<Sample> {
    let Some(first) = minutiae.first() else {
        return Err(Error::invalid("cannot match an empty minutia set"));
    };
    Sample::new(first.image_id, minutiae.to_vec())
}

impl MinutiaeMatcher for ClusterMatcher {
    fn match_samples(&self, first: &Sample, second: &Sample) -> Result<MatchResult> {
        self.match_clustered(first, second).map(|r| r.result)
    }

    fn name(&self) -> &str {
        "cluster"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ImageId, MinutiaId};

    fn m(id: u32, image: u32, x: u32, y: u32, theta: f64) -> Minutia {
        Minutia::new(MinutiaId(id), ImageId(image), x, y, theta, id % 2 == 0)
    }

    fn blobs(image: u32, dx: u32, dy: u32, id_base: u32) -> Vec<Minutia> {
        let raw = [
            (20, 20, 0.2),
            (40, 25, 1.1),
            (28, 45, 2.0),
            (220, 30, 3.0),
            (240, 45, 0.7),
            (225, 60, 5.1),
            (120, 220, 4.2),
            (140, 230, 1.6),
            (110, 245, 2.9),
        ];
        raw.iter()
            .enumerate()
            .map(|(k, &(x, y, t))| m(id_base + k as u32, image, x + dx, y + dy, t))
            .collect()
    }

    #[test]
    fn test_translated_samples_match_fully() {
        let a = blobs(1, 0, 0, 1);
        let b = blobs(2, 7, 5, 101);
        let matcher = ClusterMatcher::default();
        let out = matcher.match_minutiae(&a, &b).unwrap();

        assert_eq!(out.first_clusters, 3);
        assert_eq!(out.second_clusters, 3);
        assert_eq!(out.supporting_pairs, 3);
        assert_eq!(out.cluster_pairs.len(), 3);
        assert_eq!(out.result.score, 1.0);
        assert!(out.result.pairing.is_injective());
        for p in &out.result.pairing {
            assert_eq!(p.first.0 + 100, p.second.0);
        }
        // Every cluster pair reports the shared alignment
        for cp in &out.cluster_pairs {
            assert_eq!(cp.result.transform, out.result.transform);
        }
        assert!((out.result.transform.tx - 7.0).abs() < 1.5);
        assert!((out.result.transform.ty - 5.0).abs() < 1.5);
    }

    #[test]
    fn test_strict_gate_rejects_everything() {
        let a = blobs(1, 0, 0, 1);
        let b = blobs(2, 0, 0, 101);
        let config = ClusterMatchConfig {
            min_cluster_pairs: 10,
            ..Default::default()
        };
        let matcher = ClusterMatcher::new(ClusteringConfig::default(), MatcherConfig::default(), config);
        let out = matcher.match_minutiae(&a, &b).unwrap();
        assert_eq!(out.supporting_pairs, 3);
        assert!(out.cluster_pairs.is_empty());
        assert_eq!(out.fine_evaluations, 0);
        assert!(out.result.pairing.is_empty());
        assert_eq!(out.result.score, 0.0);
        assert!(out.result.transform.is_identity(0.0, 0.0));
    }

    #[test]
    fn test_lone_cluster_pair_needs_support() {
        // One blob in common; the other clusters sit in unrelated places
        let a = blobs(1, 0, 0, 1);
        let mut b: Vec<Minutia> = blobs(2, 0, 0, 101).into_iter().take(3).collect();
        b.push(m(104, 2, 400, 400, 0.3));
        b.push(m(105, 2, 30, 400, 4.0));

        let out = ClusterMatcher::default().match_minutiae(&a, &b).unwrap();
        assert_eq!(out.supporting_pairs, 1);
        assert!(out.result.pairing.is_empty());
        assert_eq!(out.result.score, 0.0);

        let lenient = ClusterMatchConfig {
            min_cluster_pairs: 1,
            ..Default::default()
        };
        let matcher = ClusterMatcher::new(ClusteringConfig::default(), MatcherConfig::default(), lenient);
        let out = matcher.match_minutiae(&a, &b).unwrap();
        assert_eq!(out.cluster_pairs.len(), 1);
        assert_eq!(out.result.matched(), 3);
    }

    #[test]
    fn test_unrelated_samples_score_low() {
        let a = blobs(1, 0, 0, 1);
        // Same blob layout mirrored, orientations shuffled
        let b: Vec<Minutia> = blobs(2, 0, 0, 101)
            .into_iter()
            .map(|s| m(s.id.0, 2, 300 - s.x, s.y, normalize(s.theta + 2.3 * s.id.0 as f64)))
            .collect();

        let out = ClusterMatcher::default().match_minutiae(&a, &b).unwrap();
        assert!(out.result.score < 0.5, "score {}", out.result.score);
        assert!(out.result.pairing.is_injective());
    }

    fn normalize(theta: f64) -> f64 {
        crate::core::math::normalize_angle(theta)
    }

    #[test]
    fn test_empty_is_error() {
        let matcher = ClusterMatcher::default();
        let a = blobs(1, 0, 0, 1);
        assert!(matcher.match_minutiae(&a, &[]).unwrap_err().is_invalid_input());
    }
}
