//! Cluster types and per-cluster descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::math::circular_mean;
use crate::core::{ImageId, Minutia, MinutiaId, Point2D, mean_point};

/// Cluster identifier, sequential within one clustering run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A spatial group of minutiae from one image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Identifier within the clustering run
    pub id: ClusterId,
    /// Image the members belong to
    pub image_id: ImageId,
    /// Synthetic representative: rounded mean position, circular-mean
    /// orientation, majority type. Its id equals the cluster id.
    pub centroid: Minutia,
    /// Unrounded mean position of the members
    pub center: Point2D,
    /// Members in input order (never empty)
    pub members: Vec<Minutia>,
}

impl Cluster {
    /// Build a cluster from a non-empty member list.
    ///
    /// Returns `None` when `members` is empty.
    pub fn from_members(id: ClusterId, image_id: ImageId, members: Vec<Minutia>) -> Option<Self> {
        let center = mean_point(members.iter().map(Minutia::position))?;
        let theta = circular_mean(members.iter().map(|m| m.theta));
        let terminations = members.iter().filter(|m| m.is_termination).count();
        // Ties go to termination
        let is_termination = terminations * 2 >= members.len();

        let centroid = Minutia::new(
            MinutiaId(id.0),
            image_id,
            center.x.round() as u32,
            center.y.round() as u32,
            theta,
            is_termination,
        );

        Some(Self {
            id,
            image_id,
            centroid,
            center,
            members,
        })
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for clusters produced by the engine.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether a minutia with this id is a member.
    pub fn contains(&self, id: MinutiaId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Radial/polar descriptor around the exact center.
    pub fn metrics(&self) -> ClusterMetrics {
        ClusterMetrics::compute(self.center, &self.members)
    }
}

/// Rotation- and translation-invariant shape descriptor of a cluster.
///
/// Radial distances of the members from the cluster center, sorted ascending,
/// plus each member's polar angle around the center (input order).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    /// Member distances from the center, ascending
    pub radial_distances: Vec<f64>,
    /// Member polar angles around the center, `[0, 2π)`, input order
    pub polar_angles: Vec<f64>,
    /// Mean radial distance
    pub mean_radius: f64,
    /// Largest radial distance
    pub max_radius: f64,
}

impl ClusterMetrics {
    /// Compute the descriptor of `members` around `center`.
    pub fn compute(center: Point2D, members: &[Minutia]) -> Self {
        let mut radial_distances: Vec<f64> =
            members.iter().map(|m| m.distance_to_point(center)).collect();
        radial_distances.sort_by(f64::total_cmp);

        let polar_angles = members.iter().map(|m| m.polar_angle_from(center)).collect();

        let mean_radius = if radial_distances.is_empty() {
            0.0
        } else {
            radial_distances.iter().sum::<f64>() / radial_distances.len() as f64
        };
        let max_radius = radial_distances.last().copied().unwrap_or(0.0);

        Self {
            radial_distances,
            polar_angles,
            mean_radius,
            max_radius,
        }
    }

    /// Fraction of radii that find a partner within `tolerance` pixels.
    ///
    /// One-to-one matching of the two sorted profiles, normalized by the
    /// smaller profile. Returns 0 when either profile is empty.
    pub fn profile_overlap(&self, other: &ClusterMetrics, tolerance: f64) -> f64 {
        let (a, b) = (&self.radial_distances, &other.radial_distances);
        let smaller = a.len().min(b.len());
        if smaller == 0 {
            return 0.0;
        }

        let (mut i, mut j, mut matched) = (0, 0, 0usize);
        while i < a.len() && j < b.len() {
            if (a[i] - b[j]).abs() <= tolerance {
                matched += 1;
                i += 1;
                j += 1;
            } else if a[i] < b[j] {
                i += 1;
            } else {
                j += 1;
            }
        }
        matched as f64 / smaller as f64
    }
}
