//! Local neighbourhood descriptors for anchor prefiltering.
//!
//! Each minutia is described by its nearest neighbours, as (distance,
//! bearing relative to the minutia's own orientation). Both quantities are
//! unchanged by rotation and translation, so two impressions of the same
//! feature have near-identical descriptors before any alignment is known.

use crate::core::Minutia;
use crate::core::math::{angle_diff, normalize_angle};

/// Neighbourhood of one minutia.
#[derive(Clone, Debug, Default)]
pub(crate) struct LocalStructure {
    /// `(distance, relative bearing)` per neighbour, nearest first
    neighbours: Vec<(f64, f64)>,
}

impl LocalStructure {
    /// Describe `minutiae[index]` by its `k` nearest neighbours in the set.
    pub fn compute(minutiae: &[Minutia], index: usize, k: usize) -> Self {
        let center = &minutiae[index];
        let origin = center.position();

        let mut neighbours: Vec<(f64, f64)> = minutiae
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != index)
            .map(|(_, m)| {
                let p = m.position();
                let bearing = origin.bearing_to(&p);
                (origin.distance(&p), normalize_angle(bearing - center.theta))
            })
            .collect();
        neighbours.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.total_cmp(&y.1)));
        neighbours.truncate(k);

        Self { neighbours }
    }

    /// Number of neighbours described.
    pub fn len(&self) -> usize {
        self.neighbours.len()
    }

    /// Fraction of neighbours with a one-to-one partner in `other`.
    ///
    /// Candidate neighbour pairs within both tolerances are ranked by
    /// `d_dist / distance_tolerance + d_angle / angle_tolerance` and taken
    /// greedily. Normalized by the smaller neighbourhood. `None` when either
    /// neighbourhood is empty.
    pub fn similarity(
        &self,
        other: &LocalStructure,
        distance_tolerance: f64,
        angle_tolerance: f64,
    ) -> Option<f64> {
        let smaller = self.len().min(other.len());
        if smaller == 0 {
            return None;
        }

        let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
        for (i, &(da, ta)) in self.neighbours.iter().enumerate() {
            for (j, &(db, tb)) in other.neighbours.iter().enumerate() {
                let dd = (da - db).abs();
                let dt = angle_diff(ta, tb);
                if dd > distance_tolerance || dt > angle_tolerance {
                    continue;
                }
                let cost = dd / distance_tolerance.max(f64::EPSILON)
                    + dt / angle_tolerance.max(f64::EPSILON);
                candidates.push((cost, i, j));
            }
        }
        candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));

        let mut used_a = vec![false; self.len()];
        let mut used_b = vec![false; other.len()];
        let mut matched = 0usize;
        for (_, i, j) in candidates {
            if used_a[i] || used_b[j] {
                continue;
            }
            used_a[i] = true;
            used_b[j] = true;
            matched += 1;
        }
        Some(matched as f64 / smaller as f64)
    }
}

/// Descriptors for every minutia of a set.
pub(crate) fn local_structures(minutiae: &[Minutia], k: usize) -> Vec<LocalStructure> {
    (0..minutiae.len())
        .map(|i| LocalStructure::compute(minutiae, i, k))
        .collect()
}
