//! Greedy one-to-one assignment under a fixed transform.

use super::config::MatcherConfig;
use super::types::{MinutiaPair, Pairing};
use crate::core::math::angle_diff;
use crate::core::{Minutia, RigidTransform};

/// A within-tolerance pairing candidate (indices into the two slices).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub angle_difference: f64,
}

/// Injective assignment selected by [`assign`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Assignment {
    pub pairs: Vec<Candidate>,
    pub residual: f64,
}

impl Assignment {
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn into_pairing(self, a: &[Minutia], b: &[Minutia]) -> Pairing {
        Pairing::from_pairs(
            self.pairs
                .into_iter()
                .map(|c| MinutiaPair {
                    first: a[c.a].id,
                    second: b[c.b].id,
                    distance: c.distance,
                    angle_difference: c.angle_difference,
                })
                .collect(),
        )
    }
}

/// Collect every `(a, b)` pair that agrees within tolerance under `transform`.
pub(crate) fn candidates(
    a: &[Minutia],
    b: &[Minutia],
    transform: &RigidTransform,
    config: &MatcherConfig,
) -> Vec<Candidate> {
    let max_angle = config.angle_tolerance();
    let mut out = Vec::new();

    for (ai, ma) in a.iter().enumerate() {
        let p = transform.apply_point(ma.position());
        let theta = transform.apply_angle(ma.theta);

        for (bi, mb) in b.iter().enumerate() {
            if config.require_type_match && !ma.same_type(mb) {
                continue;
            }
            let distance = mb.distance_to_point(p);
            if distance > config.distance_tolerance {
                continue;
            }
            let angle_difference = angle_diff(theta, mb.theta);
            if angle_difference > max_angle {
                continue;
            }
            out.push(Candidate {
                a: ai,
                b: bi,
                distance,
                angle_difference,
            });
        }
    }
    out
}

/// Greedy injective selection: closest first, then smallest orientation
/// residual, then lower ids.
pub(crate) fn select(a: &[Minutia], b: &[Minutia], mut candidates: Vec<Candidate>) -> Assignment {
    candidates.sort_by(|x, y| {
        x.distance
            .total_cmp(&y.distance)
            .then_with(|| x.angle_difference.total_cmp(&y.angle_difference))
            .then_with(|| a[x.a].id.cmp(&a[y.a].id))
            .then_with(|| b[x.b].id.cmp(&b[y.b].id))
    });

    let mut used_a = vec![false; a.len()];
    let mut used_b = vec![false; b.len()];
    let mut assignment = Assignment::default();

    for c in candidates {
        if used_a[c.a] || used_b[c.b] {
            continue;
        }
        used_a[c.a] = true;
        used_b[c.b] = true;
        assignment.residual += c.distance;
        assignment.pairs.push(c);
    }
    assignment
}

/// Candidates plus greedy selection.
pub(crate) fn assign(
    a: &[Minutia],
    b: &[Minutia],
    transform: &RigidTransform,
    config: &MatcherConfig,
) -> Assignment {
    select(a, b, candidates(a, b, transform, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ImageId, MinutiaId};

    fn m(id: u32, image: u32, x: u32, y: u32, term: bool) -> Minutia {
        Minutia::new(MinutiaId(id), ImageId(image), x, y, 0.0, term)
    }

    #[test]
    fn test_greedy_prefers_closest() {
        // a2 is 1 px from b1, so a1 falls back to b2 (4 px)
        let a = vec![m(1, 1, 100, 100, true), m(2, 1, 103, 100, true)];
        let b = vec![m(1, 2, 102, 100, true), m(2, 2, 96, 100, true)];
        let out = assign(&a, &b, &RigidTransform::identity(), &MatcherConfig::default());

        let pairing = out.into_pairing(&a, &b);
        assert_eq!(
            pairing.id_pairs(),
            vec![(MinutiaId(2), MinutiaId(1)), (MinutiaId(1), MinutiaId(2))]
        );
        assert!(pairing.is_injective());
    }

    #[test]
    fn test_tie_broken_by_lower_id() {
        let a = vec![m(5, 1, 50, 50, true), m(3, 1, 50, 50, true)];
        let b = vec![m(9, 2, 50, 50, true)];
        let out = assign(&a, &b, &RigidTransform::identity(), &MatcherConfig::default());
        assert_eq!(out.len(), 1);
        assert_eq!(a[out.pairs[0].a].id, MinutiaId(3));
    }

    #[test]
    fn test_type_match_filter() {
        let a = vec![m(1, 1, 10, 10, true)];
        let b = vec![m(1, 2, 10, 10, false)];
        let config = MatcherConfig::default().with_type_match(true);
        assert_eq!(assign(&a, &b, &RigidTransform::identity(), &config).len(), 0);
        assert_eq!(
            assign(&a, &b, &RigidTransform::identity(), &MatcherConfig::default()).len(),
            1
        );
    }

    #[test]
    fn test_angle_tolerance() {
        let a = vec![Minutia::new(MinutiaId(1), ImageId(1), 10, 10, 0.0, true)];
        let b = vec![Minutia::new(MinutiaId(1), ImageId(2), 10, 10, 20f64.to_radians(), true)];
        let config = MatcherConfig::default();
        assert_eq!(candidates(&a, &b, &RigidTransform::identity(), &config).len(), 0);
    }
}
