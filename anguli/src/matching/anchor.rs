//! Anchor-hypothesis consensus matcher.
//!
//! Every candidate anchor pair `(mA, mB)` defines the rigid transform that
//! maps `mA` exactly onto `mB`. Under that hypothesis the remaining minutiae
//! are paired greedily within tolerance; the hypothesis pairing the most
//! minutiae wins (ties: lower summed residual, then first evaluated).
//!
//! With `local_similarity_threshold` set, anchor pairs whose nearest
//! neighbourhoods disagree are skipped before any transform is built.

use log::debug;

use super::assign::{Assignment, assign};
use super::config::MatcherConfig;
use super::local::{LocalStructure, local_structures};
use super::traits::MinutiaeMatcher;
use super::types::MatchResult;
use crate::core::{Minutia, Point2D, RigidTransform, Sample, mean_point, validate_minutiae};
use crate::error::{Error, Result};

/// Match two minutia sets.
///
/// Both sets must be non-empty and individually consistent (one image per
/// set, unique ids, finite orientations); otherwise [`Error::InvalidInput`]
/// is returned. A failed comparison is never reported as score 0.
///
/// # Example
/// ```
/// use anguli::core::{ImageId, Minutia, MinutiaId};
/// use anguli::matching::{MatcherConfig, match_minutiae};
///
/// let a = vec![
///     Minutia::new(MinutiaId(1), ImageId(1), 10, 10, 0.0, true),
///     Minutia::new(MinutiaId(2), ImageId(1), 40, 20, 0.5, false),
/// ];
/// let b = vec![
///     Minutia::new(MinutiaId(101), ImageId(2), 15, 15, 0.0, true),
///     Minutia::new(MinutiaId(102), ImageId(2), 45, 25, 0.5, false),
/// ];
///
/// let result = match_minutiae(&a, &b, &MatcherConfig::default()).unwrap();
/// assert_eq!(result.pairing.len(), 2);
/// assert_eq!(result.score, 1.0);
/// ```
pub fn match_minutiae(a: &[Minutia], b: &[Minutia], config: &MatcherConfig) -> Result<MatchResult> {
    config.validate().map_err(Error::InvalidInput)?;
    if a.is_empty() || b.is_empty() {
        return Err(Error::invalid(format!(
            "cannot match empty minutia sets ({} vs {} minutiae)",
            a.len(),
            b.len()
        )));
    }
    validate_minutiae(None, a)?;
    validate_minutiae(None, b)?;
    Ok(match_validated(a, b, config))
}

/// Consensus search over non-empty, validated sets.
pub(crate) fn match_validated(a: &[Minutia], b: &[Minutia], config: &MatcherConfig) -> MatchResult {
    let anchors_a = anchor_indices(a, config.anchor_region_half_size);
    let anchors_b = anchor_indices(b, config.anchor_region_half_size);
    let target = a.len().min(b.len());

    let local = config.local_similarity_threshold.map(|threshold| {
        (
            threshold,
            local_structures(a, config.local_neighbours),
            local_structures(b, config.local_neighbours),
        )
    });

    let mut best: Option<(Assignment, RigidTransform)> = None;
    let mut hypotheses = 0usize;
    let mut pruned = 0usize;

    'search: for &ia in &anchors_a {
        for &ib in &anchors_b {
            if config.require_type_match && !a[ia].same_type(&b[ib]) {
                continue;
            }
            if let Some((threshold, local_a, local_b)) = &local {
                if !neighbourhoods_agree(&local_a[ia], &local_b[ib], *threshold, config) {
                    pruned += 1;
                    continue;
                }
            }

            let transform = RigidTransform::from_anchor(&a[ia], &b[ib]);
            let assignment = assign(a, b, &transform, config);
            hypotheses += 1;

            let improves = match &best {
                None => true,
                Some((current, _)) => {
                    assignment.len() > current.len()
                        || (assignment.len() == current.len()
                            && assignment.residual < current.residual)
                }
            };
            if improves {
                let reached = assignment.len() >= target;
                best = Some((assignment, transform));
                if config.early_termination && reached {
                    break 'search;
                }
            }
        }
    }

    let (assignment, transform) =
        best.unwrap_or_else(|| (Assignment::default(), RigidTransform::identity()));
    let pairing = assignment.into_pairing(a, b);
    let result = MatchResult::new(pairing, transform, hypotheses, a.len(), b.len());

    debug!(
        "[Matcher] {} vs {} minutiae: {} pairs, score {:.3}, {} hypotheses, {} pruned",
        a.len(),
        b.len(),
        result.matched(),
        result.score,
        hypotheses,
        pruned
    );
    result
}

/// Local prefilter. Minutiae without neighbours always pass.
fn neighbourhoods_agree(
    a: &LocalStructure,
    b: &LocalStructure,
    threshold: f64,
    config: &MatcherConfig,
) -> bool {
    a.similarity(b, config.local_distance_tolerance, config.local_angle_tolerance())
        .is_none_or(|s| s >= threshold)
}

/// Indices usable as anchors: those inside the square of `half_size` around
/// the rounded centroid, or all of them when disabled or the square is empty.
fn anchor_indices(minutiae: &[Minutia], half_size: Option<u32>) -> Vec<usize> {
    let all = || (0..minutiae.len()).collect::<Vec<_>>();
    let Some(half) = half_size else {
        return all();
    };
    let Some(center) = mean_point(minutiae.iter().map(Minutia::position)) else {
        return Vec::new();
    };
    let center = Point2D::new(center.x.round(), center.y.round());
    let half = half as f64;

    let inside: Vec<usize> = minutiae
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            let p = m.position();
            (p.x - center.x).abs() <= half && (p.y - center.y).abs() <= half
        })
        .map(|(i, _)| i)
        .collect();

    if inside.is_empty() {
        debug!("[Matcher] anchor region empty, using all {} minutiae", minutiae.len());
        all()
    } else {
        inside
    }
}

/// Whole-sample matcher behind the [`MinutiaeMatcher`] trait.
#[derive(Clone, Debug, Default)]
pub struct AnchorMatcher {
    config: MatcherConfig,
}

impl AnchorMatcher {
    /// Create a matcher with the given configuration.
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }
}

impl MinutiaeMatcher for AnchorMatcher {
    fn match_samples(&self, first: &Sample, second: &Sample) -> Result<MatchResult> {
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
        Ok(match_validated(first.minutiae(), second.minutiae(), &self.config))
    }

    fn name(&self) -> &str {
        "anchor"
    }
}
