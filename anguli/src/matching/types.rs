//! Matching result types.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::{MinutiaId, RigidTransform};

/// One correspondence between a minutia of sample A and one of sample B.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinutiaPair {
    /// Minutia from the first sample
    pub first: MinutiaId,
    /// Minutia from the second sample
    pub second: MinutiaId,
    /// Position residual under the winning transform (pixels)
    pub distance: f64,
    /// Orientation residual under the winning transform (radians, `[0, π]`)
    pub angle_difference: f64,
}

/// Injective correspondence between two minutia sets.
///
/// Each minutia appears at most once on its side. Unmatched minutiae are
/// simply absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pairing {
    pairs: Vec<MinutiaPair>,
}

impl Pairing {
    /// Empty pairing.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_pairs(pairs: Vec<MinutiaPair>) -> Self {
        Self { pairs }
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when nothing was paired.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in selection order.
    pub fn pairs(&self) -> &[MinutiaPair] {
        &self.pairs
    }

    /// Iterate over the pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, MinutiaPair> {
        self.pairs.iter()
    }

    /// Just the id pairs, in selection order.
    pub fn id_pairs(&self) -> Vec<(MinutiaId, MinutiaId)> {
        self.pairs.iter().map(|p| (p.first, p.second)).collect()
    }

    /// Partner of a first-sample minutia, if paired.
    pub fn partner_of_first(&self, id: MinutiaId) -> Option<MinutiaId> {
        self.pairs.iter().find(|p| p.first == id).map(|p| p.second)
    }

    /// Partner of a second-sample minutia, if paired.
    pub fn partner_of_second(&self, id: MinutiaId) -> Option<MinutiaId> {
        self.pairs.iter().find(|p| p.second == id).map(|p| p.first)
    }

    /// Sum of position residuals.
    pub fn total_distance(&self) -> f64 {
        self.pairs.iter().map(|p| p.distance).sum()
    }

    /// Whether no minutia appears twice on either side.
    pub fn is_injective(&self) -> bool {
        let mut firsts = HashSet::with_capacity(self.pairs.len());
        let mut seconds = HashSet::with_capacity(self.pairs.len());
        self.pairs
            .iter()
            .all(|p| firsts.insert(p.first) && seconds.insert(p.second))
    }

    /// Append pairs from another pairing.
    pub(crate) fn extend(&mut self, other: Pairing) {
        self.pairs.extend(other.pairs);
    }
}

impl<'a> IntoIterator for &'a Pairing {
    type Item = &'a MinutiaPair;
    type IntoIter = std::slice::Iter<'a, MinutiaPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Outcome of comparing two minutia sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// One-to-one correspondence
    pub pairing: Pairing,
    /// `|pairing| / max(|A|, |B|)`, in `[0, 1]`
    pub score: f64,
    /// Winning hypothesis mapping A onto B
    pub transform: RigidTransform,
    /// Classification of `score`
    pub quality: MatchQuality,
    /// Number of anchor hypotheses evaluated
    pub hypotheses: usize,
    /// Size of the first set
    pub first_len: usize,
    /// Size of the second set
    pub second_len: usize,
}

impl MatchResult {
    /// Build a result; score and quality are derived from the pairing.
    pub fn new(
        pairing: Pairing,
        transform: RigidTransform,
        hypotheses: usize,
        first_len: usize,
        second_len: usize,
    ) -> Self {
        let score = similarity_score(pairing.len(), first_len, second_len);
        Self {
            pairing,
            score,
            transform,
            quality: MatchQuality::from_score(score),
            hypotheses,
            first_len,
            second_len,
        }
    }

    /// Number of paired minutiae.
    #[inline]
    pub fn matched(&self) -> usize {
        self.pairing.len()
    }
}

/// `matched / max(first, second)`; 0 when both sets are empty.
pub fn similarity_score(matched: usize, first_len: usize, second_len: usize) -> f64 {
    let denom = first_len.max(second_len);
    if denom == 0 {
        0.0
    } else {
        (matched as f64 / denom as f64).min(1.0)
    }
}

/// Quality classification of a match score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchQuality {
    /// score > 0.8
    Excellent,
    /// score > 0.6
    Good,
    /// score > 0.4
    Marginal,
    /// score > 0.2
    Poor,
    /// score <= 0.2
    NoMatch,
}

impl MatchQuality {
    /// Classify a match score.
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            MatchQuality::Excellent
        } else if score > 0.6 {
            MatchQuality::Good
        } else if score > 0.4 {
            MatchQuality::Marginal
        } else if score > 0.2 {
            MatchQuality::Poor
        } else {
            MatchQuality::NoMatch
        }
    }

    /// Whether the two samples plausibly come from the same finger.
    pub fn is_acceptable(&self) -> bool {
        matches!(
            self,
            MatchQuality::Excellent | MatchQuality::Good | MatchQuality::Marginal
        )
    }
}
