//! Per-probe score aggregation and accept/reject decisions.

use serde::{Deserialize, Serialize};

use crate::core::ImageId;

/// Thresholds for probe verdicts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerdictConfig {
    /// Scores at or above this count as positive.
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,

    /// Minimum normalized positive score for acceptance.
    #[serde(default = "default_min_normalized_positive")]
    pub min_normalized_positive: f64,

    /// Minimum normalized mean score for acceptance.
    #[serde(default = "default_min_normalized_mean")]
    pub min_normalized_mean: f64,
}

fn default_positive_threshold() -> f64 {
    0.5
}

fn default_min_normalized_positive() -> f64 {
    0.15
}

fn default_min_normalized_mean() -> f64 {
    0.01
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            positive_threshold: default_positive_threshold(),
            min_normalized_positive: default_min_normalized_positive(),
            min_normalized_mean: default_min_normalized_mean(),
        }
    }
}

impl VerdictConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.positive_threshold) {
            return Err(format!(
                "positive_threshold must be in [0, 1], got {}",
                self.positive_threshold
            ));
        }
        if self.min_normalized_positive < 0.0 || self.min_normalized_mean < 0.0 {
            return Err("verdict bounds must be non-negative".to_string());
        }
        Ok(())
    }
}

/// Normalized scores of one probe against its gallery group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    /// Mean of the positive scores × positive count / group size
    pub normalized_positive: f64,
    /// Mean of all scores × positive count / group size
    pub normalized_mean: f64,
    /// Scores at or above the positive threshold
    pub positives: usize,
    /// Scores aggregated
    pub count: usize,
}

impl GroupAggregate {
    /// Aggregate `scores` for a group of `group_size` galleries.
    ///
    /// Empty input or a zero group size yields zeros.
    pub fn from_scores(scores: &[f64], group_size: usize, positive_threshold: f64) -> Self {
        if scores.is_empty() || group_size == 0 {
            return Self {
                count: scores.len(),
                ..Default::default()
            };
        }

        let positive: Vec<f64> = scores
            .iter()
            .copied()
            .filter(|&s| s >= positive_threshold)
            .collect();
        let positives = positive.len();
        let positive_mean = if positives > 0 {
            positive.iter().sum::<f64>() / positives as f64
        } else {
            0.0
        };
        let overall_mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let weight = positives as f64 / group_size as f64;

        Self {
            normalized_positive: positive_mean * weight,
            normalized_mean: overall_mean * weight,
            positives,
            count: scores.len(),
        }
    }
}

/// Accept/reject decision for one probe image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Probe image
    pub probe: ImageId,
    /// Aggregated scores the decision is based on
    pub aggregate: GroupAggregate,
    /// Both bounds met
    pub accepted: bool,
}

impl Verdict {
    /// Decide for `probe` from its aggregate.
    pub fn evaluate(probe: ImageId, aggregate: GroupAggregate, config: &VerdictConfig) -> Self {
        let accepted = aggregate.normalized_positive >= config.min_normalized_positive
            && aggregate.normalized_mean >= config.min_normalized_mean;
        Self {
            probe,
            aggregate,
            accepted,
        }
    }
}
