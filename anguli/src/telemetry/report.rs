//! Comparison records and run reports.

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

use super::aggregator::RunId;
use crate::core::ImageId;
use crate::matching::{MatchResult, Pairing};

/// One comparison's outcome as recorded in a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// Probe image, when known
    #[serde(default)]
    pub first_image: Option<ImageId>,
    /// Candidate image, when known
    #[serde(default)]
    pub second_image: Option<ImageId>,
    /// Correspondence produced by the matcher
    pub pairing: Pairing,
    /// Similarity score in `[0, 1]`
    pub score: f64,
    /// Time spent in the matcher
    #[serde(default)]
    pub duration: Option<Duration>,
}

impl ComparisonRecord {
    /// Record with just a pairing and score.
    pub fn new(pairing: Pairing, score: f64) -> Self {
        Self {
            first_image: None,
            second_image: None,
            pairing,
            score,
            duration: None,
        }
    }

    /// Record the pairing and score of a match result.
    pub fn from_result(result: &MatchResult) -> Self {
        Self::new(result.pairing.clone(), result.score)
    }

    /// Attach the compared images.
    pub fn with_images(mut self, first: ImageId, second: ImageId) -> Self {
        self.first_image = Some(first);
        self.second_image = Some(second);
        self
    }

    /// Attach the matcher duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Score statistics over a run's comparisons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Number of comparisons
    pub count: usize,
    /// Mean score
    pub mean: f64,
    /// Lowest score
    pub min: f64,
    /// Highest score
    pub max: f64,
    /// Median score
    pub median: f64,
    /// Pairs across all comparisons
    pub total_pairs: usize,
}

impl ScoreSummary {
    /// Summarize records; all zeros when empty.
    pub fn from_records(records: &[ComparisonRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let mut scores: Vec<f64> = records.iter().map(|r| r.score).collect();
        scores.sort_by(f64::total_cmp);

        Self {
            count: scores.len(),
            mean: scores.iter().sum::<f64>() / scores.len() as f64,
            min: scores[0],
            max: scores[scores.len() - 1],
            median: median_sorted(&scores),
            total_pairs: records.iter().map(|r| r.pairing.len()).sum(),
        }
    }
}

/// Timing statistics for a single operation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationTiming {
    /// Operation name.
    pub name: String,

    /// Mean duration (milliseconds).
    pub mean_ms: f64,

    /// Standard deviation (milliseconds).
    pub std_ms: f64,

    /// Minimum duration (milliseconds).
    pub min_ms: f64,

    /// Maximum duration (milliseconds).
    pub max_ms: f64,

    /// Median duration (milliseconds).
    pub median_ms: f64,

    /// Total number of samples.
    pub count: usize,

    /// Total time spent (milliseconds).
    pub total_ms: f64,
}

impl OperationTiming {
    /// Create from a list of durations.
    pub fn from_durations(name: &str, durations: &[Duration]) -> Self {
        if durations.is_empty() {
            return Self {
                name: name.to_string(),
                ..Default::default()
            };
        }

        let mut ms: Vec<f64> = durations.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        ms.sort_by(f64::total_cmp);
        let n = ms.len() as f64;

        let total_ms: f64 = ms.iter().sum();
        let mean_ms = total_ms / n;
        let variance = ms.iter().map(|v| (v - mean_ms).powi(2)).sum::<f64>() / n;

        Self {
            name: name.to_string(),
            mean_ms,
            std_ms: variance.sqrt(),
            min_ms: ms[0],
            max_ms: ms[ms.len() - 1],
            median_ms: median_sorted(&ms),
            count: ms.len(),
            total_ms,
        }
    }

    /// Format as a single line.
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.2} ± {:.2} ms (min: {:.2}, max: {:.2}, n={})",
            self.name, self.mean_ms, self.std_ms, self.min_ms, self.max_ms, self.count
        )
    }
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        0.0
    } else if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Finalized telemetry of one test run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReport {
    /// Run identifier
    pub run_id: RunId,
    /// Stamped at `begin_run`
    pub start: SystemTime,
    /// Stamped at `end_run` / `abort_run`
    pub end: SystemTime,
    /// `end - start`
    pub execution_time: Duration,
    /// Recorded comparisons in arrival order
    pub comparisons: Vec<ComparisonRecord>,
    /// False when the run was aborted (partial report)
    pub complete: bool,
    /// Score statistics
    pub scores: ScoreSummary,
    /// Matcher timing over comparisons that carried a duration
    pub timing: OperationTiming,
}

impl TelemetryReport {
    pub(crate) fn build(
        run_id: RunId,
        start: SystemTime,
        end: SystemTime,
        execution_time: Duration,
        comparisons: Vec<ComparisonRecord>,
        complete: bool,
    ) -> Self {
        let durations: Vec<Duration> = comparisons.iter().filter_map(|c| c.duration).collect();
        Self {
            run_id,
            start,
            end,
            execution_time,
            scores: ScoreSummary::from_records(&comparisons),
            timing: OperationTiming::from_durations("comparison", &durations),
            comparisons,
            complete,
        }
    }

    /// Number of recorded comparisons.
    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    /// Format as a single line.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} comparisons in {:.1} ms, mean score {:.3}{}",
            self.run_id,
            self.len(),
            self.execution_time.as_secs_f64() * 1000.0,
            self.scores.mean,
            if self.complete { "" } else { " (incomplete)" }
        )
    }
}
