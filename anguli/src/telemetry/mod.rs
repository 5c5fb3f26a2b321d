//! Test-run telemetry.
//!
//! A run is opened with [`TelemetryAggregator::begin_run`], receives
//! comparison records from any number of threads, and is closed with
//! [`TelemetryAggregator::end_run`] (or `abort_run` for partial runs),
//! yielding a [`TelemetryReport`] with start, end and execution time.
//!
//! Timestamps come from an injected [`Clock`] so tests can use
//! [`ManualClock`].

mod aggregator;
mod clock;
mod report;

pub use aggregator::{RunHandle, RunId, TelemetryAggregator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use report::{ComparisonRecord, OperationTiming, ScoreSummary, TelemetryReport};
