//! Run lifecycle and thread-safe comparison recording.

use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use super::clock::{Clock, SystemClock};
use super::report::{ComparisonRecord, TelemetryReport};
use crate::error::{Error, Result};

/// Test run identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

#[derive(Debug)]
struct RunState {
    start: SystemTime,
    comparisons: Vec<ComparisonRecord>,
    closed: bool,
}

/// Handle to an open run.
///
/// Cheap to clone; clones refer to the same run, so worker threads can each
/// hold one and record concurrently.
#[derive(Clone, Debug)]
pub struct RunHandle {
    run_id: RunId,
    state: Arc<Mutex<RunState>>,
}

impl RunHandle {
    /// Identifier of the run.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Start timestamp.
    pub fn start(&self) -> SystemTime {
        self.state.lock().start
    }

    /// Comparisons recorded so far.
    pub fn recorded(&self) -> usize {
        self.state.lock().comparisons.len()
    }

    /// Whether the run has been ended or aborted.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

/// Collects comparison records per run and produces wall-clock reports.
pub struct TelemetryAggregator {
    clock: Arc<dyn Clock>,
}

impl TelemetryAggregator {
    /// Aggregator stamping times from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Aggregator on the operating system clock.
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Open a run and stamp its start time.
    pub fn begin_run(&self, run_id: RunId) -> RunHandle {
        let start = self.clock.now();
        info!("[Telemetry] {} started", run_id);
        RunHandle {
            run_id,
            state: Arc::new(Mutex::new(RunState {
                start,
                comparisons: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Append a comparison in arrival order.
    ///
    /// Fails with [`Error::RunClosed`] once the run was ended or aborted.
    pub fn record_comparison(&self, handle: &RunHandle, record: ComparisonRecord) -> Result<()> {
        let mut state = handle.state.lock();
        if state.closed {
            return Err(Error::RunClosed(handle.run_id));
        }
        state.comparisons.push(record);
        Ok(())
    }

    /// Close the run and produce its report.
    ///
    /// Fails with [`Error::Clock`] when the clock reads earlier than the run
    /// start, and with [`Error::RunClosed`] when the run is already closed.
    pub fn end_run(&self, handle: &RunHandle) -> Result<TelemetryReport> {
        self.finish(handle, true)
    }

    /// Close the run early; the report is marked incomplete.
    pub fn abort_run(&self, handle: &RunHandle) -> Result<TelemetryReport> {
        self.finish(handle, false)
    }

    fn finish(&self, handle: &RunHandle, complete: bool) -> Result<TelemetryReport> {
        let mut state = handle.state.lock();
        if state.closed {
            return Err(Error::RunClosed(handle.run_id));
        }
        let end = self.clock.now();
        // The run cannot be reported either way
        state.closed = true;

        let execution_time = match end.duration_since(state.start) {
            Ok(elapsed) => elapsed,
            Err(_) => {
                warn!("[Telemetry] {} clock went backwards", handle.run_id);
                return Err(Error::Clock {
                    start: state.start,
                    end,
                });
            }
        };

        let comparisons = std::mem::take(&mut state.comparisons);
        let report = TelemetryReport::build(
            handle.run_id,
            state.start,
            end,
            execution_time,
            comparisons,
            complete,
        );

        if complete {
            info!("[Telemetry] {}", report.summary());
        } else {
            warn!("[Telemetry] aborted {}", report.summary());
        }
        Ok(report)
    }
}

impl Default for TelemetryAggregator {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

impl fmt::Debug for TelemetryAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryAggregator").finish_non_exhaustive()
    }
}
