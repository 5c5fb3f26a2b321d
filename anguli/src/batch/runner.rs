//! Parallel execution of a test run.
//!
//! Pairs are queued on a crossbeam channel and consumed by a scoped pool of
//! named worker threads. Each worker looks both images up in the
//! [`ImageStore`], runs the matcher, records the comparison into the run and
//! sends `(index, outcome)` back. Outcomes are returned in request order.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use super::config::BatchConfig;
use super::store::{ImagePair, ImageStore};
use crate::core::ImageId;
use crate::error::{Error, Result};
use crate::evaluation::{GroupAggregate, Verdict, VerdictConfig};
use crate::matching::{MatchResult, MinutiaeMatcher};
use crate::telemetry::{ComparisonRecord, RunHandle, RunId, TelemetryAggregator, TelemetryReport};

/// Result of one requested comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PairOutcome {
    /// The matcher produced a result (which may have a low score)
    Matched(MatchResult),
    /// The comparison could not be performed
    Failed(#[serde(serialize_with = "serialize_error")] Error),
    /// Not attempted because the run timed out
    Skipped,
}

fn serialize_error<S: serde::Serializer>(err: &Error, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(err)
}

impl PairOutcome {
    /// The match result, if matched.
    pub fn result(&self) -> Option<&MatchResult> {
        match self {
            PairOutcome::Matched(r) => Some(r),
            _ => None,
        }
    }

    /// Score of a matched comparison.
    pub fn score(&self) -> Option<f64> {
        self.result().map(|r| r.score)
    }
}

/// Everything a test run produced.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Run identifier
    pub run_id: RunId,
    /// Requested pairs
    pub pairs: Vec<ImagePair>,
    /// One outcome per requested pair, same order
    pub outcomes: Vec<PairOutcome>,
    /// Run report, or why it could not be produced
    pub telemetry: Result<TelemetryReport>,
}

impl BatchOutcome {
    /// Matched comparisons.
    pub fn matched(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Matched(_)))
    }

    /// Failed comparisons.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Failed(_)))
    }

    /// Skipped comparisons.
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PairOutcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&PairOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }

    /// Iterate over `(pair, outcome)` in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&ImagePair, &PairOutcome)> {
        self.pairs.iter().zip(&self.outcomes)
    }

    /// Per-probe verdicts over the matched comparisons.
    ///
    /// The group size of a probe is the number of pairs requested for it, so
    /// failed or skipped comparisons count against acceptance.
    pub fn verdicts(&self, config: &VerdictConfig) -> BTreeMap<ImageId, Verdict> {
        let mut groups: BTreeMap<ImageId, (Vec<f64>, usize)> = BTreeMap::new();
        for (pair, outcome) in self.iter() {
            let (scores, size) = groups.entry(pair.first).or_default();
            *size += 1;
            if let Some(score) = outcome.score() {
                scores.push(score);
            }
        }

        groups
            .into_iter()
            .map(|(probe, (scores, size))| {
                let aggregate = GroupAggregate::from_scores(&scores, size, config.positive_threshold);
                (probe, Verdict::evaluate(probe, aggregate, config))
            })
            .collect()
    }
}

/// Executes test runs on a worker pool.
pub struct BatchRunner {
    matcher: Arc<dyn MinutiaeMatcher>,
    aggregator: Arc<TelemetryAggregator>,
    config: BatchConfig,
}

impl BatchRunner {
    /// Create a runner.
    pub fn new(
        matcher: Arc<dyn MinutiaeMatcher>,
        aggregator: Arc<TelemetryAggregator>,
        config: BatchConfig,
    ) -> Self {
        Self {
            matcher,
            aggregator,
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run every pair against `store` under `run_id`.
    ///
    /// Per-pair problems (unknown image, empty sample) become
    /// [`PairOutcome::Failed`]. Only pool failures (spawn error, worker
    /// panic) fail the whole call with [`Error::Worker`].
    pub fn run(&self, run_id: RunId, store: &ImageStore, pairs: &[ImagePair]) -> Result<BatchOutcome> {
        let handle = self.aggregator.begin_run(run_id);
        let workers = self.config.resolved_workers().min(pairs.len()).max(1);
        let deadline = self.config.timeout().map(|t| Instant::now() + t);
        let timed_out = AtomicBool::new(false);

        info!(
            "[Batch] {}: {} pairs on {} workers ({} matcher)",
            run_id,
            pairs.len(),
            workers,
            self.matcher.name()
        );

        let (job_tx, job_rx) = unbounded::<(usize, ImagePair)>();
        for job in pairs.iter().copied().enumerate() {
            job_tx
                .send(job)
                .map_err(|e| Error::Worker(format!("job queue closed: {e}")))?;
        }
        drop(job_tx);

        let (result_tx, result_rx) = unbounded::<(usize, PairOutcome)>();

        let pool = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            let mut first_error = None;

            for worker_id in 0..workers {
                let ctx = WorkerContext {
                    jobs: job_rx.clone(),
                    results: result_tx.clone(),
                    store,
                    run: handle.clone(),
                    deadline,
                    timed_out: &timed_out,
                };
                let spawned = thread::Builder::new()
                    .name(format!("anguli-worker-{worker_id}"))
                    .spawn_scoped(scope, move || self.worker_loop(worker_id, ctx));
                match spawned {
                    Ok(h) => handles.push(h),
                    Err(e) => {
                        first_error = Some(Error::Worker(format!("failed to spawn worker: {e}")));
                        break;
                    }
                }
            }

            for h in handles {
                if h.join().is_err() && first_error.is_none() {
                    first_error = Some(Error::Worker("worker thread panicked".to_string()));
                }
            }
            first_error.map_or(Ok(()), Err)
        });
        drop(result_tx);

        if let Err(e) = pool {
            if let Err(abort) = self.aggregator.abort_run(&handle) {
                warn!("[Batch] {} could not be closed: {}", run_id, abort);
            }
            return Err(e);
        }

        let mut slots: Vec<Option<PairOutcome>> = vec![None; pairs.len()];
        for (idx, outcome) in result_rx.try_iter() {
            slots[idx] = Some(outcome);
        }
        let outcomes: Vec<PairOutcome> = slots
            .into_iter()
            .map(|o| o.unwrap_or(PairOutcome::Skipped))
            .collect();

        let telemetry = if timed_out.load(Ordering::Relaxed) {
            self.aggregator.abort_run(&handle)
        } else {
            self.aggregator.end_run(&handle)
        };
        if let Err(e) = &telemetry {
            warn!("[Batch] {} telemetry unavailable: {}", run_id, e);
        }

        let outcome = BatchOutcome {
            run_id,
            pairs: pairs.to_vec(),
            outcomes,
            telemetry,
        };
        info!(
            "[Batch] {}: {} matched, {} failed, {} skipped",
            run_id,
            outcome.matched(),
            outcome.failed(),
            outcome.skipped()
        );
        Ok(outcome)
    }

    fn worker_loop(&self, worker_id: usize, ctx: WorkerContext<'_>) {
        debug!("[Batch] worker {} started", worker_id);

        for (idx, pair) in ctx.jobs.iter() {
            let expired = ctx.timed_out.load(Ordering::Relaxed)
                || ctx.deadline.is_some_and(|d| Instant::now() >= d);
            let outcome = if expired {
                if !ctx.timed_out.swap(true, Ordering::Relaxed) {
                    warn!("[Batch] {} timed out, skipping remaining pairs", ctx.run.run_id());
                }
                PairOutcome::Skipped
            } else {
                self.compare(&ctx, pair)
            };

            if ctx.results.send((idx, outcome)).is_err() {
                break;
            }
        }

        debug!("[Batch] worker {} finished", worker_id);
    }

    fn compare(&self, ctx: &WorkerContext<'_>, pair: ImagePair) -> PairOutcome {
        let samples = ctx
            .store
            .require(pair.first)
            .and_then(|a| ctx.store.require(pair.second).map(|b| (a, b)));
        let (first, second) = match samples {
            Ok(s) => s,
            Err(e) => {
                warn!("[Batch] {}: {}", pair, e);
                return PairOutcome::Failed(e);
            }
        };

        let started = Instant::now();
        match self.matcher.match_samples(first, second) {
            Ok(result) => {
                let record = ComparisonRecord::from_result(&result)
                    .with_images(pair.first, pair.second)
                    .with_duration(started.elapsed());
                if let Err(e) = self.aggregator.record_comparison(&ctx.run, record) {
                    warn!("[Batch] {}: not recorded: {}", pair, e);
                }
                debug!("[Batch] {}: score {:.3}", pair, result.score);
                PairOutcome::Matched(result)
            }
            Err(e) => {
                warn!("[Batch] {}: {}", pair, e);
                PairOutcome::Failed(e)
            }
        }
    }
}

struct WorkerContext<'a> {
    jobs: Receiver<(usize, ImagePair)>,
    results: Sender<(usize, PairOutcome)>,
    store: &'a ImageStore,
    run: RunHandle,
    deadline: Option<Instant>,
    timed_out: &'a AtomicBool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Minutia, MinutiaId, Sample};
    use crate::matching::AnchorMatcher;
    use crate::telemetry::ManualClock;
    use std::time::Duration;

    fn sample(image: u32, dx: u32) -> Sample {
        let minutiae = [(20, 30, 0.3), (80, 40, 1.4), (50, 90, 2.2), (110, 100, 4.0)]
            .iter()
            .enumerate()
            .map(|(k, &(x, y, t))| {
                Minutia::new(MinutiaId(k as u32), ImageId(image), x + dx, y, t, k % 2 == 0)
            })
            .collect();
        Sample::new(ImageId(image), minutiae).unwrap()
    }

    fn runner(config: BatchConfig) -> BatchRunner {
        let aggregator = Arc::new(TelemetryAggregator::new(Arc::new(ManualClock::at_epoch())));
        BatchRunner::new(Arc::new(AnchorMatcher::default()), aggregator, config)
    }

    #[test]
    fn test_outcomes_in_request_order() {
        let store = ImageStore::from_samples([sample(1, 0), sample(2, 10), sample(3, 0)]);
        let pairs = store.all_pairs();
        let out = runner(BatchConfig::new().with_workers(3))
            .run(RunId(1), &store, &pairs)
            .unwrap();

        assert_eq!(out.outcomes.len(), 6);
        assert_eq!(out.matched(), 6);
        for (_, outcome) in out.iter() {
            assert_eq!(outcome.score(), Some(1.0));
        }
        let report = out.telemetry.unwrap();
        assert!(report.complete);
        assert_eq!(report.len(), 6);
    }

    #[test]
    fn test_unknown_image_fails_pair() {
        let store = ImageStore::from_samples([sample(1, 0)]);
        let pairs = [ImagePair::new(ImageId(1), ImageId(9)), ImagePair::new(ImageId(1), ImageId(1))];
        let out = runner(BatchConfig::new().with_workers(2))
            .run(RunId(2), &store, &pairs)
            .unwrap();

        assert!(matches!(&out.outcomes[0], PairOutcome::Failed(e) if e.is_invalid_input()));
        assert!(matches!(&out.outcomes[1], PairOutcome::Matched(_)));
        // Failed pairs are not recorded
        assert_eq!(out.telemetry.unwrap().len(), 1);
    }

    #[test]
    fn test_zero_timeout_skips_everything() {
        let store = ImageStore::from_samples([sample(1, 0), sample(2, 0)]);
        let pairs = store.all_pairs();
        let config = BatchConfig::new()
            .with_workers(2)
            .with_timeout(Some(Duration::ZERO));
        let out = runner(config).run(RunId(3), &store, &pairs).unwrap();

        assert_eq!(out.skipped(), 2);
        let report = out.telemetry.unwrap();
        assert!(!report.complete);
        assert!(report.is_empty());
    }

    #[test]
    fn test_empty_run() {
        let out = runner(BatchConfig::new())
            .run(RunId(4), &ImageStore::new(), &[])
            .unwrap();
        assert!(out.outcomes.is_empty());
        assert!(out.telemetry.unwrap().is_empty());
    }

    #[test]
    fn test_verdicts_group_by_probe() {
        let store = ImageStore::from_samples([sample(1, 0), sample(2, 5)]);
        let pairs = [
            ImagePair::new(ImageId(1), ImageId(2)),
            ImagePair::new(ImageId(1), ImageId(7)),
            ImagePair::new(ImageId(2), ImageId(1)),
        ];
        let out = runner(BatchConfig::new().with_workers(1))
            .run(RunId(5), &store, &pairs)
            .unwrap();
        let verdicts = out.verdicts(&VerdictConfig::default());

        assert_eq!(verdicts.len(), 2);
        let v1 = &verdicts[&ImageId(1)];
        assert_eq!(v1.aggregate.count, 1);
        assert!((v1.aggregate.normalized_positive - 0.5).abs() < 1e-12);
        assert!(v1.accepted);
        assert!(verdicts[&ImageId(2)].accepted);
    }
}
