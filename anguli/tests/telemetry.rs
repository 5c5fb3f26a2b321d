//! Telemetry integration tests.

mod common;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use anguli::{
    AnchorMatcher, ComparisonRecord, Error, ManualClock, MinutiaeMatcher, Pairing, RunId,
    TelemetryAggregator,
};

fn manual() -> (Arc<ManualClock>, TelemetryAggregator) {
    let clock = Arc::new(ManualClock::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000)));
    let aggregator = TelemetryAggregator::new(clock.clone());
    (clock, aggregator)
}

#[test]
fn test_empty_run_reports_elapsed_time() {
    let (clock, aggregator) = manual();
    let handle = aggregator.begin_run(RunId(1));
    clock.advance(Duration::from_millis(250));

    let report = aggregator.end_run(&handle).unwrap();
    assert!(report.comparisons.is_empty());
    assert_eq!(report.execution_time, Duration::from_millis(250));
    assert_eq!(report.end.duration_since(report.start).unwrap(), report.execution_time);
    assert_eq!(report.scores.count, 0);
    assert_eq!(report.timing.count, 0);
}

#[test]
fn test_concurrent_recording_keeps_every_record() {
    let (_, aggregator) = manual();
    let aggregator = Arc::new(aggregator);
    let handle = aggregator.begin_run(RunId(2));

    let threads: Vec<_> = (0..8)
        .map(|t| {
            let aggregator = Arc::clone(&aggregator);
            let handle = handle.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let score = (t * 50 + i) as f64 / 400.0;
                    aggregator
                        .record_comparison(&handle, ComparisonRecord::new(Pairing::new(), score))
                        .unwrap();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    let report = aggregator.end_run(&handle).unwrap();
    assert_eq!(report.len(), 400);
    assert_eq!(report.scores.min, 0.0);
    assert!((report.scores.max - 399.0 / 400.0).abs() < 1e-12);
}

#[test]
fn test_clock_going_backwards_is_reported() {
    let (clock, aggregator) = manual();
    let handle = aggregator.begin_run(RunId(3));
    clock.rewind(Duration::from_millis(5));

    match aggregator.end_run(&handle) {
        Err(Error::Clock { start, end }) => assert!(end < start),
        other => panic!("expected clock error, got {other:?}"),
    }
}

#[test]
fn test_recording_after_end_fails() {
    let (_, aggregator) = manual();
    let handle = aggregator.begin_run(RunId(4));
    aggregator.end_run(&handle).unwrap();

    let err = aggregator
        .record_comparison(&handle, ComparisonRecord::new(Pairing::new(), 0.5))
        .unwrap_err();
    assert_eq!(err, Error::RunClosed(RunId(4)));
}

#[test]
fn test_report_carries_match_details() {
    let (clock, aggregator) = manual();
    let a = common::sample(1, common::blob_minutiae(1, 1));
    let b = common::sample(2, common::blob_minutiae(2, 1));
    let result = AnchorMatcher::default().match_samples(&a, &b).unwrap();

    let handle = aggregator.begin_run(RunId(5));
    aggregator
        .record_comparison(
            &handle,
            ComparisonRecord::from_result(&result)
                .with_images(a.image_id(), b.image_id())
                .with_duration(Duration::from_millis(3)),
        )
        .unwrap();
    clock.advance(Duration::from_millis(10));
    let report = aggregator.end_run(&handle).unwrap();

    assert_eq!(report.scores.total_pairs, 12);
    assert_eq!(report.scores.mean, 1.0);
    assert_eq!(report.timing.count, 1);
    assert!((report.timing.mean_ms - 3.0).abs() < 1e-9);
    assert_eq!(report.comparisons[0].first_image, Some(a.image_id()));

    // Reports are plain data
    let yaml = serde_yaml::to_string(&report).unwrap();
    let parsed: anguli::TelemetryReport = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.execution_time, Duration::from_millis(10));
    assert_eq!(parsed.comparisons[0].pairing.len(), 12);
}
