//! Synthetic end-to-end run.
//!
//! Builds a small gallery of fingers with two impressions each, matches
//! every ordered pair on the worker pool and prints the telemetry summary
//! and per-probe verdicts.
//!
//! ```sh
//! cargo run --example synthetic_run -- [config.yaml] [--cluster]
//! ```

use std::path::Path;
use std::sync::Arc;

use anguli::{
    AnguliConfig, BatchRunner, ImageId, ImageStore, Minutia, MinutiaId, MinutiaeMatcher,
    RigidTransform, RunId, Sample, TelemetryAggregator,
};

const FINGERS: u32 = 5;
const MINUTIAE_PER_FINGER: u32 = 30;

/// Pseudo-random minutiae for one finger, spread over a 400x400 area.
fn finger(image: u32, seed: u64) -> Vec<Minutia> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    let mut out: Vec<Minutia> = Vec::new();
    while out.len() < MINUTIAE_PER_FINGER as usize {
        let x = 100 + next() % 400;
        let y = 100 + next() % 400;
        // Keep minutiae apart so impressions stay unambiguous
        if out
            .iter()
            .any(|m| m.x.abs_diff(x) < 30 && m.y.abs_diff(y) < 30)
        {
            continue;
        }
        let theta = (next() % 6283) as f64 / 1000.0;
        out.push(Minutia::new(
            MinutiaId(out.len() as u32),
            ImageId(image),
            x,
            y,
            theta,
            next() % 2 == 0,
        ));
    }
    out
}

fn impression(source: &[Minutia], image: u32, transform: &RigidTransform) -> Vec<Minutia> {
    source
        .iter()
        .map(|m| {
            let p = transform.apply_point(m.position());
            Minutia::new(
                m.id,
                ImageId(image),
                p.x.round().max(0.0) as u32,
                p.y.round().max(0.0) as u32,
                transform.apply_angle(m.theta),
                m.is_termination,
            )
        })
        .collect()
}

fn build_store() -> Result<ImageStore, anguli::Error> {
    let mut store = ImageStore::new();
    for f in 1..=FINGERS {
        let first = 10 * f + 1;
        let second = 10 * f + 2;
        let base = finger(first, 1000 + f as u64);
        let shift = RigidTransform::new(0.03 * f as f64, 12.0, 8.0);
        store.insert(Sample::new(ImageId(first), impression(&base, first, &RigidTransform::identity()))?);
        store.insert(Sample::new(ImageId(second), impression(&base, second, &shift))?);
    }
    Ok(store)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let use_cluster = args.iter().any(|a| a == "--cluster");
    let config = match args.iter().skip(1).find(|a| !a.starts_with("--")) {
        Some(path) => AnguliConfig::load(Path::new(path))?,
        None => AnguliConfig::load_default().unwrap_or_else(|e| {
            log::warn!("Using built-in defaults: {}", e);
            AnguliConfig::default()
        }),
    };

    let matcher: Arc<dyn MinutiaeMatcher> = if use_cluster {
        Arc::new(config.cluster_matcher())
    } else {
        Arc::new(config.anchor_matcher())
    };

    let store = build_store()?;
    let pairs = store.all_pairs();
    log::info!("{} images, {} pairs", store.len(), pairs.len());

    let runner = BatchRunner::new(
        matcher,
        Arc::new(TelemetryAggregator::with_system_clock()),
        config.batch_config(),
    );
    let outcome = runner.run(RunId(1), &store, &pairs)?;

    match &outcome.telemetry {
        Ok(report) => {
            println!("{}", report.summary());
            println!("{}", report.timing.summary());
        }
        Err(e) => println!("telemetry unavailable: {e}"),
    }

    println!("\nVerdicts:");
    for verdict in outcome.verdicts(&config.verdict).values() {
        println!(
            "  {:>4}  pos {:.3}  mean {:.3}  {}/{}  {}",
            verdict.probe.to_string(),
            verdict.aggregate.normalized_positive,
            verdict.aggregate.normalized_mean,
            verdict.aggregate.positives,
            verdict.aggregate.count,
            if verdict.accepted { "accept" } else { "reject" }
        );
    }

    Ok(())
}
