//! Matching and clustering benchmarks.
//!
//! Run with: `cargo bench`
//! View HTML reports in: `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use anguli::{
    AnchorMatcher, ClusterMatcher, ClusteringConfig, ImageId, MatcherConfig, Minutia, MinutiaId,
    MinutiaeMatcher, RigidTransform, Sample, cluster, match_minutiae,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Minutiae on a jittered grid inside a 500x500 print.
fn create_minutiae(image: u32, count: usize, seed: u64) -> Vec<Minutia> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    let side = (count as f64).sqrt().ceil() as u32;
    let step = 400 / side.max(1);
    (0..count as u32)
        .map(|i| {
            let x = 50 + (i % side) * step + next() % 8;
            let y = 50 + (i / side) * step + next() % 8;
            let theta = (next() % 6283) as f64 / 1000.0;
            Minutia::new(MinutiaId(i), ImageId(image), x, y, theta, next() % 2 == 0)
        })
        .collect()
}

/// Rotated and shifted copy, as a second impression of the same finger.
fn create_impression(source: &[Minutia], image: u32) -> Vec<Minutia> {
    let t = RigidTransform::new(0.12, 30.0, -10.0);
    source
        .iter()
        .map(|m| {
            let p = t.apply_point(m.position());
            Minutia::new(
                m.id,
                ImageId(image),
                p.x.round().max(0.0) as u32,
                p.y.round().max(0.0) as u32,
                t.apply_angle(m.theta),
                m.is_termination,
            )
        })
        .collect()
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_anchor_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor_matching");
    let exhaustive = MatcherConfig::default().with_early_termination(false);

    for count in [20usize, 40, 60] {
        let a = create_minutiae(1, count, 7);
        let b = create_impression(&a, 2);
        group.throughput(Throughput::Elements((count * count) as u64));

        group.bench_with_input(BenchmarkId::new("genuine", count), &count, |bench, _| {
            bench.iter(|| match_minutiae(black_box(&a), black_box(&b), &exhaustive))
        });

        let impostor = create_minutiae(3, count, 99);
        group.bench_with_input(BenchmarkId::new("impostor", count), &count, |bench, _| {
            bench.iter(|| match_minutiae(black_box(&a), black_box(&impostor), &exhaustive))
        });
    }

    group.finish();
}

fn bench_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");

    for count in [20usize, 40, 60] {
        let minutiae = create_minutiae(1, count, 11);
        group.bench_with_input(BenchmarkId::new("radius", count), &count, |bench, _| {
            bench.iter(|| cluster(black_box(&minutiae), &ClusteringConfig::default()))
        });
        group.bench_with_input(BenchmarkId::new("fixed_count", count), &count, |bench, _| {
            bench.iter(|| cluster(black_box(&minutiae), &ClusteringConfig::fixed_count(4)))
        });
    }

    group.finish();
}

fn bench_matchers(c: &mut Criterion) {
    let mut group = c.benchmark_group("matchers");

    let a = create_minutiae(1, 40, 5);
    let first = match Sample::new(ImageId(1), a.clone()) {
        Ok(s) => s,
        Err(e) => panic!("fixture: {e}"),
    };
    let second = match Sample::new(ImageId(2), create_impression(&a, 2)) {
        Ok(s) => s,
        Err(e) => panic!("fixture: {e}"),
    };

    let matchers: Vec<Box<dyn MinutiaeMatcher>> =
        vec![Box::new(AnchorMatcher::default()), Box::new(ClusterMatcher::default())];
    for matcher in &matchers {
        group.bench_function(matcher.name(), |bench| {
            bench.iter(|| matcher.match_samples(black_box(&first), black_box(&second)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_anchor_matching, bench_clustering, bench_matchers);
criterion_main!(benches);
