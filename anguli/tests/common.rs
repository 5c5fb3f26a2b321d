//! Test utilities for Anguli.
//!
//! Deterministic synthetic fingerprints and rigid transforms.

#![allow(dead_code)]

use anguli::core::math::TWO_PI;
use anguli::{ImageId, Minutia, MinutiaId, Point2D, RigidTransform, Sample};

/// Pivot used for synthetic rotations (center of the synthetic print area).
pub const PIVOT: Point2D = Point2D::new(250.0, 250.0);

/// Simple LCG PRNG for reproducibility.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * (self.next_u32() as f64 / (1u64 << 31) as f64)
    }
}

/// Random minutiae in `[100, 400)²` with at least `min_spacing` pixels
/// between any two. Ids are `id_base..`.
pub fn synthetic_minutiae(
    image: u32,
    count: usize,
    min_spacing: f64,
    seed: u64,
    id_base: u32,
) -> Vec<Minutia> {
    let mut rng = Lcg::new(seed);
    let mut out: Vec<Minutia> = Vec::with_capacity(count);
    let mut attempts = 0;

    while out.len() < count && attempts < 100_000 {
        attempts += 1;
        let x = rng.uniform(100.0, 400.0) as u32;
        let y = rng.uniform(100.0, 400.0) as u32;
        let candidate = Point2D::new(x as f64, y as f64);
        if out
            .iter()
            .any(|m| m.distance_to_point(candidate) < min_spacing)
        {
            continue;
        }
        let theta = rng.uniform(0.0, TWO_PI);
        let is_termination = rng.next_u32() % 2 == 0;
        out.push(Minutia::new(
            MinutiaId(id_base + out.len() as u32),
            ImageId(image),
            x,
            y,
            theta,
            is_termination,
        ));
    }
    assert_eq!(out.len(), count, "could not place {count} minutiae");
    out
}

/// Transform rotating by `rotation` about [`PIVOT`], then translating.
pub fn pivot_transform(rotation: f64, tx: f64, ty: f64) -> RigidTransform {
    let rotated_pivot = PIVOT.rotate(rotation);
    RigidTransform::new(rotation, PIVOT.x - rotated_pivot.x + tx, PIVOT.y - rotated_pivot.y + ty)
}

/// Copy of `source` under `transform`, rounded to whole pixels, re-labelled
/// to `image` with ids shifted by `id_offset`.
pub fn transformed_copy(
    source: &[Minutia],
    image: u32,
    transform: &RigidTransform,
    id_offset: u32,
) -> Vec<Minutia> {
    source
        .iter()
        .map(|m| {
            let p = transform.apply_point(m.position());
            assert!(p.x >= 0.0 && p.y >= 0.0, "transform left the image");
            Minutia::new(
                MinutiaId(m.id.0 + id_offset),
                ImageId(image),
                p.x.round() as u32,
                p.y.round() as u32,
                transform.apply_angle(m.theta),
                m.is_termination,
            )
        })
        .collect()
}

/// Three well-separated blobs of four minutiae each.
///
/// Blob members sit within 15 px of their blob center and at least 14 px
/// apart; blob centers are more than 150 px apart.
pub fn blob_minutiae(image: u32, id_base: u32) -> Vec<Minutia> {
    let centers = [(120u32, 120u32), (360, 140), (230, 360)];
    let offsets: [(i32, i32); 4] = [(0, 0), (14, 0), (0, 14), (-10, -10)];
    let thetas = [0.3, 1.9, 3.4, 5.2, 2.0, 0.4, 5.5, 3.1, 4.4, 2.9, 0.8, 1.6];

    let mut out = Vec::new();
    for (b, &(cx, cy)) in centers.iter().enumerate() {
        for (k, &(dx, dy)) in offsets.iter().enumerate() {
            let i = b * offsets.len() + k;
            out.push(Minutia::new(
                MinutiaId(id_base + i as u32),
                ImageId(image),
                (cx as i32 + dx) as u32,
                (cy as i32 + dy) as u32,
                thetas[i],
                i % 3 != 0,
            ));
        }
    }
    out
}

/// Wrap minutiae in a validated sample.
pub fn sample(image: u32, minutiae: Vec<Minutia>) -> Sample {
    Sample::new(ImageId(image), minutiae).unwrap()
}
