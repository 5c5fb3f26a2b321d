//! Angle utilities.
//!
//! Minutia orientations are radians in `[0, 2π)`, counter-clockwise from the
//! image +X axis. Image Y grows downward, which only flips the visual sense of
//! rotation; all formulas here are frame-agnostic.

use std::f64::consts::PI;

/// Two times PI (full circle in radians).
pub const TWO_PI: f64 = 2.0 * PI;

/// Resultant vectors shorter than this have no meaningful direction.
const MIN_RESULTANT: f64 = 1e-12;

/// Normalize angle to `[0, 2π)`.
///
/// # Example
/// ```
/// use anguli::core::math::{normalize_angle, TWO_PI};
/// use std::f64::consts::PI;
///
/// assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
/// assert!(normalize_angle(TWO_PI).abs() < 1e-12);
/// ```
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TWO_PI);
    // rem_euclid of a tiny negative value rounds up to exactly 2π
    if a >= TWO_PI { 0.0 } else { a }
}

/// Signed shortest rotation from `from` to `to`, in `[-π, π)`.
///
/// Positive result means counter-clockwise rotation from `from` to `to`.
#[inline]
pub fn signed_angle_diff(from: f64, to: f64) -> f64 {
    let d = normalize_angle(to - from);
    if d >= PI { d - TWO_PI } else { d }
}

/// Absolute shortest angular distance between two angles, in `[0, π]`.
///
/// Handles wrap-around: `angle_diff(1°, 359°)` is `2°`.
#[inline]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let d = normalize_angle(a - b);
    d.min(TWO_PI - d)
}

/// Circular mean of a set of angles.
///
/// Sums the unit vectors `(cos θ, sin θ)` and takes the direction of the
/// resultant. Arithmetic averaging is wrong near the wrap-around boundary:
/// the mean of 1° and 359° is 0°, not 180°.
///
/// Returns `0.0` for an empty set or when the vectors cancel out.
///
/// # Example
/// ```
/// use anguli::core::math::{angle_diff, circular_mean};
///
/// let mean = circular_mean([1f64.to_radians(), 359f64.to_radians()]);
/// assert!(angle_diff(mean, 0.0) < 1e-9);
/// ```
pub fn circular_mean<I>(angles: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum_sin, sum_cos) = angles
        .into_iter()
        .fold((0.0, 0.0), |(s, c), theta| (s + theta.sin(), c + theta.cos()));

    if sum_sin.hypot(sum_cos) < MIN_RESULTANT {
        return 0.0;
    }
    normalize_angle(sum_sin.atan2(sum_cos))
}

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}
