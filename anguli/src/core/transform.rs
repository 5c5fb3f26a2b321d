//! Rigid 2D transforms (rotation about the origin followed by translation).

use serde::{Deserialize, Serialize};

use super::math::{normalize_angle, signed_angle_diff};
use super::minutia::Minutia;
use super::point::Point2D;

/// Rotation + translation mapping sample A coordinates into sample B.
///
/// `p' = R(rotation) · p + (tx, ty)`, orientations shift by `rotation`.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Rotation in radians, `[-π, π)`
    pub rotation: f64,
    /// X translation (pixels)
    pub tx: f64,
    /// Y translation (pixels)
    pub ty: f64,
}

impl RigidTransform {
    /// Create a transform; `rotation` is wrapped into `[-π, π)`.
    pub fn new(rotation: f64, tx: f64, ty: f64) -> Self {
        Self {
            rotation: signed_angle_diff(0.0, rotation),
            tx,
            ty,
        }
    }

    /// The transform that leaves everything in place.
    pub const fn identity() -> Self {
        Self {
            rotation: 0.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Transform that maps `from` exactly onto `to`, position and orientation.
    ///
    /// This is the hypothesis implied by treating the two minutiae as the
    /// same physical feature.
    pub fn from_anchor(from: &Minutia, to: &Minutia) -> Self {
        let rotation = signed_angle_diff(from.theta, to.theta);
        let rotated = from.position().rotate(rotation);
        let target = to.position();
        Self {
            rotation,
            tx: target.x - rotated.x,
            ty: target.y - rotated.y,
        }
    }

    /// Translation component as a vector.
    #[inline]
    pub fn translation(&self) -> Point2D {
        Point2D::new(self.tx, self.ty)
    }

    /// Apply to a point.
    #[inline]
    pub fn apply_point(&self, p: Point2D) -> Point2D {
        p.rotate(self.rotation) + self.translation()
    }

    /// Apply to an orientation; result in `[0, 2π)`.
    #[inline]
    pub fn apply_angle(&self, theta: f64) -> f64 {
        normalize_angle(theta + self.rotation)
    }

    /// Inverse transform (maps B back onto A).
    pub fn inverse(&self) -> Self {
        let back = self.translation().rotate(-self.rotation);
        Self::new(-self.rotation, -back.x, -back.y)
    }

    /// Whether this is the identity within the given tolerances.
    pub fn is_identity(&self, translation_eps: f64, rotation_eps: f64) -> bool {
        self.rotation.abs() <= rotation_eps && self.translation().length() <= translation_eps
    }
}
