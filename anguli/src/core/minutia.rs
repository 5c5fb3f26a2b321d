//! Minutia point type and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::math::normalize_angle;
use super::point::Point2D;

/// Minutia identifier, unique within its owning image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinutiaId(pub u32);

impl fmt::Display for MinutiaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Image identifier (foreign key of the owning image).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img#{}", self.0)
    }
}

/// A detected fingerprint feature point.
///
/// Orientation is in radians, normalized to `[0, 2π)`. The image id is a
/// non-owning back-reference: images own minutiae, never the reverse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minutia {
    /// Identifier, unique within the image
    pub id: MinutiaId,
    /// Owning image
    pub image_id: ImageId,
    /// Column in pixels
    pub x: u32,
    /// Row in pixels
    pub y: u32,
    /// Ridge direction in radians, `[0, 2π)`
    pub theta: f64,
    /// Ridge ending (true) or bifurcation (false)
    pub is_termination: bool,
}

impl Minutia {
    /// Create a minutia, normalizing `theta` into `[0, 2π)`.
    pub fn new(
        id: MinutiaId,
        image_id: ImageId,
        x: u32,
        y: u32,
        theta: f64,
        is_termination: bool,
    ) -> Self {
        Self {
            id,
            image_id,
            x,
            y,
            theta: normalize_angle(theta),
            is_termination,
        }
    }

    /// Position as a continuous point.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x as f64, self.y as f64)
    }

    /// Euclidean distance to another minutia.
    #[inline]
    pub fn distance_to(&self, other: &Minutia) -> f64 {
        self.position().distance(&other.position())
    }

    /// Euclidean distance to an arbitrary point.
    #[inline]
    pub fn distance_to_point(&self, point: Point2D) -> f64 {
        self.position().distance(&point)
    }

    /// Polar angle of this minutia seen from `center`, in `[0, 2π)`.
    #[inline]
    pub fn polar_angle_from(&self, center: Point2D) -> f64 {
        center.bearing_to(&self.position())
    }

    /// Whether both minutiae are of the same type.
    #[inline]
    pub fn same_type(&self, other: &Minutia) -> bool {
        self.is_termination == other.is_termination
    }
}
