//! Continuous image-plane coordinates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Point in pixel space (f64, may be negative after a transform)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate (column, pixels)
    pub x: f64,
    /// Y coordinate (row, pixels)
    pub y: f64,
}

impl Point2D {
    /// Origin
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Create a new point
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin
    #[inline]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f64 {
        (*self - *other).length()
    }

    /// Squared distance (avoids the sqrt in nearest-centre searches)
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Rotate about the origin by `angle` radians (counter-clockwise)
    #[inline]
    pub fn rotate(&self, angle: f64) -> Point2D {
        let (sin, cos) = angle.sin_cos();
        Point2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Direction of the vector from `self` to `other`, in `[0, 2π)`
    #[inline]
    pub fn bearing_to(&self, other: &Point2D) -> f64 {
        let d = *other - *self;
        super::math::normalize_angle(d.y.atan2(d.x))
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scale: f64) -> Self {
        Point2D::new(self.x * scale, self.y * scale)
    }
}

/// Arithmetic mean of a set of points; `None` when empty.
pub fn mean_point<I>(points: I) -> Option<Point2D>
where
    I: IntoIterator<Item = Point2D>,
{
    let mut count = 0usize;
    let mut sum = Point2D::ZERO;
    for p in points {
        sum = sum + p;
        count += 1;
    }
    (count > 0).then(|| sum * (1.0 / count as f64))
}
