//! Core types for the Anguli library.
//!
//! ## Type Categories
//!
//! ### Identity
//! - [`MinutiaId`]: Minutia identifier, unique within one image
//! - [`ImageId`]: Owning image (non-owning back-reference from a minutia)
//!
//! ### Geometry
//! - [`Minutia`]: Ridge termination or bifurcation with position and direction
//! - [`Point2D`]: Continuous pixel coordinates
//! - [`RigidTransform`]: Rotation + translation between two samples
//!
//! ### Collections
//! - [`Sample`]: Validated minutia set of one image, with id lookup
//!
//! ## Conventions
//!
//! - Positions are integer pixels, non-negative
//! - Orientations are radians in `[0, 2π)`, counter-clockwise from +X
//!
//! ## Example
//!
//! ```rust
//! use anguli::core::{ImageId, Minutia, MinutiaId, RigidTransform, Sample};
//!
//! let a = Minutia::new(MinutiaId(1), ImageId(1), 10, 10, 0.0, true);
//! let b = Minutia::new(MinutiaId(1), ImageId(2), 15, 15, 0.0, true);
//!
//! let t = RigidTransform::from_anchor(&a, &b);
//! assert_eq!((t.tx, t.ty), (5.0, 5.0));
//!
//! let sample = Sample::new(ImageId(1), vec![a]).unwrap();
//! assert_eq!(sample.len(), 1);
//! ```

pub mod math;
mod minutia;
mod point;
mod sample;
mod transform;

pub use minutia::{ImageId, Minutia, MinutiaId};
pub use point::{Point2D, mean_point};
pub use sample::{Sample, validate_minutiae};
pub use transform::RigidTransform;
