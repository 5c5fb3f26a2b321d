//! # Anguli
//!
//! Fingerprint minutiae clustering, correspondence matching and test-run
//! telemetry.
//!
//! ## Overview
//!
//! Minutiae arrive already extracted: ridge terminations and bifurcations
//! with an integer pixel position and an orientation. Anguli
//!
//! - groups one image's minutiae into spatial **clusters** with
//!   circular-mean centroids,
//! - compares two samples by searching rigid-transform **anchor hypotheses**
//!   and returns an explicit one-to-one pairing plus a score,
//! - optionally compares cluster-to-cluster first (two-stage matching),
//! - runs batches of comparisons on a worker pool and aggregates wall-clock
//!   **telemetry** per test run.
//!
//! ## Quick Start
//!
//! ```rust
//! use anguli::{ImageId, Minutia, MinutiaId, MatcherConfig, match_minutiae};
//!
//! let a = vec![
//!     Minutia::new(MinutiaId(1), ImageId(1), 10, 10, 0.0, true),
//!     Minutia::new(MinutiaId(2), ImageId(1), 40, 20, 0.5, false),
//! ];
//! let b = vec![
//!     Minutia::new(MinutiaId(101), ImageId(2), 15, 15, 0.0, true),
//!     Minutia::new(MinutiaId(102), ImageId(2), 45, 25, 0.5, false),
//! ];
//!
//! let result = match_minutiae(&a, &b, &MatcherConfig::default())?;
//! assert_eq!(result.score, 1.0);
//! # Ok::<(), anguli::Error>(())
//! ```
//!
//! ## Coordinate System
//!
//! - X: image column, Y: image row (pixels, non-negative)
//! - Theta: radians in `[0, 2π)`, counter-clockwise from +X

#![warn(missing_docs)]

// Core types
pub mod core;

// Spatial clustering
pub mod clustering;

// Correspondence matching
pub mod matching;

// Run telemetry
pub mod telemetry;

// Parallel test runs
pub mod batch;

// Score aggregation and verdicts
pub mod evaluation;

// Unified configuration
pub mod config;

mod error;

pub use error::{Error, Result};

// Re-export commonly used types
pub use crate::core::{ImageId, Minutia, MinutiaId, Point2D, RigidTransform, Sample};

pub use clustering::{Cluster, ClusterId, ClusterMetrics, ClusteringConfig, cluster, cluster_sample};

pub use matching::{
    AnchorMatcher, ClusterMatchConfig, ClusterMatchResult, ClusterMatcher, MatchQuality,
    MatchResult, MatcherConfig, MinutiaPair, MinutiaeMatcher, Pairing, match_minutiae,
};

pub use telemetry::{
    Clock, ComparisonRecord, ManualClock, RunHandle, RunId, SystemClock, TelemetryAggregator,
    TelemetryReport,
};

pub use batch::{BatchConfig, BatchOutcome, BatchRunner, ImagePair, ImageStore, PairOutcome};

pub use evaluation::{GroupAggregate, Verdict, VerdictConfig};

pub use config::{AnguliConfig, ConfigLoadError};
