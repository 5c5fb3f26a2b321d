//! Batch execution of test runs.
//!
//! A test run is an ordered list of [`ImagePair`]s resolved against an
//! [`ImageStore`]. [`BatchRunner`] spreads the pairs over a worker pool,
//! records every successful comparison into the run's telemetry and returns
//! one [`PairOutcome`] per pair.
//!
//! ```
//! use std::sync::Arc;
//! use anguli::batch::{BatchConfig, BatchRunner, ImagePair, ImageStore};
//! use anguli::core::{ImageId, Minutia, MinutiaId, Sample};
//! use anguli::matching::AnchorMatcher;
//! use anguli::telemetry::{RunId, TelemetryAggregator};
//!
//! let m = |img| Minutia::new(MinutiaId(1), ImageId(img), 30, 40, 0.5, true);
//! let store = ImageStore::from_samples([
//!     Sample::new(ImageId(1), vec![m(1)]).unwrap(),
//!     Sample::new(ImageId(2), vec![m(2)]).unwrap(),
//! ]);
//!
//! let runner = BatchRunner::new(
//!     Arc::new(AnchorMatcher::default()),
//!     Arc::new(TelemetryAggregator::with_system_clock()),
//!     BatchConfig::default(),
//! );
//! let outcome = runner
//!     .run(RunId(1), &store, &[ImagePair::new(ImageId(1), ImageId(2))])
//!     .unwrap();
//! assert_eq!(outcome.matched(), 1);
//! ```

mod config;
mod runner;
mod store;

pub use config::BatchConfig;
pub use runner::{BatchOutcome, BatchRunner, PairOutcome};
pub use store::{ImagePair, ImageStore};
