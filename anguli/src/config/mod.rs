//! Unified configuration loading for Anguli.
//!
//! Loads all tunables from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anguli::config::AnguliConfig;
//!
//! // Load from default path (configs/anguli.yaml), falling back to defaults
//! let config = AnguliConfig::load_default()?;
//!
//! // Build runtime objects
//! let matcher = config.anchor_matcher();
//! let batch = config.batch_config();
//! # Ok::<(), anguli::config::ConfigLoadError>(())
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | `clustering` | Radius or fixed-count strategy |
//! | `matcher` | Tolerances, type matching, anchor region |
//! | `cluster_matching` | Coarse gate and acceptance thresholds |
//! | `batch` | Worker count, run timeout |
//! | `verdict` | Probe acceptance bounds |
//!
//! ## Example YAML
//!
//! ```yaml
//! clustering:
//!   strategy:
//!     mode: radius
//!     threshold: 48.0
//! matcher:
//!   distance_tolerance: 15.0   # pixels
//!   angle_tolerance_deg: 12.0
//!   anchor_region_half_size: 75
//! batch:
//!   workers: 0                 # 0 = all cores
//! ```

mod anguli;
mod error;

pub use anguli::{AnguliConfig, DEFAULT_CONFIG_PATH};
pub use error::ConfigLoadError;
