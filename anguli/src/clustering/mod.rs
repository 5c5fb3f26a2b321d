//! Spatial clustering of minutiae.
//!
//! Two strategies are available through [`ClusteringConfig`]:
//! - `Radius`: leader clustering against running centroids (default)
//! - `FixedCount`: deterministic k-means seeded at the densest point
//!
//! Cluster centroids use the circular mean for orientation, so members at
//! 1° and 359° average to 0°.

mod config;
mod engine;
mod types;

pub use config::{ClusteringConfig, ClusteringStrategy};
pub use engine::{cluster, cluster_sample};
pub use types::{Cluster, ClusterId, ClusterMetrics};
