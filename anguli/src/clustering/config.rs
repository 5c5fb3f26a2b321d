//! Clustering configuration types.

use serde::{Deserialize, Serialize};

/// How minutiae are grouped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClusteringStrategy {
    /// Leader clustering: join the nearest cluster whose running centroid is
    /// within `threshold` pixels, otherwise start a new cluster.
    Radius {
        /// Maximum distance from a cluster centroid (pixels)
        #[serde(default = "default_radius")]
        threshold: f64,
    },
    /// Deterministic k-means with farthest-point seeding.
    FixedCount {
        /// Number of clusters (capped at the number of minutiae)
        #[serde(default = "default_cluster_count")]
        count: usize,
        /// Upper bound on Lloyd iterations
        #[serde(default = "default_max_iterations")]
        max_iterations: usize,
    },
}

impl Default for ClusteringStrategy {
    fn default() -> Self {
        ClusteringStrategy::Radius {
            threshold: default_radius(),
        }
    }
}

/// Configuration for the clustering engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Grouping strategy
    #[serde(default)]
    pub strategy: ClusteringStrategy,
}

fn default_radius() -> f64 {
    48.0 // ~5 ridge periods at 500 dpi
}

fn default_cluster_count() -> usize {
    3
}

fn default_max_iterations() -> usize {
    20
}

impl ClusteringConfig {
    /// Leader clustering with the given radius.
    pub fn radius(threshold: f64) -> Self {
        Self {
            strategy: ClusteringStrategy::Radius { threshold },
        }
    }

    /// K-means with a fixed number of clusters.
    pub fn fixed_count(count: usize) -> Self {
        Self {
            strategy: ClusteringStrategy::FixedCount {
                count,
                max_iterations: default_max_iterations(),
            },
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        match self.strategy {
            ClusteringStrategy::Radius { threshold } => {
                if !(threshold.is_finite() && threshold > 0.0) {
                    return Err(format!("clustering threshold must be > 0, got {threshold}"));
                }
            }
            ClusteringStrategy::FixedCount { count, .. } => {
                if count == 0 {
                    return Err("clustering count must be at least 1".to_string());
                }
            }
        }
        Ok(())
    }
}
