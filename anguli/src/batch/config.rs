//! Batch execution configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`BatchRunner`](super::BatchRunner).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker threads. 0 = available parallelism.
    #[serde(default)]
    pub workers: usize,

    /// Run-level timeout (milliseconds). Pairs not started before it
    /// expires are skipped and the run is reported incomplete.
    #[serde(default)]
    pub run_timeout_ms: Option<u64>,
}

impl BatchConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder-style setter for the run timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    /// Run timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.run_timeout_ms.map(Duration::from_millis)
    }

    /// Worker count with 0 resolved to the available parallelism.
    pub fn resolved_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_workers() {
        assert_eq!(BatchConfig::new().with_workers(3).resolved_workers(), 3);
        assert!(BatchConfig::new().resolved_workers() >= 1);
    }

    #[test]
    fn test_timeout_round_trip() {
        let config = BatchConfig::new().with_timeout(Some(Duration::from_millis(1500)));
        assert_eq!(config.run_timeout_ms, Some(1500));
        assert_eq!(config.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(BatchConfig::new().timeout(), None);
    }
}
