//! Main AnguliConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::clustering::ClusteringConfig;
use crate::evaluation::VerdictConfig;
use crate::matching::{AnchorMatcher, ClusterMatchConfig, ClusterMatcher, MatcherConfig};

use super::error::ConfigLoadError;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/anguli.yaml";

/// Full Anguli configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct AnguliConfig {
    /// Clustering settings
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Correspondence matcher settings
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Two-stage cluster matching settings
    #[serde(default)]
    pub cluster_matching: ClusterMatchConfig,

    /// Batch execution settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Probe verdict thresholds
    #[serde(default)]
    pub verdict: VerdictConfig,
}

impl AnguliConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/anguli.yaml), or defaults
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let section = |name: &str, r: Result<(), String>| {
            r.map_err(|msg| ConfigLoadError::Invalid(format!("{name}: {msg}")))
        };
        section("clustering", self.clustering.validate())?;
        section("matcher", self.matcher.validate())?;
        section("cluster_matching", self.cluster_matching.validate())?;
        section("verdict", self.verdict.validate())?;
        Ok(())
    }

    /// Whole-sample matcher
    pub fn anchor_matcher(&self) -> AnchorMatcher {
        AnchorMatcher::new(self.matcher.clone())
    }

    /// Two-stage cluster matcher
    pub fn cluster_matcher(&self) -> ClusterMatcher {
        ClusterMatcher::new(
            self.clustering.clone(),
            self.matcher.clone(),
            self.cluster_matching.clone(),
        )
    }

    /// Get the batch config
    pub fn batch_config(&self) -> BatchConfig {
        self.batch.clone()
    }
}
