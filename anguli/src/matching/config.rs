//! Matcher configuration types.

use serde::{Deserialize, Serialize};

use crate::core::math::deg_to_rad;

/// Configuration for the anchor-consensus minutiae matcher.
///
/// Two minutiae correspond under a transform when the transformed position
/// lies within `distance_tolerance` of the other and the orientations differ
/// by at most `angle_tolerance_deg`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Position tolerance (pixels).
    #[serde(default = "default_distance_tolerance")]
    pub distance_tolerance: f64,

    /// Orientation tolerance (degrees).
    #[serde(default = "default_angle_tolerance_deg")]
    pub angle_tolerance_deg: f64,

    /// Only pair terminations with terminations and bifurcations with
    /// bifurcations (anchors included).
    #[serde(default)]
    pub require_type_match: bool,

    /// Restrict anchors to the square of this half size (pixels) around each
    /// sample's centroid. `None` uses every minutia as a potential anchor.
    /// Falls back to all minutiae when the square is empty.
    #[serde(default)]
    pub anchor_region_half_size: Option<u32>,

    /// Stop searching once a hypothesis pairs `min(|A|, |B|)` minutiae.
    #[serde(default = "default_true")]
    pub early_termination: bool,

    /// Skip anchor pairs whose local neighbourhoods agree on less than this
    /// fraction of neighbours. `None` evaluates every anchor pair.
    #[serde(default)]
    pub local_similarity_threshold: Option<f64>,

    /// Nearest neighbours per local neighbourhood.
    #[serde(default = "default_local_neighbours")]
    pub local_neighbours: usize,

    /// Neighbour distance tolerance (pixels).
    #[serde(default = "default_local_distance_tolerance")]
    pub local_distance_tolerance: f64,

    /// Neighbour relative bearing tolerance (degrees).
    #[serde(default = "default_local_angle_tolerance_deg")]
    pub local_angle_tolerance_deg: f64,
}

fn default_distance_tolerance() -> f64 {
    15.0
}

fn default_angle_tolerance_deg() -> f64 {
    12.0
}

fn default_true() -> bool {
    true
}

fn default_local_neighbours() -> usize {
    6
}

fn default_local_distance_tolerance() -> f64 {
    7.0
}

fn default_local_angle_tolerance_deg() -> f64 {
    45.0
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            distance_tolerance: default_distance_tolerance(),
            angle_tolerance_deg: default_angle_tolerance_deg(),
            require_type_match: false,
            anchor_region_half_size: None,
            early_termination: true,
            local_similarity_threshold: None,
            local_neighbours: default_local_neighbours(),
            local_distance_tolerance: default_local_distance_tolerance(),
            local_angle_tolerance_deg: default_local_angle_tolerance_deg(),
        }
    }
}

impl MatcherConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the position tolerance.
    pub fn with_distance_tolerance(mut self, pixels: f64) -> Self {
        self.distance_tolerance = pixels;
        self
    }

    /// Builder-style setter for the orientation tolerance.
    pub fn with_angle_tolerance_deg(mut self, degrees: f64) -> Self {
        self.angle_tolerance_deg = degrees;
        self
    }

    /// Builder-style setter for type matching.
    pub fn with_type_match(mut self, required: bool) -> Self {
        self.require_type_match = required;
        self
    }

    /// Builder-style setter for the anchor region.
    pub fn with_anchor_region(mut self, half_size: Option<u32>) -> Self {
        self.anchor_region_half_size = half_size;
        self
    }

    /// Builder-style setter for early termination.
    pub fn with_early_termination(mut self, enabled: bool) -> Self {
        self.early_termination = enabled;
        self
    }

    /// Builder-style setter for the local neighbourhood prefilter.
    pub fn with_local_filter(mut self, threshold: Option<f64>) -> Self {
        self.local_similarity_threshold = threshold;
        self
    }

    /// Orientation tolerance in radians.
    #[inline]
    pub fn angle_tolerance(&self) -> f64 {
        deg_to_rad(self.angle_tolerance_deg)
    }

    /// Neighbour bearing tolerance in radians.
    #[inline]
    pub fn local_angle_tolerance(&self) -> f64 {
        deg_to_rad(self.local_angle_tolerance_deg)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.distance_tolerance.is_finite() && self.distance_tolerance >= 0.0) {
            return Err(format!(
                "distance_tolerance must be >= 0, got {}",
                self.distance_tolerance
            ));
        }
        if !(0.0..=180.0).contains(&self.angle_tolerance_deg) {
            return Err(format!(
                "angle_tolerance_deg must be in [0, 180], got {}",
                self.angle_tolerance_deg
            ));
        }
        if let Some(threshold) = self.local_similarity_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(format!(
                    "local_similarity_threshold must be in [0, 1], got {}",
                    threshold
                ));
            }
        }
        if self.local_similarity_threshold.is_some() && self.local_neighbours == 0 {
            return Err("local_neighbours must be > 0 when the local filter is on".to_string());
        }
        if !(self.local_distance_tolerance.is_finite() && self.local_distance_tolerance > 0.0) {
            return Err(format!(
                "local_distance_tolerance must be > 0, got {}",
                self.local_distance_tolerance
            ));
        }
        if !(self.local_angle_tolerance_deg > 0.0 && self.local_angle_tolerance_deg <= 180.0) {
            return Err(format!(
                "local_angle_tolerance_deg must be in (0, 180], got {}",
                self.local_angle_tolerance_deg
            ));
        }
        Ok(())
    }
}

/// Configuration for two-stage cluster matching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterMatchConfig {
    /// Minimum radial profile overlap for a cluster pair to be matched fine.
    #[serde(default = "default_min_profile_overlap")]
    pub min_profile_overlap: f64,

    /// Minimum cluster pairs that must agree on the coarse alignment,
    /// counting the pair that proposed it. At 1 a single lone cluster pair
    /// can carry a match on its own; 2 requires independent support.
    #[serde(default = "default_min_cluster_pairs")]
    pub min_cluster_pairs: usize,

    /// Minimum fine score within a cluster pair for its members to be paired.
    #[serde(default = "default_min_cluster_score")]
    pub min_cluster_score: f64,
}

fn default_min_profile_overlap() -> f64 {
    0.25
}

fn default_min_cluster_pairs() -> usize {
    2
}

fn default_min_cluster_score() -> f64 {
    0.25
}

impl Default for ClusterMatchConfig {
    fn default() -> Self {
        Self {
            min_profile_overlap: default_min_profile_overlap(),
            min_cluster_pairs: default_min_cluster_pairs(),
            min_cluster_score: default_min_cluster_score(),
        }
    }
}

impl ClusterMatchConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_cluster_pairs == 0 {
            return Err("min_cluster_pairs must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_profile_overlap) {
            return Err(format!(
                "min_profile_overlap must be in [0, 1], got {}",
                self.min_profile_overlap
            ));
        }
        if !(0.0..=1.0).contains(&self.min_cluster_score) {
            return Err(format!(
                "min_cluster_score must be in [0, 1], got {}",
                self.min_cluster_score
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatcherConfig::default();
        assert_eq!(config.distance_tolerance, 15.0);
        assert_eq!(config.angle_tolerance_deg, 12.0);
        assert!(config.early_termination);
        assert!(config.anchor_region_half_size.is_none());
        assert!((config.angle_tolerance() - 12f64.to_radians()).abs() < 1e-12);
        assert!(config.local_similarity_threshold.is_none());
        assert_eq!(config.local_neighbours, 6);
        assert_eq!(config.local_distance_tolerance, 7.0);
        assert_eq!(config.local_angle_tolerance_deg, 45.0);
        assert_eq!(ClusterMatchConfig::default().min_cluster_pairs, 2);
    }

    #[test]
    fn test_partial_yaml() {
        let config: MatcherConfig =
            serde_yaml::from_str("require_type_match: true\nanchor_region_half_size: 75\n")
                .unwrap();
        assert!(config.require_type_match);
        assert_eq!(config.anchor_region_half_size, Some(75));
        assert_eq!(config.distance_tolerance, 15.0);
    }

    #[test]
    fn test_validate() {
        assert!(MatcherConfig::new().validate().is_ok());
        assert!(MatcherConfig::new().with_distance_tolerance(-1.0).validate().is_err());
        assert!(MatcherConfig::new().with_angle_tolerance_deg(200.0).validate().is_err());
        assert!(MatcherConfig::new().with_local_filter(Some(0.3)).validate().is_ok());
        assert!(MatcherConfig::new().with_local_filter(Some(1.2)).validate().is_err());
        let no_neighbours = MatcherConfig {
            local_neighbours: 0,
            ..MatcherConfig::new().with_local_filter(Some(0.3))
        };
        assert!(no_neighbours.validate().is_err());

        let none_required = ClusterMatchConfig {
            min_cluster_pairs: 0,
            ..Default::default()
        };
        assert!(none_required.validate().is_err());

        let bad = ClusterMatchConfig {
            min_cluster_score: 1.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
