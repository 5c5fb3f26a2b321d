//! Minutiae correspondence matching.
//!
//! ## Pipeline
//!
//! ```text
//!  minutiae A, minutiae B
//!        │
//!        ▼
//!  ┌────────────────────┐   every (mA, mB) anchor → rigid transform,
//!  │ Anchor hypotheses  │   optionally pruned by local neighbourhoods
//!  └────────────────────┘
//!        │
//!        ▼
//!  ┌────────────────────┐   greedy one-to-one pairs within 15 px / 12°
//!  │ Consensus per hyp. │
//!  └────────────────────┘
//!        │
//!        ▼
//!  MatchResult { pairing, score = |pairing| / max(|A|, |B|), transform }
//! ```
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`match_minutiae`] | Whole-set consensus matching |
//! | [`AnchorMatcher`] | Same, behind [`MinutiaeMatcher`] |
//! | [`ClusterMatcher`] | Coarse alignment voted by cluster pairs, then member matching |
//!
//! Empty inputs are an error ([`Error::InvalidInput`](crate::Error::InvalidInput)),
//! never a score of 0.

mod anchor;
mod assign;
mod cluster_match;
mod config;
mod local;
mod traits;
mod types;

pub use anchor::{AnchorMatcher, match_minutiae};
pub use cluster_match::{ClusterMatchResult, ClusterMatcher, ClusterPairing};
pub use config::{ClusterMatchConfig, MatcherConfig};
pub use traits::MinutiaeMatcher;
pub use types::{MatchQuality, MatchResult, MinutiaPair, Pairing, similarity_score};
