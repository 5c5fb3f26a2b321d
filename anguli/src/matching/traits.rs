//! Traits for minutiae matching algorithms.

use crate::core::Sample;
use crate::error::Result;

use super::MatchResult;

/// Trait for sample-to-sample matching algorithms.
///
/// Implemented by the whole-sample [`AnchorMatcher`](super::AnchorMatcher)
/// and the two-stage [`ClusterMatcher`](super::ClusterMatcher), so batch
/// execution can run either.
///
/// # Example
///
/// ```
/// use anguli::core::{ImageId, Minutia, MinutiaId, Sample};
/// use anguli::matching::{AnchorMatcher, MinutiaeMatcher};
///
/// fn same_finger<M: MinutiaeMatcher>(matcher: &M, a: &Sample, b: &Sample) -> bool {
///     matcher
///         .match_samples(a, b)
///         .map(|r| r.quality.is_acceptable())
///         .unwrap_or(false)
/// }
///
/// let m = Minutia::new(MinutiaId(1), ImageId(1), 20, 20, 1.0, true);
/// let a = Sample::new(ImageId(1), vec![m]).unwrap();
/// assert!(same_finger(&AnchorMatcher::default(), &a, &a));
/// ```
pub trait MinutiaeMatcher: Send + Sync {
    /// Compare two samples.
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) when
    /// either sample is empty.
    fn match_samples(&self, first: &Sample, second: &Sample) -> Result<MatchResult>;

    /// Name of this matcher for logging
    fn name(&self) -> &str;
}
