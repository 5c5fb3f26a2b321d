//! Validated per-image minutia sets.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::math::normalize_angle;
use super::minutia::{ImageId, Minutia, MinutiaId};
use super::point::{Point2D, mean_point};
use crate::error::{Error, Result};

/// Check that a minutia set is consistent.
///
/// Every minutia must reference `image_id`, ids must be unique and
/// orientations finite. `image_id` of `None` takes the first minutia's image.
pub fn validate_minutiae(image_id: Option<ImageId>, minutiae: &[Minutia]) -> Result<()> {
    let Some(expected) = image_id.or_else(|| minutiae.first().map(|m| m.image_id)) else {
        return Ok(());
    };

    let mut seen = HashSet::with_capacity(minutiae.len());
    for m in minutiae {
        if m.image_id != expected {
            return Err(Error::invalid(format!(
                "minutia {} references {} but belongs to a set of {}",
                m.id, m.image_id, expected
            )));
        }
        if !m.theta.is_finite() {
            return Err(Error::invalid(format!(
                "minutia {} of {} has non-finite orientation",
                m.id, expected
            )));
        }
        if !seen.insert(m.id) {
            return Err(Error::invalid(format!(
                "duplicate minutia id {} in {}",
                m.id, expected
            )));
        }
    }
    Ok(())
}

/// All minutiae of one fingerprint image.
///
/// Constructed through [`Sample::new`], which validates the set once, so the
/// clustering and matching entry points taking a `Sample` skip revalidation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawSample", into = "RawSample")]
pub struct Sample {
    image_id: ImageId,
    minutiae: Vec<Minutia>,
    index: HashMap<MinutiaId, usize>,
}

impl Sample {
    /// Validate and wrap a minutia set. Orientations are re-normalized.
    pub fn new(image_id: ImageId, minutiae: Vec<Minutia>) -> Result<Self> {
        validate_minutiae(Some(image_id), &minutiae)?;

        let minutiae: Vec<Minutia> = minutiae
            .into_iter()
            .map(|m| Minutia {
                theta: normalize_angle(m.theta),
                ..m
            })
            .collect();
        let index = minutiae
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id, i))
            .collect();

        Ok(Self {
            image_id,
            minutiae,
            index,
        })
    }

    /// Image these minutiae belong to.
    pub fn image_id(&self) -> ImageId {
        self.image_id
    }

    /// Minutiae in input order.
    pub fn minutiae(&self) -> &[Minutia] {
        &self.minutiae
    }

    /// Number of minutiae.
    pub fn len(&self) -> usize {
        self.minutiae.len()
    }

    /// True when the image has no minutiae.
    pub fn is_empty(&self) -> bool {
        self.minutiae.is_empty()
    }

    /// Look up a minutia by id.
    pub fn get(&self, id: MinutiaId) -> Option<&Minutia> {
        self.index.get(&id).map(|&i| &self.minutiae[i])
    }

    /// Arithmetic mean of all positions; `None` for an empty sample.
    pub fn centroid(&self) -> Option<Point2D> {
        mean_point(self.minutiae.iter().map(Minutia::position))
    }
}

/// Serialized shape of a [`Sample`] (the id index is rebuilt on load).
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawSample {
    image_id: ImageId,
    minutiae: Vec<Minutia>,
}

impl TryFrom<RawSample> for Sample {
    type Error = Error;

    fn try_from(raw: RawSample) -> Result<Self> {
        Sample::new(raw.image_id, raw.minutiae)
    }
}

impl From<Sample> for RawSample {
    fn from(sample: Sample) -> Self {
        RawSample {
            image_id: sample.image_id,
            minutiae: sample.minutiae,
        }
    }
}
