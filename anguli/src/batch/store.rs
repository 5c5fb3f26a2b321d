//! Explicit image lookup for batch runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::{ImageId, Minutia, Sample};
use crate::error::{Error, Result};

/// An ordered comparison request: probe first, candidate second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImagePair {
    /// Probe image
    pub first: ImageId,
    /// Candidate image
    pub second: ImageId,
}

impl ImagePair {
    /// Create a pair.
    pub fn new(first: ImageId, second: ImageId) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for ImagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}

/// `ImageId → Sample` map shared read-only by batch workers.
#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    samples: HashMap<ImageId, Sample>,
}

impl ImageStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from samples; a later sample replaces an earlier one with the
    /// same image id.
    pub fn from_samples<I: IntoIterator<Item = Sample>>(samples: I) -> Self {
        let mut store = Self::new();
        for sample in samples {
            store.insert(sample);
        }
        store
    }

    /// Group a flat minutia table by image and validate each group.
    pub fn from_minutiae<I: IntoIterator<Item = Minutia>>(minutiae: I) -> Result<Self> {
        let mut grouped: HashMap<ImageId, Vec<Minutia>> = HashMap::new();
        for m in minutiae {
            grouped.entry(m.image_id).or_default().push(m);
        }

        let mut store = Self::new();
        for (image_id, group) in grouped {
            store.insert(Sample::new(image_id, group)?);
        }
        Ok(store)
    }

    /// Add or replace a sample; returns the replaced one.
    pub fn insert(&mut self, sample: Sample) -> Option<Sample> {
        self.samples.insert(sample.image_id(), sample)
    }

    /// Look up an image.
    pub fn get(&self, id: ImageId) -> Option<&Sample> {
        self.samples.get(&id)
    }

    /// Look up an image, failing with [`Error::InvalidInput`] when absent.
    pub fn require(&self, id: ImageId) -> Result<&Sample> {
        self.get(id)
            .ok_or_else(|| Error::invalid(format!("unknown image {id}")))
    }

    /// Whether the image is present.
    pub fn contains(&self, id: ImageId) -> bool {
        self.samples.contains_key(&id)
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when no image is stored.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Image ids in ascending order.
    pub fn image_ids(&self) -> Vec<ImageId> {
        let mut ids: Vec<ImageId> = self.samples.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Every ordered pair of distinct images (probe-major, ascending ids).
    pub fn all_pairs(&self) -> Vec<ImagePair> {
        let ids = self.image_ids();
        ids.iter()
            .flat_map(|&a| {
                ids.iter()
                    .filter(move |&&b| b != a)
                    .map(move |&b| ImagePair::new(a, b))
            })
            .collect()
    }
}
