//! Room model.

use serde::{Deserialize, Serialize};

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Seats available.
    pub capacity: u32,
    /// Feature tags (projector, lab, ...). Not scored.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Room {
    /// Creates a room with the given capacity.
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
            features: Vec::new(),
        }
    }

    /// Adds a feature tag.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Whether a class of `size` students fits.
    #[inline]
    pub fn fits(&self, size: u32) -> bool {
        size <= self.capacity
    }
}
