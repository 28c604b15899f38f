//! Timeslot model.
//!
//! A timeslot is an opaque identifier such as `"Mon_09:00"`. The search
//! engine treats it as atomic; the day/period split is only used by
//! reporting.

use serde::{Deserialize, Serialize};

/// A bookable timeslot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeslot {
    /// Identifier, conventionally `<day>_<period>`.
    pub id: String,
}

impl Timeslot {
    /// Creates a timeslot.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Day component (text before the first `_`, or the whole id).
    pub fn day(&self) -> &str {
        self.id.split_once('_').map_or(self.id.as_str(), |(d, _)| d)
    }

    /// Period component (text after the first `_`), if any.
    pub fn period(&self) -> Option<&str> {
        self.id.split_once('_').map(|(_, p)| p)
    }
}

impl From<&str> for Timeslot {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
