//! Course model.
//!
//! A course is taught to one student group a fixed number of times per
//! scheduling period. Each occurrence becomes one session in the catalog.

use serde::{Deserialize, Serialize};

/// A course that must be taught `lectures_per_week` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Owning student group.
    pub group_id: String,
    /// Required sessions per scheduling period.
    pub lectures_per_week: u32,
    /// Expected number of enrolled students (room capacity requirement).
    pub expected_size: u32,
}

impl Course {
    /// Creates a course with one weekly lecture and size 1.
    pub fn new(id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            lectures_per_week: 1,
            expected_size: 1,
        }
    }

    /// Sets the number of sessions per period.
    pub fn with_lectures(mut self, lectures_per_week: u32) -> Self {
        self.lectures_per_week = lectures_per_week;
        self
    }

    /// Sets the expected class size.
    pub fn with_size(mut self, expected_size: u32) -> Self {
        self.expected_size = expected_size;
        self
    }
}
