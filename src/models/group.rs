//! Student group model.

use serde::{Deserialize, Serialize};

/// A student group (cohort) attending courses together.
///
/// Two sessions of the same group cannot share a timeslot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: String,
    /// Number of students.
    pub student_count: u32,
    /// Course IDs this group is enrolled in.
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
}

impl Group {
    /// Creates a group with the given size.
    pub fn new(id: impl Into<String>, student_count: u32) -> Self {
        Self {
            id: id.into(),
            student_count,
            enrolled_courses: Vec::new(),
        }
    }

    /// Adds enrolled courses.
    pub fn with_courses<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enrolled_courses
            .extend(courses.into_iter().map(Into::into));
        self
    }
}
