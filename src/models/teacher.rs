//! Teacher model.
//!
//! A teacher carries three independent sets: the courses they may teach,
//! the timeslots they are available for, and the timeslots they prefer.
//! A preferred slot need not be an available one.

use serde::{Deserialize, Serialize};

/// A teacher with qualifications, availability and preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Course IDs this teacher is qualified for.
    #[serde(default)]
    pub qualified_courses: Vec<String>,
    /// Timeslot IDs this teacher is available for.
    #[serde(default)]
    pub available_timeslots: Vec<String>,
    /// Timeslot IDs this teacher prefers.
    #[serde(default)]
    pub preferred_timeslots: Vec<String>,
}

impl Teacher {
    /// Creates a teacher with no qualifications, availability or preferences.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            qualified_courses: Vec::new(),
            available_timeslots: Vec::new(),
            preferred_timeslots: Vec::new(),
        }
    }

    /// Sets the teacher name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds qualified courses.
    pub fn with_qualifications<I, S>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qualified_courses
            .extend(courses.into_iter().map(Into::into));
        self
    }

    /// Adds available timeslots.
    pub fn with_availability<I, S>(mut self, timeslots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_timeslots
            .extend(timeslots.into_iter().map(Into::into));
        self
    }

    /// Adds preferred timeslots.
    pub fn with_preferences<I, S>(mut self, timeslots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_timeslots
            .extend(timeslots.into_iter().map(Into::into));
        self
    }

    /// Whether this teacher may teach the given course.
    pub fn is_qualified_for(&self, course_id: &str) -> bool {
        self.qualified_courses.iter().any(|c| c == course_id)
    }

    /// Whether this teacher is available at the given timeslot.
    pub fn is_available_at(&self, timeslot_id: &str) -> bool {
        self.available_timeslots.iter().any(|t| t == timeslot_id)
    }
}
