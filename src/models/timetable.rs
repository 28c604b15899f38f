//! Timetable (solution) model.
//!
//! A timetable is the externalized form of the best candidate found:
//! one record per session, binding it to a timeslot, room and teacher.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A complete timetable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    /// One entry per catalog session, in catalog order.
    pub sessions: Vec<ScheduledSession>,
}

/// A session bound to a timeslot, room and teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    /// Session ID (`<course>_<n>`).
    pub session_id: String,
    /// Course taught.
    pub course_id: String,
    /// Attending group (denormalized from the course).
    pub group_id: String,
    /// Assigned timeslot.
    pub timeslot_id: String,
    /// Assigned room.
    pub room_id: String,
    /// Assigned teacher.
    pub teacher_id: String,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a session.
    pub fn add_session(&mut self, session: ScheduledSession) {
        self.sessions.push(session);
    }

    /// Number of scheduled sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Finds a session by ID.
    pub fn session(&self, session_id: &str) -> Option<&ScheduledSession> {
        self.sessions.iter().find(|s| s.session_id == session_id)
    }

    /// All sessions taught by a teacher.
    pub fn sessions_for_teacher(&self, teacher_id: &str) -> Vec<&ScheduledSession> {
        self.sessions
            .iter()
            .filter(|s| s.teacher_id == teacher_id)
            .collect()
    }

    /// All sessions attended by a group.
    pub fn sessions_for_group(&self, group_id: &str) -> Vec<&ScheduledSession> {
        self.sessions
            .iter()
            .filter(|s| s.group_id == group_id)
            .collect()
    }

    /// All sessions held in a room.
    pub fn sessions_for_room(&self, room_id: &str) -> Vec<&ScheduledSession> {
        self.sessions
            .iter()
            .filter(|s| s.room_id == room_id)
            .collect()
    }

    /// Lecture count per teacher.
    pub fn teacher_workload(&self) -> HashMap<String, usize> {
        let mut load: HashMap<String, usize> = HashMap::new();
        for s in &self.sessions {
            *load.entry(s.teacher_id.clone()).or_insert(0) += 1;
        }
        load
    }
}
