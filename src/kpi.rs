//! Timetable quality metrics (KPIs).
//!
//! Computes descriptive indicators from a finished timetable.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Sessions | Number of scheduled sessions |
//! | Teacher Workload | Sessions per teacher |
//! | Lectures per Day | Per group: mean sessions over the days it attends |
//! | Teacher Overlaps | Per teacher: sessions − distinct timeslots |
//!
//! A day is the timeslot ID up to the first `_` (`Mon_09:00` → `Mon`).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{Timeslot, Timetable};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimetableKpi {
    /// Number of scheduled sessions.
    pub total_sessions: usize,
    /// Sessions per teacher.
    pub teacher_workload: HashMap<String, usize>,
    /// Per group: mean sessions per day, over days with at least one.
    pub avg_lectures_per_day: HashMap<String, f64>,
    /// Per teacher: sessions sharing a timeslot with another of theirs.
    pub teacher_overlaps: HashMap<String, usize>,
}

impl TimetableKpi {
    /// Computes KPIs from a timetable.
    pub fn calculate(timetable: &Timetable) -> Self {
        let mut group_days: HashMap<&str, HashMap<String, usize>> = HashMap::new();
        let mut teacher_slots: HashMap<&str, HashSet<&str>> = HashMap::new();

        for s in &timetable.sessions {
            let day = Timeslot::new(s.timeslot_id.as_str()).day().to_string();
            *group_days
                .entry(s.group_id.as_str())
                .or_default()
                .entry(day)
                .or_insert(0) += 1;
            teacher_slots
                .entry(s.teacher_id.as_str())
                .or_default()
                .insert(s.timeslot_id.as_str());
        }

        let avg_lectures_per_day = group_days
            .into_iter()
            .map(|(group, days)| {
                let total: usize = days.values().sum();
                (group.to_string(), total as f64 / days.len() as f64)
            })
            .collect();

        let teacher_workload = timetable.teacher_workload();
        let teacher_overlaps = teacher_slots
            .into_iter()
            .map(|(teacher, slots)| {
                let sessions = teacher_workload.get(teacher).copied().unwrap_or(0);
                (teacher.to_string(), sessions.saturating_sub(slots.len()))
            })
            .collect();

        Self {
            total_sessions: timetable.session_count(),
            teacher_workload,
            avg_lectures_per_day,
            teacher_overlaps,
        }
    }

    /// Σ overlaps over all teachers.
    pub fn total_overlaps(&self) -> usize {
        self.teacher_overlaps.values().sum()
    }

    /// Largest workload of any teacher.
    pub fn max_workload(&self) -> usize {
        self.teacher_workload.values().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduledSession;

    fn entry(id: &str, group: &str, ts: &str, room: &str, teacher: &str) -> ScheduledSession {
        ScheduledSession {
            session_id: id.into(),
            course_id: id.split('_').next().unwrap_or(id).into(),
            group_id: group.into(),
            timeslot_id: ts.into(),
            room_id: room.into(),
            teacher_id: teacher.into(),
        }
    }

    fn sample_timetable() -> Timetable {
        let mut t = Timetable::new();
        t.add_session(entry("C1_1", "G1", "Mon_09:00", "R1", "T1"));
        t.add_session(entry("C1_2", "G1", "Mon_10:00", "R1", "T1"));
        t.add_session(entry("C1_3", "G1", "Tue_09:00", "R1", "T1"));
        t.add_session(entry("C2_1", "G2", "Mon_09:00", "R2", "T2"));
        t.add_session(entry("C3_1", "G2", "Mon_09:00", "R3", "T2"));
        t
    }

    #[test]
    fn test_kpi_basic() {
        let kpi = TimetableKpi::calculate(&sample_timetable());
        assert_eq!(kpi.total_sessions, 5);
        assert_eq!(kpi.teacher_workload["T1"], 3);
        assert_eq!(kpi.teacher_workload["T2"], 2);
        assert_eq!(kpi.max_workload(), 3);
    }

    #[test]
    fn test_kpi_lectures_per_day() {
        let kpi = TimetableKpi::calculate(&sample_timetable());
        // G1: Mon 2, Tue 1 → 1.5. G2: Mon 2 → 2.0.
        assert!((kpi.avg_lectures_per_day["G1"] - 1.5).abs() < 1e-10);
        assert!((kpi.avg_lectures_per_day["G2"] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_overlaps() {
        let kpi = TimetableKpi::calculate(&sample_timetable());
        assert_eq!(kpi.teacher_overlaps["T1"], 0);
        // T2 teaches twice at Mon_09:00.
        assert_eq!(kpi.teacher_overlaps["T2"], 1);
        assert_eq!(kpi.total_overlaps(), 1);
    }

    #[test]
    fn test_kpi_day_without_period() {
        let mut t = Timetable::new();
        t.add_session(entry("C1_1", "G1", "Slot1", "R1", "T1"));
        t.add_session(entry("C1_2", "G1", "Slot2", "R1", "T1"));
        let kpi = TimetableKpi::calculate(&t);
        // Each ID is its own day.
        assert!((kpi.avg_lectures_per_day["G1"] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = TimetableKpi::calculate(&Timetable::new());
        assert_eq!(kpi.total_sessions, 0);
        assert!(kpi.teacher_workload.is_empty());
        assert!(kpi.avg_lectures_per_day.is_empty());
        assert_eq!(kpi.total_overlaps(), 0);
        assert_eq!(kpi.max_workload(), 0);
    }
}
