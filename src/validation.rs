//! Input validation and clash verification.
//!
//! [`validate_input`] checks the structural integrity of the input
//! records before a problem is built. Detects:
//! - Duplicate IDs
//! - References to unknown courses, groups or timeslots
//! - Courses with no lectures or no students
//! - Rooms with no seats
//!
//! [`verify_timetable`] re-checks a finished timetable for double
//! bookings, independently of the fitness function.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::models::{Course, Group, Room, Teacher, Timeslot, Timetable};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A course names a group that doesn't exist.
    UnknownGroup,
    /// A teacher or group names a course that doesn't exist.
    UnknownCourse,
    /// A teacher names a timeslot that doesn't exist.
    UnknownTimeslot,
    /// A course requires zero lectures per week.
    EmptyCourse,
    /// A course expects zero students.
    InvalidSize,
    /// A room has zero capacity.
    InvalidCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn collect_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
    }
    seen
}

/// Validates the input records of a timetabling problem.
///
/// Checks:
/// 1. No duplicate course, teacher, group, room or timeslot IDs
/// 2. Every course belongs to a known group (when groups are given)
/// 3. Qualifications and enrolments name known courses
/// 4. Availability and preferences name known timeslots
/// 5. Courses have at least one lecture and one student
/// 6. Rooms have at least one seat
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    courses: &[Course],
    teachers: &[Teacher],
    groups: &[Group],
    rooms: &[Room],
    timeslots: &[Timeslot],
) -> ValidationResult {
    let mut errors = Vec::new();

    let course_ids = collect_ids("course", courses.iter().map(|c| c.id.as_str()), &mut errors);
    collect_ids("teacher", teachers.iter().map(|t| t.id.as_str()), &mut errors);
    let group_ids = collect_ids("group", groups.iter().map(|g| g.id.as_str()), &mut errors);
    collect_ids("room", rooms.iter().map(|r| r.id.as_str()), &mut errors);
    let slot_ids = collect_ids("timeslot", timeslots.iter().map(|s| s.id.as_str()), &mut errors);

    for course in courses {
        if course.lectures_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourse,
                format!("Course '{}' has no lectures per week", course.id),
            ));
        }
        if course.expected_size == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSize,
                format!("Course '{}' expects no students", course.id),
            ));
        }
        // Groups are optional input; courses alone define them otherwise.
        if !groups.is_empty() && !group_ids.contains(course.group_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownGroup,
                format!(
                    "Course '{}' references unknown group '{}'",
                    course.id, course.group_id
                ),
            ));
        }
    }

    for teacher in teachers {
        for c in &teacher.qualified_courses {
            if !course_ids.contains(c.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourse,
                    format!("Teacher '{}' is qualified for unknown course '{c}'", teacher.id),
                ));
            }
        }
        for s in teacher
            .available_timeslots
            .iter()
            .chain(&teacher.preferred_timeslots)
        {
            if !slot_ids.contains(s.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTimeslot,
                    format!("Teacher '{}' references unknown timeslot '{s}'", teacher.id),
                ));
            }
        }
    }

    for group in groups {
        for c in &group.enrolled_courses {
            if !course_ids.contains(c.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourse,
                    format!("Group '{}' is enrolled in unknown course '{c}'", group.id),
                ));
            }
        }
    }

    for room in rooms {
        if room.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Room '{}' has zero capacity", room.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A double booking: `count` sessions share one entity in one timeslot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clash {
    pub timeslot_id: String,
    /// Teacher, room or group ID.
    pub entity_id: String,
    pub count: usize,
}

/// Double bookings found in a timetable, sorted by timeslot then entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClashReport {
    pub teacher_clashes: Vec<Clash>,
    pub room_clashes: Vec<Clash>,
    pub group_clashes: Vec<Clash>,
}

impl ClashReport {
    /// Whether no teacher, room or group is double-booked.
    pub fn is_clash_free(&self) -> bool {
        self.teacher_clashes.is_empty() && self.room_clashes.is_empty() && self.group_clashes.is_empty()
    }

    /// Σ (count − 1) over all clashes; matches the fitness clash terms.
    pub fn excess(&self) -> usize {
        self.teacher_clashes
            .iter()
            .chain(&self.room_clashes)
            .chain(&self.group_clashes)
            .map(|c| c.count - 1)
            .sum()
    }
}

/// Finds every teacher, room and group double booking in `timetable`.
pub fn verify_timetable(timetable: &Timetable) -> ClashReport {
    let mut teachers: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut rooms: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut groups: BTreeMap<(&str, &str), usize> = BTreeMap::new();

    for s in &timetable.sessions {
        let slot = s.timeslot_id.as_str();
        *teachers.entry((slot, s.teacher_id.as_str())).or_insert(0) += 1;
        *rooms.entry((slot, s.room_id.as_str())).or_insert(0) += 1;
        *groups.entry((slot, s.group_id.as_str())).or_insert(0) += 1;
    }

    ClashReport {
        teacher_clashes: clashes(teachers),
        room_clashes: clashes(rooms),
        group_clashes: clashes(groups),
    }
}

fn clashes(buckets: BTreeMap<(&str, &str), usize>) -> Vec<Clash> {
    buckets
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|((slot, entity), count)| Clash {
            timeslot_id: slot.to_string(),
            entity_id: entity.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{evaluate, PenaltyWeights, TimetableChromosome, TimetableProblem};
    use crate::models::ScheduledSession;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_courses() -> Vec<Course> {
        vec![
            Course::new("CS101", "G1").with_lectures(2).with_size(30),
            Course::new("MA201", "G2").with_lectures(1).with_size(20),
        ]
    }

    fn sample_teachers() -> Vec<Teacher> {
        vec![
            Teacher::new("T1")
                .with_qualifications(["CS101"])
                .with_availability(["Mon_09", "Mon_10"])
                .with_preferences(["Mon_09"]),
            Teacher::new("T2").with_qualifications(["MA201", "CS101"]),
        ]
    }

    fn sample_groups() -> Vec<Group> {
        vec![
            Group::new("G1", 30).with_courses(["CS101"]),
            Group::new("G2", 20).with_courses(["MA201"]),
        ]
    }

    fn sample_rooms() -> Vec<Room> {
        vec![Room::new("R1", 40), Room::new("R2", 25)]
    }

    fn sample_timeslots() -> Vec<Timeslot> {
        ["Mon_09", "Mon_10", "Tue_09"].map(Timeslot::new).to_vec()
    }

    fn session(id: &str, group: &str, slot: &str, room: &str, teacher: &str) -> ScheduledSession {
        ScheduledSession {
            session_id: id.into(),
            course_id: id.split('_').next().unwrap_or(id).into(),
            group_id: group.into(),
            timeslot_id: slot.into(),
            room_id: room.into(),
            teacher_id: teacher.into(),
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(
            &sample_courses(),
            &sample_teachers(),
            &sample_groups(),
            &sample_rooms(),
            &sample_timeslots(),
        )
        .is_ok());
    }

    #[test]
    fn test_duplicate_ids() {
        let rooms = vec![Room::new("R1", 40), Room::new("R1", 30)];
        let timeslots = ["Mon_09", "Mon_09"].map(Timeslot::new).to_vec();
        let errors = validate_input(
            &sample_courses(),
            &[],
            &[],
            &rooms,
            &timeslots,
        )
        .unwrap_err();

        let dups: Vec<_> = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::DuplicateId)
            .collect();
        assert_eq!(dups.len(), 2);
        assert!(dups.iter().any(|e| e.message.contains("room")));
        assert!(dups.iter().any(|e| e.message.contains("timeslot")));
    }

    #[test]
    fn test_unknown_references() {
        let teachers = vec![Teacher::new("T1")
            .with_qualifications(["CS999"])
            .with_availability(["Sun_23"])];
        let groups = vec![Group::new("G1", 30).with_courses(["CS101", "XX000"])];
        let errors = validate_input(
            &sample_courses(),
            &teachers,
            &groups,
            &sample_rooms(),
            &sample_timeslots(),
        )
        .unwrap_err();

        let count = |kind: ValidationErrorKind| errors.iter().filter(|e| e.kind == kind).count();
        // MA201 names G2, which is missing from `groups`.
        assert_eq!(count(ValidationErrorKind::UnknownGroup), 1);
        assert_eq!(count(ValidationErrorKind::UnknownCourse), 2);
        assert_eq!(count(ValidationErrorKind::UnknownTimeslot), 1);
    }

    #[test]
    fn test_groups_optional() {
        assert!(validate_input(
            &sample_courses(),
            &sample_teachers(),
            &[],
            &sample_rooms(),
            &sample_timeslots(),
        )
        .is_ok());
    }

    #[test]
    fn test_degenerate_sizes() {
        let courses = vec![
            Course::new("A", "G1").with_lectures(0).with_size(10),
            Course::new("B", "G1").with_lectures(1).with_size(0),
        ];
        let rooms = vec![Room::new("R0", 0)];
        let errors = validate_input(&courses, &[], &[], &rooms, &sample_timeslots()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::EmptyCourse));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::InvalidSize));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::InvalidCapacity));
    }

    #[test]
    fn test_verify_clash_free() {
        let mut tt = Timetable::new();
        tt.add_session(session("CS101_1", "G1", "Mon_09", "R1", "T1"));
        tt.add_session(session("CS101_2", "G1", "Mon_10", "R1", "T1"));
        tt.add_session(session("MA201_1", "G2", "Mon_09", "R2", "T2"));

        let report = verify_timetable(&tt);
        assert!(report.is_clash_free());
        assert_eq!(report.excess(), 0);
    }

    #[test]
    fn test_verify_finds_double_bookings() {
        let mut tt = Timetable::new();
        tt.add_session(session("CS101_1", "G1", "Mon_09", "R1", "T1"));
        tt.add_session(session("CS101_2", "G1", "Mon_09", "R2", "T1"));
        tt.add_session(session("MA201_1", "G2", "Mon_09", "R1", "T1"));

        let report = verify_timetable(&tt);
        assert!(!report.is_clash_free());
        assert_eq!(
            report.teacher_clashes,
            vec![Clash {
                timeslot_id: "Mon_09".into(),
                entity_id: "T1".into(),
                count: 3,
            }]
        );
        assert_eq!(report.room_clashes.len(), 1);
        assert_eq!(report.room_clashes[0].entity_id, "R1");
        assert_eq!(report.room_clashes[0].count, 2);
        assert_eq!(report.group_clashes.len(), 1);
        assert_eq!(report.group_clashes[0].entity_id, "G1");
        assert_eq!(report.excess(), 2 + 1 + 1);
    }

    #[test]
    fn test_verify_agrees_with_fitness() {
        let problem = TimetableProblem::new(
            &sample_courses(),
            &sample_teachers(),
            &sample_groups(),
            &[Room::new("R1", 40)],
            &["Mon_09", "Mon_10"].map(Timeslot::new),
        )
        .unwrap();
        let weights = PenaltyWeights::default();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..30 {
            let ch = TimetableChromosome::random(&problem, &mut rng);
            let b = evaluate(&problem, &ch, &weights).breakdown;
            let report = verify_timetable(&problem.decode(&ch));
            assert_eq!(report.excess(), b.teacher_clashes + b.room_clashes + b.group_clashes);
        }
    }
}
