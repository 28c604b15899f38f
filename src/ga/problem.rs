//! Timetabling problem definition.
//!
//! Indexes the domain records once into dense, integer-addressed tables
//! so that chromosomes only need to store `(timeslot, room, teacher)`
//! indices. Sessions are built here and shared read-only by every
//! candidate in the population.

use std::collections::{HashMap, HashSet};

use rand::seq::index;
use rand::Rng;

use super::chromosome::TimetableChromosome;
use crate::error::ConfigError;
use crate::models::{Course, Group, Room, ScheduledSession, Teacher, Timeslot, Timetable};

/// One required occurrence of a course.
///
/// Identity is `(course_id, sequence)`; the session carries no
/// assignment of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session ID (`<course_id>_<sequence>`).
    pub id: String,
    /// Index into [`TimetableProblem::courses`].
    pub course: usize,
    /// Course ID (denormalized).
    pub course_id: String,
    /// Interned group index.
    pub group: usize,
    /// Group ID (denormalized).
    pub group_id: String,
    /// Occurrence within the course (1-based).
    pub sequence: u32,
    /// Required seats.
    pub size: u32,
}

impl Session {
    /// Expands courses into their sessions.
    ///
    /// Courses are ordered by ID (stable for duplicates), then by
    /// sequence index. Crossover relies on this order being identical
    /// for every candidate. `course` indices refer to the sorted order.
    pub fn catalog(courses: &[Course]) -> Vec<Session> {
        let mut groups = GroupInterner::default();
        build_catalog(&sort_courses(courses), &mut groups)
    }
}

/// A set of admissible values for one gene field.
///
/// `Fallback` means nothing satisfied the constraint and any value in
/// `0..n` may be drawn; the resulting violation is left to the fitness
/// function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidates<'a> {
    /// Values satisfying the constraint (never empty).
    Restricted(&'a [usize]),
    /// Unconstrained choice among `0..n`.
    Fallback(usize),
}

impl Candidates<'_> {
    /// Whether the constraint could not be honored.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Candidates::Fallback(_))
    }

    /// Number of admissible values.
    pub fn len(&self) -> usize {
        match *self {
            Candidates::Restricted(values) => values.len(),
            Candidates::Fallback(n) => n,
        }
    }

    /// Whether there is nothing to choose from.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draws one value uniformly.
    ///
    /// # Panics
    /// Panics if the candidate set is empty, which [`TimetableProblem::new`]
    /// rules out.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            Candidates::Restricted(values) => values[rng.random_range(0..values.len())],
            Candidates::Fallback(n) => rng.random_range(0..n),
        }
    }

    /// Draws up to `amount` distinct values without replacement.
    pub fn sample<R: Rng>(&self, amount: usize, rng: &mut R) -> Vec<usize> {
        let len = self.len();
        let picked = index::sample(rng, len, amount.min(len));
        match *self {
            Candidates::Restricted(values) => picked.into_iter().map(|i| values[i]).collect(),
            Candidates::Fallback(_) => picked.into_vec(),
        }
    }
}

/// Indexed timetabling problem.
///
/// # Example
/// ```
/// use u_timetable::ga::TimetableProblem;
/// use u_timetable::models::{Course, Group, Room, Teacher, Timeslot};
///
/// let problem = TimetableProblem::new(
///     &[Course::new("CS101", "G1").with_lectures(2).with_size(30)],
///     &[Teacher::new("T1").with_qualifications(["CS101"])],
///     &[Group::new("G1", 30)],
///     &[Room::new("R1", 40)],
///     &[Timeslot::new("Mon_09:00"), Timeslot::new("Tue_09:00")],
/// )
/// .unwrap();
/// assert_eq!(problem.session_count(), 2);
/// assert_eq!(problem.sessions()[1].id, "CS101_2");
/// ```
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    sessions: Vec<Session>,
    courses: Vec<Course>,
    teachers: Vec<Teacher>,
    rooms: Vec<Room>,
    timeslots: Vec<Timeslot>,
    group_ids: Vec<String>,
    /// course → qualified teacher indices.
    qualified_teachers: Vec<Vec<usize>>,
    /// teacher × course.
    qualified: Vec<bool>,
    /// teacher → available timeslot indices.
    available_slots: Vec<Vec<usize>>,
    /// teacher × timeslot.
    available: Vec<bool>,
    /// teacher × timeslot.
    preferred: Vec<bool>,
}

impl TimetableProblem {
    /// Builds the problem index and the session catalog.
    ///
    /// References to unknown courses or timeslots in teacher records are
    /// ignored here; use [`crate::validation::validate_input`] to report them.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if there is nothing to schedule, if two
    /// courses share an ID, or if there is no timeslot, room or teacher to
    /// schedule it with.
    pub fn new(
        courses: &[Course],
        teachers: &[Teacher],
        groups: &[Group],
        rooms: &[Room],
        timeslots: &[Timeslot],
    ) -> Result<Self, ConfigError> {
        if timeslots.is_empty() {
            return Err(ConfigError::NoTimeslots);
        }
        if rooms.is_empty() {
            return Err(ConfigError::NoRooms);
        }
        if teachers.is_empty() {
            return Err(ConfigError::NoTeachers);
        }

        let courses = sort_courses(courses);
        if let Some(pair) = courses.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(ConfigError::DuplicateCourse(pair[0].id.clone()));
        }
        let mut interner = GroupInterner::default();
        for g in groups {
            interner.intern(&g.id);
        }
        let sessions = build_catalog(&courses, &mut interner);
        if sessions.is_empty() {
            return Err(ConfigError::NoSessions);
        }

        let n_courses = courses.len();
        let n_slots = timeslots.len();
        let mut qualified = vec![false; teachers.len() * n_courses];
        let mut qualified_teachers = vec![Vec::new(); n_courses];
        let mut available = vec![false; teachers.len() * n_slots];
        let mut preferred = vec![false; teachers.len() * n_slots];
        let mut available_slots = Vec::with_capacity(teachers.len());

        for (t, teacher) in teachers.iter().enumerate() {
            let quals: HashSet<&str> =
                teacher.qualified_courses.iter().map(String::as_str).collect();
            for (c, course) in courses.iter().enumerate() {
                if quals.contains(course.id.as_str()) {
                    qualified[t * n_courses + c] = true;
                    qualified_teachers[c].push(t);
                }
            }

            let avail: HashSet<&str> =
                teacher.available_timeslots.iter().map(String::as_str).collect();
            let prefs: HashSet<&str> =
                teacher.preferred_timeslots.iter().map(String::as_str).collect();
            let mut slots = Vec::new();
            for (s, ts) in timeslots.iter().enumerate() {
                if avail.contains(ts.id.as_str()) {
                    available[t * n_slots + s] = true;
                    slots.push(s);
                }
                if prefs.contains(ts.id.as_str()) {
                    preferred[t * n_slots + s] = true;
                }
            }
            available_slots.push(slots);
        }

        Ok(Self {
            sessions,
            courses,
            teachers: teachers.to_vec(),
            rooms: rooms.to_vec(),
            timeslots: timeslots.to_vec(),
            group_ids: interner.ids,
            qualified_teachers,
            qualified,
            available_slots,
            available,
            preferred,
        })
    }

    /// Session catalog, in chromosome order.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Courses, sorted by ID.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    /// Interned group IDs (group table first, then groups only named by courses).
    pub fn group_ids(&self) -> &[String] {
        &self.group_ids
    }

    #[inline]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn teacher_count(&self) -> usize {
        self.teachers.len()
    }

    #[inline]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    #[inline]
    pub fn timeslot_count(&self) -> usize {
        self.timeslots.len()
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.group_ids.len()
    }

    /// Whether `teacher` may teach `course`.
    #[inline]
    pub fn is_qualified(&self, teacher: usize, course: usize) -> bool {
        self.qualified[teacher * self.courses.len() + course]
    }

    /// Whether `teacher` is available at `timeslot`.
    #[inline]
    pub fn is_available(&self, teacher: usize, timeslot: usize) -> bool {
        self.available[teacher * self.timeslots.len() + timeslot]
    }

    /// Whether `teacher` prefers `timeslot`.
    #[inline]
    pub fn is_preferred(&self, teacher: usize, timeslot: usize) -> bool {
        self.preferred[teacher * self.timeslots.len() + timeslot]
    }

    /// Whether `session` fits into `room`.
    #[inline]
    pub fn fits(&self, session: usize, room: usize) -> bool {
        self.rooms[room].fits(self.sessions[session].size)
    }

    /// Teachers qualified for `course`, or all teachers if none are.
    pub fn teacher_candidates(&self, course: usize) -> Candidates<'_> {
        match self.qualified_teachers[course].as_slice() {
            [] => Candidates::Fallback(self.teachers.len()),
            qualified => Candidates::Restricted(qualified),
        }
    }

    /// Timeslots `teacher` is available for, or all timeslots if none.
    pub fn timeslot_candidates(&self, teacher: usize) -> Candidates<'_> {
        match self.available_slots[teacher].as_slice() {
            [] => Candidates::Fallback(self.timeslots.len()),
            slots => Candidates::Restricted(slots),
        }
    }

    /// Converts a chromosome into output records.
    pub fn decode(&self, chromosome: &TimetableChromosome) -> Timetable {
        let mut timetable = Timetable::new();
        for (session, gene) in self.sessions.iter().zip(&chromosome.genes) {
            timetable.add_session(ScheduledSession {
                session_id: session.id.clone(),
                course_id: session.course_id.clone(),
                group_id: session.group_id.clone(),
                timeslot_id: self.timeslots[gene.timeslot].id.clone(),
                room_id: self.rooms[gene.room].id.clone(),
                teacher_id: self.teachers[gene.teacher].id.clone(),
            });
        }
        timetable
    }
}

#[derive(Default)]
struct GroupInterner {
    ids: Vec<String>,
    index: HashMap<String, usize>,
}

impl GroupInterner {
    fn intern(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), idx);
        idx
    }
}

fn sort_courses(courses: &[Course]) -> Vec<Course> {
    let mut sorted = courses.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    sorted
}

fn build_catalog(courses: &[Course], groups: &mut GroupInterner) -> Vec<Session> {
    let total: usize = courses.iter().map(|c| c.lectures_per_week as usize).sum();
    let mut sessions = Vec::with_capacity(total);
    for (c, course) in courses.iter().enumerate() {
        let group = groups.intern(&course.group_id);
        for seq in 1..=course.lectures_per_week {
            sessions.push(Session {
                id: format!("{}_{}", course.id, seq),
                course: c,
                course_id: course.id.clone(),
                group,
                group_id: course.group_id.clone(),
                sequence: seq,
                size: course.expected_size,
            });
        }
    }
    sessions
}
