//! Occupancy counters.
//!
//! Dense `(timeslot, teacher)`, `(timeslot, room)` and `(timeslot, group)`
//! bucket sizes for one chromosome. Fitness reads the bucket excess;
//! repair removes a gene, probes alternatives in O(1) each, and puts the
//! chosen binding back.

use super::chromosome::Gene;
use super::problem::TimetableProblem;

#[derive(Debug, Clone)]
pub(crate) struct Occupancy {
    teachers: usize,
    rooms: usize,
    groups: usize,
    by_teacher: Vec<u32>,
    by_room: Vec<u32>,
    by_group: Vec<u32>,
}

impl Occupancy {
    pub fn new(problem: &TimetableProblem) -> Self {
        let slots = problem.timeslot_count();
        Self {
            teachers: problem.teacher_count(),
            rooms: problem.room_count(),
            groups: problem.group_count(),
            by_teacher: vec![0; slots * problem.teacher_count()],
            by_room: vec![0; slots * problem.room_count()],
            by_group: vec![0; slots * problem.group_count()],
        }
    }

    pub fn from_genes(problem: &TimetableProblem, genes: &[Gene]) -> Self {
        let mut occ = Self::new(problem);
        for (session, gene) in problem.sessions().iter().zip(genes) {
            occ.add(session.group, gene);
        }
        occ
    }

    #[inline]
    fn keys(&self, group: usize, gene: &Gene) -> (usize, usize, usize) {
        (
            gene.timeslot * self.teachers + gene.teacher,
            gene.timeslot * self.rooms + gene.room,
            gene.timeslot * self.groups + group,
        )
    }

    pub fn add(&mut self, group: usize, gene: &Gene) {
        let (t, r, g) = self.keys(group, gene);
        self.by_teacher[t] += 1;
        self.by_room[r] += 1;
        self.by_group[g] += 1;
    }

    pub fn remove(&mut self, group: usize, gene: &Gene) {
        let (t, r, g) = self.keys(group, gene);
        self.by_teacher[t] -= 1;
        self.by_room[r] -= 1;
        self.by_group[g] -= 1;
    }

    /// Number of recorded bindings sharing timeslot+teacher, timeslot+room
    /// or timeslot+group with `gene`, counted once per shared kind.
    ///
    /// The gene itself must not be recorded.
    #[inline]
    pub fn shared(&self, group: usize, gene: &Gene) -> u32 {
        let (t, r, g) = self.keys(group, gene);
        self.by_teacher[t] + self.by_room[r] + self.by_group[g]
    }

    /// Σ max(0, bucket − 1) for teacher, room and group buckets.
    pub fn excess(&self) -> (usize, usize, usize) {
        fn over(buckets: &[u32]) -> usize {
            buckets.iter().map(|&c| c.saturating_sub(1) as usize).sum()
        }
        (
            over(&self.by_teacher),
            over(&self.by_room),
            over(&self.by_group),
        )
    }

    /// Distinct timeslots used by each teacher.
    pub fn distinct_slots_per_teacher(&self) -> Vec<usize> {
        let mut distinct = vec![0usize; self.teachers];
        if self.teachers == 0 {
            return distinct;
        }
        for row in self.by_teacher.chunks(self.teachers) {
            for (t, &count) in row.iter().enumerate() {
                if count > 0 {
                    distinct[t] += 1;
                }
            }
        }
        distinct
    }
}
