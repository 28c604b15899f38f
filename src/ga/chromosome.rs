//! Timetable chromosome.
//!
//! # Encoding
//!
//! One gene per catalog session, in catalog order. A gene stores only
//! the `(timeslot, room, teacher)` indices; session data lives once in
//! [`TimetableProblem`]. Cloning a chromosome copies three integers per
//! session.

use rand::Rng;
use tracing::trace;

use super::problem::{Session, TimetableProblem};

/// A session's binding to a timeslot, room and teacher (by index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gene {
    pub timeslot: usize,
    pub room: usize,
    pub teacher: usize,
}

impl Gene {
    pub fn new(timeslot: usize, room: usize, teacher: usize) -> Self {
        Self {
            timeslot,
            room,
            teacher,
        }
    }
}

/// Candidate timetable.
///
/// Higher fitness = better (maximization, range `(0, 1]`).
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableChromosome {
    /// Gene `i` binds session `i` of the catalog.
    pub genes: Vec<Gene>,
    /// Last computed fitness, [`TimetableChromosome::UNEVALUATED`] if stale.
    pub fitness: f64,
}

impl TimetableChromosome {
    /// Fitness marker for chromosomes not yet evaluated.
    pub const UNEVALUATED: f64 = f64::NEG_INFINITY;

    /// Wraps existing genes.
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: Self::UNEVALUATED,
        }
    }

    /// Creates a random chromosome.
    ///
    /// Each gene gets a qualified teacher (any teacher if none qualify),
    /// a uniform timeslot and a uniform room. Feasibility is not attempted.
    pub fn random<R: Rng>(problem: &TimetableProblem, rng: &mut R) -> Self {
        let mut fallbacks = 0usize;
        let genes = problem
            .sessions()
            .iter()
            .map(|session| {
                let (gene, fallback) = random_gene(problem, session, rng);
                fallbacks += usize::from(fallback);
                gene
            })
            .collect();
        if fallbacks > 0 {
            trace!(fallbacks, "initialized genes with unqualified teachers");
        }
        Self::from_genes(genes)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether fitness reflects the current genes.
    pub fn is_evaluated(&self) -> bool {
        self.fitness != Self::UNEVALUATED
    }

    /// Marks the fitness as stale.
    pub fn invalidate(&mut self) {
        self.fitness = Self::UNEVALUATED;
    }

    /// Checks structural consistency with the problem.
    ///
    /// One gene per session, every index in range. Says nothing about
    /// constraint satisfaction.
    pub fn is_valid(&self, problem: &TimetableProblem) -> bool {
        self.genes.len() == problem.session_count()
            && self.genes.iter().all(|g| {
                g.timeslot < problem.timeslot_count()
                    && g.room < problem.room_count()
                    && g.teacher < problem.teacher_count()
            })
    }
}

/// Draws a random gene for `session`.
///
/// Returns the gene and whether the teacher came from the unqualified
/// fallback pool.
pub fn random_gene<R: Rng>(
    problem: &TimetableProblem,
    session: &Session,
    rng: &mut R,
) -> (Gene, bool) {
    let teachers = problem.teacher_candidates(session.course);
    let teacher = teachers.pick(rng);
    let timeslot = rng.random_range(0..problem.timeslot_count());
    let room = rng.random_range(0..problem.room_count());
    (Gene::new(timeslot, room, teacher), teachers.is_fallback())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Group, Room, Teacher, Timeslot};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_problem() -> TimetableProblem {
        TimetableProblem::new(
            &[
                Course::new("CS101", "G1").with_lectures(3).with_size(30),
                Course::new("MA201", "G2").with_lectures(2).with_size(20),
                Course::new("PH100", "G2").with_lectures(1).with_size(20),
            ],
            &[
                Teacher::new("T1").with_qualifications(["CS101"]),
                Teacher::new("T2").with_qualifications(["MA201"]),
                Teacher::new("T3"),
            ],
            &[Group::new("G1", 30), Group::new("G2", 20)],
            &[Room::new("R1", 40), Room::new("R2", 20)],
            &[
                Timeslot::new("Mon_09:00"),
                Timeslot::new("Mon_10:00"),
                Timeslot::new("Tue_09:00"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_random_chromosome() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let ch = TimetableChromosome::random(&p, &mut rng);

        assert_eq!(ch.len(), 6);
        assert!(ch.is_valid(&p));
        assert!(!ch.is_evaluated());
    }

    #[test]
    fn test_random_prefers_qualified_teachers() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let ch = TimetableChromosome::random(&p, &mut rng);
            for (session, gene) in p.sessions().iter().zip(&ch.genes) {
                match session.course_id.as_str() {
                    "CS101" => assert_eq!(gene.teacher, 0),
                    "MA201" => assert_eq!(gene.teacher, 1),
                    _ => assert!(gene.teacher < 3),
                }
            }
        }
    }

    #[test]
    fn test_random_gene_reports_fallback() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(7);
        let ph = &p.sessions()[5];
        assert_eq!(ph.course_id, "PH100");
        let (_, fallback) = random_gene(&p, ph, &mut rng);
        assert!(fallback);
        let (_, fallback) = random_gene(&p, &p.sessions()[0], &mut rng);
        assert!(!fallback);
    }

    #[test]
    fn test_population_members_are_independent() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let a = TimetableChromosome::random(&p, &mut rng);
        let mut b = a.clone();
        b.genes[0].room = 1 - b.genes[0].room;
        assert_ne!(a.genes[0], b.genes[0]);
    }

    #[test]
    fn test_invalid_chromosome() {
        let p = sample_problem();
        let short = TimetableChromosome::from_genes(vec![Gene::new(0, 0, 0)]);
        assert!(!short.is_valid(&p));

        let mut out_of_range = TimetableChromosome::from_genes(vec![Gene::new(0, 0, 0); 6]);
        assert!(out_of_range.is_valid(&p));
        out_of_range.genes[3].room = 9;
        assert!(!out_of_range.is_valid(&p));
    }
}
