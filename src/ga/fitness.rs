//! Constraint-aware fitness.
//!
//! # Penalty model
//!
//! | Term | Kind | Amount |
//! |------|------|--------|
//! | Session larger than its room | hard | `hard` each |
//! | Teacher / room / group double booking | hard | `hard × (bucket − 1)` per bucket |
//! | Unqualified teacher | hard | `hard` each |
//! | Timeslot outside teacher availability | soft | `soft` each |
//! | Timeslot in teacher preferences | reward | `−preferred_reward` each |
//! | Teacher spread | soft | `max(0, distinct_slots − allowance) × spread_weight` per teacher |
//!
//! Fitness is `1 / (1 + max(P, 0))`, so it lies in `(0, 1]` and reaches 1
//! exactly when the total penalty `P` is zero or negative.

use serde::Serialize;

use super::chromosome::{Gene, TimetableChromosome};
use super::config::PenaltyWeights;
use super::occupancy::Occupancy;
use super::problem::TimetableProblem;

/// Violation counts for one chromosome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PenaltyBreakdown {
    /// Sessions whose room is too small.
    pub over_capacity: usize,
    /// Σ (bucket − 1) over (timeslot, teacher) buckets.
    pub teacher_clashes: usize,
    /// Σ (bucket − 1) over (timeslot, room) buckets.
    pub room_clashes: usize,
    /// Σ (bucket − 1) over (timeslot, group) buckets.
    pub group_clashes: usize,
    /// Sessions taught by an unqualified teacher.
    pub unqualified: usize,
    /// Sessions outside their teacher's availability.
    pub unavailable: usize,
    /// Sessions in a preferred slot of their teacher.
    pub preferred: usize,
    /// Σ max(0, distinct_slots − allowance) over teachers.
    pub spread_excess: usize,
}

impl PenaltyBreakdown {
    /// Counts violations in `genes`.
    pub fn compute(
        problem: &TimetableProblem,
        genes: &[Gene],
        weights: &PenaltyWeights,
    ) -> Self {
        let occ = Occupancy::from_genes(problem, genes);
        let (teacher_clashes, room_clashes, group_clashes) = occ.excess();

        let mut b = PenaltyBreakdown {
            teacher_clashes,
            room_clashes,
            group_clashes,
            ..Default::default()
        };

        for (idx, (session, gene)) in problem.sessions().iter().zip(genes).enumerate() {
            if !problem.fits(idx, gene.room) {
                b.over_capacity += 1;
            }
            if !problem.is_qualified(gene.teacher, session.course) {
                b.unqualified += 1;
            }
            if !problem.is_available(gene.teacher, gene.timeslot) {
                b.unavailable += 1;
            }
            if problem.is_preferred(gene.teacher, gene.timeslot) {
                b.preferred += 1;
            }
        }

        b.spread_excess = occ
            .distinct_slots_per_teacher()
            .into_iter()
            .map(|n| n.saturating_sub(weights.spread_allowance))
            .sum();
        b
    }

    /// Total hard violations.
    pub fn hard_violations(&self) -> usize {
        self.over_capacity
            + self.teacher_clashes
            + self.room_clashes
            + self.group_clashes
            + self.unqualified
    }

    /// Whether no hard constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.hard_violations() == 0
    }

    pub fn hard_penalty(&self, weights: &PenaltyWeights) -> f64 {
        weights.hard * self.hard_violations() as f64
    }

    /// Soft penalty; negative when preference rewards dominate.
    pub fn soft_penalty(&self, weights: &PenaltyWeights) -> f64 {
        weights.soft * self.unavailable as f64 - weights.preferred_reward * self.preferred as f64
            + weights.spread_weight * self.spread_excess as f64
    }

    /// Total penalty `P = H + S`.
    pub fn total_penalty(&self, weights: &PenaltyWeights) -> f64 {
        self.hard_penalty(weights) + self.soft_penalty(weights)
    }
}

/// Full evaluation result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub breakdown: PenaltyBreakdown,
    /// Total penalty (may be negative).
    pub penalty: f64,
    /// `1 / (1 + max(penalty, 0))`.
    pub fitness: f64,
}

/// Maps a total penalty to fitness in `(0, 1]`.
///
/// Strictly decreasing for non-negative penalties.
#[inline]
pub fn fitness_from_penalty(penalty: f64) -> f64 {
    1.0 / (1.0 + penalty.max(0.0))
}

/// Evaluates a chromosome. Pure and deterministic.
pub fn evaluate(
    problem: &TimetableProblem,
    chromosome: &TimetableChromosome,
    weights: &PenaltyWeights,
) -> Evaluation {
    let breakdown = PenaltyBreakdown::compute(problem, &chromosome.genes, weights);
    let penalty = breakdown.total_penalty(weights);
    Evaluation {
        breakdown,
        penalty,
        fitness: fitness_from_penalty(penalty),
    }
}
