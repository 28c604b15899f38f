//! Conflict repair.
//!
//! A bounded local search run on each freshly bred child. Genes are
//! visited in catalog order; a gene in conflict is rebound to the first
//! sampled `(teacher, timeslot, room)` trial with no conflicts. Later genes
//! see earlier repairs, so the outcome depends on gene order.
//!
//! A gene's conflict count is the number of other genes sharing
//! timeslot+teacher, timeslot+room or timeslot+group with it (one per
//! shared kind), plus one if its room is too small, plus one if its
//! teacher is unqualified.
//!
//! Repair is best effort. When no trial is conflict-free, one uniformly
//! random binding is drawn and kept only if it shares no bucket with
//! another gene and does not raise the gene's own conflict count.
//!
//! Every adopted binding enters only empty buckets, so a move never adds
//! a conflict to any other gene. No gene ends a pass with more conflicts
//! than it started with.

use rand::seq::index;
use rand::Rng;
use tracing::debug;

use super::chromosome::{Gene, TimetableChromosome};
use super::config::RepairLimits;
use super::occupancy::Occupancy;
use super::problem::TimetableProblem;

/// How a conflicted gene was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMethod {
    /// Rebound to a conflict-free trial.
    Resolved,
    /// Rebound to a clash-free random binding no worse than before.
    Fallback,
    /// Kept: the random binding would have clashed or been worse.
    Unresolved,
}

/// Repair outcome for one conflicted gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneRepair {
    /// Gene (session) index.
    pub index: usize,
    /// Conflict count when the gene was visited.
    pub before: u32,
    /// Conflict count right after it was handled.
    pub after: u32,
    pub method: RepairMethod,
}

/// Summary of one repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// One entry per gene that was in conflict when visited.
    pub outcomes: Vec<GeneRepair>,
}

impl RepairReport {
    /// Genes found in conflict.
    pub fn conflicted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn resolved(&self) -> usize {
        self.count(RepairMethod::Resolved)
    }

    pub fn fallbacks(&self) -> usize {
        self.count(RepairMethod::Fallback)
    }

    pub fn unresolved(&self) -> usize {
        self.count(RepairMethod::Unresolved)
    }

    fn count(&self, method: RepairMethod) -> usize {
        self.outcomes.iter().filter(|o| o.method == method).count()
    }
}

/// Conflict count of gene `idx` against all other genes.
///
/// Direct O(n) scan; [`repair`] computes the same value incrementally.
pub fn conflict_count(problem: &TimetableProblem, genes: &[Gene], idx: usize) -> u32 {
    let sessions = problem.sessions();
    let gene = &genes[idx];
    let group = sessions[idx].group;
    let mut count = 0;
    for (j, other) in genes.iter().enumerate() {
        if j == idx || other.timeslot != gene.timeslot {
            continue;
        }
        count += u32::from(other.teacher == gene.teacher);
        count += u32::from(other.room == gene.room);
        count += u32::from(sessions[j].group == group);
    }
    count + unary_conflicts(problem, idx, gene)
}

/// Repairs `chromosome` in place.
///
/// Marks fitness stale if any gene was rebound.
pub fn repair<R: Rng>(
    problem: &TimetableProblem,
    chromosome: &mut TimetableChromosome,
    limits: &RepairLimits,
    rng: &mut R,
) -> RepairReport {
    let mut occ = Occupancy::from_genes(problem, &chromosome.genes);
    let mut report = RepairReport::default();

    for (idx, session) in problem.sessions().iter().enumerate() {
        let current = chromosome.genes[idx];
        occ.remove(session.group, &current);
        let before = gene_conflicts(problem, &occ, idx, &current);
        if before == 0 {
            occ.add(session.group, &current);
            continue;
        }

        let (gene, after, method) = match find_free_binding(problem, &occ, idx, limits, rng) {
            Some(gene) => (gene, 0, RepairMethod::Resolved),
            None => {
                let trial = Gene::new(
                    rng.random_range(0..problem.timeslot_count()),
                    rng.random_range(0..problem.room_count()),
                    rng.random_range(0..problem.teacher_count()),
                );
                let group = session.group;
                let cost = gene_conflicts(problem, &occ, idx, &trial);
                if occ.shared(group, &trial) == 0 && cost <= before {
                    (trial, cost, RepairMethod::Fallback)
                } else {
                    (current, before, RepairMethod::Unresolved)
                }
            }
        };

        chromosome.genes[idx] = gene;
        occ.add(session.group, &gene);
        report.outcomes.push(GeneRepair {
            index: idx,
            before,
            after,
            method,
        });
    }

    if report.resolved() + report.fallbacks() > 0 {
        chromosome.invalidate();
    }
    debug!(
        conflicted = report.conflicted(),
        resolved = report.resolved(),
        fallbacks = report.fallbacks(),
        "repair pass"
    );
    report
}

/// Capacity and qualification conflicts of a binding.
#[inline]
fn unary_conflicts(problem: &TimetableProblem, idx: usize, gene: &Gene) -> u32 {
    let course = problem.sessions()[idx].course;
    u32::from(!problem.fits(idx, gene.room)) + u32::from(!problem.is_qualified(gene.teacher, course))
}

/// Conflict count of `gene` for session `idx`; `occ` must exclude it.
#[inline]
fn gene_conflicts(problem: &TimetableProblem, occ: &Occupancy, idx: usize, gene: &Gene) -> u32 {
    occ.shared(problem.sessions()[idx].group, gene) + unary_conflicts(problem, idx, gene)
}

/// First conflict-free trial among the sampled
/// teachers × timeslots × rooms, if any.
fn find_free_binding<R: Rng>(
    problem: &TimetableProblem,
    occ: &Occupancy,
    idx: usize,
    limits: &RepairLimits,
    rng: &mut R,
) -> Option<Gene> {
    let course = problem.sessions()[idx].course;
    let room_count = problem.room_count();
    for teacher in problem.teacher_candidates(course).sample(limits.teachers, rng) {
        for timeslot in problem.timeslot_candidates(teacher).sample(limits.timeslots, rng) {
            let rooms = index::sample(rng, room_count, limits.rooms.min(room_count));
            for room in rooms.iter() {
                let trial = Gene::new(timeslot, room, teacher);
                if gene_conflicts(problem, occ, idx, &trial) == 0 {
                    return Some(trial);
                }
            }
        }
    }
    None
}
