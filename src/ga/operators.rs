//! Genetic operators for timetable chromosomes.
//!
//! - **Selection**: k-tournament over distinct individuals.
//! - **Crossover**: single-point, positional. Valid because every
//!   chromosome shares the catalog's session order.
//! - **Mutation**: per-gene, rebinding exactly one field.
//!
//! [`GeneticOperators`] bundles the parameters so the runner can apply
//! all three from one value.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::GeneticOperators;
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.tournament_size, 3);
//! assert_eq!(ops.mutation_rate, 0.2);
//! ```

use rand::seq::index;
use rand::Rng;

use super::chromosome::TimetableChromosome;
use super::problem::TimetableProblem;

/// Gene field rebound by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneField {
    Timeslot,
    Room,
    Teacher,
}

impl GeneField {
    const ALL: [GeneField; 3] = [GeneField::Timeslot, GeneField::Room, GeneField::Teacher];

    fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Selection, crossover and mutation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticOperators {
    /// Contestants per tournament.
    pub tournament_size: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            tournament_size: 3,
            mutation_rate: 0.2,
        }
    }
}

impl GeneticOperators {
    pub fn new(tournament_size: usize, mutation_rate: f64) -> Self {
        Self {
            tournament_size,
            mutation_rate,
        }
    }

    /// Tournament selection with the configured size.
    pub fn select<R: Rng>(
        &self,
        population: &[TimetableChromosome],
        rng: &mut R,
    ) -> TimetableChromosome {
        tournament_select(population, self.tournament_size, rng)
    }

    /// Single-point crossover.
    pub fn crossover<R: Rng>(
        &self,
        p1: &TimetableChromosome,
        p2: &TimetableChromosome,
        rng: &mut R,
    ) -> (TimetableChromosome, TimetableChromosome) {
        single_point_crossover(p1, p2, rng)
    }

    /// Per-gene mutation with the configured rate.
    ///
    /// # Panics
    /// Panics if the configured rate is not in `[0, 1]`.
    pub fn mutate<R: Rng>(
        &self,
        problem: &TimetableProblem,
        chromosome: &mut TimetableChromosome,
        rng: &mut R,
    ) -> usize {
        mutate(problem, chromosome, self.mutation_rate, rng)
    }
}

/// Returns a clone of the fittest of `k` distinct random individuals.
///
/// `k` is clamped to `1..=population.len()`. Ties go to the contestant
/// drawn first. The population is never modified.
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament_select<R: Rng>(
    population: &[TimetableChromosome],
    k: usize,
    rng: &mut R,
) -> TimetableChromosome {
    assert!(!population.is_empty(), "tournament over an empty population");
    let k = k.clamp(1, population.len());
    let contestants = index::sample(rng, population.len(), k);
    let mut best: Option<usize> = None;
    for idx in contestants.iter() {
        match best {
            Some(b) if population[b].fitness >= population[idx].fitness => {}
            _ => best = Some(idx),
        }
    }
    // k >= 1, so a contestant was always drawn.
    population[best.unwrap_or(0)].clone()
}

/// Single-point crossover.
///
/// Picks a cut in `[1, n-1]`; child 1 = `p1[..cut] ++ p2[cut..]`,
/// child 2 = `p2[..cut] ++ p1[cut..]`. Children are fresh copies with
/// stale fitness. With fewer than two genes the parents are cloned.
pub fn single_point_crossover<R: Rng>(
    p1: &TimetableChromosome,
    p2: &TimetableChromosome,
    rng: &mut R,
) -> (TimetableChromosome, TimetableChromosome) {
    let n = p1.len().min(p2.len());
    if n < 2 {
        return (p1.clone(), p2.clone());
    }
    let cut = rng.random_range(1..n);
    (splice(p1, p2, cut), splice(p2, p1, cut))
}

fn splice(head: &TimetableChromosome, tail: &TimetableChromosome, cut: usize) -> TimetableChromosome {
    let mut genes = Vec::with_capacity(tail.len());
    genes.extend_from_slice(&head.genes[..cut]);
    genes.extend_from_slice(&tail.genes[cut..]);
    TimetableChromosome::from_genes(genes)
}

/// Mutates each gene independently with probability `rate`.
///
/// A mutated gene rebinds one uniformly chosen field:
/// - timeslot: from its teacher's available slots (any slot if none),
/// - room: any room,
/// - teacher: a qualified teacher (any teacher if none qualify).
///
/// Returns the number of mutated genes. Marks fitness stale if any.
///
/// # Panics
/// Panics if `rate` is not in `[0, 1]`. [`GaConfig::validate`](super::GaConfig::validate)
/// rejects such rates before a run.
pub fn mutate<R: Rng>(
    problem: &TimetableProblem,
    chromosome: &mut TimetableChromosome,
    rate: f64,
    rng: &mut R,
) -> usize {
    assert!((0.0..=1.0).contains(&rate), "mutation rate {rate} is outside [0, 1]");
    let mut mutated = 0;
    for (session, gene) in problem.sessions().iter().zip(chromosome.genes.iter_mut()) {
        if !rng.random_bool(rate) {
            continue;
        }
        match GeneField::random(rng) {
            GeneField::Timeslot => {
                gene.timeslot = problem.timeslot_candidates(gene.teacher).pick(rng);
            }
            GeneField::Room => {
                gene.room = rng.random_range(0..problem.room_count());
            }
            GeneField::Teacher => {
                gene.teacher = problem.teacher_candidates(session.course).pick(rng);
            }
        }
        mutated += 1;
    }
    if mutated > 0 {
        chromosome.invalidate();
    }
    mutated
}
