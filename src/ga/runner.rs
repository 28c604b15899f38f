//! Generational loop.
//!
//! ```text
//! INITIALIZING → EVALUATING ⇄ BREEDING
//!                    ↓
//!                TERMINATED
//! ```
//!
//! Each generation is evaluated, the best-ever candidate is updated on
//! strict improvement, and the loop stops on the target fitness, the
//! generation limit or the time budget. Otherwise the elite survive
//! unchanged and the rest of the next generation is bred by tournament
//! selection, single-point crossover, mutation and repair.
//!
//! # Reproducibility
//!
//! Every child pair is bred from its own `SmallRng`, seeded from the
//! master generator before breeding starts. Serial and rayon-parallel
//! runs with the same seed therefore produce identical results.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::chromosome::TimetableChromosome;
use super::config::{GaConfig, PenaltyWeights, RepairLimits};
use super::fitness::{evaluate, Evaluation};
use super::operators::GeneticOperators;
use super::problem::TimetableProblem;
use super::repair::repair;
use crate::error::TimetableError;
use crate::models::Timetable;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Best fitness exceeded the configured target.
    TargetReached,
    /// `max_generations` generations were evaluated.
    GenerationLimit,
    /// The wall-clock budget ran out.
    TimeLimit,
}

/// Progress signal emitted after each evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation index (0-based).
    pub generation: usize,
    /// Best fitness seen so far, across all generations.
    pub best_fitness: f64,
    /// Best fitness in this generation.
    pub population_best: f64,
    /// Mean fitness in this generation.
    pub mean_fitness: f64,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best candidate ever evaluated.
    pub best: TimetableChromosome,
    pub best_fitness: f64,
    /// Penalty breakdown of `best`.
    pub evaluation: Evaluation,
    /// Generations evaluated.
    pub generations: usize,
    pub termination: TerminationReason,
    pub history: Vec<GenerationStats>,
    pub elapsed: Duration,
}

impl GaResult {
    /// Converts the best candidate into output records.
    pub fn timetable(&self, problem: &TimetableProblem) -> Timetable {
        problem.decode(&self.best)
    }

    /// Whether the best candidate violates no hard constraint.
    pub fn is_feasible(&self) -> bool {
        self.evaluation.breakdown.is_feasible()
    }
}

/// Runs the timetabling GA.
///
/// # Example
/// ```
/// use u_timetable::ga::{GaConfig, GaRunner, TimetableProblem};
/// use u_timetable::models::{Course, Group, Room, Teacher, Timeslot};
///
/// let problem = TimetableProblem::new(
///     &[Course::new("CS101", "G1").with_lectures(2).with_size(30)],
///     &[Teacher::new("T1")
///         .with_qualifications(["CS101"])
///         .with_availability(["Mon_09:00", "Tue_09:00", "Wed_09:00"])],
///     &[Group::new("G1", 30)],
///     &[Room::new("R1", 40)],
///     &[Timeslot::new("Mon_09:00"), Timeslot::new("Tue_09:00"), Timeslot::new("Wed_09:00")],
/// )
/// .unwrap();
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_max_generations(50)
///     .with_seed(42);
/// let result = GaRunner::run(&problem, &config).unwrap();
/// assert!(result.is_feasible());
/// assert_eq!(result.timetable(&problem).session_count(), 2);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs to termination.
    ///
    /// # Errors
    /// Returns [`TimetableError::Config`] if `config` is invalid. Never
    /// fails for lack of convergence.
    pub fn run(problem: &TimetableProblem, config: &GaConfig) -> Result<GaResult, TimetableError> {
        Self::run_with_observer(problem, config, |_| {})
    }

    /// Runs to termination, calling `observer` after every evaluation.
    pub fn run_with_observer<F>(
        problem: &TimetableProblem,
        config: &GaConfig,
        mut observer: F,
    ) -> Result<GaResult, TimetableError>
    where
        F: FnMut(&GenerationStats),
    {
        config.validate()?;
        let start = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        info!(
            event = "solve_start",
            sessions = problem.session_count(),
            teachers = problem.teacher_count(),
            rooms = problem.room_count(),
            timeslots = problem.timeslot_count(),
            population = config.population_size,
            seed = ?config.seed,
            "timetabling started"
        );

        let ops = GeneticOperators::new(config.tournament_size, config.mutation_rate);
        let mut population: Vec<TimetableChromosome> = (0..config.population_size)
            .map(|_| TimetableChromosome::random(problem, &mut rng))
            .collect();

        let mut best: Option<TimetableChromosome> = None;
        let mut best_fitness = f64::NEG_INFINITY;
        let mut history = Vec::new();
        let mut generation = 0;

        let termination = loop {
            evaluate_population(problem, &mut population, &config.penalties, config.parallel);

            let mut population_best = f64::NEG_INFINITY;
            let mut total = 0.0;
            for ch in &population {
                total += ch.fitness;
                population_best = population_best.max(ch.fitness);
                if ch.fitness > best_fitness {
                    best_fitness = ch.fitness;
                    best = Some(ch.clone());
                }
            }

            let stats = GenerationStats {
                generation,
                best_fitness,
                population_best,
                mean_fitness: total / population.len() as f64,
            };
            debug!(
                generation,
                best_fitness,
                population_best,
                mean_fitness = stats.mean_fitness,
                "generation evaluated"
            );
            if config.progress_interval > 0 && generation % config.progress_interval == 0 {
                info!(generation, best_fitness, "progress");
            }
            observer(&stats);
            history.push(stats);
            generation += 1;

            if best_fitness > config.target_fitness {
                break TerminationReason::TargetReached;
            }
            if generation >= config.max_generations {
                break TerminationReason::GenerationLimit;
            }
            if config.time_limit().is_some_and(|limit| start.elapsed() >= limit) {
                break TerminationReason::TimeLimit;
            }

            population = next_generation(problem, &population, config, &ops, &mut rng);
        };

        let best = best.ok_or(TimetableError::NothingEvaluated)?;
        let evaluation = evaluate(problem, &best, &config.penalties);
        let elapsed = start.elapsed();

        info!(
            event = "solve_end",
            termination = ?termination,
            generations = generation,
            best_fitness,
            penalty = evaluation.penalty,
            hard_violations = evaluation.breakdown.hard_violations(),
            elapsed_ms = elapsed.as_millis() as u64,
            "timetabling finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            evaluation,
            generations: generation,
            termination,
            history,
            elapsed,
        })
    }
}

/// Scores every chromosome whose fitness is stale.
fn evaluate_population(
    problem: &TimetableProblem,
    population: &mut [TimetableChromosome],
    weights: &PenaltyWeights,
    parallel: bool,
) {
    let score = |ch: &mut TimetableChromosome| {
        if !ch.is_evaluated() {
            ch.fitness = evaluate(problem, ch, weights).fitness;
        }
    };
    if parallel {
        population.par_iter_mut().for_each(score);
    } else {
        population.iter_mut().for_each(score);
    }
}

/// Elite carry-over plus bred offspring, `population_size` in total.
fn next_generation(
    problem: &TimetableProblem,
    population: &[TimetableChromosome],
    config: &GaConfig,
    ops: &GeneticOperators,
    rng: &mut SmallRng,
) -> Vec<TimetableChromosome> {
    let mut ranked: Vec<usize> = (0..population.len()).collect();
    ranked.sort_by(|&a, &b| population[b].fitness.total_cmp(&population[a].fitness));

    let mut next: Vec<TimetableChromosome> = Vec::with_capacity(config.population_size);
    next.extend(
        ranked
            .iter()
            .take(config.elite_count)
            .map(|&i| population[i].clone()),
    );

    let pairs = (config.population_size - next.len()).div_ceil(2);
    let seeds: Vec<u64> = (0..pairs).map(|_| rng.random()).collect();
    let breed = |&seed: &u64| breed_pair(problem, population, ops, &config.repair, seed);
    let children: Vec<(TimetableChromosome, TimetableChromosome)> = if config.parallel {
        seeds.par_iter().map(breed).collect()
    } else {
        seeds.iter().map(breed).collect()
    };

    for (c1, c2) in children {
        next.push(c1);
        if next.len() < config.population_size {
            next.push(c2);
        }
    }
    next
}

fn breed_pair(
    problem: &TimetableProblem,
    population: &[TimetableChromosome],
    ops: &GeneticOperators,
    limits: &RepairLimits,
    seed: u64,
) -> (TimetableChromosome, TimetableChromosome) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let p1 = ops.select(population, &mut rng);
    let p2 = ops.select(population, &mut rng);
    let (mut c1, mut c2) = ops.crossover(&p1, &p2, &mut rng);
    ops.mutate(problem, &mut c1, &mut rng);
    ops.mutate(problem, &mut c2, &mut rng);
    repair(problem, &mut c1, limits, &mut rng);
    repair(problem, &mut c2, limits, &mut rng);
    (c1, c2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::models::{Course, Group, Room, Teacher, Timeslot};
    use std::collections::HashMap;

    fn config() -> GaConfig {
        GaConfig::default()
            .with_population_size(20)
            .with_elite_count(2)
            .with_max_generations(30)
            .with_seed(42)
            .with_parallel(false)
    }

    fn slots(ids: &[&str]) -> Vec<Timeslot> {
        ids.iter().map(|&id| Timeslot::new(id)).collect()
    }

    fn busy_problem() -> TimetableProblem {
        let ids = ["Mon_09", "Mon_10", "Mon_11", "Tue_09", "Tue_10", "Tue_11"];
        TimetableProblem::new(
            &[
                Course::new("A", "G1").with_lectures(3).with_size(30),
                Course::new("B", "G1").with_lectures(2).with_size(30),
                Course::new("C", "G2").with_lectures(3).with_size(20),
                Course::new("D", "G2").with_lectures(2).with_size(20),
            ],
            &[
                Teacher::new("T1")
                    .with_qualifications(["A", "C"])
                    .with_availability(["Mon_09", "Mon_10", "Mon_11", "Tue_09"])
                    .with_preferences(["Mon_09"]),
                Teacher::new("T2")
                    .with_qualifications(["B", "D"])
                    .with_availability(["Tue_09", "Tue_10", "Tue_11"]),
                Teacher::new("T3").with_qualifications(["C"]),
            ],
            &[Group::new("G1", 30), Group::new("G2", 20)],
            &[Room::new("R1", 35), Room::new("R2", 25)],
            &slots(&ids),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let p = busy_problem();
        let bad = config().with_population_size(2);
        let mut calls = 0;
        let err = GaRunner::run_with_observer(&p, &bad, |_| calls += 1).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::Config(ConfigError::PopulationNotAboveElite { population: 2, elite: 2 })
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_single_session_converges_immediately() {
        let p = TimetableProblem::new(
            &[Course::new("A", "G1").with_lectures(1).with_size(20)],
            &[Teacher::new("T1")
                .with_qualifications(["A"])
                .with_availability(["Mon_09", "Mon_10"])],
            &[Group::new("G1", 20)],
            &[Room::new("R1", 25)],
            &slots(&["Mon_09", "Mon_10"]),
        )
        .unwrap();

        let result = GaRunner::run(&p, &config().with_max_generations(100)).unwrap();
        assert_eq!(result.best_fitness, 1.0);
        assert_eq!(result.termination, TerminationReason::TargetReached);
        assert!(result.generations <= 5);
        assert!(result.is_feasible());
    }

    #[test]
    fn test_unavoidable_teacher_double_booking() {
        let p = TimetableProblem::new(
            &[
                Course::new("A", "G1").with_lectures(1).with_size(20),
                Course::new("B", "G1").with_lectures(1).with_size(20),
            ],
            &[Teacher::new("T1")
                .with_qualifications(["A", "B"])
                .with_availability(["Mon_09"])],
            &[Group::new("G1", 20)],
            &[Room::new("R1", 30), Room::new("R2", 30)],
            &slots(&["Mon_09"]),
        )
        .unwrap();

        let result = GaRunner::run(&p, &config()).unwrap();
        assert!(result.best_fitness < 1.0);
        assert_eq!(result.termination, TerminationReason::GenerationLimit);
        assert_eq!(result.evaluation.breakdown.teacher_clashes, 1);

        let timetable = result.timetable(&p);
        let mut buckets: HashMap<(&str, &str), usize> = HashMap::new();
        for s in &timetable.sessions {
            *buckets.entry((s.timeslot_id.as_str(), s.teacher_id.as_str())).or_insert(0) += 1;
        }
        let doubled: Vec<usize> = buckets.values().copied().filter(|&n| n > 1).collect();
        assert_eq!(doubled, vec![2]);
    }

    #[test]
    fn test_undersized_room_penalized_for_every_session() {
        let p = TimetableProblem::new(
            &[Course::new("A", "G1").with_lectures(2).with_size(50)],
            &[Teacher::new("T1")
                .with_qualifications(["A"])
                .with_availability(["Mon_09", "Mon_10", "Mon_11"])],
            &[Group::new("G1", 50)],
            &[Room::new("R1", 10)],
            &slots(&["Mon_09", "Mon_10", "Mon_11"]),
        )
        .unwrap();
        let hard = PenaltyWeights::default().hard;
        let expected = 1.0 / (1.0 + hard * 2.0);

        for generations in [1, 30] {
            let result = GaRunner::run(&p, &config().with_max_generations(generations)).unwrap();
            assert_eq!(result.evaluation.breakdown.over_capacity, 2);
            assert!((result.best_fitness - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn test_elitism_keeps_population_best_monotone() {
        let p = busy_problem();
        let mut seen = Vec::new();
        let result =
            GaRunner::run_with_observer(&p, &config().with_max_generations(40), |s| seen.push(*s))
                .unwrap();

        assert_eq!(seen.len(), result.generations);
        assert_eq!(seen, result.history);
        for w in seen.windows(2) {
            assert!(w[1].population_best >= w[0].population_best);
            assert!(w[1].best_fitness >= w[0].best_fitness);
        }
        let last = seen.last().map(|s| s.best_fitness);
        assert_eq!(last, Some(result.best_fitness));
    }

    #[test]
    fn test_best_result_matches_reevaluation() {
        let p = busy_problem();
        let cfg = config();
        let result = GaRunner::run(&p, &cfg).unwrap();
        assert!(result.best.is_valid(&p));
        let again = evaluate(&p, &result.best, &cfg.penalties);
        assert_eq!(again.fitness, result.best_fitness);
        assert_eq!(result.evaluation, again);
        assert_eq!(result.timetable(&p).session_count(), p.session_count());
    }

    #[test]
    fn test_parallel_matches_serial() {
        let p = busy_problem();
        let serial = GaRunner::run(&p, &config().with_parallel(false)).unwrap();
        let parallel = GaRunner::run(&p, &config().with_parallel(true)).unwrap();
        assert_eq!(serial.best.genes, parallel.best.genes);
        assert_eq!(serial.best_fitness, parallel.best_fitness);
        assert_eq!(serial.history, parallel.history);
    }

    #[test]
    fn test_time_limit_stops_at_generation_boundary() {
        let p = TimetableProblem::new(
            &[Course::new("A", "G1").with_lectures(2).with_size(50)],
            &[Teacher::new("T1").with_qualifications(["A"])],
            &[Group::new("G1", 50)],
            &[Room::new("R1", 10)],
            &slots(&["Mon_09", "Mon_10"]),
        )
        .unwrap();
        let cfg = config()
            .with_max_generations(1000)
            .with_time_limit(Duration::ZERO);
        let result = GaRunner::run(&p, &cfg).unwrap();
        assert_eq!(result.termination, TerminationReason::TimeLimit);
        assert_eq!(result.generations, 1);
    }
}
