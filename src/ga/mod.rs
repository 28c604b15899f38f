//! GA-based timetable optimization.
//!
//! A generational genetic algorithm over direct `(timeslot, room, teacher)`
//! encodings, with a repair step after every breeding.
//!
//! # Encoding
//!
//! - **Session catalog**: every course expanded into `lectures_per_week`
//!   sessions, sorted by course ID then sequence. Built once per problem.
//! - **Gene**: the binding of one catalog session, stored as indices.
//!   Gene *i* always belongs to session *i*.
//!
//! # Submodules
//!
//! - [`operators`]: Tournament selection, single-point crossover, mutation
//!
//! # Reference
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

mod chromosome;
mod config;
mod fitness;
mod occupancy;
pub mod operators;
mod problem;
mod repair;
mod runner;

pub use chromosome::{random_gene, Gene, TimetableChromosome};
pub use config::{GaConfig, PenaltyWeights, RepairLimits};
pub use fitness::{evaluate, fitness_from_penalty, Evaluation, PenaltyBreakdown};
pub use problem::{Candidates, Session, TimetableProblem};
pub use repair::{conflict_count, repair, GeneRepair, RepairMethod, RepairReport};
pub use runner::{GaResult, GaRunner, GenerationStats, TerminationReason};
