//! Error types.
//!
//! Configuration problems are detected before any generation runs.
//! Lack of convergence is never an error: the runner always returns
//! the best timetable it found.

use thiserror::Error;

/// Invalid run parameters or a degenerate problem instance.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no sessions to schedule: every course requires zero lectures per week")]
    NoSessions,

    #[error("duplicate course ID: {0}")]
    DuplicateCourse(String),

    #[error("no timeslots available")]
    NoTimeslots,

    #[error("no rooms available")]
    NoRooms,

    #[error("no teachers available")]
    NoTeachers,

    #[error("population size ({population}) must exceed elite count ({elite})")]
    PopulationNotAboveElite { population: usize, elite: usize },

    #[error("tournament size must be at least 1")]
    EmptyTournament,

    #[error("tournament size ({tournament}) exceeds population size ({population})")]
    TournamentTooLarge { tournament: usize, population: usize },

    #[error("max_generations must be at least 1")]
    NoGenerations,

    #[error("mutation rate {0} is outside [0, 1]")]
    InvalidMutationRate(f64),

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidPenalty { name: &'static str, value: f64 },

    #[error("target fitness {0} must be a finite number")]
    InvalidTarget(f64),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a timetabling run.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The loop finished without evaluating a single individual.
    #[error("no individual was evaluated")]
    NothingEvaluated,
}
