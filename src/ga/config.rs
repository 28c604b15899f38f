//! GA run configuration.
//!
//! Builder-style setters plus TOML loading. Every field has a default,
//! so a TOML file only needs to name what it overrides:
//!
//! ```
//! use u_timetable::ga::GaConfig;
//!
//! let config = GaConfig::from_toml_str(r#"
//!     population_size = 60
//!     seed = 7
//!
//!     [penalties]
//!     soft = 2.5
//! "#).unwrap();
//!
//! assert_eq!(config.population_size, 60);
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.penalties.soft, 2.5);
//! assert_eq!(config.elite_count, 4);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Penalty magnitudes used by the fitness function.
///
/// `hard` must dominate any plausible sum of soft terms so that a single
/// hard violation always outweighs every preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    /// Per hard violation (capacity, double booking, qualification).
    pub hard: f64,
    /// Per session outside its teacher's availability.
    pub soft: f64,
    /// Subtracted per session in a teacher's preferred slot.
    pub preferred_reward: f64,
    /// Distinct timeslots a teacher may use before the spread term applies.
    pub spread_allowance: usize,
    /// Per distinct timeslot beyond the allowance.
    pub spread_weight: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            hard: 1_000_000.0,
            soft: 5.0,
            preferred_reward: 1.0,
            spread_allowance: 3,
            spread_weight: 0.5,
        }
    }
}

/// Sampling bounds for the repair heuristic.
///
/// At most `teachers × timeslots × rooms` trial bindings per gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairLimits {
    pub teachers: usize,
    pub timeslots: usize,
    pub rooms: usize,
}

impl Default for RepairLimits {
    fn default() -> Self {
        Self {
            teachers: 4,
            timeslots: 5,
            rooms: 3,
        }
    }
}

impl RepairLimits {
    /// Upper bound on trials per gene.
    pub fn max_trials(&self) -> usize {
        self.teachers * self.timeslots * self.rooms
    }
}

/// Configuration for [`GaRunner`](super::GaRunner).
///
/// # Examples
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_max_generations(200)
///     .with_seed(42)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,

    /// Maximum number of evaluated generations.
    pub max_generations: usize,

    /// Contestants per tournament.
    pub tournament_size: usize,

    /// Per-gene mutation probability.
    pub mutation_rate: f64,

    /// Individuals copied unchanged into the next generation.
    pub elite_count: usize,

    /// Stop once the best fitness exceeds this value.
    pub target_fitness: f64,

    pub penalties: PenaltyWeights,

    pub repair: RepairLimits,

    /// Wall-clock budget, checked between generations.
    pub time_limit_ms: Option<u64>,

    /// Log progress at INFO every this many generations (0 disables).
    pub progress_interval: usize,

    /// Evaluate and breed with rayon. Results do not depend on this flag.
    pub parallel: bool,

    /// Random seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 800,
            tournament_size: 3,
            mutation_rate: 0.2,
            elite_count: 4,
            target_fitness: 0.999_999,
            penalties: PenaltyWeights::default(),
            repair: RepairLimits::default(),
            time_limit_ms: None,
            progress_interval: 20,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = target;
        self
    }

    pub fn with_penalties(mut self, penalties: PenaltyWeights) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn with_repair_limits(mut self, limits: RepairLimits) -> Self {
        self.repair = limits;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = Some(limit.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    pub fn with_progress_interval(mut self, n: usize) -> Self {
        self.progress_interval = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Wall-clock budget, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size <= self.elite_count {
            return Err(ConfigError::PopulationNotAboveElite {
                population: self.population_size,
                elite: self.elite_count,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if self.tournament_size > self.population_size {
            return Err(ConfigError::TournamentTooLarge {
                tournament: self.tournament_size,
                population: self.population_size,
            });
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if !self.target_fitness.is_finite() {
            return Err(ConfigError::InvalidTarget(self.target_fitness));
        }
        let p = &self.penalties;
        for (name, value) in [
            ("hard penalty", p.hard),
            ("soft penalty", p.soft),
            ("preferred reward", p.preferred_reward),
            ("spread weight", p.spread_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPenalty { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 800);
        assert_eq!(config.tournament_size, 3);
        assert_eq!(config.elite_count, 4);
        assert!((config.mutation_rate - 0.2).abs() < 1e-12);
        assert_eq!(config.penalties.hard, 1_000_000.0);
        assert_eq!(config.repair.max_trials(), 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_population_vs_elite() {
        let config = GaConfig::default().with_population_size(4).with_elite_count(4);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PopulationNotAboveElite { population: 4, elite: 4 })
        ));

        let empty = GaConfig::default().with_population_size(0).with_elite_count(0);
        assert!(matches!(
            empty.validate(),
            Err(ConfigError::PopulationNotAboveElite { .. })
        ));
    }

    #[test]
    fn test_validate_tournament() {
        let config = GaConfig::default().with_population_size(5).with_tournament_size(6).with_elite_count(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TournamentTooLarge { tournament: 6, population: 5 })
        ));
        let config = GaConfig::default().with_tournament_size(0);
        assert!(matches!(config.validate(), Err(ConfigError::EmptyTournament)));
    }

    #[test]
    fn test_validate_rates_and_penalties() {
        assert!(matches!(
            GaConfig::default().with_mutation_rate(1.5).validate(),
            Err(ConfigError::InvalidMutationRate(_))
        ));
        assert!(matches!(
            GaConfig::default().with_mutation_rate(f64::NAN).validate(),
            Err(ConfigError::InvalidMutationRate(_))
        ));
        assert!(matches!(
            GaConfig::default().with_max_generations(0).validate(),
            Err(ConfigError::NoGenerations)
        ));
        let penalties = PenaltyWeights {
            soft: -1.0,
            ..PenaltyWeights::default()
        };
        assert!(matches!(
            GaConfig::default().with_penalties(penalties).validate(),
            Err(ConfigError::InvalidPenalty { name: "soft penalty", .. })
        ));
    }

    #[test]
    fn test_from_toml() {
        let config = GaConfig::from_toml_str(
            r#"
            max_generations = 50
            parallel = false
            time_limit_ms = 1500

            [repair]
            teachers = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.max_generations, 50);
        assert!(!config.parallel);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
        assert_eq!(config.repair.teachers, 2);
        assert_eq!(config.repair.timeslots, 5);
        assert_eq!(config.population_size, 100);
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(matches!(
            GaConfig::from_toml_str("population_size = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            GaConfig::load("/nonexistent/timetable.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
