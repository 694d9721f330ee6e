//! Search parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Genetic search configuration.
///
/// # Example
/// ```
/// use u_roster::ga::SearchConfig;
///
/// let config = SearchConfig::new()
///     .with_population_size(40)
///     .with_generations(60)
///     .with_seed(42);
/// assert_eq!(config.elite_count(40), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Rosters constructed for the initial population.
    pub population_size: usize,
    /// Generations to evolve.
    pub generations: usize,
    /// Probability that a refilled roster is mutated (0..=1).
    pub mutation_rate: f64,
    /// Share of each generation kept unchanged as elites (0..=1).
    pub elite_fraction: f64,
    /// Master seed; drawn at random (and logged) when absent.
    pub seed: Option<u64>,
    /// Construct, score and mutate candidates on the rayon pool.
    pub parallel: bool,
    /// Wall-clock budget, checked between generations.
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 80,
            generations: 150,
            mutation_rate: 0.3,
            elite_fraction: 0.25,
            seed: None,
            parallel: true,
            time_limit: None,
        }
    }
}

impl SearchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the mutation probability, clamped to 0..=1.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite share, clamped to 0..=1.
    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Fixes the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel candidate work.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets a wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Elites kept from a population of `population` rosters.
    ///
    /// At least one, at most the whole population.
    pub fn elite_count(&self, population: usize) -> usize {
        let n = (population as f64 * self.elite_fraction).floor() as usize;
        n.max(1).min(population)
    }

    /// Generations used when re-optimizing after a disruption.
    pub fn recovery_generations(&self) -> usize {
        (self.generations / 2).max(1)
    }

    /// Mutation rate clamped into a valid probability.
    pub(crate) fn mutation_probability(&self) -> f64 {
        if self.mutation_rate.is_finite() {
            self.mutation_rate.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
