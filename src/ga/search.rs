//! Population-based roster search.
//!
//! # Algorithm
//!
//! 1. Build the initial population by repeated constructive passes,
//!    keeping non-empty rosters.
//! 2. Each generation: score every roster, sort descending, record the
//!    best-ever roster (strict improvement only), keep the top
//!    `elite_fraction` unchanged, and refill the population with mutated
//!    copies of uniformly chosen elites.
//! 3. Stop after the generation budget, or earlier when the
//!    [`Termination`] fires between generations.
//!
//! # Determinism
//!
//! Every candidate (constructed or mutated) works with a private
//! `SmallRng` seeded from a `u64` drawn from the master RNG in a fixed
//! order. Results are therefore identical whether candidate work runs on
//! the rayon pool or serially.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::SearchConfig;
use super::fitness::fitness;
use super::operators::mutate;
use super::termination::{StopReason, Termination};
use crate::models::Roster;
use crate::registry::Registry;
use crate::scheduler::ConstructiveAssigner;

/// Result of [`GeneticSearch::evolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best roster and score seen across all generations.
    pub best: Option<(Roster, f64)>,
    /// Generations completed.
    pub generations_run: usize,
    /// Set when the search stopped before its budget.
    pub stopped: Option<StopReason>,
}

impl SearchOutcome {
    fn empty() -> Self {
        Self {
            best: None,
            generations_run: 0,
            stopped: None,
        }
    }

    /// Best score, if any roster was scored.
    pub fn best_score(&self) -> Option<f64> {
        self.best.as_ref().map(|(_, s)| *s)
    }
}

/// Genetic search over rosters of one registry.
///
/// # Example
/// ```no_run
/// use u_roster::ga::{GeneticSearch, SearchConfig};
/// # fn demo(registry: &u_roster::Registry) {
/// let config = SearchConfig::new().with_seed(42);
/// let mut search = GeneticSearch::new(registry, config);
/// let outcome = search.run();
/// if let Some((roster, score)) = outcome.best {
///     println!("{} assignments, fitness {score:.1}", roster.len());
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct GeneticSearch<'a> {
    registry: &'a Registry,
    config: SearchConfig,
    seed: u64,
    rng: SmallRng,
    population: Vec<Roster>,
    termination: Termination,
}

impl<'a> GeneticSearch<'a> {
    /// Creates a search. An absent seed is drawn at random and logged.
    pub fn new(registry: &'a Registry, config: SearchConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, "genetic search seeded");

        let mut termination = Termination::new();
        if let Some(limit) = config.time_limit {
            termination = termination.with_time_limit(limit);
        }

        Self {
            registry,
            config,
            seed,
            rng: SmallRng::seed_from_u64(seed),
            population: Vec::new(),
            termination,
        }
    }

    /// Adds termination signals to those derived from the configuration.
    ///
    /// A configured time limit stays in force; see [`Termination::merge`].
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = self.termination.merge(termination);
        self
    }

    /// The master seed in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The current population.
    pub fn population(&self) -> &[Roster] {
        &self.population
    }

    /// Builds `size` rosters and keeps the non-empty ones.
    ///
    /// Returns the resulting population size.
    pub fn initialize_population(&mut self, size: usize) -> usize {
        let seeds: Vec<u64> = (0..size).map(|_| self.rng.random()).collect();
        let assigner = ConstructiveAssigner::new(self.registry);

        let built = self.map_candidates(&seeds, |&seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            assigner.construct(&mut rng).0
        });

        self.population = built.into_iter().filter(|r| !r.is_empty()).collect();

        if self.population.is_empty() {
            warn!(requested = size, "no non-empty roster could be constructed");
        } else {
            info!(
                requested = size,
                kept = self.population.len(),
                "population initialized"
            );
        }
        self.population.len()
    }

    /// Evolves the current population for up to `generations` generations.
    ///
    /// Returns the best roster seen, which need not come from the last
    /// generation. An empty population yields no best roster.
    pub fn evolve(&mut self, generations: usize) -> SearchOutcome {
        if self.population.is_empty() {
            warn!("evolve called on an empty population");
            return SearchOutcome::empty();
        }

        let size = self.population.len();
        let elite_count = self.config.elite_count(size);
        let rate = self.config.mutation_probability();
        let total_flights = self.registry.flight_count();
        let registry = self.registry;

        let mut outcome = SearchOutcome::empty();

        for generation in 0..generations {
            let population = std::mem::take(&mut self.population);
            let scores = self.map_candidates(&population, |r| fitness(r, total_flights));

            let mut ranked: Vec<(Roster, f64)> = population.into_iter().zip(scores).collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

            let leader = ranked[0].1;
            if outcome.best_score().map_or(true, |best| leader > best) {
                outcome.best = Some(ranked[0].clone());
            }
            debug!(generation, leader, "generation scored");

            let elites: Vec<Roster> = ranked
                .into_iter()
                .take(elite_count)
                .map(|(r, _)| r)
                .collect();

            let jobs: Vec<(usize, u64)> = (elites.len()..size)
                .map(|_| (self.rng.random_range(0..elites.len()), self.rng.random()))
                .collect();
            let children = self.map_candidates(&jobs, |&(parent, seed)| {
                let mut child = elites[parent].clone();
                let mut rng = SmallRng::seed_from_u64(seed);
                mutate(&mut child, registry, rate, &mut rng);
                child
            });

            self.population = elites;
            self.population.extend(children);
            outcome.generations_run = generation + 1;

            if let Some(reason) = self.termination.should_stop() {
                info!(generation, %reason, "search stopped early");
                outcome.stopped = Some(reason);
                break;
            }
        }

        if let Some(score) = outcome.best_score() {
            info!(
                generations = outcome.generations_run,
                best = score,
                "search finished"
            );
        }
        outcome
    }

    /// Initializes the configured population and evolves it.
    pub fn run(&mut self) -> SearchOutcome {
        self.initialize_population(self.config.population_size);
        self.evolve(self.config.generations)
    }

    fn map_candidates<T, U, F>(&self, items: &[T], f: F) -> Vec<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> U + Sync + Send,
    {
        if self.config.parallel {
            items.par_iter().map(f).collect()
        } else {
            items.iter().map(f).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::FITNESS_SENTINEL;
    use crate::models::{CrewMember, CrewRole, Flight, RuleSet};
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    fn registry() -> Registry {
        let flights: Vec<Flight> = (1..=6)
            .map(|i| {
                let origin = if i % 2 == 0 { "DEL" } else { "BOM" };
                Flight::new(format!("FL00{i}"), origin, "BLR", "A320")
                    .with_duration(2.0)
                    .with_crew(1, 1)
            })
            .collect();
        let crew: Vec<CrewMember> = ["DEL", "BOM"]
            .iter()
            .enumerate()
            .flat_map(|(b, base)| {
                vec![
                    CrewMember::new(format!("PIL{b}1"), CrewRole::Captain)
                        .with_base(*base)
                        .with_qualification("A320"),
                    CrewMember::new(format!("PIL{b}2"), CrewRole::FirstOfficer)
                        .with_base(*base)
                        .with_qualification("A320"),
                    CrewMember::new(format!("CAB{b}1"), CrewRole::CrewMember).with_base(*base),
                    CrewMember::new(format!("CAB{b}2"), CrewRole::SeniorCrew).with_base(*base),
                ]
            })
            .collect();
        Registry::new(flights, crew, RuleSet::default()).unwrap()
    }

    fn config() -> SearchConfig {
        SearchConfig::new()
            .with_population_size(12)
            .with_generations(8)
            .with_seed(42)
    }

    #[test]
    fn test_initialize_population() {
        let reg = registry();
        let mut search = GeneticSearch::new(&reg, config());
        assert_eq!(search.initialize_population(12), 12);
        assert!(search.population().iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn test_evolve_empty_population() {
        crate::logging::init_test();
        let reg = registry();
        let mut search = GeneticSearch::new(&reg, config());
        let outcome = search.evolve(5);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.generations_run, 0);
    }

    #[test]
    fn test_run_finds_full_coverage() {
        crate::logging::init_test();
        let reg = registry();
        let mut search = GeneticSearch::new(&reg, config());
        let outcome = search.run();

        let (roster, score) = outcome.best.unwrap();
        assert_eq!(outcome.generations_run, 8);
        assert!(outcome.stopped.is_none());
        assert!(score > FITNESS_SENTINEL);
        assert!((score - fitness(&roster, reg.flight_count())).abs() < 1e-10);
        assert_eq!(roster.covered_flight_count(), 6);
        // Population size preserved across generations
        assert_eq!(search.population().len(), 12);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let reg = registry();
        let parallel = GeneticSearch::new(&reg, config()).run();
        let serial = GeneticSearch::new(&reg, config().with_parallel(false)).run();
        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_interrupt_stops_after_one_generation() {
        let reg = registry();
        let flag = Arc::new(AtomicBool::new(true));
        let mut search = GeneticSearch::new(&reg, config())
            .with_termination(Termination::new().with_interrupt(flag));
        let outcome = search.run();

        assert_eq!(outcome.generations_run, 1);
        assert_eq!(outcome.stopped, Some(StopReason::Interrupted));
        assert!(outcome.best.is_some());
    }

    #[test]
    fn test_config_time_limit_survives_with_termination() {
        let reg = registry();
        let flag = Arc::new(AtomicBool::new(false));
        let config = config()
            .with_generations(40)
            .with_time_limit(Duration::ZERO);
        let outcome = GeneticSearch::new(&reg, config)
            .with_termination(Termination::new().with_interrupt(flag))
            .run();

        assert_eq!(outcome.generations_run, 1);
        assert_eq!(outcome.stopped, Some(StopReason::Deadline));
    }

    #[test]
    fn test_best_never_regresses() {
        let reg = registry();
        let mut search = GeneticSearch::new(&reg, config());
        search.initialize_population(12);
        let first = search.evolve(1).best_score().unwrap();
        let later = search.evolve(6).best_score().unwrap();
        // Elites survive unchanged, so the next generation's leader is at least as good.
        assert!(later >= first);
    }
}
