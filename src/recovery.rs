//! Disruption recovery.
//!
//! When a crew member is pulled from a flight, the affected assignment is
//! removed and the roster is re-optimized with a fresh search over half
//! the usual generation budget.
//!
//! The disrupted roster (committed roster minus the removed pair) is kept
//! in the outcome for auditing. The fresh search does not start from it.

use tracing::{info, warn};

use crate::ga::{GeneticSearch, SearchConfig, StopReason, Termination};
use crate::models::Roster;
use crate::registry::Registry;

/// Result of a recovery run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryOutcome {
    /// Committed roster without the disrupted (flight, crew) pair.
    pub disrupted: Roster,
    /// Rows removed to form `disrupted`.
    pub removed: usize,
    /// Best roster and score of the re-optimization, if any.
    pub best: Option<(Roster, f64)>,
    /// Generations the re-optimization ran.
    pub generations_run: usize,
    /// Set when the re-optimization stopped early.
    pub stopped: Option<StopReason>,
}

impl RecoveryOutcome {
    /// The roster to commit: the re-optimized one, or the disrupted one
    /// when the search produced nothing.
    pub fn roster(&self) -> &Roster {
        self.best.as_ref().map_or(&self.disrupted, |(r, _)| r)
    }

    /// Consumes the outcome, returning the roster to commit.
    pub fn into_roster(self) -> Roster {
        match self.best {
            Some((roster, _)) => roster,
            None => self.disrupted,
        }
    }
}

/// Re-optimizes after a crew member is removed from a flight.
#[derive(Debug, Clone)]
pub struct DisruptionRecovery<'a> {
    registry: &'a Registry,
    config: SearchConfig,
    termination: Termination,
}

impl<'a> DisruptionRecovery<'a> {
    /// Creates a recovery workflow using the normal search configuration.
    pub fn new(registry: &'a Registry, config: SearchConfig) -> Self {
        Self {
            registry,
            config,
            termination: Termination::new(),
        }
    }

    /// Sets termination signals for the re-optimization.
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    /// Removes `crew_id` from `flight_id` and re-optimizes.
    pub fn recover(&self, roster: &Roster, crew_id: &str, flight_id: &str) -> RecoveryOutcome {
        let disrupted = roster.without_pair(flight_id, crew_id);
        let removed = roster.len() - disrupted.len();
        if removed == 0 {
            warn!(crew = crew_id, flight = flight_id, "disrupted pair not in roster");
        }

        let generations = self.config.recovery_generations();
        info!(
            crew = crew_id,
            flight = flight_id,
            removed,
            generations,
            "recovering from disruption"
        );

        let mut search = GeneticSearch::new(self.registry, self.config.clone())
            .with_termination(self.termination.clone());
        search.initialize_population(self.config.population_size);
        let outcome = search.evolve(generations);

        RecoveryOutcome {
            disrupted,
            removed,
            best: outcome.best,
            generations_run: outcome.generations_run,
            stopped: outcome.stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrewMember, CrewRole, Flight, RuleSet};
    use crate::scheduler::ConstructiveAssigner;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn registry() -> Registry {
        let flights: Vec<Flight> = (1..=4)
            .map(|i| {
                Flight::new(format!("FL00{i}"), "DEL", "BOM", "A320")
                    .with_duration(2.0)
                    .with_crew(1, 1)
            })
            .collect();
        let crew = vec![
            CrewMember::new("PIL0001", CrewRole::Captain)
                .with_base("DEL")
                .with_qualification("A320"),
            CrewMember::new("PIL0002", CrewRole::FirstOfficer)
                .with_base("DEL")
                .with_qualification("A320"),
            CrewMember::new("CAB0001", CrewRole::CrewMember).with_base("DEL"),
            CrewMember::new("CAB0002", CrewRole::CrewMember).with_base("DEL"),
        ];
        Registry::new(flights, crew, RuleSet::default()).unwrap()
    }

    fn config() -> SearchConfig {
        SearchConfig::new()
            .with_population_size(8)
            .with_generations(6)
            .with_seed(42)
    }

    #[test]
    fn test_recovery_keeps_coverage() {
        crate::logging::init_test();
        let reg = registry();
        let (roster, _) = ConstructiveAssigner::new(&reg).construct(&mut SmallRng::seed_from_u64(42));
        let before = roster.coverage_ratio(reg.flight_count());
        assert!((before - 1.0).abs() < 1e-10);

        let victim = roster.assignments[0].clone();
        let outcome = DisruptionRecovery::new(&reg, config()).recover(
            &roster,
            &victim.crew_id,
            &victim.flight_id,
        );

        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.disrupted.len(), roster.len() - 1);
        assert_eq!(outcome.generations_run, 3);

        let after = outcome.roster().coverage_ratio(reg.flight_count());
        assert!(after >= before - 1.0 / reg.flight_count() as f64);
    }

    #[test]
    fn test_recovery_honours_config_time_limit() {
        let reg = registry();
        let (roster, _) = ConstructiveAssigner::new(&reg).construct(&mut SmallRng::seed_from_u64(42));
        let config = config()
            .with_generations(40)
            .with_time_limit(Duration::ZERO);

        let outcome = DisruptionRecovery::new(&reg, config).recover(&roster, "PIL0001", "FL001");
        assert_eq!(outcome.generations_run, 1);
        assert_eq!(outcome.stopped, Some(StopReason::Deadline));
        assert!(outcome.best.is_some());
    }

    #[test]
    fn test_unknown_pair_removes_nothing() {
        crate::logging::init_test();
        let reg = registry();
        let (roster, _) = ConstructiveAssigner::new(&reg).construct(&mut SmallRng::seed_from_u64(42));
        let outcome = DisruptionRecovery::new(&reg, config()).recover(&roster, "NOPE", "FL001");
        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.disrupted, roster);
    }

    #[test]
    fn test_fallback_to_disrupted_roster() {
        let disrupted = Roster::new();
        let outcome = RecoveryOutcome {
            disrupted: disrupted.clone(),
            removed: 1,
            best: None,
            generations_run: 0,
            stopped: None,
        };
        assert_eq!(outcome.roster(), &disrupted);
        assert_eq!(outcome.into_roster(), disrupted);
    }
}
