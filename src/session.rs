//! Caller-owned rostering session.
//!
//! A [`RosterSession`] holds one registry, the search configuration and the
//! currently committed roster. Every operation goes through it; there is
//! no process-wide engine state.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::compliance::{ComplianceEngine, ViolationCategory};
use crate::config::EngineConfig;
use crate::error::{Result, RosterError};
use crate::ga::{fitness, GeneticSearch, SearchConfig, StopReason, Termination};
use crate::io;
use crate::models::{Assignment, Flight, Roster};
use crate::recovery::DisruptionRecovery;
use crate::registry::{Registry, RegistryStats};
use crate::scheduler::RosterKpi;

/// Violations of one roster and their per-category counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceSummary {
    /// Messages ordered by category.
    pub violations: Vec<String>,
    /// Count per category.
    pub breakdown: BTreeMap<ViolationCategory, usize>,
}

/// A roster with its score, metrics and compliance.
#[derive(Debug, Clone, Serialize)]
pub struct RosterSummary {
    /// The roster.
    pub roster: Roster,
    /// Fitness score.
    pub fitness: f64,
    /// Metrics.
    pub kpi: RosterKpi,
    /// Compliance check result.
    pub compliance: ComplianceSummary,
    /// Generations the search completed.
    pub generations_run: usize,
    /// Set when the search stopped before its generation budget.
    pub stopped: Option<StopReason>,
}

/// One flight with the assignments working it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightCrew {
    /// The flight.
    pub flight: Flight,
    /// Assignments on the flight, in roster order.
    pub crew: Vec<Assignment>,
}

/// Rostering session over one registry.
#[derive(Debug)]
pub struct RosterSession {
    registry: Arc<Registry>,
    config: SearchConfig,
    compliance: ComplianceEngine,
    termination: Termination,
    recovered_output: Option<PathBuf>,
    roster: Option<Roster>,
}

impl RosterSession {
    /// Creates a session without a roster.
    pub fn new(registry: Registry, config: SearchConfig) -> Self {
        let registry = Arc::new(registry);
        Self {
            compliance: ComplianceEngine::new(Arc::clone(&registry)),
            registry,
            config,
            termination: Termination::new(),
            recovered_output: None,
            roster: None,
        }
    }

    /// Loads the configured tables and creates a session.
    ///
    /// Recovered rosters are written to `config.data.recovered_roster`.
    ///
    /// # Errors
    /// Any load or initialization error.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let registry = io::load_registry(&config.data)?;
        Ok(Self::new(registry, config.search.clone())
            .with_recovered_output(&config.data.recovered_roster))
    }

    /// Sets termination signals used by every search of this session.
    ///
    /// A time limit in the search configuration still applies.
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    /// Writes every recovered roster, joined with flight details, to `path`.
    pub fn with_recovered_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.recovered_output = Some(path.into());
        self
    }

    /// The registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the full search and commits its best roster.
    ///
    /// If the search produces nothing, an empty roster is committed.
    pub fn generate_roster(&mut self) -> RosterSummary {
        let outcome = GeneticSearch::new(&self.registry, self.config.clone())
            .with_termination(self.termination.clone())
            .run();

        let roster = match outcome.best {
            Some((roster, score)) => {
                info!(assignments = roster.len(), score, "roster generated");
                roster
            }
            None => {
                warn!("search produced no roster");
                Roster::new()
            }
        };

        self.commit(roster, outcome.generations_run, outcome.stopped)
    }

    /// The committed roster.
    ///
    /// # Errors
    /// [`RosterError::NoRoster`] before the first generation.
    pub fn current_roster(&self) -> Result<&Roster> {
        self.roster.as_ref().ok_or(RosterError::NoRoster)
    }

    /// The committed roster grouped by flight, in flight ID order.
    pub fn roster_by_flight(&self) -> Result<Vec<FlightCrew>> {
        let roster = self.current_roster()?;
        Ok(roster
            .by_flight()
            .into_iter()
            .filter_map(|(flight_id, rows)| {
                let flight = self.registry.flight(flight_id)?;
                Some(FlightCrew {
                    flight: flight.clone(),
                    crew: rows.into_iter().cloned().collect(),
                })
            })
            .collect())
    }

    /// Removes `crew_id` from `flight_id`, re-optimizes and commits the
    /// result.
    ///
    /// When a recovered-roster output is set, the committed roster is
    /// also written there.
    ///
    /// # Errors
    /// [`RosterError::NoRoster`] before the first generation, or an export
    /// error.
    pub fn handle_disruption(&mut self, crew_id: &str, flight_id: &str) -> Result<RosterSummary> {
        let current = self.current_roster()?;
        let outcome = DisruptionRecovery::new(&self.registry, self.config.clone())
            .with_termination(self.termination.clone())
            .recover(current, crew_id, flight_id);
        let (generations_run, stopped) = (outcome.generations_run, outcome.stopped);
        let summary = self.commit(outcome.into_roster(), generations_run, stopped);

        if let Some(path) = &self.recovered_output {
            io::write_roster_with_flights(path, &summary.roster, &self.registry)?;
        }
        Ok(summary)
    }

    /// Checks an arbitrary roster.
    pub fn check_compliance(&mut self, roster: &Roster) -> ComplianceSummary {
        let violations = self.compliance.check_roster_compliance(roster);
        ComplianceSummary {
            violations,
            breakdown: self.compliance.violation_breakdown(),
        }
    }

    /// Checks the committed roster.
    pub fn check_current_compliance(&mut self) -> Result<ComplianceSummary> {
        let roster = self.roster.take().ok_or(RosterError::NoRoster)?;
        let summary = self.check_compliance(&roster);
        self.roster = Some(roster);
        Ok(summary)
    }

    /// Per-category counts of the last compliance check.
    pub fn violation_breakdown(&self) -> BTreeMap<ViolationCategory, usize> {
        self.compliance.violation_breakdown()
    }

    /// Registry statistics.
    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Writes the committed roster, joined with flight details, as CSV.
    pub fn export_roster(&self, path: impl AsRef<Path>) -> Result<()> {
        io::write_roster_with_flights(path, self.current_roster()?, &self.registry)
    }

    fn commit(
        &mut self,
        roster: Roster,
        generations_run: usize,
        stopped: Option<StopReason>,
    ) -> RosterSummary {
        let compliance = self.check_compliance(&roster);
        let kpi = RosterKpi::calculate(&roster, &self.registry, self.compliance.last_report());
        let summary = RosterSummary {
            fitness: fitness(&roster, self.registry.flight_count()),
            roster: roster.clone(),
            kpi,
            compliance,
            generations_run,
            stopped,
        };
        self.roster = Some(roster);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrewMember, CrewRole, RuleSet};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    fn registry() -> Registry {
        let flights: Vec<Flight> = (1..=3)
            .map(|i| {
                Flight::new(format!("FL00{i}"), "DEL", "BOM", "A320")
                    .with_duration(1.5)
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
            CrewMember::new("CAB0002", CrewRole::Trainee).with_base("DEL"),
        ];
        Registry::new(flights, crew, RuleSet::default()).unwrap()
    }

    fn session() -> RosterSession {
        let config = SearchConfig::new()
            .with_population_size(6)
            .with_generations(4)
            .with_seed(42);
        RosterSession::new(registry(), config)
    }

    #[test]
    fn test_no_roster_before_generation() {
        let mut s = session();
        assert!(matches!(s.current_roster(), Err(RosterError::NoRoster)));
        assert!(matches!(s.roster_by_flight(), Err(RosterError::NoRoster)));
        assert!(matches!(
            s.handle_disruption("PIL0001", "FL001"),
            Err(RosterError::NoRoster)
        ));
        assert!(matches!(
            s.check_current_compliance(),
            Err(RosterError::NoRoster)
        ));
    }

    #[test]
    fn test_generate_and_query() {
        crate::logging::init_test();
        let mut s = session();
        let summary = s.generate_roster();

        assert_eq!(summary.kpi.covered_flights, 3);
        assert!((summary.kpi.coverage_percentage - 100.0).abs() < 1e-10);
        assert_eq!(s.current_roster().unwrap(), &summary.roster);

        let by_flight = s.roster_by_flight().unwrap();
        assert_eq!(by_flight.len(), 3);
        assert_eq!(by_flight[0].flight.id, "FL001");
        assert_eq!(by_flight[0].crew.len(), 2);

        let compliance = s.check_current_compliance().unwrap();
        assert_eq!(compliance, summary.compliance);
        assert_eq!(s.violation_breakdown(), compliance.breakdown);
    }

    #[test]
    fn test_disruption() {
        let mut s = session();
        let before = s.generate_roster();
        let victim = before.roster.assignments[0].clone();

        let after = s
            .handle_disruption(&victim.crew_id, &victim.flight_id)
            .unwrap();
        assert!(after.kpi.coverage_percentage >= before.kpi.coverage_percentage - 100.0 / 3.0);
        assert_eq!(s.current_roster().unwrap(), &after.roster);
    }

    #[test]
    fn test_config_time_limit_applies_to_session_searches() {
        let config = SearchConfig::new()
            .with_population_size(6)
            .with_generations(40)
            .with_seed(42)
            .with_time_limit(Duration::ZERO);
        let flag = Arc::new(AtomicBool::new(false));
        let mut s = RosterSession::new(registry(), config)
            .with_termination(Termination::new().with_interrupt(flag));

        let generated = s.generate_roster();
        assert_eq!(generated.generations_run, 1);
        assert_eq!(generated.stopped, Some(StopReason::Deadline));

        let victim = generated.roster.assignments[0].clone();
        let recovered = s
            .handle_disruption(&victim.crew_id, &victim.flight_id)
            .unwrap();
        assert_eq!(recovered.generations_run, 1);
        assert_eq!(recovered.stopped, Some(StopReason::Deadline));
    }

    #[test]
    fn test_disruption_writes_recovered_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output").join("recovered_roster.csv");
        let mut s = session().with_recovered_output(&path);

        s.generate_roster();
        assert!(!path.exists());

        let victim = s.current_roster().unwrap().assignments[0].clone();
        let recovered = s
            .handle_disruption(&victim.crew_id, &victim.flight_id)
            .unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().get(6), Some("origin"));
        assert_eq!(reader.records().count(), recovered.roster.len());
    }

    #[test]
    fn test_compliance_query_on_arbitrary_roster() {
        let mut s = session();
        let a = Assignment::new("FL001", "PIL0001", CrewRole::Captain, 2.0);
        let summary = s.check_compliance(&Roster::from_assignments(vec![a.clone(), a]));
        assert_eq!(summary.breakdown[&ViolationCategory::Other], 1);

        let empty = s.check_compliance(&Roster::new());
        assert_eq!(empty.violations, vec!["Empty roster provided".to_string()]);
    }

    #[test]
    fn test_stats_and_export() {
        let mut s = session();
        assert_eq!(s.stats().total_flights, 3);

        s.generate_roster();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base_roster.csv");
        s.export_roster(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1 + s.current_roster().unwrap().len());
    }
}
