//! Three-phase greedy roster construction.
//!
//! # Algorithm
//!
//! Flights are sorted ascending by total crew required (stable), then
//! crewed in three full passes, each relaxing the previous one:
//!
//! | Phase | Eligible crew | Base match | Duty cap |
//! |-------|---------------|------------|----------|
//! | Strict | all ACTIVE | required | 12h |
//! | Pooled | ACTIVE with < 8h duty so far | relaxed | 14h |
//! | Aggressive | all ACTIVE | relaxed | 16h |
//!
//! A flight is committed only when its full pilot and cabin requirement
//! can be met; otherwise nothing is assigned and the flight waits for the
//! next phase. There is no retry within a phase.
//!
//! Ties are broken by uniform random choice from the caller's RNG, so a
//! seeded RNG reproduces the same roster.

use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::models::{Assignment, CrewMember, CrewRole, Flight, RoleClass, Roster};
use crate::registry::Registry;

/// Crew with less duty than this are pooled in [`AssignmentPhase::Pooled`].
pub const UNDERUTILIZED_HOURS: f64 = 8.0;

/// Construction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentPhase {
    /// Base-matched crew, 12h cap.
    Strict,
    /// Underutilized crew from any base, 14h cap.
    Pooled,
    /// Any active crew, 16h cap.
    Aggressive,
}

impl AssignmentPhase {
    /// Phases in execution order.
    pub const ALL: [AssignmentPhase; 3] = [
        AssignmentPhase::Strict,
        AssignmentPhase::Pooled,
        AssignmentPhase::Aggressive,
    ];

    /// Maximum cumulative duty hours after taking a flight.
    pub fn duty_cap(self) -> f64 {
        match self {
            AssignmentPhase::Strict => 12.0,
            AssignmentPhase::Pooled => 14.0,
            AssignmentPhase::Aggressive => 16.0,
        }
    }

    /// Whether crew must be based at the flight's origin.
    pub fn requires_base_match(self) -> bool {
        matches!(self, AssignmentPhase::Strict)
    }

    /// Lowercase name for logs.
    pub fn name(self) -> &'static str {
        match self {
            AssignmentPhase::Strict => "strict",
            AssignmentPhase::Pooled => "pooled",
            AssignmentPhase::Aggressive => "aggressive",
        }
    }
}

/// Cumulative duty hours per crew member during one construction pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DutyLedger {
    hours: HashMap<String, f64>,
}

impl DutyLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hours charged so far (0.0 if none).
    pub fn balance(&self, crew_id: &str) -> f64 {
        self.hours.get(crew_id).copied().unwrap_or(0.0)
    }

    /// Adds hours to a crew member's balance.
    pub fn charge(&mut self, crew_id: &str, hours: f64) {
        *self.hours.entry(crew_id.to_string()).or_insert(0.0) += hours;
    }

    /// Number of crew with a balance.
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    /// Whether nobody has been charged.
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Iterates over (crew ID, hours).
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.hours.iter().map(|(id, &h)| (id.as_str(), h))
    }
}

/// Builds candidate rosters from a registry.
#[derive(Debug, Clone, Copy)]
pub struct ConstructiveAssigner<'a> {
    registry: &'a Registry,
}

impl<'a> ConstructiveAssigner<'a> {
    /// Creates an assigner over a registry.
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Builds one roster and returns it with the final duty ledger.
    ///
    /// The roster may be partial: flights no phase could crew are left out.
    pub fn construct<R: Rng + ?Sized>(&self, rng: &mut R) -> (Roster, DutyLedger) {
        let mut order: Vec<&Flight> = self.registry.flights().iter().collect();
        order.sort_by_key(|f| f.total_crew_required());

        let mut roster = Roster::new();
        let mut ledger = DutyLedger::new();
        let mut covered: HashSet<&str> = HashSet::new();

        for phase in AssignmentPhase::ALL {
            let mut pool: Option<HashSet<&str>> = match phase {
                AssignmentPhase::Pooled => Some(
                    self.registry
                        .crew()
                        .iter()
                        .filter(|c| {
                            c.is_active() && ledger.balance(&c.id) < UNDERUTILIZED_HOURS
                        })
                        .map(|c| c.id.as_str())
                        .collect(),
                ),
                _ => None,
            };

            for &flight in &order {
                if covered.contains(flight.id.as_str()) {
                    continue;
                }

                let Some(crew) = self.crew_flight(flight, phase, &ledger, pool.as_ref(), rng)
                else {
                    continue;
                };

                for a in &crew {
                    ledger.charge(&a.crew_id, a.duty_hours);
                }
                roster.extend(crew);
                covered.insert(flight.id.as_str());

                if let Some(pool) = pool.as_mut() {
                    pool.retain(|id| ledger.balance(id) < UNDERUTILIZED_HOURS);
                }
            }

            info!(
                phase = phase.name(),
                covered = covered.len(),
                total = order.len(),
                "construction phase complete"
            );
        }

        (roster, ledger)
    }

    /// Selects a full crew for one flight, or `None` if any part is short.
    fn crew_flight<R: Rng + ?Sized>(
        &self,
        flight: &Flight,
        phase: AssignmentPhase,
        ledger: &DutyLedger,
        pool: Option<&HashSet<&str>>,
        rng: &mut R,
    ) -> Option<Vec<Assignment>> {
        let pilots = self.eligible(flight, RoleClass::Pilot, phase, ledger, pool);
        let Some(pilots) = pick_pilots(&pilots, flight.pilots_required, rng) else {
            debug!(flight = %flight.id, phase = phase.name(), "pilot requirement unmet");
            return None;
        };

        let cabin = self.eligible(flight, RoleClass::Cabin, phase, ledger, pool);
        let Some(cabin) = pick_cabin(&cabin, flight.cabin_crew_required, rng) else {
            debug!(flight = %flight.id, phase = phase.name(), "cabin requirement unmet");
            return None;
        };

        Some(
            pilots
                .into_iter()
                .chain(cabin)
                .map(|c| Assignment::for_flight(flight, c.id.as_str(), c.role))
                .collect(),
        )
    }

    fn eligible<'f>(
        &self,
        flight: &'f Flight,
        class: RoleClass,
        phase: AssignmentPhase,
        ledger: &DutyLedger,
        pool: Option<&HashSet<&str>>,
    ) -> Vec<&'f CrewMember>
    where
        'a: 'f,
    {
        let base = phase
            .requires_base_match()
            .then_some(flight.origin.as_str());
        let charge = flight.duration_hours + class.duty_buffer_hours();

        self.registry
            .active_crew(class, base)
            .filter(|c| pool.map_or(true, |p| p.contains(c.id.as_str())))
            .filter(|c| ledger.balance(&c.id) + charge <= phase.duty_cap())
            .collect()
    }
}

fn pick_pilots<'c, R: Rng + ?Sized>(
    eligible: &[&'c CrewMember],
    required: u32,
    rng: &mut R,
) -> Option<Vec<&'c CrewMember>> {
    match required {
        0 => Some(Vec::new()),
        1 => eligible.choose(rng).map(|&p| vec![p]),
        2 => {
            let captains: Vec<_> = eligible
                .iter()
                .copied()
                .filter(|c| c.role == CrewRole::Captain)
                .collect();
            let first_officers: Vec<_> = eligible
                .iter()
                .copied()
                .filter(|c| c.role == CrewRole::FirstOfficer)
                .collect();
            let captain = *captains.choose(rng)?;
            let first_officer = *first_officers.choose(rng)?;
            Some(vec![captain, first_officer])
        }
        _ => None,
    }
}

fn pick_cabin<'c, R: Rng + ?Sized>(
    eligible: &[&'c CrewMember],
    required: u32,
    rng: &mut R,
) -> Option<Vec<&'c CrewMember>> {
    let required = required as usize;
    if eligible.len() < required {
        return None;
    }
    Some(eligible.choose_multiple(rng, required).copied().collect())
}
