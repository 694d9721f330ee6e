//! Read-only problem snapshot.
//!
//! The registry holds the crew, flights and rule thresholds of one
//! optimization run, indexed by ID. It is never mutated after
//! construction, so it can be shared across worker threads by reference.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::error::{Result, RosterError};
use crate::models::{CrewMember, Flight, RoleClass, RuleSet};
use crate::validation::validate_input;

/// Indexed, immutable crew / flight / rules snapshot.
#[derive(Debug, Clone)]
pub struct Registry {
    flights: Vec<Flight>,
    crew: Vec<CrewMember>,
    rules: RuleSet,
    flight_index: HashMap<String, usize>,
    crew_index: HashMap<String, usize>,
}

/// Summary counts of a registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStats {
    /// Number of flights.
    pub total_flights: usize,
    /// Number of crew members.
    pub total_crew: usize,
    /// Number of ACTIVE crew members.
    pub active_crew: usize,
    /// Crew count per role name.
    pub crew_by_role: BTreeMap<String, usize>,
    /// Flight count per aircraft type.
    pub flights_by_aircraft: BTreeMap<String, usize>,
    /// Flight count per origin station.
    pub flights_by_origin: BTreeMap<String, usize>,
}

impl Registry {
    /// Builds a registry, validating the input first.
    ///
    /// # Errors
    /// [`RosterError::Initialization`] if validation fails.
    pub fn new(flights: Vec<Flight>, crew: Vec<CrewMember>, rules: RuleSet) -> Result<Self> {
        validate_input(&flights, &crew).map_err(RosterError::Initialization)?;

        let flight_index = flights
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        let crew_index = crew
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        info!(
            flights = flights.len(),
            crew = crew.len(),
            "registry initialized"
        );

        Ok(Self {
            flights,
            crew,
            rules,
            flight_index,
            crew_index,
        })
    }

    /// All flights in input order.
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// All crew in input order.
    pub fn crew(&self) -> &[CrewMember] {
        &self.crew
    }

    /// Regulatory thresholds.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Looks up a flight by ID.
    pub fn flight(&self, id: &str) -> Option<&Flight> {
        self.flight_index.get(id).map(|&i| &self.flights[i])
    }

    /// Looks up a crew member by ID.
    pub fn crew_member(&self, id: &str) -> Option<&CrewMember> {
        self.crew_index.get(id).map(|&i| &self.crew[i])
    }

    /// Number of flights.
    #[inline]
    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    /// Number of crew members.
    #[inline]
    pub fn crew_count(&self) -> usize {
        self.crew.len()
    }

    /// ACTIVE crew of a role class, optionally restricted to one base.
    pub fn active_crew<'a>(
        &'a self,
        class: RoleClass,
        base: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CrewMember> + 'a {
        self.crew.iter().filter(move |c| {
            c.is_active() && c.role_class() == class && base.map_or(true, |b| c.base == b)
        })
    }

    /// Summary counts.
    pub fn stats(&self) -> RegistryStats {
        let mut crew_by_role = BTreeMap::new();
        for c in &self.crew {
            *crew_by_role.entry(c.role.to_string()).or_insert(0) += 1;
        }
        let mut flights_by_aircraft = BTreeMap::new();
        let mut flights_by_origin = BTreeMap::new();
        for f in &self.flights {
            *flights_by_aircraft
                .entry(f.aircraft_type.clone())
                .or_insert(0) += 1;
            *flights_by_origin.entry(f.origin.clone()).or_insert(0) += 1;
        }

        RegistryStats {
            total_flights: self.flights.len(),
            total_crew: self.crew.len(),
            active_crew: self.crew.iter().filter(|c| c.is_active()).count(),
            crew_by_role,
            flights_by_aircraft,
            flights_by_origin,
        }
    }
}
