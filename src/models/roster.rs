//! Roster (solution) model.
//!
//! A roster is an ordered list of crew-to-flight assignments. It is not
//! structurally protected against duplicate (flight, crew) pairs: search
//! operators may introduce them, and fitness and compliance checks
//! detect and penalize them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{CrewRole, Flight};

/// One crew member working one flight.
///
/// Duty hours charged are always the flight's block time plus the
/// role's duty buffer; use [`Assignment::for_flight`] to build one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned flight ID.
    pub flight_id: String,
    /// Assigned crew ID.
    pub crew_id: String,
    /// Role worked on this flight.
    pub role: CrewRole,
    /// Duty hours charged (block time + buffer).
    pub duty_hours: f64,
    /// Departure copied from the flight.
    pub departure: Option<NaiveDateTime>,
    /// Arrival copied from the flight.
    pub arrival: Option<NaiveDateTime>,
}

/// An ordered collection of assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Assignments in insertion order.
    pub assignments: Vec<Assignment>,
}

impl Assignment {
    /// Creates the assignment of `crew_id` in `role` on `flight`.
    pub fn for_flight(flight: &Flight, crew_id: impl Into<String>, role: CrewRole) -> Self {
        Self {
            flight_id: flight.id.clone(),
            crew_id: crew_id.into(),
            role,
            duty_hours: flight.duration_hours + role.class().duty_buffer_hours(),
            departure: flight.departure,
            arrival: flight.arrival,
        }
    }

    /// Creates an assignment from raw values (no flight lookup).
    pub fn new(
        flight_id: impl Into<String>,
        crew_id: impl Into<String>,
        role: CrewRole,
        duty_hours: f64,
    ) -> Self {
        Self {
            flight_id: flight_id.into(),
            crew_id: crew_id.into(),
            role,
            duty_hours,
            departure: None,
            arrival: None,
        }
    }

    /// Sets departure and arrival.
    pub fn with_times(mut self, departure: NaiveDateTime, arrival: NaiveDateTime) -> Self {
        self.departure = Some(departure);
        self.arrival = Some(arrival);
        self
    }
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster from assignments.
    pub fn from_assignments(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    /// Appends an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Appends several assignments.
    pub fn extend(&mut self, assignments: impl IntoIterator<Item = Assignment>) {
        self.assignments.extend(assignments);
    }

    /// Number of assignments.
    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the roster has no assignments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Iterates over assignments.
    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.assignments.iter()
    }

    /// All assignments of one crew member, in roster order.
    pub fn assignments_for_crew(&self, crew_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.crew_id == crew_id)
            .collect()
    }

    /// All assignments on one flight, in roster order.
    pub fn assignments_for_flight(&self, flight_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.flight_id == flight_id)
            .collect()
    }

    /// Groups assignments by crew ID (sorted by ID).
    pub fn by_crew(&self) -> BTreeMap<&str, Vec<&Assignment>> {
        let mut groups: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        for a in &self.assignments {
            groups.entry(a.crew_id.as_str()).or_default().push(a);
        }
        groups
    }

    /// Groups assignments by flight ID (sorted by ID).
    pub fn by_flight(&self) -> BTreeMap<&str, Vec<&Assignment>> {
        let mut groups: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        for a in &self.assignments {
            groups.entry(a.flight_id.as_str()).or_default().push(a);
        }
        groups
    }

    /// Distinct flight IDs that appear in the roster.
    pub fn covered_flights(&self) -> HashSet<&str> {
        self.assignments.iter().map(|a| a.flight_id.as_str()).collect()
    }

    /// Number of distinct flights covered.
    pub fn covered_flight_count(&self) -> usize {
        self.covered_flights().len()
    }

    /// Number of distinct crew members used.
    pub fn crew_count(&self) -> usize {
        self.assignments
            .iter()
            .map(|a| a.crew_id.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Covered flights divided by `total_flights`.
    ///
    /// Returns 0.0 when `total_flights` is zero.
    pub fn coverage_ratio(&self, total_flights: usize) -> f64 {
        if total_flights == 0 {
            return 0.0;
        }
        self.covered_flight_count() as f64 / total_flights as f64
    }

    /// Summed duty hours per crew member.
    pub fn duty_by_crew(&self) -> BTreeMap<&str, f64> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for a in &self.assignments {
            *totals.entry(a.crew_id.as_str()).or_insert(0.0) += a.duty_hours;
        }
        totals
    }

    /// (flight, crew) pairs appearing more than once, with their counts.
    pub fn duplicate_pairs(&self) -> Vec<(&str, &str, usize)> {
        let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
        for a in &self.assignments {
            *counts
                .entry((a.flight_id.as_str(), a.crew_id.as_str()))
                .or_insert(0) += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|((f, c), n)| (f, c, n))
            .collect()
    }

    /// Number of rows repeating an earlier (flight, crew) pair.
    ///
    /// Two identical rows count as one duplicate.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_pairs().iter().map(|&(_, _, n)| n - 1).sum()
    }

    /// A copy without any assignment of `crew_id` on `flight_id`.
    pub fn without_pair(&self, flight_id: &str, crew_id: &str) -> Roster {
        Roster::from_assignments(
            self.assignments
                .iter()
                .filter(|a| !(a.flight_id == flight_id && a.crew_id == crew_id))
                .cloned()
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
