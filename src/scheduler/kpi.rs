//! Roster quality metrics (KPIs).
//!
//! Computes coverage, crew utilization and duty-load indicators from a
//! roster, its registry and a compliance report.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage | Distinct covered flights / total flights (%) |
//! | Utilization | Distinct crew used / total crew (%) |
//! | Max / Avg Duty | Per-crew summed duty hours |
//! | Over 12h / 14h | Crew whose summed duty exceeds the threshold |
//! | Duplicates | Rows repeating a (flight, crew) pair |
//! | Violations | Messages in the compliance report |

use serde::Serialize;
use std::collections::BTreeSet;

use crate::compliance::ComplianceReport;
use crate::models::Roster;
use crate::registry::Registry;

/// One covered flight, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    /// Flight ID.
    pub flight_id: String,
    /// Origin station.
    pub origin: String,
    /// Destination station.
    pub destination: String,
    /// Aircraft type.
    pub aircraft_type: String,
    /// Number of assignment rows on this flight.
    pub crew_assigned: usize,
}

/// Roster performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterKpi {
    /// Number of assignment rows.
    pub total_assignments: usize,
    /// Distinct flights with at least one assignment.
    pub covered_flights: usize,
    /// Flights in the registry.
    pub total_flights: usize,
    /// Covered / total flights (0..100).
    pub coverage_percentage: f64,
    /// Distinct crew members used.
    pub crew_utilized: usize,
    /// Crew in the registry.
    pub total_crew: usize,
    /// Used / total crew (0..100).
    pub utilization_percentage: f64,
    /// Largest per-crew summed duty.
    pub max_duty_hours: f64,
    /// Mean per-crew summed duty over crew used.
    pub avg_duty_hours: f64,
    /// Crew with more than 12h summed duty.
    pub crew_over_12h: usize,
    /// Crew with more than 14h summed duty.
    pub crew_over_14h: usize,
    /// Rows repeating an earlier (flight, crew) pair.
    pub duplicate_assignments: usize,
    /// Compliance violations reported.
    pub violations: usize,
    /// Aircraft types among covered flights.
    pub aircraft_types_covered: BTreeSet<String>,
    /// Covered flights in flight ID order.
    pub flight_details: Vec<FlightSummary>,
}

impl RosterKpi {
    /// Computes KPIs.
    ///
    /// # Arguments
    /// * `roster` - The roster to measure.
    /// * `registry` - Flights and crew the roster was built from.
    /// * `report` - Compliance report of the same roster.
    pub fn calculate(roster: &Roster, registry: &Registry, report: &ComplianceReport) -> Self {
        let total_flights = registry.flight_count();
        let total_crew = registry.crew_count();

        let duty = roster.duty_by_crew();
        let max_duty_hours = duty.values().copied().fold(0.0, f64::max);
        let avg_duty_hours = if duty.is_empty() {
            0.0
        } else {
            duty.values().sum::<f64>() / duty.len() as f64
        };

        let mut aircraft_types_covered = BTreeSet::new();
        let mut flight_details = Vec::new();
        for (flight_id, rows) in roster.by_flight() {
            // Rows for unknown flights are a compliance matter, not a KPI one.
            let Some(flight) = registry.flight(flight_id) else {
                continue;
            };
            aircraft_types_covered.insert(flight.aircraft_type.clone());
            flight_details.push(FlightSummary {
                flight_id: flight.id.clone(),
                origin: flight.origin.clone(),
                destination: flight.destination.clone(),
                aircraft_type: flight.aircraft_type.clone(),
                crew_assigned: rows.len(),
            });
        }

        let crew_utilized = roster.crew_count();

        Self {
            total_assignments: roster.len(),
            covered_flights: roster.covered_flight_count(),
            total_flights,
            coverage_percentage: roster.coverage_ratio(total_flights) * 100.0,
            crew_utilized,
            total_crew,
            utilization_percentage: percentage(crew_utilized, total_crew),
            max_duty_hours,
            avg_duty_hours,
            crew_over_12h: duty.values().filter(|&&h| h > 12.0).count(),
            crew_over_14h: duty.values().filter(|&&h| h > 14.0).count(),
            duplicate_assignments: roster.duplicate_count(),
            violations: report.total(),
            aircraft_types_covered,
            flight_details,
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
