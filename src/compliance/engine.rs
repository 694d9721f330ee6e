//! Roster compliance evaluation.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::duty::{
    check_consecutive_days, check_rest_periods, daily_duty_hours, weekly_duty_hours,
    DAILY_GRACE_HOURS, WEEKLY_GRACE_HOURS,
};
use super::report::{ComplianceReport, Violation, ViolationCategory};
use crate::models::{Assignment, Roster};
use crate::registry::Registry;

/// Stations a crew member may operate from, keyed by home base.
///
/// Bases absent from the table only operate from home.
pub fn adjacent_bases(base: &str) -> &'static [&'static str] {
    match base {
        "DEL" => &["BOM", "BLR"],
        "BOM" => &["DEL", "BLR"],
        "BLR" => &["DEL", "BOM", "HYD"],
        _ => &[],
    }
}

/// Whether crew based at `base` may operate a flight departing `origin`.
pub fn base_compatible(base: &str, origin: &str) -> bool {
    base == origin || adjacent_bases(base).contains(&origin)
}

/// Evaluates rosters against the registry's regulatory thresholds.
///
/// The engine keeps the report of its last roster-wide check so the
/// breakdown can be queried afterwards; every check starts from an empty
/// report.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    registry: Arc<Registry>,
    last_report: ComplianceReport,
}

impl ComplianceEngine {
    /// Creates an engine over a registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            last_report: ComplianceReport::new(),
        }
    }

    /// The registry checked against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Checks one crew member against one flight.
    ///
    /// Qualification (pilots only), base compatibility and status are
    /// checked in that order. Unknown IDs produce a single `other`
    /// violation.
    pub fn check_assignment_validity(&self, crew_id: &str, flight_id: &str) -> (bool, Vec<Violation>) {
        let (Some(crew), Some(flight)) = (
            self.registry.crew_member(crew_id),
            self.registry.flight(flight_id),
        ) else {
            return (
                false,
                vec![Violation::new(
                    ViolationCategory::Other,
                    "Invalid crew_id or flight_id",
                )],
            );
        };

        let mut violations = Vec::new();

        if !crew.is_qualified_for(&flight.aircraft_type) {
            violations.push(Violation::new(
                ViolationCategory::Qualifications,
                format!("Not qualified for {}", flight.aircraft_type),
            ));
        }

        if !base_compatible(&crew.base, &flight.origin) {
            violations.push(Violation::new(
                ViolationCategory::BaseMismatch,
                format!("Major base mismatch: {} to {}", crew.base, flight.origin),
            ));
        }

        if !crew.is_active() {
            violations.push(Violation::new(
                ViolationCategory::Status,
                format!("Crew status is {}", crew.status),
            ));
        }

        (violations.is_empty(), violations)
    }

    /// Checks duty-time rules over one crew member's assignments.
    ///
    /// A rest check that cannot run is reported as an `other` violation.
    pub fn check_duty_hours_compliance(
        &self,
        crew_id: &str,
        assignments: &[&Assignment],
    ) -> (bool, Vec<Violation>) {
        let daily = daily_duty_hours(assignments.iter().copied());
        if daily.is_empty() {
            return (true, Vec::new());
        }

        let rules = self.registry.rules();
        let mut violations = Vec::new();

        for (date, &hours) in &daily {
            if hours > rules.max_daily_duty_hours + DAILY_GRACE_HOURS {
                violations.push(
                    Violation::new(
                        ViolationCategory::DutyHours,
                        format!("Exceeds daily limit on {date}: {hours:.1}h"),
                    )
                    .with_measured(hours),
                );
            }
        }

        let weekly = weekly_duty_hours(&daily);
        if weekly > rules.max_weekly_duty_hours + WEEKLY_GRACE_HOURS {
            violations.push(
                Violation::new(
                    ViolationCategory::DutyHours,
                    format!("Exceeds weekly limit: {weekly:.1}h"),
                )
                .with_measured(weekly),
            );
        }

        match check_rest_periods(assignments, rules.min_rest_hours) {
            Ok(rest) => violations.extend(rest),
            Err(e) => violations.push(Violation::new(
                ViolationCategory::Other,
                format!("Rest period check not performed: {e}"),
            )),
        }

        violations.extend(check_consecutive_days(&daily, rules.max_consecutive_days));

        if !violations.is_empty() {
            debug!(crew = crew_id, count = violations.len(), "duty violations");
        }

        (violations.is_empty(), violations)
    }

    /// Builds a fresh report for a roster without touching engine state.
    pub fn evaluate(&self, roster: &Roster) -> ComplianceReport {
        let mut report = ComplianceReport::new();

        for (crew_id, group) in roster.by_crew() {
            let (_, duty) = self.check_duty_hours_compliance(crew_id, &group);
            for v in duty {
                report.push(v.category, format!("{crew_id}: {}", v.message));
            }

            for a in &group {
                let (_, validity) = self.check_assignment_validity(crew_id, &a.flight_id);
                for v in validity {
                    report.push(
                        v.category,
                        format!("{crew_id} on {}: {}", a.flight_id, v.message),
                    );
                }
            }
        }

        for msg in Self::check_for_duplicates(roster) {
            report.push(ViolationCategory::Other, msg);
        }
        for msg in self.check_crew_qualifications(roster) {
            report.push(ViolationCategory::Qualifications, msg);
        }

        report
    }

    /// Checks a whole roster and returns every violation message.
    ///
    /// Messages are ordered by category. The per-category counts remain
    /// available through [`violation_breakdown`](Self::violation_breakdown)
    /// until the next call.
    pub fn check_roster_compliance(&mut self, roster: &Roster) -> Vec<String> {
        if roster.is_empty() {
            self.last_report = ComplianceReport::new();
            return vec!["Empty roster provided".to_string()];
        }

        self.last_report = self.evaluate(roster);
        self.last_report.flatten()
    }

    /// Report of the last roster-wide check.
    pub fn last_report(&self) -> &ComplianceReport {
        &self.last_report
    }

    /// Per-category counts of the last roster-wide check.
    pub fn violation_breakdown(&self) -> BTreeMap<ViolationCategory, usize> {
        self.last_report.breakdown()
    }

    /// One message per row repeating an earlier (flight, crew) pair.
    pub fn check_for_duplicates(roster: &Roster) -> Vec<String> {
        let mut seen = HashSet::new();
        roster
            .iter()
            .filter(|a| !seen.insert((a.flight_id.as_str(), a.crew_id.as_str())))
            .map(|a| {
                format!(
                    "Crew {} assigned multiple times to flight {}",
                    a.crew_id, a.flight_id
                )
            })
            .collect()
    }

    /// Pilots assigned to aircraft types they are not rated on.
    ///
    /// Rows with unknown IDs are skipped here; validity checks report them.
    pub fn check_crew_qualifications(&self, roster: &Roster) -> Vec<String> {
        roster
            .iter()
            .filter_map(|a| {
                let crew = self.registry.crew_member(&a.crew_id)?;
                let flight = self.registry.flight(&a.flight_id)?;
                (crew.role.is_pilot() && !crew.is_qualified_for(&flight.aircraft_type)).then(|| {
                    format!(
                        "Pilot {} not qualified for {}",
                        crew.id, flight.aircraft_type
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrewMember, CrewRole, CrewStatus, Flight, RuleSet};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn engine() -> ComplianceEngine {
        let flights = vec![
            Flight::new("FL001", "DEL", "BOM", "A320")
                .with_times(at(1, 6, 0), at(1, 8, 0))
                .with_crew(1, 1),
            Flight::new("FL002", "HYD", "DEL", "B737")
                .with_times(at(1, 12, 0), at(1, 14, 0))
                .with_crew(1, 1),
            Flight::new("FL003", "BOM", "DEL", "A320")
                .with_times(at(2, 6, 0), at(2, 8, 0))
                .with_crew(1, 0),
        ];
        let crew = vec![
            CrewMember::new("PIL0001", CrewRole::Captain)
                .with_base("DEL")
                .with_qualification("A320"),
            CrewMember::new("PIL0002", CrewRole::FirstOfficer)
                .with_base("BLR")
                .with_qualification("A320")
                .with_status(CrewStatus::from("SICK")),
            CrewMember::new("CAB0001", CrewRole::CrewMember).with_base("DEL"),
        ];
        let registry = Registry::new(flights, crew, RuleSet::default()).unwrap();
        ComplianceEngine::new(Arc::new(registry))
    }

    fn assign(engine: &ComplianceEngine, flight: &str, crew: &str) -> Assignment {
        let f = engine.registry().flight(flight).unwrap();
        let c = engine.registry().crew_member(crew).unwrap();
        Assignment::for_flight(f, crew, c.role)
    }

    #[test]
    fn test_base_adjacency() {
        assert!(base_compatible("DEL", "DEL"));
        assert!(base_compatible("DEL", "BOM"));
        assert!(!base_compatible("DEL", "HYD"));
        assert!(base_compatible("BLR", "HYD"));
        assert!(!base_compatible("HYD", "BLR"));
    }

    #[test]
    fn test_assignment_validity_ok() {
        let e = engine();
        let (valid, v) = e.check_assignment_validity("PIL0001", "FL001");
        assert!(valid);
        assert!(v.is_empty());
    }

    #[test]
    fn test_assignment_validity_unknown_ids() {
        let e = engine();
        let (valid, v) = e.check_assignment_validity("NOPE", "FL001");
        assert!(!valid);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, ViolationCategory::Other);
        assert_eq!(v[0].message, "Invalid crew_id or flight_id");
    }

    #[test]
    fn test_assignment_validity_order() {
        let e = engine();
        // HYD origin, B737: pilot unqualified and base mismatch
        let (valid, v) = e.check_assignment_validity("PIL0001", "FL002");
        assert!(!valid);
        let cats: Vec<_> = v.iter().map(|x| x.category).collect();
        assert_eq!(
            cats,
            vec![ViolationCategory::Qualifications, ViolationCategory::BaseMismatch]
        );
        assert_eq!(v[0].message, "Not qualified for B737");
        assert_eq!(v[1].message, "Major base mismatch: DEL to HYD");

        // Cabin crew: qualification never checked
        let (_, v) = e.check_assignment_validity("CAB0001", "FL002");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, ViolationCategory::BaseMismatch);
    }

    #[test]
    fn test_assignment_validity_status() {
        let e = engine();
        // BLR -> DEL is adjacent, so only status fails
        let (valid, v) = e.check_assignment_validity("PIL0002", "FL001");
        assert!(!valid);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, ViolationCategory::Status);
        assert_eq!(v[0].message, "Crew status is SICK");
    }

    #[test]
    fn test_duty_compliance_empty() {
        let e = engine();
        let (ok, v) = e.check_duty_hours_compliance("PIL0001", &[]);
        assert!(ok);
        assert!(v.is_empty());
    }

    #[test]
    fn test_duty_compliance_daily_limit() {
        let e = engine();
        let a = Assignment::new("FL001", "PIL0001", CrewRole::Captain, 6.0)
            .with_times(at(1, 0, 0), at(1, 5, 30));
        let b = Assignment::new("FL003", "PIL0001", CrewRole::Captain, 5.0)
            .with_times(at(1, 18, 0), at(1, 22, 30));
        let (ok, v) = e.check_duty_hours_compliance("PIL0001", &[&a, &b]);
        assert!(!ok);
        assert!(v
            .iter()
            .any(|x| x.category == ViolationCategory::DutyHours
                && x.message == "Exceeds daily limit on 2024-03-01: 11.0h"));
    }

    fn daily_duties(hours: &[f64]) -> Vec<Assignment> {
        hours
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                let d = i as u32 + 1;
                Assignment::new(format!("FX{d}"), "PIL0001", CrewRole::Captain, h)
                    .with_times(at(d, 6, 0), at(d, 7, 0))
            })
            .collect()
    }

    #[test]
    fn test_duty_compliance_weekly_grace() {
        let e = engine();

        let at_grace = daily_duties(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 2.0]);
        let refs: Vec<&Assignment> = at_grace.iter().collect();
        let (ok, v) = e.check_duty_hours_compliance("PIL0001", &refs);
        assert!(ok, "{v:?}");

        let over = daily_duties(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 2.1]);
        let refs: Vec<&Assignment> = over.iter().collect();
        let (ok, v) = e.check_duty_hours_compliance("PIL0001", &refs);
        assert!(!ok);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, ViolationCategory::DutyHours);
        assert_eq!(v[0].message, "Exceeds weekly limit: 62.1h");
        assert!((v[0].measured.unwrap() - 62.1).abs() < 1e-10);
    }

    #[test]
    fn test_duty_compliance_reports_short_rest() {
        let e = engine();
        let a = Assignment::new("FL001", "PIL0001", CrewRole::Captain, 2.5)
            .with_times(at(1, 6, 0), at(1, 8, 0));
        let b = Assignment::new("FL003", "PIL0001", CrewRole::Captain, 2.5)
            .with_times(at(1, 19, 0), at(1, 21, 0));
        let (ok, v) = e.check_duty_hours_compliance("PIL0001", &[&b, &a]);
        assert!(!ok);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, ViolationCategory::RestPeriods);
        assert_eq!(v[0].message, "Short rest: 11.0h between flights");
    }

    #[test]
    fn test_duty_compliance_reports_consecutive_days() {
        let e = engine();
        let duties = daily_duties(&[2.0; 8]);
        let refs: Vec<&Assignment> = duties.iter().collect();
        let (ok, v) = e.check_duty_hours_compliance("PIL0001", &refs);
        assert!(!ok);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, ViolationCategory::ConsecutiveDays);
        assert_eq!(v[0].message, "Works 8 consecutive days");

        let (ok, _) = e.check_duty_hours_compliance("PIL0001", &refs[..7]);
        assert!(ok);
    }

    #[test]
    fn test_roster_buckets_for_rest_and_consecutive_days() {
        let mut e = engine();
        let mut rows = vec![
            Assignment::new("FL001", "PIL0001", CrewRole::Captain, 2.5)
                .with_times(at(1, 6, 0), at(1, 8, 0)),
            Assignment::new("FL003", "PIL0001", CrewRole::Captain, 2.5)
                .with_times(at(1, 18, 0), at(1, 20, 0)),
        ];
        // CAB0001 works FL001 on eight consecutive days.
        rows.extend((1..=8).map(|d| {
            Assignment::new("FL001", "CAB0001", CrewRole::CrewMember, 2.3)
                .with_times(at(d, 6, 0), at(d, 8, 0))
        }));
        let msgs = e.check_roster_compliance(&Roster::from_assignments(rows));

        let b = e.violation_breakdown();
        assert_eq!(b[&ViolationCategory::RestPeriods], 1);
        assert_eq!(b[&ViolationCategory::ConsecutiveDays], 1);
        assert_eq!(b[&ViolationCategory::DutyHours], 0);
        assert!(msgs.contains(&"PIL0001: Short rest: 10.0h between flights".to_string()));
        assert!(msgs.contains(&"CAB0001: Works 8 consecutive days".to_string()));
    }

    #[test]
    fn test_duty_compliance_missing_timestamp_reported_as_other() {
        let e = engine();
        let a = Assignment::new("FL001", "PIL0001", CrewRole::Captain, 2.5)
            .with_times(at(1, 6, 0), at(1, 8, 0));
        let mut b = Assignment::new("FL003", "PIL0001", CrewRole::Captain, 2.5)
            .with_times(at(2, 6, 0), at(2, 8, 0));
        b.arrival = None;
        let (ok, v) = e.check_duty_hours_compliance("PIL0001", &[&a, &b]);
        assert!(!ok);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, ViolationCategory::Other);
        assert!(v[0].message.contains("FL003"));
    }

    #[test]
    fn test_empty_roster_message() {
        let mut e = engine();
        let msgs = e.check_roster_compliance(&Roster::new());
        assert_eq!(msgs, vec!["Empty roster provided".to_string()]);
        assert!(e.violation_breakdown().values().all(|&n| n == 0));
    }

    #[test]
    fn test_clean_roster() {
        let mut e = engine();
        let roster = Roster::from_assignments(vec![
            assign(&e, "FL001", "PIL0001"),
            assign(&e, "FL001", "CAB0001"),
            assign(&e, "FL003", "PIL0001"),
        ]);
        let msgs = e.check_roster_compliance(&roster);
        assert!(msgs.is_empty(), "{msgs:?}");
        assert!(e.last_report().is_clean());
    }

    #[test]
    fn test_duplicates_counted_once() {
        let mut e = engine();
        let a = assign(&e, "FL001", "PIL0001");
        let roster = Roster::from_assignments(vec![a.clone(), a]);

        let dups = ComplianceEngine::check_for_duplicates(&roster);
        assert_eq!(dups, vec!["Crew PIL0001 assigned multiple times to flight FL001"]);

        e.check_roster_compliance(&roster);
        assert_eq!(e.violation_breakdown()[&ViolationCategory::Other], 1);
    }

    #[test]
    fn test_roster_tags_and_breakdown() {
        let mut e = engine();
        let roster = Roster::from_assignments(vec![
            assign(&e, "FL002", "PIL0001"),
            assign(&e, "FL001", "PIL0002"),
        ]);
        let msgs = e.check_roster_compliance(&roster);

        assert!(msgs.contains(&"PIL0001 on FL002: Not qualified for B737".to_string()));
        assert!(msgs.contains(&"PIL0001 on FL002: Major base mismatch: DEL to HYD".to_string()));
        assert!(msgs.contains(&"PIL0002 on FL001: Crew status is SICK".to_string()));
        assert!(msgs.contains(&"Pilot PIL0001 not qualified for B737".to_string()));

        let b = e.violation_breakdown();
        assert_eq!(b[&ViolationCategory::Qualifications], 2);
        assert_eq!(b[&ViolationCategory::BaseMismatch], 1);
        assert_eq!(b[&ViolationCategory::Status], 1);
        assert_eq!(msgs.len(), 4);
        // Category order: qualifications before status
        assert_eq!(msgs.last().unwrap(), "PIL0002 on FL001: Crew status is SICK");
    }

    #[test]
    fn test_evaluate_is_pure() {
        let e = engine();
        let roster = Roster::from_assignments(vec![assign(&e, "FL001", "PIL0002")]);
        let report = e.evaluate(&roster);
        assert_eq!(report.total(), 1);
        assert!(e.last_report().is_clean());
    }
}
