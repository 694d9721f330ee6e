//! Duty-time calculations.
//!
//! Pure functions over a single crew member's assignments: daily and
//! rolling-weekly duty totals, rest between duties and consecutive duty
//! days. Thresholds come from the [`RuleSet`](crate::models::RuleSet);
//! the grace margins below are fixed operational tolerances.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use super::report::{Violation, ViolationCategory};
use crate::error::ComplianceError;
use crate::models::Assignment;

/// Hours tolerated above the daily duty limit.
pub const DAILY_GRACE_HOURS: f64 = 0.5;
/// Hours tolerated above the weekly duty limit.
pub const WEEKLY_GRACE_HOURS: f64 = 2.0;
/// Hours tolerated below the minimum rest.
pub const REST_GRACE_HOURS: f64 = 0.5;
/// Days tolerated above the consecutive duty day limit.
pub const CONSECUTIVE_GRACE_DAYS: u32 = 1;

/// Duty hours per calendar day of departure.
///
/// Assignments without a departure time are skipped.
pub fn daily_duty_hours<'a, I>(assignments: I) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut daily = BTreeMap::new();
    for a in assignments {
        let Some(departure) = a.departure else {
            continue;
        };
        *daily.entry(departure.date()).or_insert(0.0) += a.duty_hours;
    }
    daily
}

/// Largest duty total over any trailing 7-day window.
///
/// Each window ends on a date present in `daily` and reaches 6 days back
/// (inclusive). Returns 0.0 for an empty map.
pub fn weekly_duty_hours(daily: &BTreeMap<NaiveDate, f64>) -> f64 {
    daily
        .keys()
        .map(|&end| {
            let start = end - Duration::days(6);
            daily.range(start..=end).map(|(_, h)| h).sum::<f64>()
        })
        .fold(0.0, f64::max)
}

/// Checks rest between consecutive duties.
///
/// Assignments are ordered by departure. Rest is the time from one
/// arrival to the next departure; a rest not exceeding
/// `min_rest_hours - REST_GRACE_HOURS` is a violation.
///
/// # Errors
/// [`ComplianceError::MissingTimestamp`] if any assignment lacks a
/// departure or arrival, in which case the check cannot run.
pub fn check_rest_periods(
    assignments: &[&Assignment],
    min_rest_hours: f64,
) -> Result<Vec<Violation>, ComplianceError> {
    if assignments.len() < 2 {
        return Ok(Vec::new());
    }

    let mut timed = Vec::with_capacity(assignments.len());
    for a in assignments {
        match (a.departure, a.arrival) {
            (Some(dep), Some(arr)) => timed.push((dep, arr)),
            _ => {
                return Err(ComplianceError::MissingTimestamp {
                    flight_id: a.flight_id.clone(),
                })
            }
        }
    }
    timed.sort_by_key(|&(dep, _)| dep);

    let threshold = min_rest_hours - REST_GRACE_HOURS;
    let violations = timed
        .windows(2)
        .filter_map(|pair| {
            let rest = (pair[1].0 - pair[0].1).num_seconds() as f64 / 3600.0;
            (rest <= threshold).then(|| {
                Violation::new(
                    ViolationCategory::RestPeriods,
                    format!("Short rest: {rest:.1}h between flights"),
                )
                .with_measured(rest)
            })
        })
        .collect();

    Ok(violations)
}

/// Longest run of duty dates where gaps of 1 or 2 days keep the run going.
pub fn max_consecutive_streak(daily: &BTreeMap<NaiveDate, f64>) -> u32 {
    let mut max_streak = 0;
    let mut streak = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in daily.keys() {
        streak = match previous {
            Some(prev) if matches!((day - prev).num_days(), 1 | 2) => streak + 1,
            _ => 1,
        };
        max_streak = max_streak.max(streak);
        previous = Some(day);
    }

    max_streak
}

/// Checks the consecutive duty day limit (plus one day of grace).
pub fn check_consecutive_days(
    daily: &BTreeMap<NaiveDate, f64>,
    max_consecutive_days: u32,
) -> Vec<Violation> {
    let streak = max_consecutive_streak(daily);
    if streak > max_consecutive_days + CONSECUTIVE_GRACE_DAYS {
        vec![Violation::new(
            ViolationCategory::ConsecutiveDays,
            format!("Works {streak} consecutive days"),
        )
        .with_measured(streak as f64)]
    } else {
        Vec::new()
    }
}
