//! Roster fitness.
//!
//! ```text
//! fitness = 1000
//!         + 3000 * coverage
//!         - 100 * |crew with duty > 14h|
//!         -  50 * |crew with duty > 12h|
//!         - 200 * duplicate rows
//! ```
//!
//! The two duty deductions are cumulative: a crew member at 15h costs 150.
//! Higher is better.

use crate::models::Roster;

/// Score of an empty roster.
pub const FITNESS_SENTINEL: f64 = -10_000.0;

const BASE_SCORE: f64 = 1000.0;
const COVERAGE_WEIGHT: f64 = 3000.0;
const OVER_14H_PENALTY: f64 = 100.0;
const OVER_12H_PENALTY: f64 = 50.0;
const DUPLICATE_PENALTY: f64 = 200.0;

/// Scores a roster against the number of flights to cover.
pub fn fitness(roster: &Roster, total_flights: usize) -> f64 {
    if roster.is_empty() {
        return FITNESS_SENTINEL;
    }

    let mut score = BASE_SCORE + roster.coverage_ratio(total_flights) * COVERAGE_WEIGHT;

    for &hours in roster.duty_by_crew().values() {
        if hours > 14.0 {
            score -= OVER_14H_PENALTY;
        }
        if hours > 12.0 {
            score -= OVER_12H_PENALTY;
        }
    }

    score - DUPLICATE_PENALTY * roster.duplicate_count() as f64
}
