//! Roster mutation.
//!
//! Replaces the crew member of 1 to 3 random assignments with a random
//! ACTIVE crew member of the same role class based at the flight's origin.
//! The replacement is not checked against other crew already on the same
//! flight, so mutation may introduce duplicate (flight, crew) rows; fitness
//! penalizes them instead.

use rand::seq::{index, IndexedRandom};
use rand::Rng;

use crate::models::Roster;
use crate::registry::Registry;

/// Upper bound on assignments touched by one mutation.
pub const MAX_MUTATED_ASSIGNMENTS: usize = 3;

/// Mutates `roster` in place with probability `rate`.
///
/// Only `crew_id` is overwritten; role and duty hours stay as they were.
/// Assignments whose flight is unknown, or whose flight origin has no
/// eligible crew, are left alone.
///
/// Returns whether a mutation was attempted.
pub fn mutate<R: Rng + ?Sized>(
    roster: &mut Roster,
    registry: &Registry,
    rate: f64,
    rng: &mut R,
) -> bool {
    if roster.is_empty() || !rng.random_bool(rate) {
        return false;
    }

    let len = roster.len();
    let count = rng.random_range(1..=MAX_MUTATED_ASSIGNMENTS.min(len));

    for idx in index::sample(rng, len, count) {
        let assignment = &mut roster.assignments[idx];
        let Some(flight) = registry.flight(&assignment.flight_id) else {
            continue;
        };
        let candidates: Vec<_> = registry
            .active_crew(assignment.role.class(), Some(flight.origin.as_str()))
            .collect();
        if let Some(replacement) = candidates.choose(rng) {
            assignment.crew_id = replacement.id.clone();
        }
    }

    true
}
