//! Input validation for rostering problems.
//!
//! Checks structural integrity of flights and crew before a registry is
//! built. Detects:
//! - Empty flight or crew tables
//! - Duplicate flight / crew IDs
//! - Pilot requirements outside 1..=2
//! - Negative block times
//! - Arrivals scheduled before departures
//!
//! Any error here prevents the engine from starting.

use crate::models::{CrewMember, Flight};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// Flights or crew table has no rows.
    EmptyTable,
    /// A flight needs an unsupported number of pilots.
    InvalidCrewRequirement,
    /// A flight has a negative or non-finite block time.
    InvalidDuration,
    /// A flight arrives before it departs.
    InvalidTimeWindow,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a rostering problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(flights: &[Flight], crew: &[CrewMember]) -> ValidationResult {
    let mut errors = Vec::new();

    if flights.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTable,
            "No flights loaded",
        ));
    }
    if crew.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTable,
            "No crew loaded",
        ));
    }

    let mut flight_ids = HashSet::new();
    for f in flights {
        if !flight_ids.insert(f.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate flight ID: {}", f.id),
            ));
        }

        if !(1..=2).contains(&f.pilots_required) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCrewRequirement,
                format!(
                    "Flight '{}' requires {} pilots (expected 1 or 2)",
                    f.id, f.pilots_required
                ),
            ));
        }

        if !f.duration_hours.is_finite() || f.duration_hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Flight '{}' has invalid duration {}", f.id, f.duration_hours),
            ));
        }

        if let (Some(dep), Some(arr)) = (f.departure, f.arrival) {
            if arr < dep {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeWindow,
                    format!("Flight '{}' arrives before it departs", f.id),
                ));
            }
        }
    }

    let mut crew_ids = HashSet::new();
    for c in crew {
        if !crew_ids.insert(c.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate crew ID: {}", c.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
