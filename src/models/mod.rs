//! Crew rostering domain models.
//!
//! Provides the core data types for representing a rostering problem
//! (crew, flights, regulatory thresholds) and its solution (assignments
//! collected into a roster).
//!
//! # Domain Mappings
//!
//! | Rostering | Scheduling | Meaning |
//! |-----------|------------|---------|
//! | Flight | Task | A scheduled sector needing a full crew |
//! | CrewMember | Resource | A pilot or cabin crew member |
//! | Assignment | Assignment | One crew member working one flight |
//! | Roster | Schedule | All assignments of one candidate solution |
//! | RuleSet | Constraint | Regulatory duty-time thresholds |

mod crew;
mod flight;
mod roster;
mod rules;

pub use crew::{CrewMember, CrewRole, CrewStatus, ParseRoleError, RoleClass};
pub use flight::Flight;
pub use roster::{Assignment, Roster};
pub use rules::{ParseRuleCodeError, RuleCode, RuleSet};
