//! Flight crew rostering engine.
//!
//! Assigns pilots and cabin crew to scheduled flights, maximizing coverage
//! while honoring duty-time regulations, and re-optimizes when a crew
//! member is pulled from a flight.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `CrewMember`, `Flight`, `Assignment`,
//!   `Roster`, `RuleSet`
//! - **`registry`**: Indexed, immutable problem snapshot shared by all workers
//! - **`validation`**: Input integrity checks (duplicate IDs, crew requirements)
//! - **`compliance`**: Duty-time, rest, consecutive-day, qualification,
//!   base and status checks with categorized violations
//! - **`scheduler`**: Three-phase constructive heuristic and roster KPIs
//! - **`ga`**: Elitist genetic search over rosters
//! - **`recovery`**: Disruption handling
//! - **`session`**: Caller-owned session tying the above together
//! - **`io`** / **`config`** / **`logging`**: CSV tables, JSON configuration,
//!   `tracing` setup
//!
//! # Pipeline
//!
//! ```text
//! Registry -> ConstructiveAssigner -> population -> GeneticSearch
//!          -> best roster -> ComplianceEngine -> report / KPIs
//! ```
//!
//! # Example
//!
//! ```
//! use u_roster::ga::SearchConfig;
//! use u_roster::models::{CrewMember, CrewRole, Flight, RuleSet};
//! use u_roster::{Registry, RosterSession};
//!
//! let flights = vec![Flight::new("FL001", "DEL", "BOM", "A320")
//!     .with_duration(2.0)
//!     .with_crew(1, 1)];
//! let crew = vec![
//!     CrewMember::new("PIL0001", CrewRole::Captain)
//!         .with_base("DEL")
//!         .with_qualification("A320"),
//!     CrewMember::new("CAB0001", CrewRole::CrewMember).with_base("DEL"),
//! ];
//! let registry = Registry::new(flights, crew, RuleSet::default()).unwrap();
//!
//! let config = SearchConfig::new()
//!     .with_population_size(4)
//!     .with_generations(2)
//!     .with_seed(42);
//! let mut session = RosterSession::new(registry, config);
//! let summary = session.generate_roster();
//! assert_eq!(summary.kpi.covered_flights, 1);
//! ```
//!
//! # References
//!
//! - Kohl & Karisch (2004), "Airline Crew Rostering: Problem Types,
//!   Modeling, and Optimization"
//! - Gopalakrishnan & Johnson (2005), "Airline Crew Scheduling:
//!   State-of-the-Art"
//! - DGCA CAR Section 7, Series J, Part III: Flight Duty Time Limitations

pub mod compliance;
pub mod config;
pub mod error;
pub mod ga;
pub mod io;
pub mod logging;
pub mod models;
pub mod recovery;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod validation;

pub use error::{ComplianceError, Result, RosterError};
pub use registry::{Registry, RegistryStats};
pub use session::{ComplianceSummary, FlightCrew, RosterSession, RosterSummary};
