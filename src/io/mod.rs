//! Tabular data ingestion and roster export.
//!
//! Reads the flights, crew and rules CSV tables into domain models and
//! writes rosters back out as CSV. Everything here is plumbing around the
//! engine; no rostering logic lives in this module.

mod export;
mod loader;

pub use export::{write_roster, write_roster_with_flights};
pub use loader::{
    load_crew, load_flights, load_registry, load_rules, parse_timestamp, TIMESTAMP_FORMATS,
};
