//! Error types.
//!
//! Only two things are allowed to fail from a caller's point of view:
//! building the registry (missing or malformed mandatory data) and asking
//! for a roster before one exists. Everything the engine discovers about a
//! roster is reported as data, not as an error.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced to callers.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Registry input failed validation.
    #[error("registry initialization failed: {}", summarize(.0))]
    Initialization(Vec<ValidationError>),

    /// A data file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file is not valid CSV.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from a table header.
    #[error("{path}: missing column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    /// A field could not be interpreted.
    #[error("{path} row {row}, field '{field}': {message}")]
    InvalidRecord {
        path: PathBuf,
        row: usize,
        field: String,
        message: String,
    },

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No roster has been generated yet.
    #[error("no roster available; generate one first")]
    NoRoster,
}

/// Errors from a compliance check that could not run.
///
/// Distinguishes "no violations" from "check not performed".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplianceError {
    /// An assignment lacks a departure or arrival time.
    #[error("missing timestamp on flight {flight_id}")]
    MissingTimestamp { flight_id: String },
}

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, RosterError>;

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (+{} more)", first.message, rest.len()),
    }
}
