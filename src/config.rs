//! Engine configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! overrides:
//!
//! ```json
//! {
//!   "data": { "flights": "data/input/flights.csv" },
//!   "search": { "generations": 60, "seed": 42 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RosterError};
use crate::ga::SearchConfig;

/// Input and output file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Flights table.
    pub flights: PathBuf,
    /// Crew table.
    pub crew: PathBuf,
    /// Optional rule overrides; defaults apply when the file is absent.
    pub rules: PathBuf,
    /// Generated roster export.
    pub base_roster: PathBuf,
    /// Roster export after disruption recovery.
    pub recovered_roster: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            flights: PathBuf::from("data/input/flights.csv"),
            crew: PathBuf::from("data/input/crew.csv"),
            rules: PathBuf::from("data/input/dgca_rules.csv"),
            base_roster: PathBuf::from("data/output/base_roster.csv"),
            recovered_roster: PathBuf::from("data/output/recovered_roster.csv"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// File locations.
    pub data: DataPaths,
    /// Search parameters.
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    /// [`RosterError::Io`] if the file cannot be read,
    /// [`RosterError::Config`] if it is not valid configuration JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
            .map_err(|e| RosterError::Config(format!("{}: {e}", path.display())))
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
