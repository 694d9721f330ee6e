//! CSV roster export.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Result, RosterError};
use crate::models::{Assignment, Roster};
use crate::registry::Registry;

const EXPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct RosterRow<'a> {
    flight_id: &'a str,
    crew_id: &'a str,
    role: &'static str,
    duty_hours: f64,
    departure_time: String,
    arrival_time: String,
}

#[derive(Serialize)]
struct JoinedRosterRow<'a> {
    flight_id: &'a str,
    crew_id: &'a str,
    role: &'static str,
    duty_hours: f64,
    departure_time: String,
    arrival_time: String,
    origin: &'a str,
    destination: &'a str,
    aircraft_type: &'a str,
}

impl<'a> RosterRow<'a> {
    fn from_assignment(a: &'a Assignment) -> Self {
        Self {
            flight_id: &a.flight_id,
            crew_id: &a.crew_id,
            role: a.role.as_str(),
            duty_hours: a.duty_hours,
            departure_time: format_time(a.departure),
            arrival_time: format_time(a.arrival),
        }
    }
}

/// Writes a roster as CSV (flight, crew, role, duty hours, timestamps).
///
/// Parent directories are created as needed.
pub fn write_roster(path: impl AsRef<Path>, roster: &Roster) -> Result<()> {
    let path = path.as_ref();
    write_rows(path, roster.iter().map(RosterRow::from_assignment))?;
    info!(path = %path.display(), rows = roster.len(), "roster exported");
    Ok(())
}

/// Writes a roster joined with each flight's origin, destination and
/// aircraft type. Those columns are blank for unknown flights.
pub fn write_roster_with_flights(
    path: impl AsRef<Path>,
    roster: &Roster,
    registry: &Registry,
) -> Result<()> {
    let path = path.as_ref();
    let rows = roster.iter().map(|a| {
        let flight = registry.flight(&a.flight_id);
        let base = RosterRow::from_assignment(a);
        JoinedRosterRow {
            flight_id: base.flight_id,
            crew_id: base.crew_id,
            role: base.role,
            duty_hours: base.duty_hours,
            departure_time: base.departure_time,
            arrival_time: base.arrival_time,
            origin: flight.map_or("", |f| f.origin.as_str()),
            destination: flight.map_or("", |f| f.destination.as_str()),
            aircraft_type: flight.map_or("", |f| f.aircraft_type.as_str()),
        }
    });
    write_rows(path, rows)?;
    info!(path = %path.display(), rows = roster.len(), "joined roster exported");
    Ok(())
}

fn write_rows<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RosterError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_error = |source| RosterError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn format_time(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format(EXPORT_TIME_FORMAT).to_string())
        .unwrap_or_default()
}
