//! CSV ingestion.
//!
//! Columns are located by header name, so column order does not matter
//! and extra columns are ignored.
//!
//! | Table | Required columns | Optional columns |
//! |-------|------------------|------------------|
//! | flights | flight_id, origin, destination, aircraft_type, departure_time, arrival_time, pilots_required, cabin_crew_required | flight_duration_hours |
//! | crew | crew_id, base, role, status | qualifications, max_duty_hours |
//! | rules | rule_id, value | rule_name, description |

use chrono::NaiveDateTime;
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::DataPaths;
use crate::error::{Result, RosterError};
use crate::models::{CrewMember, CrewRole, Flight, RuleCode, RuleSet};
use crate::registry::Registry;

/// Accepted timestamp layouts, tried in order.
pub const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a timestamp in any of [`TIMESTAMP_FORMATS`].
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Loads the flights table.
///
/// Unparseable timestamps become `None` with a warning. Block time comes
/// from `flight_duration_hours` when present, otherwise from the
/// timestamps.
pub fn load_flights(path: impl AsRef<Path>) -> Result<Vec<Flight>> {
    let mut table = Table::open(path.as_ref())?;
    let id = table.column("flight_id")?;
    let origin = table.column("origin")?;
    let destination = table.column("destination")?;
    let aircraft = table.column("aircraft_type")?;
    let departure = table.column("departure_time")?;
    let arrival = table.column("arrival_time")?;
    let pilots = table.column("pilots_required")?;
    let cabin = table.column("cabin_crew_required")?;
    let duration = table.optional_column("flight_duration_hours");

    let mut flights = Vec::new();
    for (row, record) in table.records()? {
        let flight_id = get_str_field(&record, id);
        let mut flight = Flight::new(
            flight_id,
            get_str_field(&record, origin),
            get_str_field(&record, destination),
            get_str_field(&record, aircraft),
        )
        .with_crew(
            table.get_u32_field(&record, row, pilots, "pilots_required")?,
            table.get_u32_field(&record, row, cabin, "cabin_crew_required")?,
        );

        let dep = parse_time_field(&record, departure, flight_id, "departure_time");
        let arr = parse_time_field(&record, arrival, flight_id, "arrival_time");
        match (dep, arr) {
            (Some(d), Some(a)) => flight = flight.with_times(d, a),
            (d, a) => {
                flight.departure = d;
                flight.arrival = a;
            }
        }

        if let Some(col) = duration {
            if !get_str_field(&record, col).is_empty() {
                flight = flight.with_duration(table.get_f64_field(
                    &record,
                    row,
                    col,
                    "flight_duration_hours",
                )?);
            }
        }

        flights.push(flight);
    }

    info!(path = %table.path.display(), count = flights.len(), "flights loaded");
    Ok(flights)
}

/// Loads the crew table.
///
/// Qualifications are pipe-delimited; `ALL` means unrestricted. A missing
/// `max_duty_hours` keeps the default.
pub fn load_crew(path: impl AsRef<Path>) -> Result<Vec<CrewMember>> {
    let mut table = Table::open(path.as_ref())?;
    let id = table.column("crew_id")?;
    let base = table.column("base")?;
    let role = table.column("role")?;
    let status = table.column("status")?;
    let qualifications = table.optional_column("qualifications");
    let max_duty = table.optional_column("max_duty_hours");

    let mut crew = Vec::new();
    for (row, record) in table.records()? {
        let role_value: CrewRole = get_str_field(&record, role)
            .parse()
            .map_err(|e| table.invalid(row, "role", format!("{e}")))?;

        let mut member = CrewMember::new(get_str_field(&record, id), role_value)
            .with_base(get_str_field(&record, base))
            .with_status(get_str_field(&record, status));

        if let Some(col) = qualifications {
            member = member.with_qualification_list(get_str_field(&record, col));
        }
        if let Some(col) = max_duty {
            if !get_str_field(&record, col).is_empty() {
                member = member.with_max_duty_hours(table.get_f64_field(
                    &record,
                    row,
                    col,
                    "max_duty_hours",
                )?);
            }
        }

        crew.push(member);
    }

    info!(path = %table.path.display(), count = crew.len(), "crew loaded");
    Ok(crew)
}

/// Loads rule overrides on top of the defaults.
///
/// A missing file yields the defaults. Unknown rule codes are skipped with
/// a warning.
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "rules file not found, using defaults");
        return Ok(RuleSet::default());
    }

    let mut table = Table::open(path)?;
    let id = table.column("rule_id")?;
    let value = table.column("value")?;

    let mut rules = RuleSet::default();
    for (row, record) in table.records()? {
        let code = get_str_field(&record, id);
        match code.parse::<RuleCode>() {
            Ok(rule) => rules.set(rule, table.get_f64_field(&record, row, value, "value")?),
            Err(_) => warn!(rule = code, "unknown rule code skipped"),
        }
    }

    info!(path = %path.display(), ?rules, "rules loaded");
    Ok(rules)
}

/// Loads all tables and builds a validated registry.
pub fn load_registry(paths: &DataPaths) -> Result<Registry> {
    let flights = load_flights(&paths.flights)?;
    let crew = load_crew(&paths.crew)?;
    let rules = load_rules(&paths.rules)?;
    Registry::new(flights, crew, rules)
}

/// A CSV file opened with headers.
struct Table {
    path: PathBuf,
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl Table {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
        })
    }

    fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.optional_column(name)
            .ok_or_else(|| RosterError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    /// Non-blank records with 1-based row numbers.
    fn records(&mut self) -> Result<Vec<(usize, StringRecord)>> {
        let mut rows = Vec::new();
        for (i, result) in self.reader.records().enumerate() {
            let record = result.map_err(|e| csv_error(&self.path, e))?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push((i + 1, record));
        }
        Ok(rows)
    }

    fn invalid(&self, row: usize, field: &str, message: impl Into<String>) -> RosterError {
        RosterError::InvalidRecord {
            path: self.path.clone(),
            row,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn get_f64_field(&self, record: &StringRecord, row: usize, col: usize, name: &str) -> Result<f64> {
        let raw = get_str_field(record, col);
        raw.parse::<f64>()
            .map_err(|e| self.invalid(row, name, format!("'{raw}': {e}")))
    }

    fn get_u32_field(&self, record: &StringRecord, row: usize, col: usize, name: &str) -> Result<u32> {
        let raw = get_str_field(record, col);
        // Tables written by dataframe tools may carry "2.0" for integers.
        raw.parse::<u32>()
            .or_else(|_| match raw.parse::<f64>() {
                Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(v as u32),
                _ => Err(()),
            })
            .map_err(|_| self.invalid(row, name, format!("'{raw}' is not a non-negative integer")))
    }
}

fn get_str_field(record: &StringRecord, col: usize) -> &str {
    record.get(col).unwrap_or("")
}

fn parse_time_field(
    record: &StringRecord,
    col: usize,
    flight_id: &str,
    name: &str,
) -> Option<NaiveDateTime> {
    let raw = get_str_field(record, col);
    let parsed = parse_timestamp(raw);
    if parsed.is_none() {
        warn!(flight = flight_id, field = name, value = raw, "unparseable timestamp");
    }
    parsed
}

fn csv_error(path: &Path, source: csv::Error) -> RosterError {
    RosterError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const FLIGHTS: &str = "\
flight_id,origin,destination,aircraft_type,departure_time,arrival_time,flight_duration_hours,pilots_required,cabin_crew_required
FL001,DEL,BOM,A320,2024-03-01 06:00:00,2024-03-01 08:15:00,2.25,2,4
FL002,BOM,BLR,A321,2024-03-01T09:00:00,2024-03-01T10:30:00,,1,2
FL003,BLR,DEL,A320,garbage,2024-03-01 15:00,2.5,1,2
";

    const CREW: &str = "\
crew_id,base,role,qualifications,rank,status,max_duty_hours
PIL0001,DEL,Captain,A320|A321,P1,ACTIVE,10
PIL0002,BOM,First Officer,A320,P2,ACTIVE,
CAB0001,DEL,Senior Crew,ALL,C1,ON_LEAVE,11
";

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-03-01 06:00:00").is_some());
        assert!(parse_timestamp("2024-03-01T06:00:00").is_some());
        assert!(parse_timestamp("2024-03-01 06:00").is_some());
        assert!(parse_timestamp("01/03/2024").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_load_flights() {
        let file = csv_file(FLIGHTS);
        let flights = load_flights(file.path()).unwrap();
        assert_eq!(flights.len(), 3);

        assert_eq!(flights[0].pilots_required, 2);
        assert_eq!(flights[0].cabin_crew_required, 4);
        assert!((flights[0].duration_hours - 2.25).abs() < 1e-10);

        // Duration derived from timestamps when the column is blank
        assert!((flights[1].duration_hours - 1.5).abs() < 1e-10);

        // Bad timestamp kept as None, the other one still parsed
        assert!(flights[2].departure.is_none());
        assert!(flights[2].arrival.is_some());
        assert!((flights[2].duration_hours - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_load_flights_missing_column() {
        let file = csv_file("flight_id,origin\nFL001,DEL\n");
        let err = load_flights(file.path()).unwrap_err();
        assert!(matches!(err, RosterError::MissingColumn { ref column, .. } if column == "destination"));
    }

    #[test]
    fn test_load_flights_bad_count() {
        let content = "\
flight_id,origin,destination,aircraft_type,departure_time,arrival_time,pilots_required,cabin_crew_required
FL001,DEL,BOM,A320,2024-03-01 06:00:00,2024-03-01 08:00:00,two,4
";
        let file = csv_file(content);
        let err = load_flights(file.path()).unwrap_err();
        assert!(matches!(
            err,
            RosterError::InvalidRecord { row: 1, ref field, .. } if field == "pilots_required"
        ));
    }

    #[test]
    fn test_load_crew() {
        let file = csv_file(CREW);
        let crew = load_crew(file.path()).unwrap();
        assert_eq!(crew.len(), 3);
        assert_eq!(crew[0].qualifications.len(), 2);
        assert_eq!(crew[1].role, CrewRole::FirstOfficer);
        assert!((crew[1].max_duty_hours - 10.0).abs() < 1e-10);
        assert!(crew[2].qualifications.is_empty());
        assert!(!crew[2].is_active());
        assert!((crew[2].max_duty_hours - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_load_crew_bad_role() {
        let file = csv_file("crew_id,base,role,status\nX1,DEL,Navigator,ACTIVE\n");
        let err = load_crew(file.path()).unwrap_err();
        assert!(matches!(err, RosterError::InvalidRecord { ref field, .. } if field == "role"));
    }

    #[test]
    fn test_load_rules() {
        crate::logging::init_test();
        let file = csv_file(
            "rule_id,rule_name,value,description\n\
             DGCA001,Max Daily,9,x\n\
             DGCA004,Max Days,5,x\n\
             DGCA999,Unknown,1,x\n",
        );
        let rules = load_rules(file.path()).unwrap();
        assert!((rules.max_daily_duty_hours - 9.0).abs() < 1e-10);
        assert_eq!(rules.max_consecutive_days, 5);
        assert!((rules.min_rest_hours - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_rules_file_uses_defaults() {
        crate::logging::init_test();
        let rules = load_rules("/nonexistent/dgca_rules.csv").unwrap();
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn test_load_registry() {
        let flights = csv_file(FLIGHTS);
        let crew = csv_file(CREW);
        let paths = DataPaths {
            flights: flights.path().to_path_buf(),
            crew: crew.path().to_path_buf(),
            rules: PathBuf::from("/nonexistent/dgca_rules.csv"),
            ..DataPaths::default()
        };
        let registry = load_registry(&paths).unwrap();
        assert_eq!(registry.flight_count(), 3);
        assert_eq!(registry.crew_count(), 3);
    }

    #[test]
    fn test_missing_flights_file() {
        let err = load_flights("/nonexistent/flights.csv").unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }));
    }
}
