//! Flight model.
//!
//! A flight is the unit of work to be covered: one sector flown by one
//! aircraft type, needing a fixed number of pilots and cabin crew.
//!
//! # Time Representation
//! Departure and arrival are local wall-clock timestamps without zone.
//! Either may be `None` when the source value could not be interpreted;
//! duty-time aggregation skips such flights rather than failing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A scheduled flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Unique flight identifier.
    pub id: String,
    /// Origin station code.
    pub origin: String,
    /// Destination station code.
    pub destination: String,
    /// Aircraft type (matched against pilot qualifications).
    pub aircraft_type: String,
    /// Scheduled departure.
    pub departure: Option<NaiveDateTime>,
    /// Scheduled arrival.
    pub arrival: Option<NaiveDateTime>,
    /// Block time in hours.
    pub duration_hours: f64,
    /// Number of pilots needed (1 or 2).
    pub pilots_required: u32,
    /// Number of cabin crew needed.
    pub cabin_crew_required: u32,
}

impl Flight {
    /// Creates a flight with one pilot, no cabin crew and no times.
    pub fn new(
        id: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        aircraft_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            origin: origin.into(),
            destination: destination.into(),
            aircraft_type: aircraft_type.into(),
            departure: None,
            arrival: None,
            duration_hours: 0.0,
            pilots_required: 1,
            cabin_crew_required: 0,
        }
    }

    /// Sets departure and arrival, deriving the duration from them.
    pub fn with_times(mut self, departure: NaiveDateTime, arrival: NaiveDateTime) -> Self {
        self.departure = Some(departure);
        self.arrival = Some(arrival);
        self.duration_hours = (arrival - departure).num_seconds() as f64 / 3600.0;
        self
    }

    /// Overrides the block time.
    pub fn with_duration(mut self, hours: f64) -> Self {
        self.duration_hours = hours;
        self
    }

    /// Sets the crew requirement.
    pub fn with_crew(mut self, pilots: u32, cabin_crew: u32) -> Self {
        self.pilots_required = pilots;
        self.cabin_crew_required = cabin_crew;
        self
    }

    /// Pilots plus cabin crew needed.
    #[inline]
    pub fn total_crew_required(&self) -> u32 {
        self.pilots_required + self.cabin_crew_required
    }
}
