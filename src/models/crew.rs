//! Crew member model.
//!
//! Crew members are the resources assigned to flights. Each has a home
//! base, a role (which decides whether they fly the aircraft or work the
//! cabin), aircraft type qualifications and an employment status.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A pilot or cabin crew member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Unique crew identifier (e.g. `PIL0001`).
    pub id: String,
    /// Home base station code (e.g. `DEL`).
    pub base: String,
    /// Operational role.
    pub role: CrewRole,
    /// Aircraft types this member may operate.
    ///
    /// Only meaningful for pilot roles; cabin roles are qualified for
    /// every aircraft and usually carry an empty set.
    pub qualifications: BTreeSet<String>,
    /// Employment status.
    pub status: CrewStatus,
    /// Contractual maximum duty hours.
    pub max_duty_hours: f64,
}

/// Operational crew role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrewRole {
    /// Pilot in command.
    Captain,
    /// Second pilot.
    #[serde(rename = "First Officer", alias = "FirstOfficer")]
    FirstOfficer,
    /// Lead cabin crew.
    #[serde(rename = "Senior Crew", alias = "SeniorCrew")]
    SeniorCrew,
    /// Regular cabin crew.
    #[serde(rename = "Crew Member", alias = "CrewMember")]
    CrewMember,
    /// Cabin crew in training.
    Trainee,
}

/// Pilot / cabin split of [`CrewRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleClass {
    /// Flight deck crew (`Captain`, `FirstOfficer`).
    Pilot,
    /// Cabin crew (`SeniorCrew`, `CrewMember`, `Trainee`).
    Cabin,
}

/// Employment status. Only [`CrewStatus::Active`] crew may be rostered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CrewStatus {
    /// Available for duty.
    Active,
    /// Any other status (leave, training, sick, ...), kept verbatim.
    Other(String),
}

/// Returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown crew role: {0}")]
pub struct ParseRoleError(pub String);

impl CrewRole {
    /// All roles, pilots first.
    pub const ALL: [CrewRole; 5] = [
        CrewRole::Captain,
        CrewRole::FirstOfficer,
        CrewRole::SeniorCrew,
        CrewRole::CrewMember,
        CrewRole::Trainee,
    ];

    /// The pilot / cabin class of this role.
    pub fn class(self) -> RoleClass {
        match self {
            CrewRole::Captain | CrewRole::FirstOfficer => RoleClass::Pilot,
            CrewRole::SeniorCrew | CrewRole::CrewMember | CrewRole::Trainee => RoleClass::Cabin,
        }
    }

    /// Whether this is a flight deck role.
    #[inline]
    pub fn is_pilot(self) -> bool {
        self.class() == RoleClass::Pilot
    }

    /// Display name as used in crew tables.
    pub fn as_str(self) -> &'static str {
        match self {
            CrewRole::Captain => "Captain",
            CrewRole::FirstOfficer => "First Officer",
            CrewRole::SeniorCrew => "Senior Crew",
            CrewRole::CrewMember => "Crew Member",
            CrewRole::Trainee => "Trainee",
        }
    }
}

impl RoleClass {
    /// Pre/post-flight duty overhead in hours.
    #[inline]
    pub fn duty_buffer_hours(self) -> f64 {
        match self {
            RoleClass::Pilot => 0.5,
            RoleClass::Cabin => 0.3,
        }
    }
}

impl fmt::Display for CrewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrewRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "captain" => Ok(CrewRole::Captain),
            "firstofficer" => Ok(CrewRole::FirstOfficer),
            "seniorcrew" => Ok(CrewRole::SeniorCrew),
            "crewmember" => Ok(CrewRole::CrewMember),
            "trainee" => Ok(CrewRole::Trainee),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

impl CrewStatus {
    /// Whether the member can be rostered.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, CrewStatus::Active)
    }
}

impl From<String> for CrewStatus {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("ACTIVE") {
            CrewStatus::Active
        } else {
            CrewStatus::Other(s.trim().to_string())
        }
    }
}

impl From<&str> for CrewStatus {
    fn from(s: &str) -> Self {
        CrewStatus::from(s.to_string())
    }
}

impl From<CrewStatus> for String {
    fn from(status: CrewStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for CrewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrewStatus::Active => f.write_str("ACTIVE"),
            CrewStatus::Other(s) => f.write_str(s),
        }
    }
}

impl CrewMember {
    /// Creates an active crew member with no base and no qualifications.
    pub fn new(id: impl Into<String>, role: CrewRole) -> Self {
        Self {
            id: id.into(),
            base: String::new(),
            role,
            qualifications: BTreeSet::new(),
            status: CrewStatus::Active,
            max_duty_hours: 10.0,
        }
    }

    /// Sets the home base.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Adds an aircraft type qualification.
    pub fn with_qualification(mut self, aircraft_type: impl Into<String>) -> Self {
        self.qualifications.insert(aircraft_type.into());
        self
    }

    /// Replaces the qualification set from a pipe-delimited list
    /// (`A320|A321`). `ALL` and empty entries are dropped.
    pub fn with_qualification_list(mut self, list: &str) -> Self {
        self.qualifications = list
            .split('|')
            .map(str::trim)
            .filter(|q| !q.is_empty() && !q.eq_ignore_ascii_case("ALL"))
            .map(str::to_string)
            .collect();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: impl Into<CrewStatus>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the contractual maximum duty hours.
    pub fn with_max_duty_hours(mut self, hours: f64) -> Self {
        self.max_duty_hours = hours;
        self
    }

    /// Pilot / cabin class.
    #[inline]
    pub fn role_class(&self) -> RoleClass {
        self.role.class()
    }

    /// Whether the member can be rostered.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether the member may operate the given aircraft type.
    ///
    /// Cabin roles are always qualified.
    pub fn is_qualified_for(&self, aircraft_type: &str) -> bool {
        match self.role_class() {
            RoleClass::Cabin => true,
            RoleClass::Pilot => self.qualifications.contains(aircraft_type),
        }
    }
}
