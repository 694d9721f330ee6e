//! Regulatory duty-time thresholds.
//!
//! Thresholds are identified by DGCA rule codes and have documented
//! defaults. A rules table may override any of them; rules not present
//! keep their default value.
//!
//! Grace margins applied on top of these thresholds are not part of the
//! rule set: they are fixed by the compliance engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Regulatory rule identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCode {
    /// Maximum daily duty hours.
    #[serde(rename = "DGCA001")]
    MaxDailyDuty,
    /// Minimum rest between duties, in hours.
    #[serde(rename = "DGCA002")]
    MinRest,
    /// Maximum duty hours in any rolling 7-day window.
    #[serde(rename = "DGCA003")]
    MaxWeeklyDuty,
    /// Maximum consecutive duty days.
    #[serde(rename = "DGCA004")]
    MaxConsecutiveDays,
}

/// Returned when a rule code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rule code: {0}")]
pub struct ParseRuleCodeError(pub String);

impl RuleCode {
    /// Table code (`DGCA001` ..).
    pub fn code(self) -> &'static str {
        match self {
            RuleCode::MaxDailyDuty => "DGCA001",
            RuleCode::MinRest => "DGCA002",
            RuleCode::MaxWeeklyDuty => "DGCA003",
            RuleCode::MaxConsecutiveDays => "DGCA004",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            RuleCode::MaxDailyDuty => "Max Daily Duty Hours",
            RuleCode::MinRest => "Min Rest Period",
            RuleCode::MaxWeeklyDuty => "Weekly Duty Limit",
            RuleCode::MaxConsecutiveDays => "Max Consecutive Duty Days",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RuleCode {
    type Err = ParseRuleCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DGCA001" => Ok(RuleCode::MaxDailyDuty),
            "DGCA002" => Ok(RuleCode::MinRest),
            "DGCA003" => Ok(RuleCode::MaxWeeklyDuty),
            "DGCA004" => Ok(RuleCode::MaxConsecutiveDays),
            _ => Err(ParseRuleCodeError(s.trim().to_string())),
        }
    }
}

/// Duty-time thresholds used by the compliance engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Maximum duty hours per calendar day (DGCA001, default 10).
    pub max_daily_duty_hours: f64,
    /// Minimum rest between consecutive duties (DGCA002, default 12).
    pub min_rest_hours: f64,
    /// Maximum duty hours in a rolling 7-day window (DGCA003, default 60).
    pub max_weekly_duty_hours: f64,
    /// Maximum consecutive duty days (DGCA004, default 6).
    pub max_consecutive_days: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            max_daily_duty_hours: 10.0,
            min_rest_hours: 12.0,
            max_weekly_duty_hours: 60.0,
            max_consecutive_days: 6,
        }
    }
}

impl RuleSet {
    /// Creates the default rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides one threshold.
    pub fn with_rule(mut self, code: RuleCode, value: f64) -> Self {
        self.set(code, value);
        self
    }

    /// Overrides one threshold in place.
    pub fn set(&mut self, code: RuleCode, value: f64) {
        match code {
            RuleCode::MaxDailyDuty => self.max_daily_duty_hours = value,
            RuleCode::MinRest => self.min_rest_hours = value,
            RuleCode::MaxWeeklyDuty => self.max_weekly_duty_hours = value,
            RuleCode::MaxConsecutiveDays => self.max_consecutive_days = value.max(0.0).round() as u32,
        }
    }

    /// Current value of a threshold.
    pub fn value(&self, code: RuleCode) -> f64 {
        match code {
            RuleCode::MaxDailyDuty => self.max_daily_duty_hours,
            RuleCode::MinRest => self.min_rest_hours,
            RuleCode::MaxWeeklyDuty => self.max_weekly_duty_hours,
            RuleCode::MaxConsecutiveDays => self.max_consecutive_days as f64,
        }
    }
}
