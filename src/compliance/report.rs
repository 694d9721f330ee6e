//! Violation taxonomy and per-call compliance report.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Violation categories, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Daily or weekly duty limit exceeded.
    DutyHours,
    /// Crew operating away from an allowed base.
    BaseMismatch,
    /// Pilot not rated on the aircraft type.
    Qualifications,
    /// Rest between duties too short.
    RestPeriods,
    /// Too many consecutive duty days.
    ConsecutiveDays,
    /// Crew not ACTIVE.
    Status,
    /// Data faults, duplicates and checks that could not run.
    Other,
}

/// A single categorized violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Category.
    pub category: ViolationCategory,
    /// Human-readable description.
    pub message: String,
    /// Measured quantity behind the violation (hours, days), if any.
    pub measured: Option<f64>,
}

/// Violation messages grouped by category.
///
/// Every category is always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    buckets: BTreeMap<ViolationCategory, Vec<String>>,
}

impl ViolationCategory {
    /// All categories in reporting order.
    pub const ALL: [ViolationCategory; 7] = [
        ViolationCategory::DutyHours,
        ViolationCategory::BaseMismatch,
        ViolationCategory::Qualifications,
        ViolationCategory::RestPeriods,
        ViolationCategory::ConsecutiveDays,
        ViolationCategory::Status,
        ViolationCategory::Other,
    ];

    /// Snake-case key.
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationCategory::DutyHours => "duty_hours",
            ViolationCategory::BaseMismatch => "base_mismatch",
            ViolationCategory::Qualifications => "qualifications",
            ViolationCategory::RestPeriods => "rest_periods",
            ViolationCategory::ConsecutiveDays => "consecutive_days",
            ViolationCategory::Status => "status",
            ViolationCategory::Other => "other",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Violation {
    /// Creates a violation without a measured value.
    pub fn new(category: ViolationCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            measured: None,
        }
    }

    /// Attaches the measured value.
    pub fn with_measured(mut self, value: f64) -> Self {
        self.measured = Some(value);
        self
    }
}

impl Default for ComplianceReport {
    fn default() -> Self {
        Self {
            buckets: ViolationCategory::ALL
                .iter()
                .map(|&c| (c, Vec::new()))
                .collect(),
        }
    }
}

impl ComplianceReport {
    /// Creates a report with every category empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message under a category.
    pub fn push(&mut self, category: ViolationCategory, message: impl Into<String>) {
        self.buckets.entry(category).or_default().push(message.into());
    }

    /// Messages of one category.
    pub fn messages(&self, category: ViolationCategory) -> &[String] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All messages, category by category in reporting order.
    pub fn flatten(&self) -> Vec<String> {
        self.buckets.values().flatten().cloned().collect()
    }

    /// Message count per category.
    pub fn breakdown(&self) -> BTreeMap<ViolationCategory, usize> {
        self.buckets.iter().map(|(&c, v)| (c, v.len())).collect()
    }

    /// Total number of messages.
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether no violation was recorded.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}
