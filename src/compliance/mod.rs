//! Regulatory compliance checking.
//!
//! Evaluates a roster, or one crew member's share of it, against duty-time
//! regulations and assignment validity rules, and explains every breach as
//! a categorized, human-readable violation.
//!
//! # Rules
//!
//! | Code | Rule | Default | Grace |
//! |------|------|---------|-------|
//! | DGCA001 | Max daily duty | 10h | +0.5h |
//! | DGCA002 | Min rest between duties | 12h | -0.5h |
//! | DGCA003 | Max duty in any 7 days | 60h | +2h |
//! | DGCA004 | Max consecutive duty days | 6 | +1 day |
//!
//! Thresholds come from the [`RuleSet`](crate::models::RuleSet); grace
//! margins are engine constants.
//!
//! Constraint breaches never abort anything: they are collected into a
//! [`ComplianceReport`].

mod duty;
mod engine;
mod report;

pub use duty::{
    check_consecutive_days, check_rest_periods, daily_duty_hours, max_consecutive_streak,
    weekly_duty_hours, CONSECUTIVE_GRACE_DAYS, DAILY_GRACE_HOURS, REST_GRACE_HOURS,
    WEEKLY_GRACE_HOURS,
};
pub use engine::{adjacent_bases, base_compatible, ComplianceEngine};
pub use report::{ComplianceReport, Violation, ViolationCategory};
