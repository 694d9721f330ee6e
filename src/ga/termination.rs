//! Search termination signals.
//!
//! A search may be bounded by a wall-clock deadline and may be interrupted
//! from another thread through a shared flag. Both are polled between
//! generations only.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a search stopped before its generation budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The deadline passed.
    Deadline,
    /// The interrupt flag was raised.
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Deadline => f.write_str("deadline reached"),
            StopReason::Interrupted => f.write_str("interrupt signal received"),
        }
    }
}

/// Deadline and interrupt flag checked between generations.
#[derive(Debug, Clone, Default)]
pub struct Termination {
    deadline: Option<Instant>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Termination {
    /// Never stops early.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stops once `limit` has elapsed from now.
    pub fn with_time_limit(self, limit: Duration) -> Self {
        self.with_deadline(Instant::now() + limit)
    }

    /// Stops once `flag` is set to `true`.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    /// Combines two sets of signals.
    ///
    /// The earlier deadline wins; `other`'s interrupt flag replaces this
    /// one's only when it has one.
    pub fn merge(mut self, other: Termination) -> Self {
        self.deadline = match (self.deadline, other.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        if other.interrupt.is_some() {
            self.interrupt = other.interrupt;
        }
        self
    }

    /// The reason to stop now, if any. The interrupt takes precedence.
    pub fn should_stop(&self) -> Option<StopReason> {
        if self
            .interrupt
            .as_ref()
            .is_some_and(|f| f.load(Ordering::Relaxed))
        {
            return Some(StopReason::Interrupted);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(StopReason::Deadline),
            _ => None,
        }
    }
}
