//! Constructive roster building and KPI evaluation.
//!
//! # Algorithm
//!
//! `ConstructiveAssigner` is a three-phase greedy heuristic: each phase
//! relaxes base matching and raises the per-crew duty cap, crewing the
//! flights the previous phases could not. It is not optimal, but gives
//! the genetic search a feasible, diverse starting population.
//!
//! # KPI
//!
//! `RosterKpi` computes coverage, utilization and duty-load metrics.
//!
//! # References
//!
//! - Kohl & Karisch (2004), "Airline Crew Rostering: Problem Types,
//!   Modeling, and Optimization", Annals of OR 127
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod constructive;
mod kpi;

pub use constructive::{AssignmentPhase, ConstructiveAssigner, DutyLedger, UNDERUTILIZED_HOURS};
pub use kpi::{FlightSummary, RosterKpi};
