//! Genetic search over rosters.
//!
//! Refines rosters produced by the
//! [`ConstructiveAssigner`](crate::scheduler::ConstructiveAssigner) with an
//! elitist, mutation-only genetic algorithm.
//!
//! # Encoding
//!
//! A candidate is a [`Roster`](crate::models::Roster) itself: the
//! assignment list is the chromosome and each assignment's crew ID is a
//! gene. There is no crossover; diversity comes from randomized
//! construction and crew-swap mutation.
//!
//! # Submodules
//!
//! - [`operators`]: crew-swap mutation
//!
//! # Reference
//! - Eiben & Smith (2015), "Introduction to Evolutionary Computing", Ch. 3-5
//! - Souai & Teghem (2009), "Genetic algorithm based approach for the
//!   integrated airline crew-pairing and rostering problem", EJOR 199

mod config;
mod fitness;
pub mod operators;
mod search;
mod termination;

pub use config::SearchConfig;
pub use fitness::{fitness, FITNESS_SENTINEL};
pub use operators::mutate;
pub use search::{GeneticSearch, SearchOutcome};
pub use termination::{StopReason, Termination};
