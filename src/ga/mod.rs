//! Genetic Algorithm core.
//!
//! A generational GA over [`Tour`](crate::tsp::Tour) permutations with
//! single-individual elitism, binary tournament selection, PMX crossover
//! and swap mutation. The evaluation budget is the sole termination
//! condition.
//!
//! # Key Types
//!
//! - [`GaConfig`]: population size and operator rates
//! - [`GaRunner`]: executes the generational loop
//! - [`GaResult`]: best tour found plus run statistics
//! - [`BestObserver`]: synchronous "new best found" hook
//!
//! # Submodules
//!
//! - [`operators`]: PMX crossover and swap mutation
//! - [`selection`]: binary tournament
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod runner;
pub mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner};
pub use types::{BestEvent, BestObserver, GaPhase};
