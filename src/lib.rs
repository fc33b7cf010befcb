//! Genetic algorithm for the symmetric Travelling Salesman Problem.
//!
//! The optimizer searches for short closed tours through a fixed start
//! node `0`:
//!
//! - **Distances**: an immutable [`DistanceMatrix`](tsp::DistanceMatrix)
//!   built once per instance from coordinates or explicit weights.
//! - **Tours**: permutations of `1..dimension` with an explicit
//!   evaluated/unevaluated state.
//! - **GA core**: single elite, binary tournament selection, PMX crossover,
//!   swap mutation, and an evaluation budget as the only stop condition.
//! - **Randomness**: every run owns a [`RandomStream`](random::RandomStream)
//!   derived from `(master_seed, worker_index)`, so concurrent runs are
//!   independent and reproducible.
//! - **Experiments**: repeated runs of an instance on a rayon worker pool,
//!   with results written one length per line.
//!
//! # Example
//!
//! ```
//! use tsp_ga::ga::{GaConfig, GaRunner};
//! use tsp_ga::random::SeedSource;
//! use tsp_ga::tsp::DistanceMatrix;
//!
//! let distances = DistanceMatrix::from_full_matrix(
//!     3,
//!     &[0.0, 1.0, 2.0, 1.0, 0.0, 3.0, 2.0, 3.0, 0.0],
//! )?;
//! let mut rng = SeedSource::new(7).for_worker(0);
//! let result = GaRunner::run(&distances, 100, &GaConfig::default(), &mut rng, None)?;
//! assert_eq!(result.best_length, 6.0);
//! # Ok::<(), tsp_ga::TspError>(())
//! ```

pub mod error;
pub mod experiment;
pub mod ga;
pub mod random;
pub mod tsp;

pub use error::{TspError, TspResult};
