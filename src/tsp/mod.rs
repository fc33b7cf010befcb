//! Problem side of the optimizer.
//!
//! - [`DistanceMatrix`]: immutable pairwise distances, shared by all runs
//! - [`Tour`]: a permutation of the non-start nodes with a typed length state
//! - [`Evaluator`]: computes cycle lengths and enforces the evaluation budget
//! - [`tsplib`]: reader for TSPLIB `.tsp` files

mod distance;
mod evaluator;
mod tour;
pub mod tsplib;

pub use distance::{Coord, DistanceMatrix, DistanceSource, EdgeWeightFormat};
pub use evaluator::Evaluator;
pub use tour::{is_valid_permutation, Tour, TourLength};
pub use tsplib::ProblemInstance;
