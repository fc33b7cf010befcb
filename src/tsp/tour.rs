//! Tour representation.
//!
//! A [`Tour`] stores a permutation of the non-start nodes `1..dimension`.
//! Node `0` is the implicit, fixed start and end of the cycle and is never
//! stored. The cached length is tracked as [`TourLength`], so code that
//! needs a trusted length has to handle the unevaluated case explicitly.

use crate::error::{TspError, TspResult};
use rand::Rng;

/// Evaluation state of a tour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TourLength {
    /// Freshly built or modified; the length is unknown.
    Unevaluated,
    /// Total cycle length as last computed by the evaluator.
    Evaluated(f64),
}

/// A candidate solution.
///
/// `Clone` is a deep copy: the clone shares no buffer with the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    order: Vec<usize>,
    length: TourLength,
}

impl Tour {
    /// Wraps an order without checking it.
    ///
    /// Operators use this for children that are valid by construction.
    pub(crate) fn from_order_unchecked(order: Vec<usize>) -> Self {
        Self {
            order,
            length: TourLength::Unevaluated,
        }
    }

    /// Creates an unevaluated tour from an explicit order.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `order` is not a permutation of
    /// `1..dimension`.
    pub fn from_order(order: Vec<usize>, dimension: usize) -> TspResult<Self> {
        if !is_valid_permutation(&order, dimension) {
            return Err(TspError::invalid_input(format!(
                "order is not a permutation of 1..{dimension}: {order:?}"
            )));
        }
        Ok(Self::from_order_unchecked(order))
    }

    /// Creates a uniformly random tour over `1..dimension`.
    ///
    /// Fills the nodes in order, then applies a Fisher–Yates shuffle.
    pub fn random<R: Rng>(dimension: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (1..dimension).collect();
        for i in (1..order.len()).rev() {
            let j = rng.random_range(0..=i);
            order.swap(i, j);
        }
        Self::from_order_unchecked(order)
    }

    /// The visiting order, excluding the start node.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Mutable access to the order. Invalidates the cached length.
    pub fn order_mut(&mut self) -> &mut [usize] {
        self.length = TourLength::Unevaluated;
        &mut self.order
    }

    /// Number of stored nodes (`dimension - 1`).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no nodes are stored.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Current evaluation state.
    pub fn state(&self) -> TourLength {
        self.length
    }

    /// The cached length, if evaluated.
    pub fn length(&self) -> Option<f64> {
        match self.length {
            TourLength::Evaluated(len) => Some(len),
            TourLength::Unevaluated => None,
        }
    }

    /// Length for ranking; unevaluated tours rank last.
    pub fn fitness(&self) -> f64 {
        self.length().unwrap_or(f64::INFINITY)
    }

    pub(crate) fn set_length(&mut self, length: f64) {
        self.length = TourLength::Evaluated(length);
    }

    /// Returns `true` if the order is a permutation of `1..dimension`.
    pub fn is_valid_permutation(&self, dimension: usize) -> bool {
        is_valid_permutation(&self.order, dimension)
    }

    /// The full cycle including the start node at both ends.
    pub fn cycle(&self) -> Vec<usize> {
        let mut cycle = Vec::with_capacity(self.order.len() + 2);
        cycle.push(0);
        cycle.extend_from_slice(&self.order);
        cycle.push(0);
        cycle
    }
}

/// Checks that `order` holds each of `1..dimension` exactly once.
pub fn is_valid_permutation(order: &[usize], dimension: usize) -> bool {
    if dimension == 0 || order.len() != dimension - 1 {
        return false;
    }
    let mut seen = vec![false; dimension];
    for &v in order {
        if v == 0 || v >= dimension || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeedSource;
    use proptest::prelude::*;

    #[test]
    fn test_random_tour_is_permutation() {
        let mut rng = SeedSource::new(42).for_worker(0);
        for dimension in 2..30 {
            let tour = Tour::random(dimension, &mut rng);
            assert!(
                tour.is_valid_permutation(dimension),
                "invalid tour for dimension {dimension}: {:?}",
                tour.order()
            );
            assert_eq!(tour.state(), TourLength::Unevaluated);
        }
    }

    #[test]
    fn test_random_tour_reproducible() {
        let seeds = SeedSource::new(7);
        let a = Tour::random(50, &mut seeds.for_worker(1));
        let b = Tour::random(50, &mut seeds.for_worker(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_reaches_every_position() {
        // Each node should land in each slot at least once over many draws.
        let mut rng = SeedSource::new(3).for_worker(0);
        let mut hits = [[false; 4]; 5];
        for _ in 0..2_000 {
            let tour = Tour::random(5, &mut rng);
            for (pos, &node) in tour.order().iter().enumerate() {
                hits[node][pos] = true;
            }
        }
        for node in 1..5 {
            assert!(hits[node].iter().all(|&h| h), "node {node} missed a slot");
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Tour::from_order(vec![1, 2, 3], 4).unwrap();
        original.set_length(10.0);
        let snapshot = original.clone();

        original.order_mut().swap(0, 2);

        assert_eq!(snapshot.order(), &[1, 2, 3]);
        assert_eq!(snapshot.length(), Some(10.0));
        assert_eq!(original.order(), &[3, 2, 1]);
        assert_eq!(original.length(), None);
    }

    #[test]
    fn test_fitness_of_unevaluated_is_infinite() {
        let tour = Tour::from_order(vec![2, 1], 3).unwrap();
        assert_eq!(tour.fitness(), f64::INFINITY);
    }

    #[test]
    fn test_from_order_rejects_invalid() {
        assert!(Tour::from_order(vec![1, 1, 3], 4).is_err());
        assert!(Tour::from_order(vec![0, 1, 2], 4).is_err());
        assert!(Tour::from_order(vec![1, 2], 4).is_err());
        assert!(Tour::from_order(vec![1, 2, 4], 4).is_err());
    }

    #[test]
    fn test_cycle_closes_at_start() {
        let tour = Tour::from_order(vec![3, 1, 2], 4).unwrap();
        assert_eq!(tour.cycle(), vec![0, 3, 1, 2, 0]);
    }

    proptest! {
        #[test]
        fn prop_random_tour_is_permutation(dimension in 2usize..200, seed in any::<u64>()) {
            let mut rng = SeedSource::new(seed).for_worker(0);
            let tour = Tour::random(dimension, &mut rng);
            prop_assert!(tour.is_valid_permutation(dimension));
        }
    }
}
