//! Budget-counting tour evaluation.

use super::distance::DistanceMatrix;
use super::tour::Tour;

/// Scores tours against a [`DistanceMatrix`] and counts evaluations.
///
/// One evaluator belongs to one run; its counter is the run's only
/// termination signal.
#[derive(Debug)]
pub struct Evaluator<'a> {
    distances: &'a DistanceMatrix,
    budget: usize,
    evaluations: usize,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator allowing `budget` evaluations.
    pub fn new(distances: &'a DistanceMatrix, budget: usize) -> Self {
        Self {
            distances,
            budget,
            evaluations: 0,
        }
    }

    /// Evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Total evaluations allowed.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Evaluations still available.
    pub fn remaining(&self) -> usize {
        self.budget.saturating_sub(self.evaluations)
    }

    /// Returns `true` once the budget is used up.
    pub fn is_exhausted(&self) -> bool {
        self.evaluations >= self.budget
    }

    /// Computes the cycle length of `tour`, caches it on the tour, and
    /// counts one evaluation.
    pub fn evaluate(&mut self, tour: &mut Tour) -> f64 {
        let length = self.length_of(tour.order());
        tour.set_length(length);
        self.evaluations += 1;
        length
    }

    /// Cycle length of `order` through the start node, without counting.
    pub fn length_of(&self, order: &[usize]) -> f64 {
        let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
            return 0.0;
        };
        let d = self.distances;
        let inner: f64 = order.windows(2).map(|w| d.distance(w[0], w[1])).sum();
        d.distance(0, first) + inner + d.distance(last, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsp::distance::Coord;

    fn square() -> DistanceMatrix {
        // Unit-10 square: 0=(0,0) 1=(10,0) 2=(10,10) 3=(0,10)
        let coords = [
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
            Coord::new(0.0, 10.0),
        ];
        DistanceMatrix::from_coordinates(4, &coords).unwrap()
    }

    #[test]
    fn test_evaluate_closes_cycle() {
        let d = square();
        let mut eval = Evaluator::new(&d, 10);

        let mut perimeter = Tour::from_order(vec![1, 2, 3], 4).unwrap();
        assert_eq!(eval.evaluate(&mut perimeter), 40.0);
        assert_eq!(perimeter.length(), Some(40.0));

        // 0 -> 2 -> 1 -> 3 -> 0: 14 + 10 + 14 + 10
        let mut crossed = Tour::from_order(vec![2, 1, 3], 4).unwrap();
        assert_eq!(eval.evaluate(&mut crossed), 48.0);
    }

    #[test]
    fn test_evaluate_counts() {
        let d = square();
        let mut eval = Evaluator::new(&d, 2);
        let mut tour = Tour::from_order(vec![1, 2, 3], 4).unwrap();

        assert_eq!(eval.remaining(), 2);
        eval.evaluate(&mut tour);
        assert!(!eval.is_exhausted());
        eval.evaluate(&mut tour);
        assert!(eval.is_exhausted());
        assert_eq!(eval.evaluations(), 2);
        assert_eq!(eval.remaining(), 0);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let d = square();
        let mut eval = Evaluator::new(&d, 10);
        let mut tour = Tour::from_order(vec![3, 1, 2], 4).unwrap();
        let first = eval.evaluate(&mut tour);
        let second = eval.evaluate(&mut tour);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_single_node_tour() {
        let d = DistanceMatrix::from_full_matrix(2, &[0.0, 7.0, 7.0, 0.0]).unwrap();
        let mut eval = Evaluator::new(&d, 1);
        let mut tour = Tour::from_order(vec![1], 2).unwrap();
        assert_eq!(eval.evaluate(&mut tour), 14.0);
    }

    #[test]
    fn test_length_of_does_not_count() {
        let d = square();
        let eval = Evaluator::new(&d, 1);
        assert_eq!(eval.length_of(&[1, 2, 3]), 40.0);
        assert_eq!(eval.evaluations(), 0);
    }
}
