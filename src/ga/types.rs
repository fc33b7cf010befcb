//! Observer hook and run-state types shared by the GA runner.

use crate::tsp::Tour;

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaPhase {
    /// Building and evaluating the random initial population.
    Initializing,
    /// Producing generations while evaluations remain.
    Evolving,
    /// Budget exhausted; the best tour is returned.
    Terminated,
}

/// Context passed with every "new best" notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestEvent {
    /// Generation in which the improvement happened (0 = initial population).
    pub generation: usize,
    /// Evaluations consumed when the improvement was observed.
    pub evaluations: usize,
    /// The new best length.
    pub length: f64,
}

/// Receives a notification whenever a run finds a strictly shorter tour.
///
/// Called synchronously on the run's own thread, between evaluations.
/// Implementations must return quickly: time spent here stalls the run.
/// The tour is a snapshot owned by the runner and must not be retained by
/// reference.
///
/// Any `FnMut(&Tour, &BestEvent)` closure is an observer:
///
/// ```
/// use tsp_ga::ga::{BestEvent, BestObserver};
/// use tsp_ga::tsp::Tour;
///
/// let mut lengths = Vec::new();
/// let mut observer = |_: &Tour, event: &BestEvent| lengths.push(event.length);
/// # let _ = &mut observer as &mut dyn BestObserver;
/// ```
pub trait BestObserver {
    /// Called with the new best tour.
    fn on_new_best(&mut self, tour: &Tour, event: &BestEvent);
}

impl<F> BestObserver for F
where
    F: FnMut(&Tour, &BestEvent),
{
    fn on_new_best(&mut self, tour: &Tour, event: &BestEvent) {
        self(tour, event)
    }
}
