//! GA evolutionary loop execution.
//!
//! [`GaRunner`] drives one run through its phases:
//! initialization → (elitism → selection → crossover → mutation →
//! evaluation)* → termination.
//!
//! The evaluation budget is the only termination condition. Every random
//! decision is drawn from the run's own [`RandomStream`], so a run is fully
//! determined by its stream, configuration, budget and distance table.

use super::config::GaConfig;
use super::operators::{pmx_crossover, swap_mutation};
use super::selection::tournament;
use super::types::{BestEvent, BestObserver, GaPhase};
use crate::error::{TspError, TspResult};
use crate::random::RandomStream;
use crate::tsp::{DistanceMatrix, Evaluator, Tour};
use tracing::{debug, trace};

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best tour found during the entire run.
    pub best: Tour,

    /// Length of `best`.
    pub best_length: f64,

    /// Number of generations executed after initialization.
    pub generations: usize,

    /// Evaluations consumed; equals the budget.
    pub evaluations: usize,

    /// Best length after initialization and after each generation.
    pub fitness_history: Vec<f64>,
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use tsp_ga::ga::{GaConfig, GaRunner};
/// use tsp_ga::random::SeedSource;
/// use tsp_ga::tsp::{Coord, DistanceMatrix};
///
/// let coords = [
///     Coord::new(0.0, 0.0),
///     Coord::new(10.0, 0.0),
///     Coord::new(10.0, 10.0),
///     Coord::new(0.0, 10.0),
/// ];
/// let distances = DistanceMatrix::from_coordinates(4, &coords).unwrap();
/// let config = GaConfig::default().with_population_size(20);
/// let mut rng = SeedSource::new(42).for_worker(0);
///
/// let result = GaRunner::run(&distances, 2_000, &config, &mut rng, None).unwrap();
/// assert_eq!(result.best_length, 40.0);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA until `evaluation_budget` evaluations are spent.
    ///
    /// `observer` is notified synchronously each time a strictly shorter
    /// tour is evaluated, including during initialization.
    ///
    /// # Errors
    /// - [`TspError::InvalidArgument`] for an invalid `config` or a zero
    ///   budget.
    /// - [`TspError::InternalInvariant`] if PMX resolution or generation
    ///   construction stops making progress.
    pub fn run(
        distances: &DistanceMatrix,
        evaluation_budget: usize,
        config: &GaConfig,
        rng: &mut RandomStream,
        mut observer: Option<&mut dyn BestObserver>,
    ) -> TspResult<GaResult> {
        config.validate()?;
        if evaluation_budget == 0 {
            return Err(TspError::invalid_argument(
                "evaluation budget must be at least 1",
            ));
        }

        let dimension = distances.dimension();
        let pop_size = config.population_size;
        let mut evaluator = Evaluator::new(distances, evaluation_budget);

        debug!(
            phase = ?GaPhase::Initializing,
            dimension,
            pop_size,
            crossover_rate = config.crossover_rate,
            mutation_rate = config.mutation_rate,
            evaluation_budget,
            "GA run started"
        );

        // 1. Initialize and evaluate the population
        let mut population: Vec<Tour> = Vec::with_capacity(pop_size);
        let mut best: Option<Tour> = None;
        for _ in 0..pop_size {
            let mut tour = Tour::random(dimension, rng);
            if !evaluator.is_exhausted() {
                let length = evaluator.evaluate(&mut tour);
                let improved = match &best {
                    Some(b) => length < b.fitness(),
                    None => true,
                };
                if improved {
                    best = Some(tour.clone());
                    notify(&mut observer, &tour, 0, &evaluator, length);
                }
            }
            population.push(tour);
        }
        let mut best = best.ok_or_else(|| {
            TspError::internal("no tour was evaluated during initialization")
        })?;

        let mut fitness_history = vec![best.fitness()];
        let mut generation = 0usize;

        debug!(
            phase = ?GaPhase::Evolving,
            evaluations = evaluator.evaluations(),
            best = best.fitness(),
            "initial population evaluated"
        );

        // 2. Evolutionary loop
        while !evaluator.is_exhausted() {
            generation += 1;
            let evaluations_before = evaluator.evaluations();

            // Elitism: carry the current minimum over unchanged
            let mut offspring: Vec<Tour> = Vec::with_capacity(pop_size);
            offspring.push(find_best(&population).clone());

            // Selection + crossover; every round adds at least one child.
            let mut rounds = 0usize;
            while offspring.len() < pop_size {
                rounds += 1;
                if rounds > pop_size {
                    return Err(TspError::internal(format!(
                        "offspring construction stuck at {}/{pop_size} in generation {generation}",
                        offspring.len()
                    )));
                }

                let parent_a = select_parent(&population, rng)?;
                let parent_b = select_parent(&population, rng)?;

                let (child_a, child_b) = if rng.next_real() < config.crossover_rate {
                    pmx_crossover(parent_a, parent_b, rng)?
                } else {
                    (parent_a.clone(), parent_b.clone())
                };
                debug_assert!(child_a.is_valid_permutation(dimension));
                debug_assert!(child_b.is_valid_permutation(dimension));

                offspring.push(child_a);
                if offspring.len() < pop_size {
                    offspring.push(child_b);
                }
            }

            // Mutation + evaluation (the elite is already evaluated)
            for tour in offspring.iter_mut().skip(1) {
                if evaluator.is_exhausted() {
                    break;
                }
                if rng.next_real() < config.mutation_rate {
                    swap_mutation(tour, rng);
                }
                let length = evaluator.evaluate(tour);
                if length < best.fitness() {
                    best = tour.clone();
                    notify(&mut observer, tour, generation, &evaluator, length);
                }
            }

            if evaluator.evaluations() == evaluations_before {
                return Err(TspError::internal(format!(
                    "generation {generation} evaluated no offspring at {}/{} evaluations",
                    evaluator.evaluations(),
                    evaluator.budget()
                )));
            }

            population = offspring;
            fitness_history.push(best.fitness());

            trace!(
                generation,
                evaluations = evaluator.evaluations(),
                best = best.fitness(),
                "generation complete"
            );
        }

        debug!(
            phase = ?GaPhase::Terminated,
            generations = generation,
            evaluations = evaluator.evaluations(),
            best = best.fitness(),
            "GA run finished"
        );

        Ok(GaResult {
            best_length: best.fitness(),
            best,
            generations: generation,
            evaluations: evaluator.evaluations(),
            fitness_history,
        })
    }
}

fn notify(
    observer: &mut Option<&mut dyn BestObserver>,
    tour: &Tour,
    generation: usize,
    evaluator: &Evaluator<'_>,
    length: f64,
) {
    debug!(generation, evaluations = evaluator.evaluations(), length, "new best");
    if let Some(obs) = observer.as_deref_mut() {
        obs.on_new_best(
            tour,
            &BestEvent {
                generation,
                evaluations: evaluator.evaluations(),
                length,
            },
        );
    }
}

fn select_parent<'a>(population: &'a [Tour], rng: &mut RandomStream) -> TspResult<&'a Tour> {
    tournament(population, rng)
        .ok_or_else(|| TspError::internal("selection from an empty population"))
}

/// The shortest tour in the population; the first one on ties.
fn find_best(population: &[Tour]) -> &Tour {
    let mut best = &population[0];
    for tour in &population[1..] {
        if tour.fitness() < best.fitness() {
            best = tour;
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
