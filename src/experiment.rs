//! Batch experiments: many independent GA runs per problem instance.
//!
//! Each repeat of an instance runs on a worker of a fixed-size rayon pool
//! with its own [`RandomStream`](crate::random::RandomStream), derived from
//! the master seed and the repeat index. Runs share nothing but the
//! read-only distance table, so results do not depend on scheduling: the
//! same master seed gives the same per-run lengths for any pool size.

use crate::error::{TspError, TspResult};
use crate::ga::{BestObserver, GaConfig, GaRunner};
use crate::random::SeedSource;
use crate::tsp::ProblemInstance;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Parameters of a batch experiment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// GA parameters shared by every run.
    pub ga: GaConfig,

    /// Independent runs per instance.
    pub repeats: usize,

    /// Evaluation budget per node; a run gets `evaluations_per_node * dimension`.
    pub evaluations_per_node: usize,

    /// Master seed. `None` draws one from OS entropy.
    pub master_seed: Option<u64>,

    /// Worker threads. `None` uses the available hardware parallelism.
    pub workers: Option<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            ga: GaConfig::default(),
            repeats: 30,
            evaluations_per_node: 1000,
            master_seed: None,
            workers: None,
        }
    }
}

impl ExperimentConfig {
    /// Sets the GA parameters.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Sets the number of runs per instance.
    pub fn with_repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    /// Sets the evaluation budget per node.
    pub fn with_evaluations_per_node(mut self, n: usize) -> Self {
        self.evaluations_per_node = n;
        self
    }

    /// Sets the master seed.
    pub fn with_master_seed(mut self, seed: u64) -> Self {
        self.master_seed = Some(seed);
        self
    }

    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        self.ga.validate()?;
        if self.repeats == 0 {
            return Err(TspError::invalid_argument("repeats must be at least 1"));
        }
        if self.evaluations_per_node == 0 {
            return Err(TspError::invalid_argument(
                "evaluations_per_node must be at least 1",
            ));
        }
        if self.workers == Some(0) {
            return Err(TspError::invalid_argument("workers must be positive or None"));
        }
        Ok(())
    }

    /// Evaluation budget of one run on a `dimension`-node instance.
    pub fn evaluation_budget(&self, dimension: usize) -> usize {
        self.evaluations_per_node.saturating_mul(dimension)
    }

    fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Outcome of one run inside a batch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunOutcome {
    /// Repeat index, also the worker index of its random stream.
    pub run_index: usize,
    /// Best length found, or `None` if the run failed.
    pub best_length: Option<f64>,
    /// Generations executed (0 for a failed run).
    pub generations: usize,
    /// Error message of a failed run.
    pub error: Option<String>,
}

/// All runs of one instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceReport {
    /// Instance name.
    pub name: String,
    /// Number of nodes.
    pub dimension: usize,
    /// Master seed the run streams were derived from.
    pub master_seed: u64,
    /// Evaluation budget of each run.
    pub evaluation_budget: usize,
    /// Per-run outcomes in run order.
    pub runs: Vec<RunOutcome>,
}

impl InstanceReport {
    /// Best length per run; failed runs are `NaN`.
    pub fn best_lengths(&self) -> Vec<f64> {
        self.runs
            .iter()
            .map(|r| r.best_length.unwrap_or(f64::NAN))
            .collect()
    }

    /// Number of runs that completed.
    pub fn successful(&self) -> usize {
        self.runs.iter().filter(|r| r.best_length.is_some()).count()
    }

    /// Shortest length over all completed runs.
    pub fn best(&self) -> Option<f64> {
        self.runs
            .iter()
            .filter_map(|r| r.best_length)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Runs every repeat of `instance` without observers.
pub fn run_instance(
    instance: &ProblemInstance,
    config: &ExperimentConfig,
) -> TspResult<InstanceReport> {
    run_instance_with(instance, config, |_| None)
}

/// Runs every repeat of `instance`.
///
/// `make_observer` is called on the worker thread with the run index and
/// may return an observer for that run.
///
/// A failing run is recorded in its [`RunOutcome`] and does not stop the
/// other runs.
///
/// # Errors
/// Invalid configuration or a worker pool that cannot be built.
pub fn run_instance_with<F>(
    instance: &ProblemInstance,
    config: &ExperimentConfig,
    make_observer: F,
) -> TspResult<InstanceReport>
where
    F: Fn(usize) -> Option<Box<dyn BestObserver>> + Sync,
{
    config.validate()?;

    let seeds = config
        .master_seed
        .map(SeedSource::new)
        .unwrap_or_else(SeedSource::from_entropy);
    let dimension = instance.dimension();
    let budget = config.evaluation_budget(dimension);
    let workers = config.worker_count();

    info!(
        instance = %instance.name,
        dimension,
        budget,
        repeats = config.repeats,
        workers,
        master_seed = seeds.master_seed(),
        "starting instance"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let runs: Vec<RunOutcome> = pool.install(|| {
        (0..config.repeats)
            .into_par_iter()
            .map(|run_index| {
                let mut rng = seeds.for_worker(run_index);
                let mut observer = make_observer(run_index);
                let result = match observer.as_mut() {
                    Some(obs) => GaRunner::run(
                        &instance.distances,
                        budget,
                        &config.ga,
                        &mut rng,
                        Some(&mut **obs),
                    ),
                    None => GaRunner::run(&instance.distances, budget, &config.ga, &mut rng, None),
                };

                match result {
                    Ok(res) => {
                        info!(
                            instance = %instance.name,
                            run = run_index + 1,
                            of = config.repeats,
                            best = res.best_length,
                            "run completed"
                        );
                        RunOutcome {
                            run_index,
                            best_length: Some(res.best_length),
                            generations: res.generations,
                            error: None,
                        }
                    }
                    Err(err) => {
                        if err.is_internal() {
                            error!(instance = %instance.name, run = run_index + 1, %err, "run aborted");
                        } else {
                            warn!(instance = %instance.name, run = run_index + 1, %err, "run failed");
                        }
                        RunOutcome {
                            run_index,
                            best_length: None,
                            generations: 0,
                            error: Some(err.to_string()),
                        }
                    }
                }
            })
            .collect()
    });

    Ok(InstanceReport {
        name: instance.name.clone(),
        dimension,
        master_seed: seeds.master_seed(),
        evaluation_budget: budget,
        runs,
    })
}

/// Path of the result file for `instance_name`.
pub fn result_path(dir: &Path, prefix: &str, instance_name: &str) -> PathBuf {
    dir.join(format!("{prefix}{instance_name}.txt"))
}

/// Writes one best length per line, in run order, and returns the path.
pub fn write_results(report: &InstanceReport, dir: &Path, prefix: &str) -> TspResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = result_path(dir, prefix, &report.name);
    let mut out = BufWriter::new(File::create(&path)?);
    for length in report.best_lengths() {
        writeln!(out, "{length}")?;
    }
    out.flush()?;
    info!(path = %path.display(), "results saved");
    Ok(path)
}
