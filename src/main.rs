use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tsp_ga::experiment::{run_instance, write_results, ExperimentConfig};
use tsp_ga::ga::GaConfig;
use tsp_ga::tsp::tsplib;

/// Runs repeated GA experiments on TSPLIB instances.
#[derive(Parser, Debug)]
#[command(name = "tsp-ga", author, version, about)]
struct Cli {
    /// TSPLIB `.tsp` files to solve
    #[arg(required = true, value_name = "FILE")]
    instances: Vec<PathBuf>,

    /// Independent runs per instance
    #[arg(long, default_value_t = 30)]
    repeats: usize,

    /// Tours per generation
    #[arg(long, default_value_t = 100)]
    population_size: usize,

    /// Crossover probability
    #[arg(long, default_value_t = 0.8)]
    crossover_rate: f64,

    /// Mutation probability
    #[arg(long, default_value_t = 0.1)]
    mutation_rate: f64,

    /// Evaluation budget per node
    #[arg(long, default_value_t = 1000)]
    evaluations_per_node: usize,

    /// Master seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads; all cores when omitted
    #[arg(long)]
    workers: Option<usize>,

    /// Directory for result files
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Result file name prefix
    #[arg(long, default_value = "GA_")]
    prefix: String,
}

impl Cli {
    fn experiment_config(&self) -> ExperimentConfig {
        ExperimentConfig {
            ga: GaConfig {
                population_size: self.population_size,
                crossover_rate: self.crossover_rate,
                mutation_rate: self.mutation_rate,
            },
            repeats: self.repeats,
            evaluations_per_node: self.evaluations_per_node,
            master_seed: self.seed,
            workers: self.workers,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = cli.experiment_config();
    if let Err(err) = config.validate() {
        error!(%err, "invalid configuration");
        return ExitCode::FAILURE;
    }
    // Fix the seed once so every instance shares it and it can be logged.
    let seed = *config.master_seed.get_or_insert_with(rand::random);
    info!(seed, "master seed");

    let mut failed = false;
    for path in &cli.instances {
        info!(path = %path.display(), "processing");
        let instance = match tsplib::read_file(path) {
            Ok(instance) => instance,
            Err(err) => {
                error!(path = %path.display(), %err, "cannot load instance");
                failed = true;
                continue;
            }
        };

        let outcome = run_instance(&instance, &config).and_then(|report| {
            let saved = write_results(&report, &cli.output_dir, &cli.prefix)?;
            Ok((report, saved))
        });
        match outcome {
            Ok((report, saved)) => info!(
                instance = %report.name,
                best = ?report.best(),
                successful = report.successful(),
                path = %saved.display(),
                "instance finished"
            ),
            Err(err) => {
                error!(instance = %instance.name, %err, "instance failed");
                failed = true;
            }
        }
    }

    info!("all experiments finished");
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
