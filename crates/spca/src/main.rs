use clap::Parser;
use log::{error, info};
use spca::plot::plot_report;
use spca::{Experiment, ExperimentConfig, Method};
use std::path::PathBuf;
use std::process;

/// Runs the sparse PCA recovery sweep on a synthetic spiked-covariance problem.
#[derive(Parser, Debug)]
#[command(name = "spca-sweep", version, about)]
struct Cli {
    /// JSON experiment configuration; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of features (p)
    #[arg(long, value_name = "P")]
    features: Option<usize>,

    /// Number of samples (n)
    #[arg(long, value_name = "N")]
    samples: Option<usize>,

    /// Weight of the planted signal in the covariance
    #[arg(long)]
    alpha: Option<f64>,

    /// Weight of the identity in the covariance
    #[arg(long)]
    beta: Option<f64>,

    /// Fraction of features in the support of the signal
    #[arg(long)]
    sparsity: Option<f64>,

    /// Seed for the synthetic data and the initializations
    #[arg(long)]
    seed: Option<u64>,

    /// Methods to run, comma separated (default: all five)
    #[arg(long, value_enum, value_delimiter = ',')]
    methods: Vec<Method>,

    /// Directory receiving the PNG plots
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Skip plotting
    #[arg(long)]
    no_plots: bool,
}

impl Cli {
    fn into_config(self) -> spca::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_json_file(path)?,
            None => ExperimentConfig::default(),
        };

        if let Some(features) = self.features {
            config.features = features;
        }
        if let Some(samples) = self.samples {
            config.samples = samples;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(beta) = self.beta {
            config.beta = beta;
        }
        if let Some(sparsity) = self.sparsity {
            config.sparsity = sparsity;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if !self.methods.is_empty() {
            config.methods = self.methods;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if self.no_plots {
            config.plots = false;
        }
        Ok(config)
    }
}

fn run(cli: Cli) -> spca::Result<()> {
    let config = cli.into_config()?;
    let experiment = Experiment::new(config)?;
    let config = experiment.config();

    for &method in &config.methods {
        let report = experiment.run_method(method)?;
        println!("{}", report);
        if config.plots {
            plot_report(&report, &config.output_dir)?;
        }
    }

    if config.plots {
        info!("Plots written to {}", config.output_dir.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        process::exit(1);
    }
}
