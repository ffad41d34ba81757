//! sobol2d - Sobol Quasi-Monte Carlo Integration CLI
//!
//! Demonstration entry point for the `sobol_kernel` library: estimates pi
//! from the fraction of two-dimensional Sobol points that fall inside the
//! unit circle.
//!
//! # Commands
//!
//! - `sobol2d integrate` - Integrate the quarter-circle indicator at each checkpoint
//! - `sobol2d points --count <n>` - Print the first `n` Sobol points

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod integrand;

use config::{build_config, CliArgs, OutputFormat};
pub use error::{CliError, Result};

/// Sobol quasi-Monte Carlo integration over the unit square
#[derive(Parser)]
#[command(name = "sobol2d")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SOBOL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate pi at each checkpoint sample size
    Integrate {
        /// Checkpoint sample sizes, comma separated and strictly increasing
        #[arg(short = 'n', long, value_delimiter = ',', env = "SOBOL_SAMPLE_SIZES")]
        sample_sizes: Option<Vec<usize>>,

        /// Evaluate the integrand on a bounded worker pool
        #[arg(long, env = "SOBOL_CONCURRENT")]
        concurrent: bool,

        /// Maximum simultaneous integrand evaluations in concurrent mode
        #[arg(short = 'j', long, env = "SOBOL_MAX_CONCURRENCY")]
        max_concurrency: Option<usize>,

        /// Artificial delay per integrand call, in milliseconds
        #[arg(long)]
        sleep_ms: Option<u64>,

        /// Log how many integrand calls each worker made
        #[arg(long)]
        report_workers: bool,
    },

    /// Print Sobol points
    Points {
        /// Number of points to print
        #[arg(long, default_value = "16")]
        count: usize,

        /// Number of leading points to skip
        #[arg(long, default_value = "0")]
        skip: usize,
    },
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut args = CliArgs {
        config_file: cli.config,
        log_level: cli.log_level,
        format: cli.format,
        ..CliArgs::default()
    };

    if let Commands::Integrate {
        sample_sizes,
        concurrent,
        max_concurrency,
        sleep_ms,
        report_workers,
    } = &cli.command
    {
        args.sample_sizes = sample_sizes.clone();
        args.concurrent = *concurrent;
        args.max_concurrency = *max_concurrency;
        args.sleep_ms = *sleep_ms;
        args.report_workers = *report_workers;
    }

    let config = build_config(&args)?;
    init_tracing(config.log_level.as_filter_str());

    info!("sobol2d v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Integrate { .. } => commands::integrate::run(&config),
        Commands::Points { count, skip } => commands::points::run(count, skip, config.format),
    }
}
