//! Integrate command implementation
//!
//! Estimates pi as the mean of the quarter-circle integrand over the first
//! `N` Sobol points, reporting the estimate at every checkpoint.

use std::f64::consts::PI;
use std::time::{Duration, Instant};

use serde::Serialize;
use sobol_kernel::{
    EvaluationMode, IntegrationResult, NoopObserver, SampleSizes, SobolIntegrator, WorkerUsage,
};
use tracing::info;

use crate::config::{CliConfig, OutputFormat};
use crate::integrand::quarter_circle;
use crate::Result;

/// JSON report for one integration run
#[derive(Debug, Serialize)]
struct Report<'a> {
    mode: EvaluationMode,
    max_concurrency: usize,
    elapsed_ms: u64,
    result: &'a IntegrationResult,
    differences: Vec<f64>,
}

/// Run the integrate command
pub fn run(config: &CliConfig) -> Result<()> {
    let sample_sizes = SampleSizes::new(config.sample_sizes.clone())
        .map_err(sobol_kernel::IntegrationError::from)?;
    let kernel_config = config
        .integration_config()
        .map_err(sobol_kernel::IntegrationError::from)?;

    info!("MC simulate fraction of (x,y) 2-D Sobol sequence points falling inside unit circle");
    info!(
        sample_sizes = ?sample_sizes.as_slice(),
        mode = ?kernel_config.mode(),
        max_concurrency = kernel_config.max_concurrency(),
        sleep_ms = config.sleep_ms,
        "Starting integration"
    );

    let integrator = SobolIntegrator::new(kernel_config)?;
    let integrand = quarter_circle(Duration::from_millis(config.sleep_ms));

    let started = Instant::now();
    let result = if config.report_workers {
        let usage = WorkerUsage::new(integrator.config().max_concurrency());
        let result = integrator.integrate_observed(&sample_sizes, integrand, &usage)?;
        report_workers(&usage);
        result
    } else {
        integrator.integrate_observed(&sample_sizes, integrand, NoopObserver)?
    };
    let elapsed = started.elapsed();
    info!(elapsed_ms = elapsed.as_millis() as u64, "Integration complete");

    match config.format {
        OutputFormat::Table => print_table(&result),
        OutputFormat::Json => {
            let report = Report {
                mode: integrator.config().mode(),
                max_concurrency: integrator.config().max_concurrency(),
                elapsed_ms: elapsed.as_millis() as u64,
                differences: result.estimates().iter().map(|e| e - PI).collect(),
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn report_workers(usage: &WorkerUsage) {
    info!("Used {} threads", usage.threads_used());
    for worker in usage.calls_per_worker() {
        match worker.worker {
            Some(index) => info!("Worker {} called integrand {} times", index, worker.calls),
            None => info!("Calling thread called integrand {} times", worker.calls),
        }
    }
}

fn print_table(result: &IntegrationResult) {
    for line in format_rows(result) {
        println!("{}", line);
    }
}

/// One line per checkpoint: `N`, estimate, and difference to pi
fn format_rows(result: &IntegrationResult) -> Vec<String> {
    result
        .iter()
        .map(|(n, estimate)| {
            format!(
                "N: {:>10}, Calculated Pi: {:.6}, Diff: {:.6}",
                n,
                estimate,
                estimate - PI
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use sobol_kernel::IntegrationConfig;

    #[test]
    fn test_format_rows() {
        let integrator = SobolIntegrator::new(IntegrationConfig::default()).unwrap();
        let sizes = SampleSizes::new(vec![100, 1000]).unwrap();
        let result = integrator
            .integrate(&sizes, quarter_circle(Duration::ZERO))
            .unwrap();

        let rows = format_rows(&result);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "N:        100, Calculated Pi: 3.160000, Diff: 0.018407");
        assert!(rows[1].starts_with("N:       1000, Calculated Pi: 3.144000"));
    }

    #[test]
    fn test_run_rejects_bad_sample_sizes() {
        let config = CliConfig {
            sample_sizes: vec![50, 10],
            ..CliConfig::default()
        };
        assert!(matches!(run(&config), Err(CliError::Integration(_))));
    }

    #[test]
    fn test_run_concurrent_with_worker_report() {
        let config = CliConfig {
            sample_sizes: vec![10, 100],
            concurrent: true,
            max_concurrency: 2,
            report_workers: true,
            format: OutputFormat::Json,
            ..CliConfig::default()
        };
        assert!(run(&config).is_ok());
    }
}
