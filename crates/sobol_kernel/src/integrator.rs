//! Checkpointed quasi-Monte Carlo integration over the unit square.
//!
//! # Pipeline
//!
//! ```text
//! SampleSizes ──► bit depth L ──► DirectionSet (V_x, V_y)
//!                                       │
//!          ┌────────────────────────────┴──┐
//!     Sequential                       Concurrent
//!     SobolSequence2D                  GrayCodeIndices (C)
//!     (C[i] computed per step)         SobolPoints (X, Y)
//!     evaluate + push inline           evaluate on pool into values[i]
//!          │                               │
//!          │                           push values in index order
//!          └──────────► CheckpointAccumulator ──► estimates
//! ```
//!
//! The call is synchronous: it returns only after all `N` evaluations and
//! the reduction are complete.

use std::convert::Infallible;
use std::sync::OnceLock;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::accumulate::CheckpointAccumulator;
use crate::config::IntegrationConfig;
use crate::error::IntegrationError;
use crate::evaluate::{EvaluationObserver, Evaluator, NoopObserver};
use crate::sample_sizes::SampleSizes;
use crate::sobol::{bit_depth, DirectionSet, GrayCodeIndices, SobolPoints, SobolSequence2D};

/// Estimates recorded at each checkpoint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegrationResult {
    /// Checkpoint sample counts.
    sample_sizes: Vec<usize>,
    /// Mean estimate for each checkpoint.
    estimates: Vec<f64>,
}

impl IntegrationResult {
    /// Checkpoint sample counts.
    #[inline]
    pub fn sample_sizes(&self) -> &[usize] {
        &self.sample_sizes
    }

    /// Mean estimates, one per checkpoint.
    #[inline]
    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    /// Number of checkpoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    /// Whether there are no checkpoints.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// `(sample size, estimate)` pairs in checkpoint order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.sample_sizes
            .iter()
            .copied()
            .zip(self.estimates.iter().copied())
    }

    /// Consumes the result, returning the estimate vector.
    pub fn into_estimates(self) -> Vec<f64> {
        self.estimates
    }
}

/// Integrator holding a validated configuration and, in concurrent mode,
/// its bounded worker pool.
///
/// The pool is built once and reused across calls.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::{IntegrationConfig, SampleSizes, SobolIntegrator};
///
/// let integrator = SobolIntegrator::new(IntegrationConfig::concurrent()).unwrap();
/// let sizes = SampleSizes::new(vec![100, 1000, 10_000]).unwrap();
///
/// let result = integrator
///     .integrate(&sizes, |x, y| {
///         Ok::<_, std::convert::Infallible>(if x * x + y * y < 1.0 { 4.0 } else { 0.0 })
///     })
///     .unwrap();
///
/// assert_eq!(result.estimates(), &[3.16, 3.144, 3.142]);
/// ```
#[derive(Debug)]
pub struct SobolIntegrator {
    config: IntegrationConfig,
    pool: Option<ThreadPool>,
}

impl SobolIntegrator {
    /// Creates an integrator, starting the worker pool in concurrent mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an invalid configuration and `WorkerPool`
    /// if the pool threads cannot be spawned.
    pub fn new(config: IntegrationConfig) -> Result<Self, IntegrationError> {
        config.validate()?;

        let pool = if config.mode().is_concurrent() {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.max_concurrency())
                .thread_name(|i| format!("sobol-eval-{}", i))
                .build()?;
            debug!(workers = config.max_concurrency(), "worker pool started");
            Some(pool)
        } else {
            None
        };

        Ok(Self { config, pool })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Integrates `integrand` over the first `N = sample_sizes.total()`
    /// Sobol points, recording the running mean at each checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `IntegrandFailure` if the integrand fails at any point; no
    /// estimates are returned in that case.
    pub fn integrate<F, E>(
        &self,
        sample_sizes: &SampleSizes,
        integrand: F,
    ) -> Result<IntegrationResult, IntegrationError>
    where
        F: Fn(f64, f64) -> Result<f64, E> + Sync,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.integrate_observed(sample_sizes, integrand, NoopObserver)
    }

    /// Like [`integrate`](Self::integrate), reporting every evaluation to
    /// `observer`.
    pub fn integrate_observed<F, E, O>(
        &self,
        sample_sizes: &SampleSizes,
        integrand: F,
        observer: O,
    ) -> Result<IntegrationResult, IntegrationError>
    where
        F: Fn(f64, f64) -> Result<f64, E> + Sync,
        E: std::error::Error + Send + Sync + 'static,
        O: EvaluationObserver,
    {
        let n = sample_sizes.total();
        let bits = bit_depth(n);

        let started = Instant::now();
        let directions = DirectionSet::new(bits);
        debug!(
            points = n,
            bit_depth = bits,
            checkpoints = sample_sizes.len(),
            mode = ?self.config.mode(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "direction numbers ready"
        );

        let evaluator = Evaluator::with_observer(&integrand, observer);
        let mut accumulator = CheckpointAccumulator::new(sample_sizes);

        match &self.pool {
            None => {
                let started = Instant::now();
                let sequence = SobolSequence2D::with_directions(directions, n);
                evaluator.evaluate_sequential(sequence, &mut accumulator)?;
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "sequential integration complete"
                );
            }
            Some(pool) => {
                let started = Instant::now();
                let gray = GrayCodeIndices::new(n);
                let points = SobolPoints::generate(&directions, &gray);
                drop(gray);
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "sequence generated"
                );

                let started = Instant::now();
                let values = evaluator.evaluate_concurrent(&points, pool)?;
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    workers = self.config.max_concurrency(),
                    "concurrent evaluation complete"
                );

                for value in values {
                    accumulator.push(value);
                }
            }
        }

        Ok(IntegrationResult {
            sample_sizes: sample_sizes.as_slice().to_vec(),
            estimates: accumulator.finish(),
        })
    }
}

/// Integrates an infallible integrand over the unit square.
///
/// `sample_sizes` must be strictly increasing and positive; the last entry is
/// the number of Sobol points used. `use_concurrency` selects evaluation on
/// a pool of [`DEFAULT_MAX_CONCURRENCY`](crate::DEFAULT_MAX_CONCURRENCY)
/// workers.
///
/// Concurrent calls share one process-wide default pool, started on first
/// use. Use a [`SobolIntegrator`] for a different worker bound.
///
/// # Errors
///
/// Returns `InvalidSampleSizes` before any computation if `sample_sizes` is
/// malformed.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::integrate;
///
/// let estimates = integrate(&[1, 4], |x, y| x + y, false).unwrap();
/// assert_eq!(estimates, vec![0.0, 0.75]);
///
/// assert!(integrate(&[5, 3], |x, y| x + y, false).is_err());
/// ```
pub fn integrate<F>(
    sample_sizes: &[usize],
    integrand: F,
    use_concurrency: bool,
) -> Result<Vec<f64>, IntegrationError>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    try_integrate(
        sample_sizes,
        move |x, y| Ok::<f64, Infallible>(integrand(x, y)),
        use_concurrency,
    )
}

/// Integrates a fallible integrand over the unit square.
///
/// # Errors
///
/// Returns `InvalidSampleSizes` for malformed checkpoints and
/// `IntegrandFailure` if the integrand fails for any point.
pub fn try_integrate<F, E>(
    sample_sizes: &[usize],
    integrand: F,
    use_concurrency: bool,
) -> Result<Vec<f64>, IntegrationError>
where
    F: Fn(f64, f64) -> Result<f64, E> + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    let sample_sizes = SampleSizes::try_from(sample_sizes)?;
    let result = if use_concurrency {
        shared_concurrent()?.integrate(&sample_sizes, integrand)?
    } else {
        SobolIntegrator::new(IntegrationConfig::sequential())?
            .integrate(&sample_sizes, integrand)?
    };
    Ok(result.into_estimates())
}

static SHARED_CONCURRENT: OnceLock<SobolIntegrator> = OnceLock::new();

/// Default-bound concurrent integrator shared by the free functions.
fn shared_concurrent() -> Result<&'static SobolIntegrator, IntegrationError> {
    if let Some(integrator) = SHARED_CONCURRENT.get() {
        return Ok(integrator);
    }
    let integrator = SobolIntegrator::new(IntegrationConfig::concurrent())?;
    // A racing caller may have won; its pool is kept and ours is dropped.
    let _ = SHARED_CONCURRENT.set(integrator);
    SHARED_CONCURRENT
        .get()
        .ok_or_else(|| IntegrationError::WorkerPool("default pool unavailable".to_string()))
}

/// Integrates with an explicit configuration and evaluation observer.
///
/// Builds a fresh [`SobolIntegrator`] for the call, so a concurrent
/// configuration starts and tears down a worker pool every time. Keep an
/// integrator around instead to reuse its pool across calls.
pub fn integrate_observed<F, E, O>(
    sample_sizes: &SampleSizes,
    integrand: F,
    config: &IntegrationConfig,
    observer: O,
) -> Result<Vec<f64>, IntegrationError>
where
    F: Fn(f64, f64) -> Result<f64, E> + Sync,
    E: std::error::Error + Send + Sync + 'static,
    O: EvaluationObserver,
{
    SobolIntegrator::new(config.clone())?
        .integrate_observed(sample_sizes, integrand, observer)
        .map(IntegrationResult::into_estimates)
}
