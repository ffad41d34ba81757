//! Error types for the Sobol integration kernel.
//!
//! Every error surfaces synchronously from the integration call. There is no
//! partial-success mode: when any variant is returned, no estimates were
//! produced.

use thiserror::Error;

/// Boxed error raised by a caller-supplied integrand.
pub type BoxedIntegrandError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Rejection reasons for a list of checkpoint sample sizes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SampleSizeError {
    /// No checkpoints were requested.
    #[error("Sample size list is empty")]
    Empty,

    /// A checkpoint requested zero samples.
    #[error("Sample size at position {position} is zero: every checkpoint needs at least one point")]
    ZeroSampleSize {
        /// Position of the offending entry.
        position: usize,
    },

    /// Checkpoints are not strictly increasing.
    #[error(
        "Sample sizes must be strictly increasing: position {position} has {value} after {previous}"
    )]
    NotStrictlyIncreasing {
        /// Position of the offending entry.
        position: usize,
        /// Value of the preceding entry.
        previous: usize,
        /// Value of the offending entry.
        value: usize,
    },

    /// The largest checkpoint needs more points than 32-bit direction numbers can index.
    #[error("Sample size {value} exceeds the maximum of {max} points")]
    TooLarge {
        /// Requested sample size.
        value: usize,
        /// Largest supported sample size.
        max: u64,
    },
}

/// Configuration error for the integrator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Concurrency bound must allow at least one worker.
    #[error("Invalid concurrency bound {0}: must be at least 1")]
    InvalidConcurrency(usize),
}

/// Integration error.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Checkpoint list failed validation; nothing was computed.
    #[error("Invalid sample sizes: {0}")]
    InvalidSampleSizes(#[from] SampleSizeError),

    /// Integrator configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The bounded worker pool could not be started.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    /// The integrand failed for one point; the whole integration is aborted.
    #[error("Integrand failed at point {index} ({x}, {y}): {source}")]
    IntegrandFailure {
        /// Sequence index of the failing point.
        index: usize,
        /// Normalised x coordinate.
        x: f64,
        /// Normalised y coordinate.
        y: f64,
        /// Error raised by the integrand.
        #[source]
        source: BoxedIntegrandError,
    },
}

impl From<rayon::ThreadPoolBuildError> for IntegrationError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::WorkerPool(err.to_string())
    }
}
