//! Integration configuration.
//!
//! This module provides the configuration type and builder for
//! [`SobolIntegrator`](crate::SobolIntegrator).

use crate::error::ConfigError;

/// Default maximum number of simultaneous integrand evaluations.
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

/// How integrand evaluations are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EvaluationMode {
    /// Evaluate in index order on the calling thread, summing inline.
    ///
    /// Best when the integrand is cheap relative to sequence generation.
    #[default]
    Sequential,

    /// Evaluate on a bounded worker pool, then reduce in index order.
    ///
    /// Best when time is dominated by integrand calls.
    Concurrent,
}

impl EvaluationMode {
    /// Selects `Concurrent` when `use_concurrency` is set.
    #[inline]
    pub fn from_flag(use_concurrency: bool) -> Self {
        if use_concurrency {
            Self::Concurrent
        } else {
            Self::Sequential
        }
    }

    /// Whether this mode uses the worker pool.
    #[inline]
    pub fn is_concurrent(self) -> bool {
        matches!(self, Self::Concurrent)
    }
}

/// Integration configuration.
///
/// Immutable once built. Use [`IntegrationConfigBuilder`] to construct
/// instances.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::{EvaluationMode, IntegrationConfig};
///
/// let config = IntegrationConfig::builder()
///     .mode(EvaluationMode::Concurrent)
///     .max_concurrency(8)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.mode(), EvaluationMode::Concurrent);
/// assert_eq!(config.max_concurrency(), 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegrationConfig {
    /// Evaluation scheduling.
    mode: EvaluationMode,
    /// Upper bound on simultaneous integrand evaluations.
    max_concurrency: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            mode: EvaluationMode::Sequential,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl IntegrationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> IntegrationConfigBuilder {
        IntegrationConfigBuilder::default()
    }

    /// Sequential configuration with default bounds.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Concurrent configuration with the default concurrency bound.
    pub fn concurrent() -> Self {
        Self {
            mode: EvaluationMode::Concurrent,
            ..Self::default()
        }
    }

    /// Returns the evaluation mode.
    #[inline]
    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Returns the concurrency bound.
    #[inline]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConcurrency` if the bound is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.max_concurrency));
        }
        Ok(())
    }
}

/// Builder for [`IntegrationConfig`].
///
/// Validates at build time.
#[derive(Clone, Debug, Default)]
pub struct IntegrationConfigBuilder {
    mode: EvaluationMode,
    max_concurrency: Option<usize>,
}

impl IntegrationConfigBuilder {
    /// Sets the evaluation mode.
    #[inline]
    pub fn mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for `mode(EvaluationMode::from_flag(use_concurrency))`.
    #[inline]
    pub fn use_concurrency(self, use_concurrency: bool) -> Self {
        self.mode(EvaluationMode::from_flag(use_concurrency))
    }

    /// Sets the maximum number of simultaneous integrand evaluations.
    ///
    /// Only used in concurrent mode. Defaults to [`DEFAULT_MAX_CONCURRENCY`].
    #[inline]
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the concurrency bound is zero.
    pub fn build(self) -> Result<IntegrationConfig, ConfigError> {
        let config = IntegrationConfig {
            mode: self.mode,
            max_concurrency: self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
        };
        config.validate()?;
        Ok(config)
    }
}
