//! # Sobol Kernel
//!
//! Quasi-Monte Carlo integration of a two-variable function over the unit
//! square, using a two-dimensional Sobol low-discrepancy sequence.
//!
//! A single call returns running mean estimates at several checkpoint
//! sample sizes, computed in one pass over the sequence.
//!
//! ## Architecture
//!
//! ```text
//! integrate()
//! ├── SampleSizes            (validated checkpoints)
//! ├── sobol::DirectionSet    (direction numbers per axis)
//! ├── sobol::GrayCodeIndices (step index per point)
//! ├── sobol::SobolPoints / SobolSequence2D
//! ├── Evaluator              (sequential or bounded-pool evaluation)
//! └── CheckpointAccumulator  (index-ordered running sums)
//! ```
//!
//! ## Determinism
//!
//! The sequence is fully deterministic and the reduction always sums values
//! in index order, so sequential and concurrent evaluation return
//! bit-identical estimates for a deterministic integrand.
//!
//! ## Usage Example
//!
//! ```rust
//! use sobol_kernel::integrate;
//!
//! let quarter_circle = |x: f64, y: f64| if x * x + y * y < 1.0 { 4.0 } else { 0.0 };
//!
//! let estimates = integrate(&[100, 1000, 10_000], quarter_circle, true).unwrap();
//! for estimate in &estimates {
//!     assert!((estimate - std::f64::consts::PI).abs() < 0.5);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`IntegrationConfig`],
//!   [`EvaluationMode`] and [`IntegrationResult`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod accumulate;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod integrator;
pub mod sample_sizes;
pub mod sobol;

// Re-exports for convenient access
pub use accumulate::CheckpointAccumulator;
pub use config::{
    EvaluationMode, IntegrationConfig, IntegrationConfigBuilder, DEFAULT_MAX_CONCURRENCY,
};
pub use error::{BoxedIntegrandError, ConfigError, IntegrationError, SampleSizeError};
pub use evaluate::{EvaluationObserver, Evaluator, NoopObserver, WorkerCalls, WorkerUsage};
pub use integrator::{
    integrate, integrate_observed, try_integrate, IntegrationResult, SobolIntegrator,
};
pub use sample_sizes::{SampleSizes, MAX_SAMPLE_SIZE};
