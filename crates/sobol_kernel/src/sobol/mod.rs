//! # Two-Dimensional Sobol Sequence
//!
//! Deterministic low-discrepancy points on the unit square, generated
//! incrementally in Gray-code order.
//!
//! ## Module Structure
//!
//! - [`direction`]: direction numbers per axis and the bit depth `L`
//! - [`gray`]: Gray-code step indices `C[i]`
//! - [`sequence`]: batch and streaming point generators
//!
//! ## Scope
//!
//! The construction is fixed to exactly two dimensions: the x axis uses
//! powers of two and the y axis an XOR-shift recurrence. Extending to more
//! dimensions needs per-dimension direction numbers from primitive
//! polynomials and is not supported here.
//!
//! ## Usage Example
//!
//! ```rust
//! use sobol_kernel::sobol::{DirectionSet, GrayCodeIndices, SobolPoints};
//!
//! let n = 1000;
//! let directions = DirectionSet::for_points(n);
//! let gray = GrayCodeIndices::new(n);
//! let points = SobolPoints::generate(&directions, &gray);
//!
//! assert_eq!(directions.bits(), 10);
//! assert_eq!(points.point(0), (0.0, 0.0));
//! assert_eq!(points.point(1), (0.5, 0.5));
//! ```

pub mod direction;
pub mod gray;
pub mod sequence;

pub use direction::{bit_depth, Axis, DirectionNumbers, DirectionSet};
pub use gray::{lowest_zero_bit, GrayCodeIndices};
pub use sequence::{
    normalise, LowDiscrepancySequence, SobolPoints, SobolSequence2D, TWO_POW_MINUS_32,
};
