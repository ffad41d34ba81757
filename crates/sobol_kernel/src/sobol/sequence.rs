//! Two-dimensional Sobol point generation.
//!
//! Points are produced in Gray-code order by the Antonov-Saleev recurrence:
//!
//! ```text
//! X[0] = Y[0] = 0
//! X[i] = X[i-1] ^ V_x[C[i-1]]
//! Y[i] = Y[i-1] ^ V_y[C[i-1]]
//! ```
//!
//! Raw coordinates are 32-bit fractions; the normalised coordinate is
//! `raw * 2^-32`, always in `[0, 1)`.
//!
//! Two generators are provided:
//!
//! - [`SobolPoints`]: the full `X`, `Y` arrays, generated up front before a
//!   parallel evaluation phase.
//! - [`SobolSequence2D`]: a streaming generator implementing
//!   [`LowDiscrepancySequence`], consumed point by point in sequential mode.

use super::direction::{bit_depth, DirectionSet};
use super::gray::{lowest_zero_bit, GrayCodeIndices};

/// `2^-32`, the scale from raw to normalised coordinates.
pub const TWO_POW_MINUS_32: f64 = 1.0 / 4_294_967_296.0;

/// Maps a raw 32-bit coordinate into `[0, 1)`.
#[inline]
pub fn normalise(raw: u32) -> f64 {
    f64::from(raw) * TWO_POW_MINUS_32
}

/// Trait for low-discrepancy sequences used in quasi-Monte Carlo methods.
///
/// Low-discrepancy sequences cover the unit hypercube more evenly than
/// pseudo-random draws, which speeds up convergence of sample means.
pub trait LowDiscrepancySequence {
    /// Returns the dimensionality of the sequence.
    fn dimension(&self) -> usize;

    /// Advances the sequence and returns the next point.
    ///
    /// # Returns
    ///
    /// A slice of `dimension()` values in `[0, 1)`, or `None` once the
    /// sequence's capacity is exhausted.
    fn next_point(&mut self) -> Option<&[f64]>;

    /// Resets the sequence to its initial state.
    ///
    /// After calling this method, the sequence produces the same points as a
    /// newly initialised instance.
    fn reset(&mut self);

    /// Skips ahead by `n` points.
    ///
    /// Skipping past the end leaves the sequence exhausted.
    fn skip_ahead(&mut self, n: usize);
}

/// Raw coordinates of the first `N` points, stored as parallel arrays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SobolPoints {
    x: Vec<u32>,
    y: Vec<u32>,
}

impl SobolPoints {
    /// Generates the first `gray.len()` points.
    ///
    /// # Panics
    ///
    /// Panics if `directions` has fewer bits than the Gray-code indices
    /// consumed by the recurrence require.
    pub fn generate(directions: &DirectionSet, gray: &GrayCodeIndices) -> Self {
        let n = gray.len();
        let mut x = Vec::with_capacity(n);
        let mut y = Vec::with_capacity(n);

        if n > 0 {
            x.push(0);
            y.push(0);
        }
        for i in 1..n {
            let c = gray.get(i - 1);
            x.push(x[i - 1] ^ directions.x.get(c));
            y.push(y[i - 1] ^ directions.y.get(c));
        }

        Self { x, y }
    }

    /// Generates the first `n` points with freshly computed tables.
    pub fn first(n: usize) -> Self {
        Self::generate(&DirectionSet::for_points(n), &GrayCodeIndices::new(n))
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether there are no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Raw coordinates of point `i`.
    #[inline]
    pub fn raw(&self, i: usize) -> (u32, u32) {
        (self.x[i], self.y[i])
    }

    /// Normalised coordinates of point `i`.
    #[inline]
    pub fn point(&self, i: usize) -> (f64, f64) {
        (normalise(self.x[i]), normalise(self.y[i]))
    }

    /// Raw x coordinates.
    #[inline]
    pub fn xs(&self) -> &[u32] {
        &self.x
    }

    /// Raw y coordinates.
    #[inline]
    pub fn ys(&self) -> &[u32] {
        &self.y
    }

    /// Iterator over normalised points in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| (normalise(x), normalise(y)))
    }
}

/// Streaming generator over the first `capacity` points.
///
/// Holds only the direction numbers: each step index `C[i]` is computed as
/// the point is produced, so memory does not grow with `capacity` and
/// [`skip_ahead`](LowDiscrepancySequence::skip_ahead) jumps straight to the
/// target point.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::sobol::{LowDiscrepancySequence, SobolSequence2D};
///
/// let mut seq = SobolSequence2D::new(4);
/// assert_eq!(seq.next_point(), Some(&[0.0, 0.0][..]));
/// assert_eq!(seq.next_point(), Some(&[0.5, 0.5][..]));
/// assert_eq!(seq.next_point(), Some(&[0.75, 0.25][..]));
/// assert_eq!(seq.next_point(), Some(&[0.25, 0.75][..]));
/// assert_eq!(seq.next_point(), None);
/// ```
#[derive(Clone, Debug)]
pub struct SobolSequence2D {
    directions: DirectionSet,
    capacity: usize,
    /// Index of the point returned by the next call to `next_point`.
    next: usize,
    x: u32,
    y: u32,
    buffer: [f64; 2],
}

impl SobolSequence2D {
    /// Creates a generator for the first `capacity` points.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `2^32`.
    pub fn new(capacity: usize) -> Self {
        Self::with_directions(DirectionSet::for_points(capacity), capacity)
    }

    /// Creates a generator from precomputed direction numbers.
    ///
    /// # Panics
    ///
    /// Panics if `directions` has fewer bits than `capacity` points need.
    pub fn with_directions(directions: DirectionSet, capacity: usize) -> Self {
        assert!(
            directions.bits() >= bit_depth(capacity),
            "{} direction bits cannot address {} points",
            directions.bits(),
            capacity
        );
        Self {
            directions,
            capacity,
            next: 0,
            x: 0,
            y: 0,
            buffer: [0.0; 2],
        }
    }

    /// Number of points the generator can produce.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the next point to be returned.
    #[inline]
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Raw coordinates of the next point, if any.
    pub fn next_raw(&mut self) -> Option<(u32, u32)> {
        if self.next >= self.capacity {
            return None;
        }
        let current = (self.x, self.y);
        if self.next + 1 < self.capacity {
            let c = lowest_zero_bit(self.next);
            self.x ^= self.directions.x.get(c);
            self.y ^= self.directions.y.get(c);
        }
        self.next += 1;
        Some(current)
    }

    /// Raw coordinates of point `index`, computed from its Gray code.
    fn raw_at(&self, index: usize) -> (u32, u32) {
        let mut gray = index ^ (index >> 1);
        let (mut x, mut y) = (0u32, 0u32);
        let mut position = 1;
        while gray != 0 {
            if gray & 1 != 0 {
                x ^= self.directions.x.get(position);
                y ^= self.directions.y.get(position);
            }
            gray >>= 1;
            position += 1;
        }
        (x, y)
    }
}

impl LowDiscrepancySequence for SobolSequence2D {
    fn dimension(&self) -> usize {
        2
    }

    fn next_point(&mut self) -> Option<&[f64]> {
        let (x, y) = self.next_raw()?;
        self.buffer = [normalise(x), normalise(y)];
        Some(&self.buffer)
    }

    fn reset(&mut self) {
        self.next = 0;
        self.x = 0;
        self.y = 0;
    }

    fn skip_ahead(&mut self, n: usize) {
        let target = self.next.saturating_add(n).min(self.capacity);
        if target < self.capacity {
            (self.x, self.y) = self.raw_at(target);
        }
        self.next = target;
    }
}

impl Iterator for SobolSequence2D {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_raw().map(|(x, y)| (normalise(x), normalise(y)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SobolSequence2D {}
