//! Direction numbers for the two axes of the sequence.
//!
//! Direction numbers are dyadic fractions scaled by 2^32. The x axis uses the
//! van der Corput construction `V_x[i] = 2^(32 - i)`; the y axis uses the
//! recurrence `V_y[1] = 2^31`, `V_y[i] = V_y[i-1] ^ (V_y[i-1] >> 1)`.
//! The two constructions are fixed for this two-dimensional sequence and are
//! not derived from primitive polynomials.

/// Smallest `L` such that `2^L >= n`.
///
/// Returns 0 for `n <= 1`: a single point needs no direction numbers.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::sobol::bit_depth;
///
/// assert_eq!(bit_depth(1), 0);
/// assert_eq!(bit_depth(2), 1);
/// assert_eq!(bit_depth(1000), 10);
/// assert_eq!(bit_depth(1024), 10);
/// ```
#[inline]
pub fn bit_depth(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// Coordinate axis of the two-dimensional sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First coordinate.
    X,
    /// Second coordinate.
    Y,
}

/// Direction numbers `V[1..=L]` for one axis.
///
/// Positions are one-based, matching the Gray-code indices that select them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionNumbers {
    axis: Axis,
    values: Vec<u32>,
}

impl DirectionNumbers {
    /// Computes the direction numbers of `axis` for bit depth `bits`.
    ///
    /// # Panics
    ///
    /// Panics if `bits > 32`.
    pub fn new(axis: Axis, bits: u32) -> Self {
        assert!(bits <= 32, "bit depth {} exceeds 32-bit magnitudes", bits);

        let values = match axis {
            Axis::X => (1..=bits).map(|i| 1u32 << (32 - i)).collect(),
            Axis::Y => {
                let mut values = Vec::with_capacity(bits as usize);
                let mut v = 1u32 << 31;
                for _ in 0..bits {
                    values.push(v);
                    v ^= v >> 1;
                }
                values
            }
        };

        Self { axis, values }
    }

    /// Axis these numbers belong to.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Bit depth `L` (number of direction numbers).
    #[inline]
    pub fn bits(&self) -> u32 {
        self.values.len() as u32
    }

    /// Direction number at one-based `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is 0 or greater than [`bits`](Self::bits).
    #[inline]
    pub fn get(&self, position: u32) -> u32 {
        self.values[position as usize - 1]
    }

    /// All direction numbers, position 1 first.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.values
    }
}

/// Direction numbers for both axes at a common bit depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionSet {
    /// Axis-x direction numbers.
    pub x: DirectionNumbers,
    /// Axis-y direction numbers.
    pub y: DirectionNumbers,
}

impl DirectionSet {
    /// Computes both axes for bit depth `bits`.
    pub fn new(bits: u32) -> Self {
        Self {
            x: DirectionNumbers::new(Axis::X, bits),
            y: DirectionNumbers::new(Axis::Y, bits),
        }
    }

    /// Computes both axes for the bit depth needed by `n` points.
    pub fn for_points(n: usize) -> Self {
        Self::new(bit_depth(n))
    }

    /// Common bit depth.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.x.bits()
    }
}
