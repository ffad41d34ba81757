//! Validated checkpoint sample sizes.

use crate::error::SampleSizeError;

/// Largest number of points that 32-bit direction numbers can index.
pub const MAX_SAMPLE_SIZE: u64 = 1 << 32;

/// Strictly increasing list of checkpoint sample counts.
///
/// The last entry is the total number of points `N` generated by an
/// integration run; an estimate is recorded after each entry's worth of
/// points.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::SampleSizes;
///
/// let sizes = SampleSizes::new(vec![100, 1000, 10_000]).unwrap();
/// assert_eq!(sizes.total(), 10_000);
/// assert_eq!(sizes.len(), 3);
///
/// assert!(SampleSizes::new(vec![5, 3]).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSizes(Vec<usize>);

impl SampleSizes {
    /// Validates and wraps a checkpoint list.
    ///
    /// # Errors
    ///
    /// Returns `SampleSizeError` if the list is empty, contains a zero, is not
    /// strictly increasing, or its last entry exceeds [`MAX_SAMPLE_SIZE`].
    pub fn new(sizes: Vec<usize>) -> Result<Self, SampleSizeError> {
        let Some(&last) = sizes.last() else {
            return Err(SampleSizeError::Empty);
        };

        for (position, window) in sizes.windows(2).enumerate() {
            if window[1] <= window[0] {
                return Err(SampleSizeError::NotStrictlyIncreasing {
                    position: position + 1,
                    previous: window[0],
                    value: window[1],
                });
            }
        }

        // Strictly increasing, so only the head can be zero.
        if sizes[0] == 0 {
            return Err(SampleSizeError::ZeroSampleSize { position: 0 });
        }

        if last as u64 > MAX_SAMPLE_SIZE {
            return Err(SampleSizeError::TooLarge {
                value: last,
                max: MAX_SAMPLE_SIZE,
            });
        }

        Ok(Self(sizes))
    }

    /// Total number of points to generate (the last checkpoint).
    #[inline]
    pub fn total(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Number of checkpoints.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: construction rejects empty lists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checkpoints as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Consumes the list and returns the raw checkpoints.
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl TryFrom<Vec<usize>> for SampleSizes {
    type Error = SampleSizeError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl TryFrom<&[usize]> for SampleSizes {
    type Error = SampleSizeError;

    fn try_from(sizes: &[usize]) -> Result<Self, Self::Error> {
        Self::new(sizes.to_vec())
    }
}

impl AsRef<[usize]> for SampleSizes {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}
