//! Checkpointed running-mean reduction.
//!
//! Values are summed strictly in index order. Both evaluation modes feed the
//! same accumulator in the same order, so their estimates are bit-identical
//! regardless of how concurrent evaluations were scheduled.

use crate::sample_sizes::SampleSizes;

/// Running sum that records a mean estimate at each checkpoint.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::{CheckpointAccumulator, SampleSizes};
///
/// let sizes = SampleSizes::new(vec![1, 3]).unwrap();
/// let mut acc = CheckpointAccumulator::new(&sizes);
/// for v in [4.0, 0.0, 2.0] {
///     acc.push(v);
/// }
/// assert_eq!(acc.finish(), vec![4.0, 2.0]);
/// ```
#[derive(Clone, Debug)]
pub struct CheckpointAccumulator<'a> {
    checkpoints: &'a [usize],
    next_checkpoint: usize,
    count: usize,
    sum: f64,
    estimates: Vec<f64>,
}

impl<'a> CheckpointAccumulator<'a> {
    /// Creates an accumulator for the given checkpoints.
    pub fn new(sample_sizes: &'a SampleSizes) -> Self {
        Self {
            checkpoints: sample_sizes.as_slice(),
            next_checkpoint: 0,
            count: 0,
            sum: 0.0,
            estimates: Vec::with_capacity(sample_sizes.len()),
        }
    }

    /// Adds the value of the next point in index order.
    ///
    /// Records `sum / a[k]` when the number of values seen reaches the
    /// current checkpoint `a[k]`. Values pushed after the last checkpoint are
    /// summed but never reported.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;

        if let Some(&checkpoint) = self.checkpoints.get(self.next_checkpoint) {
            if self.count == checkpoint {
                let estimate = self.sum / checkpoint as f64;
                tracing::trace!(checkpoint, estimate, "checkpoint reached");
                self.estimates.push(estimate);
                self.next_checkpoint += 1;
            }
        }
    }

    /// Number of values pushed so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of the values pushed so far.
    #[inline]
    pub fn running_sum(&self) -> f64 {
        self.sum
    }

    /// Estimates recorded so far.
    #[inline]
    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    /// Whether every checkpoint has been recorded.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.next_checkpoint == self.checkpoints.len()
    }

    /// Returns the estimate vector.
    ///
    /// Shorter than the checkpoint list if fewer than `N` values were pushed.
    pub fn finish(self) -> Vec<f64> {
        debug_assert!(
            self.is_complete(),
            "finished after {} of {} values",
            self.count,
            self.checkpoints.last().copied().unwrap_or(0)
        );
        self.estimates
    }

    /// Reduces a complete value array in one pass.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `values` is shorter than the last checkpoint.
    pub fn reduce(values: &[f64], sample_sizes: &'a SampleSizes) -> Vec<f64> {
        let mut acc = Self::new(sample_sizes);
        for &value in values {
            acc.push(value);
        }
        acc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sizes(v: &[usize]) -> SampleSizes {
        SampleSizes::new(v.to_vec()).unwrap()
    }

    #[test]
    fn test_single_checkpoint_mean() {
        let s = sizes(&[4]);
        let est = CheckpointAccumulator::reduce(&[1.0, 2.0, 3.0, 4.0], &s);
        assert_eq!(est, vec![2.5]);
    }

    #[test]
    fn test_first_checkpoint_of_one() {
        let s = sizes(&[1, 2]);
        let est = CheckpointAccumulator::reduce(&[3.0, 5.0], &s);
        assert_eq!(est, vec![3.0, 4.0]);
    }

    #[test]
    fn test_checkpoint_consistency() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64).sqrt()).collect();
        let s = sizes(&[13, 50]);
        let est = CheckpointAccumulator::reduce(&values, &s);

        let tail: f64 = values[13..50].iter().sum();
        assert_relative_eq!(est[1], (13.0 * est[0] + tail) / 50.0, epsilon = 1e-12);
    }

    #[test]
    fn test_incremental_state() {
        let s = sizes(&[2, 3]);
        let mut acc = CheckpointAccumulator::new(&s);
        acc.push(1.0);
        assert!(acc.estimates().is_empty());
        acc.push(2.0);
        assert_eq!(acc.estimates(), &[1.5]);
        assert!(!acc.is_complete());
        acc.push(6.0);
        assert!(acc.is_complete());
        assert_eq!(acc.count(), 3);
        assert_eq!(acc.running_sum(), 9.0);
        assert_eq!(acc.finish(), vec![1.5, 3.0]);
    }

    #[test]
    fn test_values_past_last_checkpoint_ignored() {
        let s = sizes(&[2]);
        let mut acc = CheckpointAccumulator::new(&s);
        for v in [1.0, 1.0, 100.0] {
            acc.push(v);
        }
        assert_eq!(acc.estimates(), &[1.0]);
    }
}
