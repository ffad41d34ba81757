//! Integrand evaluation over Sobol points.
//!
//! # Sequential Mode
//!
//! Points are streamed from a [`SobolSequence2D`] and each value is pushed
//! straight into the [`CheckpointAccumulator`]; no value array is kept.
//!
//! # Concurrent Mode
//!
//! All points are generated first. Point 0 is evaluated on the calling
//! thread, points `1..N` on a bounded rayon pool. Every task writes only its
//! own slot of the `values` array, so there is no shared accumulator and no
//! synchronisation while evaluating. The array is reduced afterwards in
//! index order, which keeps the estimates bit-identical to sequential mode.
//!
//! # Observability
//!
//! Each evaluation is reported to an [`EvaluationObserver`]. [`WorkerUsage`]
//! counts calls per worker thread; [`NoopObserver`] discards them.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::accumulate::CheckpointAccumulator;
use crate::error::IntegrationError;
use crate::sobol::{SobolPoints, SobolSequence2D};

/// Hook invoked once per integrand evaluation.
///
/// Implementations must be cheap and thread-safe: in concurrent mode they
/// are called from every worker.
pub trait EvaluationObserver: Sync {
    /// Called after point `index` was evaluated.
    ///
    /// `worker` is the rayon worker index, or `None` on the calling thread.
    fn on_evaluate(&self, worker: Option<usize>, index: usize);
}

/// Observer that ignores every evaluation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {
    #[inline(always)]
    fn on_evaluate(&self, _worker: Option<usize>, _index: usize) {}
}

impl<O: EvaluationObserver + ?Sized> EvaluationObserver for &O {
    #[inline]
    fn on_evaluate(&self, worker: Option<usize>, index: usize) {
        (**self).on_evaluate(worker, index);
    }
}

/// Number of integrand calls made by one thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerCalls {
    /// Worker index, `None` for the calling thread.
    pub worker: Option<usize>,
    /// Integrand calls made on that thread.
    pub calls: usize,
}

/// Per-thread call counter.
///
/// Holds one lock-free slot for the calling thread and one per pool worker.
///
/// # Examples
///
/// ```rust
/// use sobol_kernel::{integrate_observed, IntegrationConfig, SampleSizes, WorkerUsage};
///
/// let config = IntegrationConfig::builder()
///     .use_concurrency(true)
///     .max_concurrency(4)
///     .build()
///     .unwrap();
/// let usage = WorkerUsage::new(config.max_concurrency());
/// let sizes = SampleSizes::new(vec![100, 1000]).unwrap();
///
/// integrate_observed(&sizes, |x, y| Ok::<_, std::convert::Infallible>(x * y), &config, &usage)
///     .unwrap();
///
/// assert_eq!(usage.total_calls(), 1000);
/// assert!(usage.threads_used() >= 1);
/// ```
#[derive(Debug)]
pub struct WorkerUsage {
    /// Slot 0 is the calling thread; slot `w + 1` is worker `w`.
    slots: Vec<AtomicUsize>,
}

impl WorkerUsage {
    /// Creates counters for a pool of `workers` threads.
    pub fn new(workers: usize) -> Self {
        Self {
            slots: (0..=workers).map(|_| AtomicUsize::new(0)).collect(),
        }
    }

    /// Total integrand calls across all threads.
    pub fn total_calls(&self) -> usize {
        self.slots.iter().map(|s| s.load(Ordering::Relaxed)).sum()
    }

    /// Number of threads that made at least one call.
    pub fn threads_used(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.load(Ordering::Relaxed) > 0)
            .count()
    }

    /// Calls per thread, for threads that made at least one call.
    pub fn calls_per_worker(&self) -> Vec<WorkerCalls> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, count)| {
                let calls = count.load(Ordering::Relaxed);
                (calls > 0).then_some(WorkerCalls {
                    worker: slot.checked_sub(1),
                    calls,
                })
            })
            .collect()
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for slot in &self.slots {
            slot.store(0, Ordering::Relaxed);
        }
    }
}

impl EvaluationObserver for WorkerUsage {
    #[inline]
    fn on_evaluate(&self, worker: Option<usize>, _index: usize) {
        let slot = worker.map_or(0, |w| w + 1);
        if let Some(counter) = self.slots.get(slot) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Applies a fallible integrand to Sobol points.
pub struct Evaluator<'a, F, O = NoopObserver> {
    integrand: &'a F,
    observer: O,
}

impl<'a, F, E> Evaluator<'a, F, NoopObserver>
where
    F: Fn(f64, f64) -> Result<f64, E> + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Creates an evaluator without an observer.
    pub fn new(integrand: &'a F) -> Self {
        Self {
            integrand,
            observer: NoopObserver,
        }
    }
}

impl<'a, F, E, O> Evaluator<'a, F, O>
where
    F: Fn(f64, f64) -> Result<f64, E> + Sync,
    E: std::error::Error + Send + Sync + 'static,
    O: EvaluationObserver,
{
    /// Creates an evaluator reporting to `observer`.
    pub fn with_observer(integrand: &'a F, observer: O) -> Self {
        Self {
            integrand,
            observer,
        }
    }

    #[inline]
    fn call(
        &self,
        index: usize,
        x: f64,
        y: f64,
        worker: Option<usize>,
    ) -> Result<f64, IntegrationError> {
        let value = (self.integrand)(x, y).map_err(|err| IntegrationError::IntegrandFailure {
            index,
            x,
            y,
            source: Box::new(err),
        })?;
        self.observer.on_evaluate(worker, index);
        Ok(value)
    }

    /// Evaluates the remaining points of `sequence` in index order, pushing
    /// each value into `accumulator`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing point with `IntegrandFailure`.
    pub fn evaluate_sequential(
        &self,
        sequence: SobolSequence2D,
        accumulator: &mut CheckpointAccumulator<'_>,
    ) -> Result<(), IntegrationError> {
        let start = sequence.next_index();
        for (offset, (x, y)) in sequence.enumerate() {
            accumulator.push(self.call(start + offset, x, y, None)?);
        }
        Ok(())
    }

    /// Evaluates every point of `points` on `pool`.
    ///
    /// Returns `values` with `values[i] = f(point i)`.
    ///
    /// # Errors
    ///
    /// Returns `IntegrandFailure` if any evaluation fails. Remaining tasks
    /// are abandoned as soon as possible; which failing index is reported is
    /// unspecified when several points fail.
    pub fn evaluate_concurrent(
        &self,
        points: &SobolPoints,
        pool: &ThreadPool,
    ) -> Result<Vec<f64>, IntegrationError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let mut values = vec![0.0; points.len()];
        let (x0, y0) = points.point(0);
        values[0] = self.call(0, x0, y0, None)?;

        pool.install(|| {
            values[1..]
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(offset, slot)| {
                    let index = offset + 1;
                    let (x, y) = points.point(index);
                    *slot = self.call(index, x, y, rayon::current_thread_index())?;
                    Ok::<(), IntegrationError>(())
                })
        })?;

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_sizes::SampleSizes;
    use std::convert::Infallible;
    use std::fmt;

    #[derive(Debug)]
    struct OutOfDomain;

    impl fmt::Display for OutOfDomain {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "point outside integrand domain")
        }
    }

    impl std::error::Error for OutOfDomain {}

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    fn sum_xy(x: f64, y: f64) -> Result<f64, Infallible> {
        Ok(x + y)
    }

    #[test]
    fn test_concurrent_values_in_index_order() {
        let points = SobolPoints::first(512);
        let evaluator = Evaluator::new(&sum_xy);
        let values = evaluator.evaluate_concurrent(&points, &pool(4)).unwrap();

        assert_eq!(values.len(), 512);
        for (i, v) in values.iter().enumerate() {
            let (x, y) = points.point(i);
            assert_eq!(*v, x + y);
        }
    }

    #[test]
    fn test_concurrent_single_point() {
        let points = SobolPoints::first(1);
        let evaluator = Evaluator::new(&sum_xy);
        let values = evaluator.evaluate_concurrent(&points, &pool(2)).unwrap();
        assert_eq!(values, vec![0.0]);
    }

    #[test]
    fn test_sequential_feeds_accumulator() {
        let sizes = SampleSizes::new(vec![2, 4]).unwrap();
        let mut acc = CheckpointAccumulator::new(&sizes);
        let evaluator = Evaluator::new(&sum_xy);
        evaluator
            .evaluate_sequential(SobolSequence2D::new(4), &mut acc)
            .unwrap();
        // Points: (0,0), (.5,.5), (.75,.25), (.25,.75)
        assert_eq!(acc.finish(), vec![0.5, 0.75]);
    }

    #[test]
    fn test_failure_aborts_sequential() {
        let failing = |x: f64, _y: f64| {
            if x == 0.75 {
                Err(OutOfDomain)
            } else {
                Ok(1.0)
            }
        };
        let sizes = SampleSizes::new(vec![8]).unwrap();
        let mut acc = CheckpointAccumulator::new(&sizes);
        let err = Evaluator::new(&failing)
            .evaluate_sequential(SobolSequence2D::new(8), &mut acc)
            .unwrap_err();

        match err {
            IntegrationError::IntegrandFailure { index, x, y, .. } => {
                assert_eq!(index, 2);
                assert_eq!((x, y), (0.75, 0.25));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(acc.count(), 2);
    }

    #[test]
    fn test_failure_aborts_concurrent() {
        let failing = |x: f64, y: f64| {
            if x == 0.625 && y == 0.125 {
                Err(OutOfDomain)
            } else {
                Ok(x)
            }
        };
        let points = SobolPoints::first(64);
        let err = Evaluator::new(&failing)
            .evaluate_concurrent(&points, &pool(3))
            .unwrap_err();
        assert!(matches!(err, IntegrationError::IntegrandFailure { index: 6, .. }));
    }

    #[test]
    fn test_worker_usage_counts_every_call() {
        let usage = WorkerUsage::new(3);
        let points = SobolPoints::first(300);
        let evaluator = Evaluator::with_observer(&sum_xy, &usage);
        evaluator.evaluate_concurrent(&points, &pool(3)).unwrap();

        assert_eq!(usage.total_calls(), 300);
        let per_worker = usage.calls_per_worker();
        assert!(per_worker.len() <= 4);
        assert!(per_worker.iter().all(|w| w.worker.map_or(true, |i| i < 3)));
        assert_eq!(per_worker.iter().map(|w| w.calls).sum::<usize>(), 300);

        // Point 0 runs on the calling thread.
        assert!(per_worker.iter().any(|w| w.worker.is_none()));

        usage.reset();
        assert_eq!(usage.total_calls(), 0);
        assert_eq!(usage.threads_used(), 0);
    }

    #[test]
    fn test_sequential_reports_calling_thread() {
        let usage = WorkerUsage::new(2);
        let sizes = SampleSizes::new(vec![10]).unwrap();
        let mut acc = CheckpointAccumulator::new(&sizes);
        Evaluator::with_observer(&sum_xy, &usage)
            .evaluate_sequential(SobolSequence2D::new(10), &mut acc)
            .unwrap();
        assert_eq!(
            usage.calls_per_worker(),
            vec![WorkerCalls {
                worker: None,
                calls: 10
            }]
        );
    }
}
