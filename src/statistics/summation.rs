//! Chunked parallel summation
//!
//! A sample set is split into `W` contiguous chunks of `ceil(N / W)` elements,
//! each chunk is summed on its own rayon task, and the partial sums are added
//! once every task has joined. Chunk boundaries depend only on `N` and `W`, so
//! each partial sum is reproducible from run to run.

use crate::numeric::Sample;
use rayon::prelude::*;
use std::ops::Range;
use tracing::debug;

/// Worker count for `n` samples given `available` threads
///
/// `min(available, n)`, where an empty input counts as one sample and at least
/// one worker is always returned.
pub fn worker_count(n: usize, available: usize) -> usize {
    available.min(n.max(1)).max(1)
}

/// Chunk length `ceil(n / workers)`
pub fn chunk_len(n: usize, workers: usize) -> usize {
    n.div_ceil(workers.max(1))
}

/// Non-empty `[start, end)` ranges covering `[0, n)` for `workers` chunks
pub fn chunk_bounds(n: usize, workers: usize) -> Vec<Range<usize>> {
    let len = chunk_len(n, workers);
    if len == 0 {
        return Vec::new();
    }
    (0..workers.max(1))
        .map(|w| (w * len).min(n)..((w + 1) * len).min(n))
        .filter(|r| !r.is_empty())
        .collect()
}

/// Sum in index order on the calling thread, accumulating in `f64`
pub fn sequential_sum<T: Sample>(data: &[T]) -> f64 {
    data.iter().map(|&x| x.to_f64()).sum()
}

/// Sum using one worker per thread of the current rayon pool
pub fn parallel_sum<T: Sample>(data: &[T]) -> f64 {
    parallel_sum_with(data, rayon::current_num_threads())
}

/// Sum using at most `available` workers
///
/// Falls back to [`sequential_sum`] when only one worker would run.
pub fn parallel_sum_with<T: Sample>(data: &[T], available: usize) -> f64 {
    let n = data.len();
    let workers = worker_count(n, available);
    if workers <= 1 {
        return sequential_sum(data);
    }

    let bounds = chunk_bounds(n, workers);
    debug!(
        samples = n,
        workers,
        chunks = bounds.len(),
        chunk_len = chunk_len(n, workers),
        "parallel summation"
    );

    bounds
        .into_par_iter()
        .map(|range| sequential_sum(&data[range]))
        .sum()
}
