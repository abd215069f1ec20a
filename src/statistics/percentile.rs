//! Empirical-CDF percentile estimation over a sorted sample set
//!
//! [`PercentileEstimator`] keeps a sorted `f64` copy of its input together with
//! the total computed at construction. [`PercentileEstimator::evaluate`] answers
//! "what fraction of samples lies at or below `x`", averaging the ranks of tied
//! samples and interpolating linearly between neighbours otherwise. The value at
//! the configured target fraction is recovered by driving
//! [`PercentileEstimator::squared_residual`] to zero with any scalar solver
//! (see [`crate::solver`]).

use super::summation::parallel_sum_with;
use crate::errors::{CubeStatError, Result};
use crate::numeric::Sample;
use crate::parallel::ParallelConfig;
use crate::solver::Objective;
use std::cmp::Ordering;
use tracing::{debug, instrument, warn};

/// Target fraction used when none is given: the median
pub const DEFAULT_FRACTION: f64 = 0.5;

/// Percentile estimator over an immutable, sorted sample set
///
/// Cloning copies the cached sum; nothing is re-sorted or re-summed.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileEstimator {
    values: Vec<f64>,
    fraction: f64,
    sum: f64,
}

impl PercentileEstimator {
    /// Build an estimator targeting the median
    pub fn new<T: Sample>(values: &[T]) -> Self {
        Self::build(values, DEFAULT_FRACTION, &ParallelConfig::new_default())
    }

    /// Build an estimator targeting `fraction`
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::InvalidFraction`] if `fraction` is outside [0, 1].
    pub fn with_fraction<T: Sample>(values: &[T], fraction: f64) -> Result<Self> {
        Self::with_config(values, fraction, &ParallelConfig::new_default())
    }

    /// Build an estimator, summing with the workers described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::InvalidFraction`] if `fraction` is outside [0, 1].
    pub fn with_config<T: Sample>(
        values: &[T],
        fraction: f64,
        config: &ParallelConfig,
    ) -> Result<Self> {
        CubeStatError::check_fraction(fraction)?;
        Ok(Self::build(values, fraction, config))
    }

    #[instrument(level = "debug", skip(values, config), fields(samples = values.len()))]
    fn build<T: Sample>(values: &[T], fraction: f64, config: &ParallelConfig) -> Self {
        // NaN has no rank in the ordering
        let mut sorted: Vec<f64> = values
            .iter()
            .map(|&x| x.to_f64())
            .filter(|x| !x.is_nan())
            .collect();

        let discarded = values.len() - sorted.len();
        if discarded > 0 {
            warn!(discarded, "dropped NaN samples from percentile input");
        }

        if sorted.len() > 1 {
            sorted.sort_unstable_by(f64::total_cmp);
        }

        let sum = parallel_sum_with(&sorted, config.worker_count(sorted.len()));
        debug!(samples = sorted.len(), sum, "percentile estimator ready");

        Self {
            values: sorted,
            fraction,
            sum,
        }
    }

    /// Empirical CDF at `threshold`
    ///
    /// - every sample equal to `c`: 0.5 at `c`, 0.0 below, 1.0 above;
    /// - at or below the minimum: 0.0; at or above the maximum: 1.0;
    /// - on a run of tied samples `[start, end]`: `0.5 * (start + end) / (N - 1)`;
    /// - between samples `j - 1` and `j`: `(j - 1 + frac) / (N - 1)`, where
    ///   `frac` is 1 below a `-inf` neighbour and 0 above a `+inf` one.
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::EmptySample`] for an empty sample set and
    /// [`CubeStatError::Statistics`] for a NaN threshold.
    pub fn evaluate(&self, threshold: f64) -> Result<f64> {
        let (Some(&min), Some(&max)) = (self.values.first(), self.values.last()) else {
            return Err(CubeStatError::EmptySample);
        };
        if threshold.is_nan() {
            return Err(CubeStatError::Statistics(
                "Cannot evaluate the CDF at NaN".to_string(),
            ));
        }

        if min == max {
            return Ok(match threshold.partial_cmp(&min) {
                Some(Ordering::Less) => 0.0,
                Some(Ordering::Greater) => 1.0,
                _ => 0.5,
            });
        }
        if threshold <= min {
            return Ok(0.0);
        }
        if threshold >= max {
            return Ok(1.0);
        }

        // min < threshold < max, so 1 <= j <= N - 1
        let last = (self.values.len() - 1) as f64;
        let j = self.values.partition_point(|&v| v < threshold);

        if self.values[j] == threshold {
            let end = self.values.partition_point(|&v| v <= threshold) - 1;
            return Ok(0.5 * (j + end) as f64 / last);
        }

        let lo = self.values[j - 1];
        let hi = self.values[j];
        // An infinite neighbour is infinitely far from any finite threshold
        let frac = match (lo.is_infinite(), hi.is_infinite()) {
            (true, true) => 0.5,
            (true, false) => 1.0,
            (false, true) => 0.0,
            (false, false) => (threshold - lo) / (hi - lo),
        };
        Ok(((j - 1) as f64 + frac) / last)
    }

    /// `(evaluate(θ) - fraction)²` for the single parameter `params = [θ]`
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::InvalidParameters`] unless exactly one parameter
    /// is given, and propagates errors from [`Self::evaluate`].
    pub fn squared_residual(&self, params: &[f64]) -> Result<f64> {
        let [theta] = params else {
            return Err(CubeStatError::InvalidParameters {
                expected: 1,
                found: params.len(),
            });
        };
        let residual = self.evaluate(*theta)? - self.fraction;
        Ok(residual * residual)
    }

    /// Replace the target fraction
    ///
    /// # Errors
    ///
    /// Returns [`CubeStatError::InvalidFraction`] if `fraction` is outside [0, 1];
    /// the previous fraction is kept in that case.
    pub fn set_target_fraction(&mut self, fraction: f64) -> Result<()> {
        CubeStatError::check_fraction(fraction)?;
        self.fraction = fraction;
        Ok(())
    }

    #[must_use]
    pub fn target_fraction(&self) -> f64 {
        self.fraction
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total of all samples, computed once at construction
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.sum / self.values.len() as f64)
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The samples in ascending order
    #[must_use]
    pub fn sorted_values(&self) -> &[f64] {
        &self.values
    }
}

impl Objective for PercentileEstimator {
    fn dimension(&self) -> usize {
        1
    }

    fn value(&self, params: &[f64]) -> Result<f64> {
        self.squared_residual(params)
    }
}
