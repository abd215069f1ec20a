//! Scalar drivers for one-parameter objectives
//!
//! [`Objective`] is the seam between a statistic and the search strategy that
//! extracts a value from it. [`PercentileEstimator`] implements it with its
//! squared residual; the drivers here are two ways of minimizing such an
//! objective.

use crate::errors::{CubeStatError, Result};
use crate::statistics::percentile::PercentileEstimator;
use tracing::debug;

/// Iteration cap shared by the drivers
pub const MAX_ITERATIONS: usize = 200;

/// A scalar function of a parameter vector
pub trait Objective {
    /// Number of parameters `value` expects
    fn dimension(&self) -> usize;

    /// Evaluate the objective at `params`
    ///
    /// # Errors
    ///
    /// Implementations reject parameter vectors of the wrong length and may
    /// surface their own evaluation errors.
    fn value(&self, params: &[f64]) -> Result<f64>;
}

/// Location and value of a minimum found by [`golden_section_minimize`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub argument: f64,
    pub value: f64,
    pub iterations: usize,
}

/// Value at the estimator's target fraction by bracketed bisection
///
/// The empirical CDF is non-decreasing, so `evaluate(θ) - fraction` changes
/// sign at most once on `[min, max]`. Returns the bracket midpoint once the
/// bracket is narrower than `tolerance` or the residual vanishes.
///
/// # Errors
///
/// Returns [`CubeStatError::EmptySample`] for an empty estimator and
/// [`CubeStatError::Statistics`] for a non-positive tolerance.
pub fn bisect_quantile(estimator: &PercentileEstimator, tolerance: f64) -> Result<f64> {
    check_tolerance(tolerance)?;
    let (Some(mut lo), Some(mut hi)) = (estimator.min(), estimator.max()) else {
        return Err(CubeStatError::EmptySample);
    };
    let target = estimator.target_fraction();

    for iteration in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= tolerance {
            debug!(iteration, value = mid, "bisection converged");
            return Ok(mid);
        }

        let residual = estimator.evaluate(mid)? - target;
        if residual == 0.0 {
            return Ok(mid);
        }
        if residual < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}

/// Minimize a one-parameter objective on `[lo, hi]` by golden-section search
///
/// Assumes the objective is unimodal on the interval; otherwise a local
/// minimum is returned.
///
/// # Errors
///
/// Returns [`CubeStatError::InvalidParameters`] if the objective takes more than
/// one parameter, [`CubeStatError::Statistics`] for an empty interval or a
/// non-positive tolerance, and propagates objective errors.
pub fn golden_section_minimize<O: Objective + ?Sized>(
    objective: &O,
    lo: f64,
    hi: f64,
    tolerance: f64,
) -> Result<Minimum> {
    if objective.dimension() != 1 {
        return Err(CubeStatError::InvalidParameters {
            expected: 1,
            found: objective.dimension(),
        });
    }
    check_tolerance(tolerance)?;
    if !(lo < hi) {
        return Err(CubeStatError::Statistics(format!(
            "Search interval [{lo}, {hi}] is empty"
        )));
    }

    let ratio = (5.0_f64.sqrt() - 1.0) / 2.0;
    let (mut a, mut b) = (lo, hi);
    let mut c = b - ratio * (b - a);
    let mut d = a + ratio * (b - a);
    let mut fc = objective.value(&[c])?;
    let mut fd = objective.value(&[d])?;

    let mut iterations = 0;
    while b - a > tolerance && iterations < MAX_ITERATIONS {
        if fc <= fd {
            b = d;
            d = c;
            fd = fc;
            c = b - ratio * (b - a);
            fc = objective.value(&[c])?;
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + ratio * (b - a);
            fd = objective.value(&[d])?;
        }
        iterations += 1;
    }

    let argument = 0.5 * (a + b);
    let value = objective.value(&[argument])?;
    debug!(argument, value, iterations, "golden-section search finished");

    Ok(Minimum {
        argument,
        value,
        iterations,
    })
}

fn check_tolerance(tolerance: f64) -> Result<()> {
    if !(tolerance > 0.0) {
        return Err(CubeStatError::Statistics(format!(
            "Tolerance {tolerance} must be positive"
        )));
    }
    Ok(())
}
