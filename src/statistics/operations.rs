//! Core statistical operations and traits
//!
//! This module defines the reducer selector and the per-sequence reduction
//! primitive shared by every axis reduction.

use crate::errors::{CubeStatError, Result};
use crate::numeric::Sample;
use ndarray::{Array2, ArrayView3};
use std::str::FromStr;

/// Supported statistical operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOperation {
    /// Arithmetic mean
    Mean,
    /// Sum of values
    Sum,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
    /// Middle value, averaging the two middle values for even counts
    Median,
}

impl StatOperation {
    /// Get the string representation of the operation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Min => "minimum",
            Self::Max => "maximum",
            Self::Median => "median",
        }
    }

    /// Reduce one sequence of samples
    ///
    /// Returns `None` for an empty sequence. `values` may be reordered (the
    /// median sorts it in place). Min, max and median follow
    /// [`Sample::sample_cmp`], so the result depends only on the multiset of
    /// values. Mean, sum and the even-count median are computed in `f64` and
    /// narrowed back to `T`.
    pub fn apply<T: Sample>(self, values: &mut [T]) -> Option<T> {
        if values.is_empty() {
            return None;
        }

        match self {
            Self::Mean => {
                let sum: f64 = values.iter().map(|&x| x.to_f64()).sum();
                Some(T::from_f64(sum / values.len() as f64))
            }
            Self::Sum => Some(T::from_f64(values.iter().map(|&x| x.to_f64()).sum())),
            Self::Min => values.iter().copied().min_by(|a, b| a.sample_cmp(b)),
            Self::Max => values.iter().copied().max_by(|a, b| a.sample_cmp(b)),
            Self::Median => Some(median_in_place(values)),
        }
    }
}

impl FromStr for StatOperation {
    type Err = CubeStatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            "min" | "minimum" => Ok(Self::Min),
            "max" | "maximum" => Ok(Self::Max),
            "median" => Ok(Self::Median),
            other => Err(CubeStatError::Statistics(format!(
                "Unknown reducer '{other}', expected one of mean, sum, min, max, median"
            ))),
        }
    }
}

/// Median of a non-empty slice, sorting it in place
fn median_in_place<T: Sample>(values: &mut [T]) -> T {
    values.sort_unstable_by(|a, b| a.sample_cmp(b));

    let n = values.len();
    let mid = n / 2;
    if n % 2 == 1 {
        values[mid]
    } else {
        T::from_f64(0.5 * (values[mid - 1].to_f64() + values[mid].to_f64()))
    }
}

/// Trait for 3-D arrays that can be collapsed along one axis
pub trait StatisticalReduction<T> {
    /// Perform a statistical reduction along the specified axis using every sample
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is out of bounds for the array.
    fn reduce_along_axis(&self, axis: usize, operation: StatOperation) -> Result<Array2<T>>;

    /// Perform a statistical reduction along the specified axis, skipping the
    /// samples whose `mask` entry is `true`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The axis is out of bounds for the array
    /// - The mask shape differs from the array shape
    fn masked_reduce_along_axis(
        &self,
        axis: usize,
        mask: &ArrayView3<'_, bool>,
        operation: StatOperation,
    ) -> Result<Array2<T>>;
}
