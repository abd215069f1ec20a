//! Statistical computations and parallel reduction operations
//!
//! # Organization
//!
//! This module is organized into submodules:
//! - [`summation`]: Chunked parallel summation
//! - [`percentile`]: Empirical-CDF percentile estimation
//! - [`operations`]: Reducer selector and per-sequence reduction primitive
//! - [`overlay`]: Masked per-pixel axis reductions over 3-D cubes

pub mod operations;
pub mod overlay;
pub mod percentile;
pub mod summation;

// Re-export the main types and functions for convenience
pub use operations::{StatOperation, StatisticalReduction};
pub use overlay::{overlay, valid_counts, CubeShape, Overlay, OverlayOptions};
pub use percentile::{PercentileEstimator, DEFAULT_FRACTION};
pub use summation::{chunk_bounds, chunk_len, parallel_sum, parallel_sum_with, sequential_sum};
