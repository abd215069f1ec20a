//! cubestat: percentile estimation and masked cube reductions
//!
//! A Rust library for two families of derived statistics over numeric sample
//! sets of any of the ten primitive integer and float types:
//!
//! - **Percentiles**: an empirical-CDF estimator over an arbitrarily large flat
//!   sample, with tie-band rank averaging and a pluggable objective for
//!   recovering the value at a target fraction.
//! - **Overlays**: masked per-pixel reductions (mean, sum, min, max, median)
//!   that collapse the depth axis of a 3-D cube into a 2-D plane.
//!
//! ## Module Organization
//!
//! - [`numeric`]: The [`Sample`](numeric::Sample) element abstraction
//! - [`statistics`]: Summation, percentile estimation and overlays
//! - [`solver`]: Objective trait and scalar drivers
//! - [`parallel`]: Parallel processing configuration
//! - [`input`]: Text sample parsing for the command-line tool
//! - [`errors`]: Centralized error handling
//!
//! ## Usage Examples
//!
//! ```rust
//! use cubestat::prelude::*;
//!
//! let estimator = PercentileEstimator::new(&[1_u8, 2, 2, 2, 3]);
//! assert_eq!(estimator.evaluate(2.0).unwrap(), 0.5);
//!
//! // 1x1 pixel, three layers, middle layer masked
//! let plane = overlay(&[1.0_f32, 9.0, 5.0], &[false, true, false], CubeShape::new(1, 1, 3), StatOperation::Mean).unwrap();
//! assert_eq!(plane[[0, 0]], 3.0);
//! ```

pub mod errors;
pub mod input;
pub mod numeric;
pub mod parallel;
pub mod solver;
pub mod statistics;

// Direct re-exports for the public API
pub use errors::*;
pub use numeric::Sample;
pub use parallel::*;
pub use solver::{bisect_quantile, golden_section_minimize, Minimum, Objective};
pub use statistics::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::errors::{CubeStatError, Result};
    pub use crate::numeric::Sample;
    pub use crate::parallel::ParallelConfig;
    pub use crate::solver::{bisect_quantile, golden_section_minimize, Objective};
    pub use crate::statistics::{
        overlay, CubeShape, Overlay, OverlayOptions, PercentileEstimator, StatOperation,
        StatisticalReduction,
    };
}
