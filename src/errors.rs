//! Centralized error handling for cubestat
//!
//! Every fallible operation in the crate returns [`Result`], so callers can
//! propagate failures with `?` and match on the variant they care about.

use thiserror::Error;

/// Main error type for cubestat operations
#[derive(Error, Debug)]
pub enum CubeStatError {
    /// A CDF or percentile query was made against zero samples
    #[error("Cannot evaluate a percentile over an empty sample set")]
    EmptySample,

    /// Target fraction outside [0, 1]
    #[error("Target fraction {fraction} must be in [0, 1]")]
    InvalidFraction { fraction: f64 },

    /// Objective called with the wrong number of parameters
    #[error("Objective expects {expected} parameter(s), got {found}")]
    InvalidParameters { expected: usize, found: usize },

    /// Cube and mask (or flat buffer and declared shape) disagree
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// Reduction axis does not exist on the cube
    #[error("Axis {axis} is out of bounds for array with {ndim} dimensions")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    /// Statistics computation errors
    #[error("Statistics computation error: {0}")]
    Statistics(String),

    /// Thread pool configuration error
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Array shape or dimension error
    #[error("Array error: {0}")]
    Array(#[from] ndarray::ShapeError),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unparsable token in text sample input
    #[error("Invalid sample '{token}' on line {line}")]
    Parse { line: usize, token: String },
}

impl CubeStatError {
    /// Check that a target fraction lies in [0, 1]
    pub fn check_fraction(fraction: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(CubeStatError::InvalidFraction { fraction });
        }
        Ok(())
    }
}

/// Result type alias for cubestat operations
pub type Result<T> = std::result::Result<T, CubeStatError>;
