//! Text sample input for the command-line front end
//!
//! Samples are decimal numbers separated by whitespace or commas. Blank lines
//! and everything after a `#` are ignored.

use crate::errors::{CubeStatError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Parse every sample from `reader`
///
/// # Errors
///
/// Returns [`CubeStatError::Parse`] on the first token that is not a number
/// and [`CubeStatError::Io`] if reading fails.
pub fn parse_samples<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    let mut samples = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default();

        for token in content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value = token.parse::<f64>().map_err(|_| CubeStatError::Parse {
                line: index + 1,
                token: token.to_string(),
            })?;
            samples.push(value);
        }
    }

    Ok(samples)
}

/// Read samples from `path`, or from stdin when no path is given
///
/// # Errors
///
/// Propagates open, read and parse failures.
pub fn read_samples(path: Option<&Path>) -> Result<Vec<f64>> {
    match path {
        Some(path) => parse_samples(BufReader::new(File::open(path)?)),
        None => parse_samples(io::stdin().lock()),
    }
}
