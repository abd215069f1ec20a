//! Defines command-line interface options using `clap` for the cubestat tool.

use clap::Parser;
use cubestat::{CubeShape, StatOperation};
use std::path::PathBuf;

/// A CLI tool for percentile queries and masked cube overlays
#[derive(Parser, Debug)]
#[command(
    version,
    name = "cubestat",
    about = "Percentile estimation and masked per-pixel cube reductions"
)]
pub struct Args {
    /// Text file of samples separated by whitespace or commas. Reads stdin if not set.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Target fraction in [0, 1] for --quantile
    #[arg(long, default_value_t = 0.5)]
    pub fraction: f64,

    /// Print the empirical CDF at this threshold
    #[arg(long, allow_hyphen_values = true)]
    pub evaluate: Option<f64>,

    /// Print the sample value at --fraction
    #[arg(long)]
    pub quantile: bool,

    /// Bracket width at which the quantile search stops
    #[arg(long, default_value_t = 1e-9)]
    pub tolerance: f64,

    /// Collapse the input cube along depth with this reducer (mean, sum, min, max, median)
    #[arg(long, value_parser = parse_operation)]
    pub overlay: Option<StatOperation>,

    /// Cube shape for --overlay, formatted as <nx>,<ny>,<nz>
    #[arg(long, value_parser = parse_shape)]
    pub shape: Option<CubeShape>,

    /// Depth layers to mask out for --overlay, formatted as <z1>,<z2>,...
    #[arg(long, value_delimiter = ',')]
    pub mask_layers: Vec<usize>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}

fn parse_operation(s: &str) -> Result<StatOperation, String> {
    s.parse().map_err(|e: cubestat::CubeStatError| e.to_string())
}

fn parse_shape(s: &str) -> Result<CubeShape, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [nx, ny, nz] => {
            let parse = |v: &str| {
                v.parse::<usize>()
                    .map_err(|_| format!("Invalid extent '{v}' in shape"))
            };
            Ok(CubeShape::new(parse(nx)?, parse(ny)?, parse(nz)?))
        }
        _ => Err("Invalid format: Expected '<nx>,<ny>,<nz>'.".to_string()),
    }
}
