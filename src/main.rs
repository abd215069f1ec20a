//! Entry point for the cubestat application.
//! Handles CLI parsing, sample loading, and dispatches percentile queries or overlays.

use clap::Parser;
use cubestat::input::read_samples;
use cubestat::parallel::get_parallel_info;
use cubestat::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Args;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args
        .threads
        .map_or_else(ParallelConfig::all_cores, ParallelConfig::with_threads);
    config.setup_global_pool()?;
    if args.verbose {
        get_parallel_info().log_info();
    }

    let samples = read_samples(args.input.as_deref())?;
    info!(samples = samples.len(), "loaded samples");

    if let Some(operation) = args.overlay {
        return run_overlay(&args, &samples, operation);
    }

    let estimator = PercentileEstimator::with_fraction(&samples, args.fraction)?;

    if let Some(threshold) = args.evaluate {
        println!("cdf({threshold}) = {}", estimator.evaluate(threshold)?);
    }

    if args.quantile || args.evaluate.is_none() {
        let value = bisect_quantile(&estimator, args.tolerance)?;
        println!("count = {}", estimator.len());
        println!("sum = {}", estimator.sum());
        if let (Some(mean), Some(min), Some(max)) =
            (estimator.mean(), estimator.min(), estimator.max())
        {
            println!("mean = {mean}");
            println!("min = {min}");
            println!("max = {max}");
        }
        println!("quantile({}) = {value}", estimator.target_fraction());
    }

    Ok(())
}

fn run_overlay(
    args: &Args,
    samples: &[f64],
    operation: StatOperation,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let shape = args
        .shape
        .ok_or("--overlay requires --shape <nx>,<ny>,<nz>")?;

    // nx * ny cannot overflow once the full product fits
    let total = shape.element_count()?;
    let layer = shape.nx * shape.ny;
    let mut mask = vec![false; total];
    for &z in &args.mask_layers {
        if z >= shape.nz {
            return Err(format!("Mask layer {z} is outside depth {}", shape.nz).into());
        }
        mask[z * layer..(z + 1) * layer].fill(true);
    }

    let plane = overlay(samples, &mask, shape, operation)?;
    info!(
        op = operation.as_str(),
        masked_layers = args.mask_layers.len(),
        "overlay complete"
    );

    for row in plane.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        println!("{}", cells.join(" "));
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
