//! Simple benchmark example showing the performance benefits of chunked parallel summation.
//!
//! This example times the sequential and parallel summation paths, and the
//! percentile estimator construction that relies on them.

use cubestat::statistics::{parallel_sum, sequential_sum};
use cubestat::PercentileEstimator;
use std::time::Instant;

fn time_sum(data: &[f32], use_parallel: bool) -> f64 {
    let start = Instant::now();

    let sum = if use_parallel {
        parallel_sum(data)
    } else {
        sequential_sum(data)
    };

    let duration = start.elapsed();
    println!("   Sum result: {:.6}", sum);

    duration.as_secs_f64()
}

fn main() {
    println!("cubestat Parallel Summation Benchmark");
    println!("=====================================\n");

    let available_threads = rayon::current_num_threads();
    println!(
        "System has {} logical CPU cores available\n",
        available_threads
    );

    let data_sizes = vec![1_000_000, 5_000_000, 10_000_000];

    for data_size in data_sizes {
        let data: Vec<f32> = (0..data_size).map(|i| (i as f32).sin()).collect();

        println!("Testing with {} data points:", data_size);
        println!("-------------------------------------------");

        println!("Sequential summation:");
        let seq_time = time_sum(&data, false);
        println!("   Duration: {:.3} seconds\n", seq_time);

        println!("Parallel summation ({} threads):", available_threads);
        let par_time = time_sum(&data, true);
        println!("   Duration: {:.3} seconds", par_time);

        let speedup = seq_time / par_time;
        println!("   Speedup: {:.2}x\n", speedup);

        let start = Instant::now();
        let estimator = PercentileEstimator::new(&data);
        println!(
            "Estimator construction (sort + sum of {} samples): {:.3} seconds",
            estimator.len(),
            start.elapsed().as_secs_f64()
        );
        println!("=========================================\n");
    }
}
