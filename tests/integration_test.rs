use approx::assert_abs_diff_eq;
use cubestat::prelude::*;
use cubestat::solver::Minimum;
use cubestat::statistics::valid_counts;
use ndarray::{Array3, ArrayView3};

/// `(x - 3)²` over a single parameter
struct Parabola;

impl Objective for Parabola {
    fn dimension(&self) -> usize {
        1
    }

    fn value(&self, params: &[f64]) -> Result<f64> {
        Ok((params[0] - 3.0).powi(2))
    }
}

/// An objective that wants two parameters
struct Plane;

impl Objective for Plane {
    fn dimension(&self) -> usize {
        2
    }

    fn value(&self, params: &[f64]) -> Result<f64> {
        Ok(params.iter().sum())
    }
}

#[test]
fn test_quantile_by_bisection() -> Result<()> {
    // CDF of 1..=101 is (x - 1) / 100 between samples
    let data: Vec<u32> = (1..=101).collect();
    let mut estimator = PercentileEstimator::with_fraction(&data, 0.25)?;

    let q25 = bisect_quantile(&estimator, 1e-9)?;
    assert_abs_diff_eq!(q25, 26.0, epsilon = 1e-6);

    estimator.set_target_fraction(0.5)?;
    let median = bisect_quantile(&estimator, 1e-9)?;
    assert_abs_diff_eq!(median, 51.0, epsilon = 1e-6);

    estimator.set_target_fraction(0.0)?;
    assert_abs_diff_eq!(bisect_quantile(&estimator, 1e-9)?, 1.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_quantile_by_golden_section() -> Result<()> {
    let data: Vec<f64> = (0..=200).map(|i| i as f64 * 0.5).collect();
    let estimator = PercentileEstimator::with_fraction(&data, 0.75)?;

    let (lo, hi) = (estimator.min().unwrap(), estimator.max().unwrap());
    let minimum = golden_section_minimize(&estimator, lo, hi, 1e-9)?;
    assert_abs_diff_eq!(minimum.argument, 75.0, epsilon = 1e-6);
    assert!(minimum.value < 1e-12);
    assert!(minimum.iterations > 0);

    // Both drivers agree on the same objective
    let bisected = bisect_quantile(&estimator, 1e-9)?;
    assert_abs_diff_eq!(bisected, minimum.argument, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_golden_section_generic_objective() -> Result<()> {
    let Minimum {
        argument, value, ..
    } = golden_section_minimize(&Parabola, 0.0, 10.0, 1e-10)?;
    assert_abs_diff_eq!(argument, 3.0, epsilon = 1e-6);
    assert_abs_diff_eq!(value, 0.0, epsilon = 1e-10);

    let objective: &dyn Objective = &Parabola;
    assert!(golden_section_minimize(objective, -5.0, 5.0, 1e-8).is_ok());
    Ok(())
}

#[test]
fn test_solver_errors() {
    assert!(matches!(
        golden_section_minimize(&Plane, 0.0, 1.0, 1e-6),
        Err(CubeStatError::InvalidParameters {
            expected: 1,
            found: 2
        })
    ));
    assert!(matches!(
        golden_section_minimize(&Parabola, 1.0, 1.0, 1e-6),
        Err(CubeStatError::Statistics(_))
    ));
    assert!(matches!(
        golden_section_minimize(&Parabola, 0.0, 1.0, 0.0),
        Err(CubeStatError::Statistics(_))
    ));

    let empty = PercentileEstimator::new::<f32>(&[]);
    assert!(matches!(
        bisect_quantile(&empty, 1e-6),
        Err(CubeStatError::EmptySample)
    ));
}

#[test]
fn test_constant_sample_quantile() -> Result<()> {
    let estimator = PercentileEstimator::with_fraction(&[42_i16; 10], 0.9)?;
    assert_eq!(bisect_quantile(&estimator, 1e-9)?, 42.0);
    assert_eq!(estimator.evaluate(42.0)?, 0.5);
    Ok(())
}

#[test]
fn test_estimator_matches_overlay_median() -> Result<()> {
    // The overlay median and the estimator's 0.5 crossing agree on odd counts
    let samples = [9.0, 1.0, 5.0, 3.0, 7.0];
    let estimator = PercentileEstimator::new(&samples);
    assert_eq!(estimator.evaluate(5.0)?, 0.5);

    let shape = CubeShape::new(1, 1, samples.len());
    let plane = overlay(&samples, &[false; 5], shape, StatOperation::Median)?;
    assert_eq!(plane[[0, 0]], 5.0);
    Ok(())
}

#[test]
fn test_overlay_masked_cube_end_to_end() -> Result<()> {
    // 4x3 image stack with 6 exposures; exposure z holds z * 10 + x
    let shape = CubeShape::new(4, 3, 6);
    let cube = Array3::from_shape_fn(shape.dim(), |(z, _y, x)| (z * 10 + x) as u32);

    // Reject exposures 0 and 5 everywhere and exposure 2 on row 1
    let mask = Array3::from_shape_fn(shape.dim(), |(z, y, _x)| z == 0 || z == 5 || (z == 2 && y == 1));

    let engine = Overlay::new();
    let mean = engine.reduce(cube.view(), Some(mask.view()), 0, StatOperation::Mean)?;
    let max = engine.reduce(cube.view(), Some(mask.view()), 0, StatOperation::Max)?;
    let counts = valid_counts(mask.view(), 0)?;

    assert_eq!(mean.shape(), &[3, 4]);
    // Rows 0 and 2 keep exposures {1, 2, 3, 4}: mean of 10..=40 step 10 is 25
    assert_eq!(mean[[0, 0]], 25);
    assert_eq!(mean[[2, 3]], 28);
    // Row 1 keeps {1, 3, 4}: (10 + 30 + 40) / 3 = 26.67, truncated
    assert_eq!(mean[[1, 0]], 26);
    assert_eq!(max[[1, 2]], 42);
    assert_eq!(counts[[0, 0]], 4);
    assert_eq!(counts[[1, 1]], 3);

    // The flat-buffer entry point agrees with the array entry point
    let flat_cube: Vec<u32> = cube.iter().copied().collect();
    let flat_mask: Vec<bool> = mask.iter().copied().collect();
    let flat = overlay(&flat_cube, &flat_mask, shape, StatOperation::Mean)?;
    assert_eq!(flat, mean);

    let view = ArrayView3::from_shape(shape.dim(), flat_cube.as_slice())?;
    assert_eq!(view.masked_reduce_along_axis(0, &mask.view(), StatOperation::Max)?, max);
    Ok(())
}

#[test]
fn test_overlay_supports_every_element_type() -> Result<()> {
    fn check<T: Sample + PartialEq>(values: [T; 3], expected_median: T) -> Result<()> {
        let plane = overlay(&values, &[false; 3], CubeShape::new(1, 1, 3), StatOperation::Median)?;
        assert_eq!(plane[[0, 0]], expected_median);
        Ok(())
    }

    check([3_i8, -1, 2], 2)?;
    check([3_u8, 1, 2], 2)?;
    check([300_i16, -100, 200], 200)?;
    check([3_u16, 1, 2], 2)?;
    check([3_i32, 1, 2], 2)?;
    check([3_u32, 1, 2], 2)?;
    check([3_i64, 1, 2], 2)?;
    check([3_u64, 1, 2], 2)?;
    check([3.5_f32, 1.5, 2.5], 2.5)?;
    check([3.5_f64, 1.5, 2.5], 2.5)?;
    Ok(())
}
