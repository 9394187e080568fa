//! Integration tests for lanefold-simd

use approx::assert_relative_eq;
use lanefold_simd::prelude::*;
use lanefold_simd::{horizontal_fold, scalar_reduce, DType};

#[test]
fn test_concrete_scenarios() {
    assert_eq!(reduce_with::<F32x4, _>(&SumOp, &[1.0, 2.0, 3.0, 4.0, 5.0]), 15.0);
    assert_eq!(
        reduce_with::<F32x4, _>(&SumOp, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
        36.0
    );
}

#[test]
fn test_every_length_up_to_four_widths() -> Result<()> {
    for n in 0..=4 * F32x8::LANES {
        let data: Vec<f32> = (0..n).map(|i| (i as f32 * 0.37).sin() * 10.0).collect();

        let expected = data.iter().sum::<f32>();
        assert_relative_eq!(
            reduce_with::<F32x8, _>(&SumOp, &data),
            expected,
            epsilon = 1e-3
        );

        let expected_max = data.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(reduce_with::<F32x8, _>(&MaxOp, &data), expected_max);

        assert_eq!(
            reduce_prefix::<F32x8, _>(&SumOp, &data, n)?,
            reduce_all::<F32x8, _>(&SumOp, &data)
        );
    }
    Ok(())
}

#[test]
fn test_prefix_of_longer_buffer() -> Result<()> {
    let data: Vec<i32> = (1..=20).collect();
    let prefix = reduce_prefix::<I32x8, _>(&SumOp, &data, 10)?;
    assert_eq!(prefix, scalar_reduce(|a, b| a + b, &data[..10]));
    assert!(reduce_prefix::<I32x8, _>(&SumOp, &data, 21).is_err());
    Ok(())
}

#[test]
fn test_native_vector_agrees_with_portable() {
    let data: Vec<f32> = (0..1003).map(|i| ((i % 17) as f32 - 8.0) * 0.25).collect();

    let native_max = reduce_with::<NativeF32, _>(&MaxOp, &data);
    let portable_max = reduce_with::<F32x8, _>(&MaxOp, &data);
    assert_eq!(native_max, portable_max);

    let native_sum = reduce_with::<NativeF32, _>(&SumOp, &data);
    let portable_sum = reduce_with::<F32x8, _>(&SumOp, &data);
    assert_relative_eq!(native_sum, portable_sum, epsilon = 1e-3);

    let mut native_out = vec![0.0f32; data.len()];
    let mut portable_out = vec![0.0f32; data.len()];
    mul::<NativeF32>(&data, &data, &mut native_out).unwrap();
    mul::<F32x8>(&data, &data, &mut portable_out).unwrap();
    assert_eq!(native_out, portable_out);
}

#[test]
fn test_product_of_arange_pair() -> Result<()> {
    let size = 10_000usize;
    let x: Vec<f32> = (0..size).map(|i| i as f32).collect();
    let y: Vec<f32> = (0..size).map(|i| (size - i) as f32).collect();
    let mut out = vec![0.0f32; size];

    mul_unrolled::<F32x8>(&x, &y, &mut out)?;

    for i in 0..size {
        assert_eq!(out[i], x[i] * y[i]);
    }
    Ok(())
}

#[test]
fn test_horizontal_fold_of_full_vector() {
    let v = I64x4::new([1, 2, 3, 4]);
    assert_eq!(horizontal_fold(&SumOp, v, 4), 10);
    assert_eq!(horizontal_fold(&ProdOp, v, 4), 24);
    assert_eq!(horizontal_fold(&MinOp, v, 3), 1);
}

#[test]
fn test_lane_widths_per_dtype() {
    assert_eq!(DType::F32.vec256_lanes(), F32x8::LANES);
    assert_eq!(DType::F64.vec256_lanes(), F64x4::LANES);
    assert_eq!(DType::I32.vec256_lanes(), I32x8::LANES);
    assert_eq!(DType::U8.vec256_lanes(), U8x32::LANES);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_reduction_matches() -> Result<()> {
    let data: Vec<f64> = (0..100_000).map(|i| (i % 101) as f64 * 0.5).collect();
    let sequential = reduce_with::<F64x4, _>(&SumOp, &data);
    let parallel = par_reduce_with::<F64x4, _>(&SumOp, &data, 4096)?;
    assert_relative_eq!(parallel, sequential, max_relative = 1e-12);

    let max = par_reduce_with::<F64x4, _>(&MaxOp, &data, 1000)?;
    assert_eq!(max, 50.0);
    Ok(())
}
