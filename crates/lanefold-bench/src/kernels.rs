//! Kernel benchmarks over a pair of `arange` buffers

use anyhow::{ensure, Context};
use clap::ValueEnum;
use lanefold_simd::arch::{native_isa, NativeF32};
use lanefold_simd::elementwise::{mul, mul_unrolled};
use lanefold_simd::ops::{MaxOp, SumOp};
use lanefold_simd::reduce::{reduce_with, scalar_reduce};
use lanefold_simd::SimdVector;
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use tracing::debug;

use crate::runner::BenchmarkProfile;
use crate::{run_benchmark_iterations, Benchmark, BenchmarkResult};

/// Operations the harness can time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Kernel {
    /// Elementwise product, one vector per iteration
    Prod,
    /// Elementwise product, two vectors per iteration
    ProdUnrolled,
    /// Elementwise product, scalar loop
    ProdScalar,
    /// Sum reduction
    Sum,
    /// Max reduction
    Max,
}

impl Kernel {
    /// Every kernel, in report order
    pub const ALL: [Kernel; 5] = [
        Kernel::Prod,
        Kernel::ProdUnrolled,
        Kernel::ProdScalar,
        Kernel::Sum,
        Kernel::Max,
    ];

    /// Stable name used in reports
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Prod => "prod",
            Kernel::ProdUnrolled => "prod_unrolled",
            Kernel::ProdScalar => "prod_scalar",
            Kernel::Sum => "sum",
            Kernel::Max => "max",
        }
    }

    /// One-line description for `list`
    pub fn description(self) -> &'static str {
        match self {
            Kernel::Prod => "elementwise x * y, one vector per step",
            Kernel::ProdUnrolled => "elementwise x * y, two vectors per step",
            Kernel::ProdScalar => "elementwise x * y, scalar loop baseline",
            Kernel::Sum => "sum of x through the lane-fold reducer",
            Kernel::Max => "max of x through the lane-fold reducer",
        }
    }
}

/// `[start, start + 1, ..., end - 1]` as f32
pub fn arange(start: usize, end: usize) -> Vec<f32> {
    (start..end).map(|i| i as f32).collect()
}

/// Elementwise closeness test with relative and absolute tolerance
pub fn allclose(a: &[f32], b: &[f32], rtol: f32, atol: f32) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= atol + rtol * y.abs())
}

/// Checks a product buffer against `x[i] * y[i]`
pub fn verify_product(out: &[f32], x: &[f32], y: &[f32]) -> anyhow::Result<()> {
    let expected: Vec<f32> = x.iter().zip(y).map(|(a, b)| a * b).collect();
    ensure!(
        allclose(out, &expected, 1e-6, 0.0),
        "product output does not match x * y"
    );
    Ok(())
}

/// Times one kernel over fixed-size inputs
pub struct KernelBenchmark {
    kernel: Kernel,
    name: String,
    iterations: u32,
    warmup_iterations: u32,
    x: Vec<f32>,
    y: Vec<f32>,
    out: Vec<f32>,
}

impl KernelBenchmark {
    /// Builds inputs `x = y = arange(0, size)`
    pub fn new(kernel: Kernel, size: usize, profile: &BenchmarkProfile) -> Self {
        Self::with_inputs(kernel, arange(0, size), arange(0, size), profile)
    }

    /// Builds a benchmark over caller-provided inputs of equal length
    pub fn with_inputs(kernel: Kernel, x: Vec<f32>, y: Vec<f32>, profile: &BenchmarkProfile) -> Self {
        let size = x.len();
        Self {
            kernel,
            name: format!("{}/{}", kernel.name(), size),
            iterations: profile.iterations,
            warmup_iterations: profile.warmup_iterations,
            out: vec![0.0; size],
            x,
            y,
        }
    }

    fn step(&mut self) -> anyhow::Result<()> {
        match self.kernel {
            Kernel::Prod => mul::<NativeF32>(&self.x, &self.y, &mut self.out)?,
            Kernel::ProdUnrolled => mul_unrolled::<NativeF32>(&self.x, &self.y, &mut self.out)?,
            Kernel::ProdScalar => {
                for ((a, b), o) in self.x.iter().zip(&self.y).zip(self.out.iter_mut()) {
                    *o = a * b;
                }
            }
            Kernel::Sum => {
                black_box(reduce_with::<NativeF32, _>(&SumOp, black_box(&self.x)));
            }
            Kernel::Max => {
                black_box(reduce_with::<NativeF32, _>(&MaxOp, black_box(&self.x)));
            }
        }
        Ok(())
    }

    /// Runs the kernel once and checks it against a scalar reference
    pub fn verify(&mut self) -> anyhow::Result<()> {
        self.step()?;
        match self.kernel {
            Kernel::Prod | Kernel::ProdUnrolled | Kernel::ProdScalar => {
                verify_product(&self.out, &self.x, &self.y)
                    .with_context(|| format!("{} failed verification", self.name))?;
            }
            Kernel::Sum => {
                let got = reduce_with::<NativeF32, _>(&SumOp, &self.x) as f64;
                let expected: f64 = self.x.iter().map(|&v| v as f64).sum();
                ensure!(
                    (got - expected).abs() <= 1e-3 * expected.abs().max(1.0),
                    "{}: sum {} differs from reference {}",
                    self.name,
                    got,
                    expected
                );
            }
            Kernel::Max => {
                let got = reduce_with::<NativeF32, _>(&MaxOp, &self.x);
                let expected = scalar_reduce(f32::max, &self.x).unwrap_or(f32::NEG_INFINITY);
                ensure!(
                    got == expected,
                    "{}: max {} differs from reference {}",
                    self.name,
                    got,
                    expected
                );
            }
        }
        debug!("{} verified", self.name);
        Ok(())
    }
}

impl Benchmark for KernelBenchmark {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&mut self) -> anyhow::Result<()> {
        self.verify()?;
        for _ in 0..self.warmup_iterations {
            self.step()?;
        }
        Ok(())
    }

    fn run(&mut self) -> anyhow::Result<BenchmarkResult> {
        let name = self.name.clone();
        let iterations = self.iterations;
        let mut result = run_benchmark_iterations(&name, 0, iterations, || self.step())?;

        let size = self.x.len();
        let mean_secs = result.mean_time.as_secs_f64();
        if mean_secs > 0.0 {
            result.throughput = Some(size as f64 / mean_secs);
        }
        result.metadata = serde_json::json!({
            "kernel": self.kernel,
            "size": size,
            "isa": native_isa(),
            "lanes": <NativeF32 as SimdVector>::LANES,
        });

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_profile() -> BenchmarkProfile {
        BenchmarkProfile {
            name: "test".to_string(),
            sizes: vec![37],
            iterations: 3,
            warmup_iterations: 1,
        }
    }

    #[test]
    fn test_every_kernel_verifies() {
        let profile = tiny_profile();
        for kernel in Kernel::ALL {
            for size in [0usize, 1, 7, 37, 1003] {
                let mut bench = KernelBenchmark::new(kernel, size, &profile);
                bench.verify().unwrap_or_else(|e| panic!("{kernel:?}/{size}: {e:#}"));
            }
        }
    }

    #[test]
    fn test_product_verification_rejects_repeated_operand() {
        let x = arange(0, 20);
        let y: Vec<f32> = (0..20).map(|i| (i % 3) as f32).collect();
        let squared: Vec<f32> = x.iter().map(|v| v * v).collect();

        assert!(verify_product(&squared, &x, &y).is_err());

        let correct: Vec<f32> = x.iter().zip(&y).map(|(a, b)| a * b).collect();
        assert!(verify_product(&correct, &x, &y).is_ok());
    }

    #[test]
    fn test_run_records_metadata() {
        let mut bench = KernelBenchmark::new(Kernel::Prod, 100, &tiny_profile());
        bench.warmup().unwrap();
        let result = bench.run().unwrap();

        assert_eq!(result.name, "prod/100");
        assert_eq!(result.iterations, 3);
        assert_eq!(result.metadata["kernel"], "prod");
        assert_eq!(result.metadata["size"], 100);
    }

    #[test]
    fn test_allclose() {
        assert!(allclose(&[1.0, 2.0], &[1.0, 2.0 + 1e-7], 1e-6, 0.0));
        assert!(!allclose(&[1.0, 2.0], &[1.0, 2.1], 1e-6, 0.0));
        assert!(!allclose(&[1.0], &[1.0, 2.0], 1e-6, 0.0));
    }
}
