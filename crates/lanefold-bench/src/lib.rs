//! Lanefold benchmarking harness
//!
//! This crate times the lanefold vector kernels, including:
//! - Elementwise products of two buffers (plain, unrolled, scalar baseline)
//! - Horizontal reductions (sum, max)
//! - Per-size comparisons ranking the variants against the scalar baseline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub mod config;
pub mod kernels;
pub mod runner;

/// Result of a benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub iterations: u32,
    pub total_time: Duration,
    pub mean_time: Duration,
    pub min_time: Duration,
    pub max_time: Duration,
    /// Standard deviation of the per-iteration time, in nanoseconds
    pub stddev: Option<f64>,
    /// Elements processed per second
    pub throughput: Option<f64>,
    pub metadata: serde_json::Value,
}

impl BenchmarkResult {
    /// Mean time per call in microseconds
    pub fn mean_micros(&self) -> f64 {
        self.mean_time.as_secs_f64() * 1_000_000.0
    }
}

/// Trait for implementing comparable benchmarks
pub trait Benchmark {
    /// Name of the benchmark
    fn name(&self) -> &str;

    /// Run the benchmark and return results
    fn run(&mut self) -> anyhow::Result<BenchmarkResult>;

    /// Optional warmup before benchmarking
    fn warmup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Kernel that speedups are measured against when it is present
pub const BASELINE_KERNEL: &str = "prod_scalar";

/// Kernel name of a result, from its metadata or the `kernel/size` name
pub fn kernel_of(result: &BenchmarkResult) -> &str {
    result.metadata["kernel"]
        .as_str()
        .unwrap_or_else(|| result.name.split('/').next().unwrap_or(&result.name))
}

/// Buffer length a result was timed over, if it recorded one
pub fn size_of(result: &BenchmarkResult) -> Option<u64> {
    result.metadata["size"].as_u64()
}

/// Kernel variants timed over one buffer length, fastest first
#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Shared buffer length, `None` when the results did not record one
    pub size: Option<u64>,
    /// Entry the speedups are relative to
    pub baseline: Option<String>,
    pub entries: Vec<KernelComparison>,
}

/// One ranked row of a [`ComparisonReport`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelComparison {
    pub name: String,
    pub kernel: String,
    pub mean_time: Duration,
    /// Baseline mean over this mean; above 1.0 beats the baseline
    pub speedup: Option<f64>,
    /// This mean over the fastest mean
    pub vs_fastest: f64,
}

impl ComparisonReport {
    /// Ranks results that share a buffer length
    ///
    /// The [`BASELINE_KERNEL`] entry is the baseline, or the first result
    /// when that kernel was not run.
    pub fn new(size: Option<u64>, results: &[BenchmarkResult]) -> Self {
        let baseline = results
            .iter()
            .find(|r| kernel_of(r) == BASELINE_KERNEL)
            .or_else(|| results.first());
        let baseline_nanos = baseline
            .map(|r| r.mean_time.as_nanos() as f64)
            .filter(|t| *t > 0.0);

        let mut ranked: Vec<&BenchmarkResult> = results.iter().collect();
        ranked.sort_by_key(|r| r.mean_time);
        let fastest_nanos = ranked
            .first()
            .map(|r| r.mean_time.as_nanos() as f64)
            .filter(|t| *t > 0.0)
            .unwrap_or(1.0);

        let entries = ranked
            .into_iter()
            .map(|r| {
                let nanos = r.mean_time.as_nanos() as f64;
                KernelComparison {
                    name: r.name.clone(),
                    kernel: kernel_of(r).to_string(),
                    mean_time: r.mean_time,
                    speedup: baseline_nanos.filter(|_| nanos > 0.0).map(|b| b / nanos),
                    vs_fastest: nanos / fastest_nanos,
                }
            })
            .collect();

        Self {
            size,
            baseline: baseline.map(|r| r.name.clone()),
            entries,
        }
    }

    /// One report per buffer length, in ascending length order
    pub fn by_size(results: &[BenchmarkResult]) -> Vec<Self> {
        let mut groups: BTreeMap<Option<u64>, Vec<BenchmarkResult>> = BTreeMap::new();
        for result in results {
            groups.entry(size_of(result)).or_default().push(result.clone());
        }
        groups
            .into_iter()
            .map(|(size, group)| Self::new(size, &group))
            .collect()
    }

    /// Fastest entry
    pub fn fastest(&self) -> Option<&KernelComparison> {
        self.entries.first()
    }

    /// Markdown section with one ranked table
    pub fn to_markdown(&self) -> String {
        let mut out = match self.size {
            Some(size) => format!("## Kernels at size {size}\n\n"),
            None => "## Kernels\n\n".to_string(),
        };
        if let Some(baseline) = &self.baseline {
            out.push_str(&format!("Baseline: `{baseline}`\n\n"));
        }

        out.push_str("| Rank | Kernel | Mean (us) | Speedup | vs Fastest |\n");
        out.push_str("|------|--------|-----------|---------|------------|\n");
        for (rank, entry) in self.entries.iter().enumerate() {
            let speedup = entry
                .speedup
                .map(|s| format!("{s:.2}x"))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "| {} | {} | {:.3} | {} | {:.2}x |\n",
                rank + 1,
                entry.kernel,
                entry.mean_time.as_secs_f64() * 1_000_000.0,
                speedup,
                entry.vs_fastest
            ));
        }
        out.push('\n');
        out
    }
}

/// Helper function to measure execution time
pub fn measure_time<F, R>(f: F) -> (Duration, R)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    let duration = start.elapsed();
    (duration, result)
}

/// Helper to run a closure `warmup + iterations` times and collect statistics
/// over the timed iterations
pub fn run_benchmark_iterations<F>(
    name: &str,
    warmup: u32,
    iterations: u32,
    mut f: F,
) -> anyhow::Result<BenchmarkResult>
where
    F: FnMut() -> anyhow::Result<()>,
{
    anyhow::ensure!(iterations > 0, "benchmark {name} needs at least one iteration");

    for _ in 0..warmup {
        f()?;
    }

    let mut times = Vec::with_capacity(iterations as usize);
    let total_start = Instant::now();

    for _ in 0..iterations {
        let (elapsed, outcome) = measure_time(&mut f);
        outcome?;
        times.push(elapsed);
    }

    let total_time = total_start.elapsed();
    let mean_time = Duration::from_nanos(
        (times.iter().map(|d| d.as_nanos()).sum::<u128>() / iterations as u128) as u64,
    );
    let min_time = times.iter().min().copied().unwrap_or_default();
    let max_time = times.iter().max().copied().unwrap_or_default();

    // Calculate standard deviation
    let mean_nanos = mean_time.as_nanos() as f64;
    let variance = times
        .iter()
        .map(|d| {
            let diff = d.as_nanos() as f64 - mean_nanos;
            diff * diff
        })
        .sum::<f64>()
        / iterations as f64;
    let stddev = variance.sqrt();

    Ok(BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_time,
        mean_time,
        min_time,
        max_time,
        stddev: Some(stddev),
        throughput: None,
        metadata: serde_json::json!({}),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, mean_ms: u64) -> BenchmarkResult {
        BenchmarkResult {
            name: name.to_string(),
            iterations: 10,
            total_time: Duration::from_millis(mean_ms * 10),
            mean_time: Duration::from_millis(mean_ms),
            min_time: Duration::from_millis(mean_ms),
            max_time: Duration::from_millis(mean_ms),
            stddev: None,
            throughput: None,
            metadata: serde_json::Value::Null,
        }
    }

    fn kernel_result(kernel: &str, size: u64, mean_ms: u64) -> BenchmarkResult {
        let mut r = result(&format!("{kernel}/{size}"), mean_ms);
        r.metadata = serde_json::json!({"kernel": kernel, "size": size});
        r
    }

    #[test]
    fn test_comparison_uses_scalar_baseline() {
        let results = vec![
            kernel_result("prod", 1000, 10),
            kernel_result("prod_scalar", 1000, 40),
            kernel_result("prod_unrolled", 1000, 20),
        ];
        let report = ComparisonReport::new(Some(1000), &results);

        assert_eq!(report.baseline.as_deref(), Some("prod_scalar/1000"));
        assert_eq!(report.fastest().map(|e| e.kernel.as_str()), Some("prod"));

        let kernels: Vec<&str> = report.entries.iter().map(|e| e.kernel.as_str()).collect();
        assert_eq!(kernels, vec!["prod", "prod_unrolled", "prod_scalar"]);
        assert_eq!(report.entries[0].speedup, Some(4.0));
        assert_eq!(report.entries[1].speedup, Some(2.0));
        assert_eq!(report.entries[2].vs_fastest, 4.0);

        let md = report.to_markdown();
        assert!(md.contains("## Kernels at size 1000"));
        assert!(md.contains("| 1 | prod | 10000.000 | 4.00x | 1.00x |"));
    }

    #[test]
    fn test_comparison_without_scalar_baseline_uses_first() {
        let results = vec![kernel_result("sum", 64, 6), kernel_result("max", 64, 3)];
        let report = ComparisonReport::new(Some(64), &results);
        assert_eq!(report.baseline.as_deref(), Some("sum/64"));
        assert_eq!(report.entries[0].speedup, Some(2.0));
    }

    #[test]
    fn test_comparisons_never_mix_sizes() {
        let results = vec![
            kernel_result("prod", 100, 1),
            kernel_result("sum", 100_000, 500),
            kernel_result("prod_scalar", 100, 4),
            kernel_result("prod", 100_000, 300),
        ];
        let reports = ComparisonReport::by_size(&results);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].size, Some(100));
        assert_eq!(reports[1].size, Some(100_000));
        assert!(reports[0].entries.iter().all(|e| e.name.ends_with("/100")));
        assert!(reports[1].entries.iter().all(|e| e.name.ends_with("/100000")));
        assert_eq!(reports[1].fastest().map(|e| e.kernel.as_str()), Some("prod"));
    }

    #[test]
    fn test_kernel_of_falls_back_to_name() {
        let r = result("prod_unrolled/1003", 1);
        assert_eq!(kernel_of(&r), "prod_unrolled");
        assert_eq!(size_of(&r), None);
    }

    #[test]
    fn test_empty_report() {
        let report = ComparisonReport::new(None, &[]);
        assert!(report.fastest().is_none());
        assert!(report.baseline.is_none());
        assert!(ComparisonReport::by_size(&[]).is_empty());
    }

    #[test]
    fn test_run_benchmark_iterations_counts_calls() {
        let mut calls = 0u32;
        let result = run_benchmark_iterations("count", 3, 5, || {
            calls += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(calls, 8);
        assert_eq!(result.iterations, 5);
        assert!(result.min_time <= result.max_time);
    }

    #[test]
    fn test_run_benchmark_iterations_propagates_errors() {
        let err = run_benchmark_iterations("fails", 0, 3, || anyhow::bail!("bad kernel"));
        assert!(err.is_err());
        assert!(run_benchmark_iterations("zero", 0, 0, || Ok(())).is_err());
    }

    #[test]
    fn test_benchmark_result_serialization() {
        let mut original = result("test", 10);
        original.stddev = Some(1.5);
        original.throughput = Some(100.0);
        original.metadata = serde_json::json!({"size": 10000});

        let json = serde_json::to_string(&original).unwrap();
        let deserialized: BenchmarkResult = serde_json::from_str(&json).unwrap();
        assert_eq!(original.name, deserialized.name);
        assert_eq!(original.mean_time, deserialized.mean_time);
        assert_eq!(deserialized.metadata["size"], 10000);
    }
}
