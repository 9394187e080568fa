//! Benchmark runner utilities

use crate::{Benchmark, BenchmarkResult, ComparisonReport};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Benchmark suite runner
pub struct BenchmarkRunner {
    benchmarks: Vec<Box<dyn Benchmark>>,
    results: Vec<BenchmarkResult>,
    output_dir: PathBuf,
}

impl BenchmarkRunner {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            benchmarks: Vec::new(),
            results: Vec::new(),
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Add a benchmark to the suite
    pub fn add_benchmark(&mut self, benchmark: Box<dyn Benchmark>) {
        self.benchmarks.push(benchmark);
    }

    /// Number of queued benchmarks
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether no benchmarks are queued
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    /// Run all benchmarks in the suite and save the results
    ///
    /// A benchmark that fails is logged and skipped. Returns the paths of the
    /// JSON results and the markdown report.
    pub fn run_all(&mut self) -> anyhow::Result<(PathBuf, PathBuf)> {
        info!("Starting benchmark suite with {} benchmarks", self.benchmarks.len());

        std::fs::create_dir_all(&self.output_dir)?;

        self.results.clear();

        let total_benchmarks = self.benchmarks.len();

        for (i, benchmark) in self.benchmarks.iter_mut().enumerate() {
            info!("Running benchmark {}/{}: {}", i + 1, total_benchmarks, benchmark.name());

            if let Err(e) = benchmark.warmup() {
                warn!("Warmup failed for {}: {}", benchmark.name(), e);
                continue;
            }

            match benchmark.run() {
                Ok(result) => {
                    info!(
                        "Benchmark {} completed: mean time = {:.3} us",
                        benchmark.name(),
                        result.mean_micros()
                    );
                    self.results.push(result);
                }
                Err(e) => {
                    warn!("Benchmark {} failed: {}", benchmark.name(), e);
                }
            }
        }

        self.save_results()
    }

    /// Writes `results_<stamp>.json` and `report_<stamp>.md`
    fn save_results(&self) -> anyhow::Result<(PathBuf, PathBuf)> {
        let stamp = self.unused_stamp();

        let json_path = self.output_dir.join(format!("results_{stamp}.json"));
        std::fs::write(&json_path, serde_json::to_string_pretty(&self.results)?)?;
        info!("Results saved to {:?}", json_path);

        let md_path = self.output_dir.join(format!("report_{stamp}.md"));
        std::fs::write(&md_path, self.markdown_report())?;
        info!("Report saved to {:?}", md_path);

        Ok((json_path, md_path))
    }

    /// Millisecond timestamp, suffixed until no earlier run's files collide
    fn unused_stamp(&self) -> String {
        let base = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f").to_string();
        let taken = |stamp: &str| {
            self.output_dir.join(format!("results_{stamp}.json")).exists()
                || self.output_dir.join(format!("report_{stamp}.md")).exists()
        };

        let mut stamp = base.clone();
        let mut n = 1;
        while taken(&stamp) {
            stamp = format!("{base}_{n}");
            n += 1;
        }
        stamp
    }

    fn markdown_report(&self) -> String {
        let mut report = format!(
            "# Lanefold Benchmark Report\n\nGenerated: {}\n\nBenchmarks completed: {}\n\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            self.results.len()
        );

        report.push_str("| Benchmark | Iterations | Mean (us) | Min (us) | Max (us) | Std Dev (us) | Melem/s |\n");
        report.push_str("|-----------|------------|-----------|----------|----------|--------------|---------|\n");
        for result in &self.results {
            let throughput = result
                .throughput
                .map(|t| format!("{:.1}", t / 1e6))
                .unwrap_or_else(|| "-".to_string());
            report.push_str(&format!(
                "| {} | {} | {:.3} | {:.3} | {:.3} | {:.3} | {} |\n",
                result.name,
                result.iterations,
                result.mean_micros(),
                result.min_time.as_secs_f64() * 1_000_000.0,
                result.max_time.as_secs_f64() * 1_000_000.0,
                result.stddev.unwrap_or(0.0) / 1_000.0,
                throughput,
            ));
        }
        report.push('\n');

        for comparison in ComparisonReport::by_size(&self.results) {
            if comparison.entries.len() > 1 {
                report.push_str(&comparison.to_markdown());
            }
        }

        report
    }

    /// Get the results
    pub fn results(&self) -> &[BenchmarkResult] {
        &self.results
    }
}

/// Profile-based benchmark configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkProfile {
    pub name: String,
    /// Buffer lengths to benchmark
    pub sizes: Vec<usize>,
    pub iterations: u32,
    pub warmup_iterations: u32,
}

impl BenchmarkProfile {
    /// Names accepted by [`BenchmarkProfile::by_name`]
    pub const NAMES: [&'static str; 3] = ["quick", "standard", "comprehensive"];

    /// Looks a profile up by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "quick" => Some(Self::quick()),
            "standard" => Some(Self::standard()),
            "comprehensive" => Some(Self::comprehensive()),
            _ => None,
        }
    }

    /// Quick profile for fast benchmarking
    pub fn quick() -> Self {
        Self {
            name: "quick".to_string(),
            sizes: vec![1_000, 10_000],
            iterations: 1_000,
            warmup_iterations: 10,
        }
    }

    /// Standard profile: one 10k-element pair, 100k calls per kernel
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            sizes: vec![10_000],
            iterations: 100_000,
            warmup_iterations: 100,
        }
    }

    /// Comprehensive profile, including lengths that leave a tail
    pub fn comprehensive() -> Self {
        Self {
            name: "comprehensive".to_string(),
            sizes: vec![100, 1_003, 10_000, 100_000],
            iterations: 100_000,
            warmup_iterations: 1_000,
        }
    }
}
