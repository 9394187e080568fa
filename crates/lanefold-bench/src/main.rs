//! Lanefold benchmark CLI

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use lanefold_bench::{
    config::BenchConfig,
    kernels::{Kernel, KernelBenchmark},
    runner::{BenchmarkProfile, BenchmarkRunner},
    BenchmarkResult, ComparisonReport,
};
use lanefold_simd::{arch::native_isa, DType};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lanefold-bench")]
#[command(about = "Times lanefold vector kernels")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LANEFOLD_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory for benchmark results (overrides the config file)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify and time kernels
    Run(RunArgs),

    /// Show 256-bit lane counts per scalar type
    Lanes,

    /// List available kernels and profiles
    List,

    /// Show benchmark results
    Show(ShowArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Benchmark profile to use (quick, standard, comprehensive)
    #[arg(short, long)]
    profile: Option<String>,

    /// Buffer length, replacing the profile's sizes
    #[arg(short, long)]
    size: Option<usize>,

    /// Timed iterations per kernel
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Kernels to run (defaults to all)
    #[arg(long, value_enum, value_delimiter = ',')]
    ops: Vec<Kernel>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShowFormat {
    Json,
    Table,
    Markdown,
}

#[derive(Args)]
struct ShowArgs {
    /// Path to results file
    #[arg(short, long)]
    results_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: ShowFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run(args) => {
            let config = BenchConfig::load(cli.config.as_deref())?;
            let output_dir = cli.output.unwrap_or_else(|| config.output_dir.clone());
            run_kernels(args, &config, &output_dir)
        }
        Commands::Lanes => show_lanes(),
        Commands::List => list_kernels(),
        Commands::Show(args) => show_results(args),
    }
}

fn run_kernels(args: RunArgs, config: &BenchConfig, output_dir: &Path) -> anyhow::Result<()> {
    let mut profile = config.resolve_profile(args.profile.as_deref());
    if let Some(size) = args.size {
        profile.sizes = vec![size];
    }
    if let Some(iterations) = args.iterations {
        profile.iterations = iterations;
    }

    let kernels = if args.ops.is_empty() {
        Kernel::ALL.to_vec()
    } else {
        args.ops
    };

    info!(
        "Running {} kernels with profile {} on {} ({:?}, {} iterations)",
        kernels.len(),
        profile.name,
        native_isa(),
        profile.sizes,
        profile.iterations
    );

    let mut runner = BenchmarkRunner::new(output_dir);
    for &size in &profile.sizes {
        for &kernel in &kernels {
            runner.add_benchmark(Box::new(KernelBenchmark::new(kernel, size, &profile)));
        }
    }

    let (json_path, md_path) = runner.run_all()?;

    print_table(runner.results());
    println!();
    println!("Results: {}", json_path.display());
    println!("Report:  {}", md_path.display());

    let expected = profile.sizes.len() * kernels.len();
    anyhow::ensure!(
        runner.results().len() == expected,
        "{} of {} benchmarks failed",
        expected - runner.results().len(),
        expected
    );
    Ok(())
}

fn show_lanes() -> anyhow::Result<()> {
    println!("{:<8} {:<8} {:<8}", "dtype", "bytes", "lanes");
    println!("{}", "-".repeat(26));
    for dtype in DType::ALL {
        println!(
            "{:<8} {:<8} {:<8}",
            dtype.name(),
            dtype.size_in_bytes(),
            dtype.vec256_lanes()
        );
    }
    println!();
    println!("Native f32 vector: {}", native_isa());
    Ok(())
}

fn list_kernels() -> anyhow::Result<()> {
    println!("Available kernels:");
    for kernel in Kernel::ALL {
        println!("  - {:<14} {}", kernel.name(), kernel.description());
    }
    println!();
    println!("Profiles:");
    for name in BenchmarkProfile::NAMES {
        if let Some(profile) = BenchmarkProfile::by_name(name) {
            println!(
                "  - {:<14} sizes {:?}, {} iterations, {} warmup",
                profile.name, profile.sizes, profile.iterations, profile.warmup_iterations
            );
        }
    }
    Ok(())
}

fn print_table(results: &[BenchmarkResult]) {
    println!(
        "{:<24} {:<12} {:<12} {:<12} {:<12}",
        "Benchmark", "Iterations", "Mean (us)", "Min (us)", "Max (us)"
    );
    println!("{}", "-".repeat(76));

    for result in results {
        println!(
            "{:<24} {:<12} {:<12.3} {:<12.3} {:<12.3}",
            result.name,
            result.iterations,
            result.mean_micros(),
            result.min_time.as_secs_f64() * 1_000_000.0,
            result.max_time.as_secs_f64() * 1_000_000.0
        );
    }
}

fn show_results(args: ShowArgs) -> anyhow::Result<()> {
    info!("Loading results from {:?}", args.results_file);

    let content = std::fs::read_to_string(&args.results_file)
        .with_context(|| format!("Failed to read {}", args.results_file.display()))?;
    let results: Vec<BenchmarkResult> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.results_file.display()))?;

    match args.format {
        ShowFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        ShowFormat::Table => print_table(&results),
        ShowFormat::Markdown => {
            for comparison in ComparisonReport::by_size(&results) {
                print!("{}", comparison.to_markdown());
            }
        }
    }

    Ok(())
}
