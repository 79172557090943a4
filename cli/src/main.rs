use std::path::PathBuf;
use std::sync::Once;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use gridmax_core::{
    config::BenchConfig,
    perf::{
        fixture::BenchFixture,
        harness::{IterationReport, StrategySummary, run_benchmark},
    },
    reduce::Strategy,
};


#[derive(Debug, Parser)]
#[command(
    name = "gridmax",
    author,
    version,
    about = "Time serial and parallel max reductions over a random integer grid",
    long_about = None
)]
struct CliArgs {
    /// TOML file with benchmark settings; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Side length of the square grid
    #[arg(long, short = 'n', value_name = "N", value_parser = parse_positive)]
    grid_size: Option<usize>,

    /// Worker count for the parallel strategies
    #[arg(long, short = 'w', value_name = "W", value_parser = parse_positive)]
    workers: Option<usize>,

    /// Timed runs per strategy
    #[arg(long, short = 'i', value_parser = parse_positive)]
    iterations: Option<usize>,

    /// Seed the grid generator for a reproducible grid
    #[arg(long)]
    seed: Option<u64>,

    /// Strategies to run in order (repeat the flag or separate with commas)
    #[arg(long = "strategy", short = 's', value_enum, value_delimiter = ',')]
    strategies: Vec<StrategyCli>,

    /// Print the whole run as JSON instead of one line per run
    #[arg(long)]
    json: bool,

    /// Check results against this maximum instead of the generated one
    #[arg(long, hide = true, allow_hyphen_values = true)]
    expected: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyCli {
    Serial,
    Threads,
    Tasks,
}

impl From<StrategyCli> for Strategy {
    fn from(value: StrategyCli) -> Self {
        match value {
            StrategyCli::Serial => Strategy::Serial,
            StrategyCli::Threads => Strategy::Threads,
            StrategyCli::Tasks => Strategy::Tasks,
        }
    }
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|e| format!("'{}' is not a positive integer: {}", raw, e))?;
    if value == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(value)
}

impl CliArgs {
    fn resolve_config(&self) -> anyhow::Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)?,
            None => BenchConfig::default(),
        };
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if !self.strategies.is_empty() {
            config.strategies = self.strategies.iter().copied().map(Strategy::from).collect();
        }
        config.validate().context("invalid benchmark configuration")?;
        Ok(config)
    }
}

static TRACING: Once = Once::new();

/// What `GRIDMAX_TRACE` asks for.
#[derive(Debug, PartialEq, Eq)]
enum TraceRequest {
    Off,
    /// `RUST_LOG` if set, otherwise info for the core crate.
    Default,
    Filter(String),
}

fn trace_request(raw: &str) -> TraceRequest {
    let value = raw.trim();
    let is_any = |words: &[&str]| words.iter().any(|w| value.eq_ignore_ascii_case(w));
    if value.is_empty() || is_any(&["0", "false", "off"]) {
        TraceRequest::Off
    } else if is_any(&["1", "true", "on"]) {
        TraceRequest::Default
    } else {
        TraceRequest::Filter(value.to_string())
    }
}

fn init_tracing() {
    let Ok(raw) = std::env::var("GRIDMAX_TRACE") else {
        return;
    };
    let filter = match trace_request(&raw) {
        TraceRequest::Off => return,
        TraceRequest::Default => std::env::var("RUST_LOG").unwrap_or_else(|_| "gridmax_core=info".to_string()),
        TraceRequest::Filter(expr) => expr,
    };

    TRACING.call_once(|| {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("gridmax_core=info"));
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init();
    });
}

fn format_iteration(report: &IterationReport) -> String {
    let workers = if report.strategy.is_parallel() {
        format!(" ({} workers)", report.workers)
    } else {
        String::new()
    };
    format!(
        "{} reduction{} - test run {} - {}ms",
        report.strategy, workers, report.iteration, report.elapsed_ms
    )
}

fn format_summary(summary: &StrategySummary) -> String {
    format!(
        "{}: {} runs, mean {:.1}us, min {}us, max {}us",
        summary.strategy, summary.runs, summary.mean_us, summary.min_us, summary.max_us
    )
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = args.resolve_config()?;
    let mut fixture = BenchFixture::setup(&config).context("set up benchmark grid")?;

    if !args.json {
        eprintln!(
            "Generated {n}x{n} grid, largest number generated {}",
            fixture.expected(),
            n = config.grid_size
        );
    }
    if let Some(expected) = args.expected {
        fixture = fixture.with_expected(expected);
    }

    let json = args.json;
    let report = run_benchmark(&config, &fixture, |iteration| {
        if !json {
            println!("{}", format_iteration(iteration));
        }
    })?;

    if json {
        println!("{}", report.to_json_pretty()?);
        return Ok(());
    }

    for strategy in Strategy::ALL {
        if let Some(summary) = report.summary(strategy) {
            println!("{}", format_summary(&summary));
        }
    }
    Ok(())
}
