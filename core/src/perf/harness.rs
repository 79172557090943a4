//! Timed reduction runs checked against the fixture's ground truth.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use super::fixture::BenchFixture;
use crate::config::BenchConfig;
use crate::grid::Grid;
use crate::reduce::{Reducer, Strategy};

/// Anything the harness can time against a fixture.
pub trait GridReducer {
    fn strategy(&self) -> Strategy;
    fn workers(&self) -> usize;
    fn reduce(&self, grid: &Arc<Grid>) -> Result<i32>;
}

impl GridReducer for Reducer {
    fn strategy(&self) -> Strategy {
        Reducer::strategy(self)
    }

    fn workers(&self) -> usize {
        if Reducer::strategy(self).is_parallel() {
            Reducer::workers(self)
        } else {
            1
        }
    }

    fn reduce(&self, grid: &Arc<Grid>) -> Result<i32> {
        Reducer::reduce(self, grid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IterationReport {
    pub strategy: Strategy,
    pub workers: usize,
    pub iteration: usize,
    pub elapsed_ms: u64,
    pub elapsed_us: u64,
    pub largest: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub runs: usize,
    pub mean_us: f64,
    pub min_us: u64,
    pub max_us: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub grid_size: usize,
    pub workers: usize,
    pub seed: Option<u64>,
    pub expected: i32,
    pub iterations: Vec<IterationReport>,
}

impl RunReport {
    pub fn summary(&self, strategy: Strategy) -> Option<StrategySummary> {
        let samples: Vec<u64> = self
            .iterations
            .iter()
            .filter(|it| it.strategy == strategy)
            .map(|it| it.elapsed_us)
            .collect();
        let min_us = *samples.iter().min()?;
        let max_us = *samples.iter().max()?;
        let total: u64 = samples.iter().sum();
        Some(StrategySummary {
            strategy,
            runs: samples.len(),
            mean_us: total as f64 / samples.len() as f64,
            min_us,
            max_us,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize run report")
    }
}

/// Time one reduction, including the ground-truth check.
///
/// A mismatch comes back as an [`crate::error::IntegrityViolation`] wrapped in
/// the returned error and must end the run.
pub fn run_iteration<R>(fixture: &BenchFixture, reducer: &R, iteration: usize) -> Result<IterationReport>
where
    R: GridReducer + ?Sized,
{
    let strategy = reducer.strategy();
    let start = Instant::now();
    let largest = reducer
        .reduce(fixture.grid())
        .with_context(|| format!("{} reduction failed on run {}", strategy, iteration))?;
    if let Err(violation) = fixture.verify(strategy, iteration, largest) {
        error!(%strategy, iteration, expected = violation.expected, found = violation.found, "integrity violation");
        return Err(violation.into());
    }
    let elapsed = start.elapsed();
    Ok(IterationReport {
        strategy,
        workers: reducer.workers(),
        iteration,
        elapsed_ms: elapsed.as_millis() as u64,
        elapsed_us: elapsed.as_micros() as u64,
        largest,
    })
}

/// Run every configured strategy `config.iterations` times against `fixture`.
///
/// `on_iteration` sees each report as soon as it is measured. The first
/// failure stops the whole run.
pub fn run_benchmark<F>(config: &BenchConfig, fixture: &BenchFixture, mut on_iteration: F) -> Result<RunReport>
where
    F: FnMut(&IterationReport),
{
    config.validate()?;
    let mut iterations = Vec::with_capacity(config.iterations * config.strategies.len());
    for &strategy in &config.strategies {
        let reducer = Reducer::new(strategy, config.workers)?;
        for iteration in 0..config.iterations {
            let report = run_iteration(fixture, &reducer, iteration)?;
            on_iteration(&report);
            iterations.push(report);
        }
    }
    Ok(RunReport {
        generated_at: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        grid_size: config.grid_size,
        workers: config.workers,
        seed: config.seed,
        expected: fixture.expected(),
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrityViolation;

    struct OffByOne;

    impl GridReducer for OffByOne {
        fn strategy(&self) -> Strategy {
            Strategy::Threads
        }

        fn workers(&self) -> usize {
            2
        }

        fn reduce(&self, grid: &Arc<Grid>) -> Result<i32> {
            Ok(crate::reduce::serial_max(grid) - 1)
        }
    }

    fn seeded_config() -> BenchConfig {
        BenchConfig {
            grid_size: 24,
            workers: 3,
            iterations: 2,
            seed: Some(2024),
            strategies: Strategy::ALL.to_vec(),
        }
    }

    #[test]
    fn test_run_benchmark_reports_every_iteration() {
        let config = seeded_config();
        let fixture = BenchFixture::setup(&config).unwrap();
        let mut seen = Vec::new();
        let report = run_benchmark(&config, &fixture, |it| seen.push((it.strategy, it.iteration))).unwrap();

        assert_eq!(report.iterations.len(), 6);
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], (Strategy::Serial, 0));
        assert_eq!(seen[5], (Strategy::Tasks, 1));
        assert!(report.iterations.iter().all(|it| it.largest == fixture.expected()));
        assert_eq!(report.iterations[0].workers, 1);
        assert_eq!(report.iterations[2].workers, 3);
        assert_eq!(report.expected, fixture.expected());
    }

    #[test]
    fn test_integrity_violation_is_typed() {
        let fixture = BenchFixture::from_grid(Grid::from_rows(vec![vec![5, 3], vec![9, 1]]).unwrap());
        let err = run_iteration(&fixture, &OffByOne, 7).unwrap_err();
        let violation = err.downcast_ref::<IntegrityViolation>().expect("integrity violation");
        assert_eq!(violation.expected, 9);
        assert_eq!(violation.found, 8);
        assert_eq!(violation.iteration, 7);
    }

    #[test]
    fn test_summary_and_json() {
        let config = BenchConfig {
            strategies: vec![Strategy::Serial],
            ..seeded_config()
        };
        let fixture = BenchFixture::setup(&config).unwrap();
        let report = run_benchmark(&config, &fixture, |_| {}).unwrap();

        let summary = report.summary(Strategy::Serial).expect("serial runs recorded");
        assert_eq!(summary.runs, 2);
        assert!(summary.min_us <= summary.max_us);
        assert!(report.summary(Strategy::Tasks).is_none());

        let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["grid_size"], 24);
        assert_eq!(json["seed"], 2024);
        assert_eq!(json["iterations"][0]["strategy"], "serial");
    }
}
