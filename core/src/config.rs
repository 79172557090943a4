//! Benchmark tunables.
//!
//! Values come from an optional TOML file and are then overridden by CLI
//! flags; anything left unset keeps the defaults below.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::reduce::Strategy;

pub const DEFAULT_GRID_SIZE: usize = 100;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_ITERATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Side length of the square grid.
    pub grid_size: usize,
    /// Worker count for the parallel strategies.
    pub workers: usize,
    /// Timed reductions per strategy.
    pub iterations: usize,
    /// Fixed generator seed; `None` draws a fresh grid every run.
    pub seed: Option<u64>,
    pub strategies: Vec<Strategy>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            workers: DEFAULT_WORKERS,
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            strategies: vec![Strategy::Serial, Strategy::Threads],
        }
    }
}

impl BenchConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).context("parse benchmark config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("load {}", path.display()))
    }

    /// Reject non-positive sizes before any grid is allocated.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            bail!("grid_size must be a positive integer");
        }
        if self.workers == 0 {
            bail!("workers must be a positive integer");
        }
        if self.iterations == 0 {
            bail!("iterations must be a positive integer");
        }
        if self.strategies.is_empty() {
            bail!("at least one strategy must be selected");
        }
        if self.workers > self.grid_size {
            warn!(
                workers = self.workers,
                grid_size = self.grid_size,
                "more workers than rows; leading partitions will be empty"
            );
        }
        Ok(())
    }
}
