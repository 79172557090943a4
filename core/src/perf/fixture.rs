use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::BenchConfig;
use crate::error::IntegrityViolation;
use crate::grid::{Grid, GridGenerator};
use crate::reduce::Strategy;

/// A generated grid together with its ground-truth maximum.
#[derive(Debug, Clone)]
pub struct BenchFixture {
    grid: Arc<Grid>,
    expected: i32,
}

impl BenchFixture {
    /// Generate a `grid_size x grid_size` grid as described by `config`.
    pub fn setup(config: &BenchConfig) -> Result<Self> {
        config.validate()?;
        let mut generator = match config.seed {
            Some(seed) => GridGenerator::seeded(seed),
            None => GridGenerator::from_entropy(),
        };
        let (grid, expected) = generator.generate(config.grid_size, config.grid_size);
        info!(
            grid_size = config.grid_size,
            seed = ?config.seed,
            expected,
            "generated benchmark grid"
        );
        Ok(Self {
            grid: Arc::new(grid),
            expected,
        })
    }

    /// Wrap an existing grid, taking the ground truth from a plain iterator max.
    pub fn from_grid(grid: Grid) -> Self {
        let expected = grid.cells().iter().copied().max().unwrap_or(i32::MIN);
        Self {
            grid: Arc::new(grid),
            expected,
        }
    }

    /// Replace the recorded ground truth, e.g. with a maximum known from
    /// outside the generator.
    pub fn with_expected(mut self, expected: i32) -> Self {
        self.expected = expected;
        self
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn expected(&self) -> i32 {
        self.expected
    }

    pub fn verify(&self, strategy: Strategy, iteration: usize, found: i32) -> Result<(), IntegrityViolation> {
        if found == self.expected {
            Ok(())
        } else {
            Err(IntegrityViolation {
                strategy,
                iteration,
                expected: self.expected,
                found,
            })
        }
    }
}
