//! Maximum reductions over a [`Grid`].
//!
//! Every strategy funnels through [`max_in_rows`]: the serial path scans the
//! full grid with it, and each parallel worker scans its own row partition
//! with it before the partial maxima are merged.

mod tasks;
mod threads;


use std::fmt;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::Grid;
use crate::partition::Partition;

pub use tasks::{task_max, task_max_async};
pub use threads::parallel_max;

/// Keep the running maximum, replacing it only on a strictly greater value.
#[inline]
pub(crate) fn keep_larger(current: i32, candidate: i32) -> i32 {
    if current < candidate { candidate } else { current }
}

/// Largest value in the rows covered by `partition`, scanning row-major.
///
/// Returns `i32::MIN` for an empty partition.
pub fn max_in_rows(grid: &Grid, partition: Partition) -> i32 {
    grid.rows_in(partition)
        .iter()
        .fold(i32::MIN, |largest, &value| keep_larger(largest, value))
}

pub fn serial_max(grid: &Grid) -> i32 {
    max_in_rows(grid, Partition::full(grid.rows()))
}

/// How a [`Reducer`] spreads the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Single linear scan on the calling thread.
    Serial,
    /// One scoped OS thread per row partition.
    Threads,
    /// One tokio task per row partition.
    Tasks,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Serial, Strategy::Threads, Strategy::Tasks];

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Serial => "serial",
            Strategy::Threads => "threads",
            Strategy::Tasks => "tasks",
        }
    }

    pub fn is_parallel(self) -> bool {
        !matches!(self, Strategy::Serial)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A strategy bound to a fixed worker count.
///
/// The `Tasks` strategy owns its tokio runtime so repeated reductions reuse the
/// scheduler while the workers themselves are still spawned per call.
#[derive(Debug)]
pub struct Reducer {
    strategy: Strategy,
    workers: usize,
    runtime: Option<tokio::runtime::Runtime>,
}

impl Reducer {
    pub fn new(strategy: Strategy, workers: usize) -> Result<Self> {
        if workers == 0 {
            bail!("{} reduction needs at least one worker", strategy);
        }
        let runtime = match strategy {
            Strategy::Tasks => Some(
                tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| anyhow!("Failed to create tokio runtime: {}", e))?,
            ),
            Strategy::Serial | Strategy::Threads => None,
        };
        debug!(%strategy, workers, "reducer ready");
        Ok(Self {
            strategy,
            workers,
            runtime,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Blocking entry point.
    ///
    /// The `Tasks` strategy blocks on its own runtime and refuses to run from
    /// inside another tokio context; async callers use [`task_max_async`]
    /// instead. A `Reducer` holding a runtime must also be dropped outside
    /// async code.
    pub fn reduce(&self, grid: &Arc<Grid>) -> Result<i32> {
        match self.strategy {
            Strategy::Serial => Ok(serial_max(grid)),
            Strategy::Threads => parallel_max(grid, self.workers),
            Strategy::Tasks => {
                if tokio::runtime::Handle::try_current().is_ok() {
                    bail!("tasks reducer cannot block inside an async context; await task_max_async instead");
                }
                let runtime = self
                    .runtime
                    .as_ref()
                    .ok_or_else(|| anyhow!("tasks reducer was built without a runtime"))?;
                task_max(grid, self.workers, runtime)
            }
        }
    }
}
