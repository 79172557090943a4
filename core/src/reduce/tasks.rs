use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use super::{keep_larger, max_in_rows};
use crate::grid::Grid;
use crate::partition::partition_rows;

/// Task-based counterpart of [`super::parallel_max`].
///
/// Hands each partition to tokio's blocking pool, so the scans run on
/// separate threads even under a current-thread runtime. Each scan reports
/// through its own oneshot channel; the channels are awaited in partition
/// order.
pub async fn task_max_async(grid: Arc<Grid>, workers: usize) -> Result<i32> {
    if workers == 0 {
        bail!("task reduction needs at least one worker");
    }
    let partitions = partition_rows(grid.rows(), workers);
    debug!(rows = grid.rows(), workers, "dispatching row partitions to tasks");

    let mut results = Vec::with_capacity(partitions.len());
    for (index, partition) in partitions.into_iter().enumerate() {
        let (tx, rx) = oneshot::channel::<i32>();
        let grid = Arc::clone(&grid);
        tokio::task::spawn_blocking(move || {
            let partial = max_in_rows(&grid, partition);
            trace!(task = index, start = partition.start, end = partition.end, partial, "partition scanned");
            let _ = tx.send(partial);
        });
        results.push(rx);
    }

    let mut largest = i32::MIN;
    for (index, rx) in results.into_iter().enumerate() {
        let partial = rx
            .await
            .with_context(|| format!("task {} exited without reporting a partial maximum", index))?;
        largest = keep_larger(largest, partial);
    }
    Ok(largest)
}

/// Run [`task_max_async`] to completion on `runtime`.
pub fn task_max(grid: &Arc<Grid>, workers: usize, runtime: &Runtime) -> Result<i32> {
    runtime.block_on(task_max_async(Arc::clone(grid), workers))
}
