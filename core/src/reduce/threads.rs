use anyhow::{Result, anyhow, bail};
use crossbeam::channel;
use tracing::{debug, trace};

use super::{keep_larger, max_in_rows};
use crate::grid::Grid;
use crate::partition::partition_rows;

/// Fan the rows out to `workers` scoped threads and merge their partial maxima.
///
/// Every worker is spawned before any result is read. Each one owns the
/// sending half of a capacity-1 channel; results are received in partition
/// order, which fixes the read order but not the order workers finish in.
pub fn parallel_max(grid: &Grid, workers: usize) -> Result<i32> {
    if workers == 0 {
        bail!("parallel reduction needs at least one worker");
    }
    let partitions = partition_rows(grid.rows(), workers);
    debug!(rows = grid.rows(), workers, "dispatching row partitions to threads");

    crossbeam::scope(|scope| -> Result<i32> {
        let mut results = Vec::with_capacity(partitions.len());
        for (index, partition) in partitions.iter().copied().enumerate() {
            let (tx, rx) = channel::bounded::<i32>(1);
            scope.spawn(move |_| {
                let partial = max_in_rows(grid, partition);
                trace!(worker = index, start = partition.start, end = partition.end, partial, "partition scanned");
                // the receiver only goes away if the merge already bailed
                let _ = tx.send(partial);
            });
            results.push(rx);
        }

        let mut largest = i32::MIN;
        for (index, rx) in results.into_iter().enumerate() {
            let partial = rx
                .recv()
                .map_err(|_| anyhow!("worker {} exited without reporting a partial maximum", index))?;
            largest = keep_larger(largest, partial);
        }
        Ok(largest)
    })
    .map_err(|_| anyhow!("a reduction worker thread panicked"))?
}
