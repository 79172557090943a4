/// Half-open row range `[start, end)` scanned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Every row of a grid with `rows` rows.
    pub fn full(rows: usize) -> Self {
        Self { start: 0, end: rows }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `[0, rows)` into `workers` contiguous ranges of `rows / workers` rows.
///
/// The last range absorbs the `rows % workers` leftover rows, so the ranges
/// always cover every row exactly once. When `workers > rows` the leading
/// ranges are empty and the last one takes all rows. Zero workers yields no
/// ranges.
pub fn partition_rows(rows: usize, workers: usize) -> Vec<Partition> {
    if workers == 0 {
        return Vec::new();
    }
    let range_size = rows / workers;
    (0..workers)
        .map(|index| {
            let start = index * range_size;
            let end = if index + 1 == workers { rows } else { start + range_size };
            Partition { start, end }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(rows: usize, parts: &[Partition]) {
        let mut hits = vec![0u32; rows];
        for part in parts {
            for row in part.start..part.end {
                hits[row] += 1;
            }
        }
        assert!(
            hits.iter().all(|&h| h == 1),
            "rows={} partitions={:?} hits={:?}",
            rows,
            parts,
            hits
        );
        for pair in parts.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "partitions must be contiguous");
        }
    }

    #[test]
    fn test_even_split() {
        let parts = partition_rows(8, 4);
        assert_eq!(
            parts,
            vec![
                Partition::new(0, 2),
                Partition::new(2, 4),
                Partition::new(4, 6),
                Partition::new(6, 8)
            ]
        );
    }

    #[test]
    fn test_last_partition_absorbs_remainder() {
        let parts = partition_rows(10, 3);
        assert_eq!(
            parts,
            vec![Partition::new(0, 3), Partition::new(3, 6), Partition::new(6, 10)]
        );
        assert_exact_cover(10, &parts);
    }

    #[test]
    fn test_single_worker_takes_everything() {
        assert_eq!(partition_rows(37, 1), vec![Partition::full(37)]);
    }

    #[test]
    fn test_one_row_per_worker() {
        let parts = partition_rows(5, 5);
        assert!(parts.iter().all(|p| p.len() == 1));
        assert_exact_cover(5, &parts);
    }

    #[test]
    fn test_more_workers_than_rows() {
        let parts = partition_rows(3, 5);
        assert_eq!(parts.len(), 5);
        assert!(parts[..4].iter().all(Partition::is_empty));
        assert_eq!(parts[4], Partition::new(0, 3));
        assert_exact_cover(3, &parts);
    }

    #[test]
    fn test_zero_workers_yields_nothing() {
        assert!(partition_rows(10, 0).is_empty());
    }

    #[test]
    fn test_exact_cover_for_all_worker_counts() {
        for rows in 1..=40 {
            for workers in 1..=rows {
                let parts = partition_rows(rows, workers);
                assert_eq!(parts.len(), workers);
                assert_eq!(parts.first().map(|p| p.start), Some(0));
                assert_eq!(parts.last().map(|p| p.end), Some(rows));
                assert_exact_cover(rows, &parts);
            }
        }
    }
}
