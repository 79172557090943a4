//! Row-major integer grid and its random generator.

use anyhow::{Result, anyhow};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::partition::Partition;

/// Dense `rows x cols` matrix of `i32` stored row-major in one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Zero-filled grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0)
    }

    pub fn filled(rows: usize, cols: usize, value: i32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Build a grid from nested rows. Every row must have the same, non-zero length.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(anyhow!("grid needs at least one row with at least one column"));
        }
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(anyhow!(
                    "row {} has {} columns, expected {} like row 0",
                    index,
                    row.len(),
                    cols
                ));
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[i32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }

    /// Contiguous cells covered by `partition`, all columns included.
    ///
    /// Rows past the end of the grid are clamped away, so an out-of-range or
    /// empty partition yields an empty slice.
    pub fn rows_in(&self, partition: Partition) -> &[i32] {
        let end = partition.end.min(self.rows);
        let start = partition.start.min(end);
        &self.cells[start * self.cols..end * self.cols]
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [i32] {
        &mut self.cells
    }
}

/// Fills grids with uniformly distributed values over the whole `i32` range.
#[derive(Debug, Clone)]
pub struct GridGenerator {
    rng: StdRng,
}

impl GridGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible generator; the same seed always yields the same grid.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Overwrite every cell and return the largest value written.
    pub fn fill(&mut self, grid: &mut Grid) -> i32 {
        let mut largest = i32::MIN;
        for cell in grid.cells_mut() {
            let value: i32 = self.rng.random();
            *cell = value;
            if largest < value {
                largest = value;
            }
        }
        largest
    }

    pub fn generate(&mut self, rows: usize, cols: usize) -> (Grid, i32) {
        let mut grid = Grid::new(rows, cols);
        let largest = self.fill(&mut grid);
        (grid, largest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_keeps_row_major_order() {
        let grid = Grid::from_rows(vec![vec![5, 3], vec![9, 1]]).expect("square grid");
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.cells(), &[5, 3, 9, 1]);
        assert_eq!(grid.get(1, 0), Some(9));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.row(1), Some(&[9, 1][..]));
        assert_eq!(grid.row(2), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = Grid::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 columns"));
    }

    #[test]
    fn test_from_rows_rejects_empty_input() {
        assert!(Grid::from_rows(Vec::new()).is_err());
        assert!(Grid::from_rows(vec![Vec::new()]).is_err());
    }

    #[test]
    fn test_rows_in_clamps_to_grid() {
        let grid = Grid::from_rows(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
        assert_eq!(grid.rows_in(Partition::new(1, 3)), &[3, 4, 5, 6]);
        assert_eq!(grid.rows_in(Partition::new(2, 9)), &[5, 6]);
        assert!(grid.rows_in(Partition::new(2, 2)).is_empty());
        assert!(grid.rows_in(Partition::new(7, 9)).is_empty());
    }

    #[test]
    fn test_generator_reports_true_maximum() {
        let mut generator = GridGenerator::from_entropy();
        let (grid, largest) = generator.generate(64, 64);
        assert_eq!(grid.cells().len(), 64 * 64);
        assert_eq!(Some(largest), grid.cells().iter().copied().max());
    }

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let (first, first_max) = GridGenerator::seeded(7).generate(16, 16);
        let (second, second_max) = GridGenerator::seeded(7).generate(16, 16);
        assert_eq!(first, second);
        assert_eq!(first_max, second_max);
    }
}
