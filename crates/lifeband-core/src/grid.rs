//! Dense row-major grid used when bands are reassembled.

use std::fmt;

use crate::cell::{is_alive, Cell, DEAD};

/// A dense `rows × cols` matrix of cells without any padding.
///
/// The simulation never holds the whole grid in one place while it runs.
/// A `Grid` only appears after a run, when every worker's final band is
/// stitched together, and in tests that compare against a sequential
/// reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An all-dead grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![DEAD; rows * cols],
        }
    }

    /// Build a grid from row-major cells. Returns `None` if the length
    /// does not equal `rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() != rows * cols {
            return None;
        }
        Some(Self { rows, cols, cells })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Set the cell at `(row, col)`. Returns `false` if out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) -> bool {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
            true
        } else {
            false
        }
    }

    /// One row of cells.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Overwrite consecutive rows starting at `first_row` with `band`.
    ///
    /// Returns `false` (leaving the grid untouched) if `band` is not a
    /// whole number of rows or would run past the last row.
    pub fn paste_rows(&mut self, first_row: usize, band: &[Cell]) -> bool {
        if self.cols == 0 || band.len() % self.cols != 0 {
            return false;
        }
        let start = first_row * self.cols;
        let end = start + band.len();
        if end > self.cells.len() {
            return false;
        }
        self.cells[start..end].copy_from_slice(band);
        true
    }

    /// Number of live cells.
    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&c| is_alive(c)).count()
    }

    /// Coordinates of every live cell in row-major order.
    pub fn alive_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| is_alive(c))
            .map(|(i, _)| (i / self.cols, i % self.cols))
            .collect()
    }

    /// Same liveness pattern, ignoring owner tags.
    pub fn same_liveness(&self, other: &Grid) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(&a, &b)| is_alive(a) == is_alive(b))
    }
}

/// Renders each row as its values, each followed by a single space.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for &c in self.row(r) {
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
