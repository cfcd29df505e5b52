//! Double-buffered band with halo rows and padding columns.
//!
//! # Buffer layout
//!
//! ```text
//!          col 0   1 .. C   C+1
//! row 0      0   [top halo ]  0     <- written by the halo exchanger
//! row 1      0   [ real    ]  0
//!  ...       0   [ real    ]  0
//! row B      0   [ real    ]  0
//! row B+1    0   [bot. halo]  0     <- written by the halo exchanger
//! ```
//!
//! One contiguous row-major `Vec` per buffer, stride `C + 2`. Padding
//! columns are zero from allocation and are never written.

use std::fmt::Write as _;

use lifeband_core::{is_alive, Cell, HaloSide, DEAD};

use crate::error::BandError;

/// Read-only view of the `current` buffer.
#[derive(Clone, Copy, Debug)]
pub struct CurrentFrame<'a> {
    cells: &'a [Cell],
    stride: usize,
}

impl CurrentFrame<'_> {
    /// Cell at padded `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the padded buffer.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.stride + col]
    }
}

/// Write view of the `next` buffer, restricted to real cells by the
/// kernel's iteration bounds.
#[derive(Debug)]
pub struct NextFrame<'a> {
    cells: &'a mut [Cell],
    stride: usize,
}

impl NextFrame<'_> {
    /// Store `value` at padded `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the padded buffer.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        self.cells[row * self.stride + col] = value;
    }
}

/// A worker's band: `current` and `next` buffers of identical shape.
///
/// Allocated once when the worker starts and never resized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandStore {
    band_rows: usize,
    cols: usize,
    current: Vec<Cell>,
    next: Vec<Cell>,
}

impl BandStore {
    /// Allocate a zeroed band with `band_rows` real rows and `cols` real
    /// columns.
    pub fn new(band_rows: usize, cols: usize) -> Self {
        let len = (band_rows + 2) * (cols + 2);
        Self {
            band_rows,
            cols,
            current: vec![DEAD; len],
            next: vec![DEAD; len],
        }
    }

    /// Number of real rows.
    pub fn band_rows(&self) -> usize {
        self.band_rows
    }

    /// Number of real columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row stride of both buffers (`cols + 2`).
    pub fn stride(&self) -> usize {
        self.cols + 2
    }

    /// Padded shape `(band_rows + 2, cols + 2)`.
    pub fn padded_shape(&self) -> (usize, usize) {
        (self.band_rows + 2, self.cols + 2)
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, BandError> {
        let shape = self.padded_shape();
        if row >= shape.0 || col >= shape.1 {
            return Err(BandError::OutOfBounds { row, col, shape });
        }
        Ok(row * self.stride() + col)
    }

    fn is_real(&self, row: usize, col: usize) -> bool {
        (1..=self.band_rows).contains(&row) && (1..=self.cols).contains(&col)
    }

    /// Cell of `current` at padded `(row, col)`, halo and padding included.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, BandError> {
        self.index(row, col).map(|i| self.current[i])
    }

    /// Set a real cell of `current`.
    ///
    /// Used for seeding. Halo rows and padding columns are rejected with
    /// [`BandError::NotReal`].
    pub fn set(&mut self, row: usize, col: usize, value: Cell) -> Result<(), BandError> {
        let i = self.index(row, col)?;
        if !self.is_real(row, col) {
            return Err(BandError::NotReal { row, col });
        }
        self.current[i] = value;
        Ok(())
    }

    /// Real columns (`1..=C`) of padded row `row` in `current`.
    ///
    /// # Panics
    ///
    /// Panics if `row > band_rows + 1`.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.stride() + 1;
        &self.current[start..start + self.cols]
    }

    /// The real boundary row on `side`: row 1 for `Top`, row `band_rows`
    /// for `Bottom`.
    pub fn boundary_row(&self, side: HaloSide) -> &[Cell] {
        match side {
            HaloSide::Top => self.row(1),
            HaloSide::Bottom => self.row(self.band_rows),
        }
    }

    /// Real columns of the halo row on `side`.
    pub fn halo_row(&self, side: HaloSide) -> &[Cell] {
        self.row(self.halo_index(side))
    }

    fn halo_index(&self, side: HaloSide) -> usize {
        match side {
            HaloSide::Top => 0,
            HaloSide::Bottom => self.band_rows + 1,
        }
    }

    /// Overwrite the real columns of the `side` halo row in `current`.
    ///
    /// Padding columns of the halo row are left untouched (zero).
    pub fn write_halo(&mut self, side: HaloSide, cells: &[Cell]) -> Result<(), BandError> {
        if cells.len() != self.cols {
            return Err(BandError::RowLength {
                expected: self.cols,
                got: cells.len(),
            });
        }
        let start = self.halo_index(side) * self.stride() + 1;
        self.current[start..start + self.cols].copy_from_slice(cells);
        Ok(())
    }

    /// Split into a read view of `current` and a write view of `next`.
    pub fn frames(&mut self) -> (CurrentFrame<'_>, NextFrame<'_>) {
        let stride = self.stride();
        (
            CurrentFrame {
                cells: &self.current,
                stride,
            },
            NextFrame {
                cells: &mut self.next,
                stride,
            },
        )
    }

    /// Copy the real region of `next` into `current`.
    ///
    /// Halo rows and padding columns of `current` are not touched.
    pub fn commit(&mut self) {
        let stride = self.stride();
        for row in 1..=self.band_rows {
            let start = row * stride + 1;
            let end = start + self.cols;
            self.current[start..end].copy_from_slice(&self.next[start..end]);
        }
    }

    /// Real cells of `current`, row-major, without halos or padding.
    pub fn real_cells(&self) -> Vec<Cell> {
        let mut out = Vec::with_capacity(self.band_rows * self.cols);
        for row in 1..=self.band_rows {
            out.extend_from_slice(self.row(row));
        }
        out
    }

    /// Number of live real cells in `current`.
    pub fn alive_count(&self) -> usize {
        (1..=self.band_rows)
            .map(|r| self.row(r).iter().filter(|&&c| is_alive(c)).count())
            .sum()
    }

    /// Whether every padding cell of both buffers is still zero.
    pub fn padding_is_clear(&self) -> bool {
        let stride = self.stride();
        let rows = self.band_rows + 2;
        [&self.current, &self.next].iter().all(|buf| {
            (0..rows).all(|r| buf[r * stride] == DEAD && buf[r * stride + stride - 1] == DEAD)
        })
    }

    /// Render the whole padded `current` buffer, one line per row.
    ///
    /// Debug aid: unlike the collector output, halo rows and padding
    /// columns are included.
    pub fn render_with_halos(&self) -> String {
        let stride = self.stride();
        let mut out = String::with_capacity(self.current.len() * 2);
        for row in self.current.chunks(stride) {
            for &c in row {
                let _ = write!(out, "{c} ");
            }
            out.push('\n');
        }
        out
    }
}
