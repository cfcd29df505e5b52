//! Reusable grid fixtures.
//!
//! Small named patterns with known behaviour under B3/S23:
//!
//! - [`PatternFixture::Block`]: still life.
//! - [`PatternFixture::Blinker`]: period-2 oscillator (horizontal phase).
//! - [`PatternFixture::Glider`]: moves one cell down-right every 4 generations.

use lifeband_core::Grid;

/// A named pattern placed by its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternFixture {
    Block,
    Blinker,
    Glider,
}

impl PatternFixture {
    /// Live offsets relative to the pattern's top-left corner.
    pub fn offsets(self) -> &'static [(usize, usize)] {
        match self {
            Self::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Self::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Self::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
        }
    }

    /// A `rows × cols` grid with this pattern at `(row, col)`, tagged 1.
    pub fn grid(self, rows: usize, cols: usize, row: usize, col: usize) -> Grid {
        let cells: Vec<_> = self
            .offsets()
            .iter()
            .map(|&(r, c)| (row + r, col + c))
            .collect();
        grid_with_cells(rows, cols, &cells)
    }
}

/// A grid with the given cells alive (tag 1).
///
/// # Panics
///
/// Panics if a coordinate is out of bounds.
pub fn grid_with_cells(rows: usize, cols: usize, alive: &[(usize, usize)]) -> Grid {
    let mut g = Grid::new(rows, cols);
    for &(r, c) in alive {
        assert!(g.set(r, c, 1), "({r}, {c}) outside {rows}x{cols}");
    }
    g
}
