//! Error types for band storage.

use std::fmt;

/// Errors from [`BandStore`](crate::BandStore) access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BandError {
    /// A `(row, col)` pair lies outside the padded buffer.
    OutOfBounds {
        /// Requested row (padded coordinates).
        row: usize,
        /// Requested column (padded coordinates).
        col: usize,
        /// Padded buffer shape `(rows, cols)`.
        shape: (usize, usize),
    },
    /// A direct write targeted a halo row or padding column.
    ///
    /// Halo rows are written only through
    /// [`write_halo`](crate::BandStore::write_halo); padding columns are
    /// never written.
    NotReal {
        /// Requested row (padded coordinates).
        row: usize,
        /// Requested column (padded coordinates).
        col: usize,
    },
    /// A halo row of the wrong length was supplied.
    RowLength {
        /// Number of real columns.
        expected: usize,
        /// Number of cells supplied.
        got: usize,
    },
}

impl fmt::Display for BandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { row, col, shape } => write!(
                f,
                "cell ({row}, {col}) outside padded band of {}x{}",
                shape.0, shape.1
            ),
            Self::NotReal { row, col } => {
                write!(f, "cell ({row}, {col}) is a halo or padding cell")
            }
            Self::RowLength { expected, got } => {
                write!(f, "halo row has {got} cells, expected {expected}")
            }
        }
    }
}

impl std::error::Error for BandError {}
