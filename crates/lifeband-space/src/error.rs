//! Error types for partitioning.

use std::fmt;

/// Errors from [`Partition::new`](crate::Partition::new).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionError {
    /// The grid has zero rows or zero columns.
    EmptyGrid {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
    /// Zero workers were requested.
    NoWorkers,
    /// The row count does not divide evenly among the workers.
    UnevenRows {
        /// Requested row count.
        rows: usize,
        /// Requested worker count.
        workers: usize,
    },
    /// More workers than the decomposition supports.
    TooManyWorkers {
        /// Requested worker count.
        workers: usize,
        /// Largest supported worker count.
        max: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { rows, cols } => write!(
                f,
                "number of rows and columns must be greater than 0 (got {rows}x{cols})"
            ),
            Self::NoWorkers => write!(f, "at least one worker is required"),
            Self::UnevenRows { rows, workers } => write!(
                f,
                "number of rows ({rows}) is not divisible by the number of workers ({workers})"
            ),
            Self::TooManyWorkers { workers, max } => write!(
                f,
                "number of workers must be at most {max} (got {workers})"
            ),
        }
    }
}

impl std::error::Error for PartitionError {}
