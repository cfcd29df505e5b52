//! Configuration and run errors.

use std::error::Error;
use std::fmt;

use lifeband_arena::BandError;
use lifeband_core::{CollectError, ExchangeError, Rank};
use lifeband_kernel::RuleParseError;
use lifeband_space::PartitionError;

use crate::seed::PatternParseError;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`](crate::SimConfig::validate)
/// or while turning user input into a [`SimConfig`](crate::SimConfig).
///
/// These are reported once and end the run cleanly; no worker is started.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The grid side is zero or negative.
    NonPositiveSize {
        /// The configured side length.
        size: i64,
    },
    /// The grid cannot be split into equal bands.
    Partition(PartitionError),
    /// Random seeding density is not a probability.
    InvalidDensity {
        /// The invalid value.
        value: f64,
    },
    /// A seeded live cell falls outside the grid.
    PatternOutOfBounds {
        /// Global row of the offending cell.
        row: usize,
        /// Global column of the offending cell.
        col: usize,
        /// Grid side length.
        size: usize,
    },
    /// A rule string could not be parsed.
    InvalidRule(RuleParseError),
    /// A pattern name is not one of the presets.
    InvalidPattern(PatternParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveSize { size } => write!(
                f,
                "number of rows and columns must be greater than 0 (got {size})"
            ),
            Self::Partition(e) => write!(f, "{e}"),
            Self::InvalidDensity { value } => {
                write!(f, "density must be within [0, 1], got {value}")
            }
            Self::PatternOutOfBounds { row, col, size } => write!(
                f,
                "seed cell ({row}, {col}) lies outside the {size}x{size} grid"
            ),
            Self::InvalidRule(e) => write!(f, "{e}"),
            Self::InvalidPattern(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Partition(e) => Some(e),
            Self::InvalidRule(e) => Some(e),
            Self::InvalidPattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PartitionError> for ConfigError {
    fn from(e: PartitionError) -> Self {
        Self::Partition(e)
    }
}

impl From<RuleParseError> for ConfigError {
    fn from(e: RuleParseError) -> Self {
        Self::InvalidRule(e)
    }
}

impl From<PatternParseError> for ConfigError {
    fn from(e: PatternParseError) -> Self {
        Self::InvalidPattern(e)
    }
}

// ── RunError ───────────────────────────────────────────────────────

/// Fatal errors raised while workers are running.
///
/// There is no recovery: the first error abandons the run.
#[derive(Debug)]
pub enum RunError {
    /// A halo exchange failed.
    Exchange(ExchangeError),
    /// Gathering or printing a snapshot failed.
    Collect(CollectError),
    /// A band access was rejected.
    Band(BandError),
    /// A worker thread panicked.
    WorkerPanicked {
        /// Rank of the panicked worker.
        rank: Rank,
    },
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Rank the thread was meant to run.
        rank: Rank,
        /// OS error description.
        reason: String,
    },
}

impl RunError {
    /// Whether this error only reports a peer going away.
    ///
    /// Disconnections are the cascade of some other failure, so when
    /// several workers fail the run reports a non-disconnect error first.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Exchange(ExchangeError::Disconnected { .. })
                | Self::Collect(CollectError::Disconnected { .. })
        )
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exchange(e) => write!(f, "halo exchange: {e}"),
            Self::Collect(e) => write!(f, "collector: {e}"),
            Self::Band(e) => write!(f, "band: {e}"),
            Self::WorkerPanicked { rank } => write!(f, "worker {rank} panicked"),
            Self::ThreadSpawnFailed { rank, reason } => {
                write!(f, "failed to spawn worker {rank}: {reason}")
            }
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Exchange(e) => Some(e),
            Self::Collect(e) => Some(e),
            Self::Band(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExchangeError> for RunError {
    fn from(e: ExchangeError) -> Self {
        Self::Exchange(e)
    }
}

impl From<CollectError> for RunError {
    fn from(e: CollectError) -> Self {
        Self::Collect(e)
    }
}

impl From<BandError> for RunError {
    fn from(e: BandError) -> Self {
        Self::Band(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeband_core::HaloSide;

    #[test]
    fn partition_message_passes_through() {
        let err = ConfigError::from(PartitionError::UnevenRows {
            rows: 10,
            workers: 4,
        });
        assert_eq!(
            err.to_string(),
            "number of rows (10) is not divisible by the number of workers (4)"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn non_positive_size_message() {
        let err = ConfigError::NonPositiveSize { size: -3 };
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn disconnects_are_classified() {
        let disc = RunError::from(ExchangeError::Disconnected {
            peer: Rank(1),
            side: HaloSide::Top,
        });
        assert!(disc.is_disconnect());
        let gather = RunError::from(CollectError::Disconnected { rank: Rank(2) });
        assert!(gather.is_disconnect());
        let stale = RunError::from(ExchangeError::RowLength {
            peer: Rank(1),
            expected: 4,
            got: 3,
        });
        assert!(!stale.is_disconnect());
        assert!(!RunError::WorkerPanicked { rank: Rank(0) }.is_disconnect());
    }

    #[test]
    fn run_error_chains_source() {
        let err = RunError::from(BandError::RowLength {
            expected: 4,
            got: 2,
        });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("band: "));
    }
}
