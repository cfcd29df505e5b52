//! Communication error types.
//!
//! Every cross-worker interaction is either a halo exchange or a snapshot
//! gather. Both are fatal on failure: there is no retry and no partial
//! recovery. A worker that observes one of these errors abandons the run,
//! which drops its channel endpoints and lets its peers fail in turn
//! instead of blocking forever.

use std::error::Error;
use std::fmt;
use std::io;

use crate::edge::HaloSide;
use crate::id::{Generation, Rank};

/// Errors from the per-generation halo exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeError {
    /// The peer's end of a halo link was dropped.
    Disconnected {
        /// Rank on the other end of the link.
        peer: Rank,
        /// The halo side this worker was sending from or receiving into.
        side: HaloSide,
    },
    /// A halo row arrived stamped with the wrong generation.
    OutOfStep {
        /// Rank that sent the row.
        peer: Rank,
        /// Generation this worker is exchanging.
        expected: Generation,
        /// Generation stamped on the received row.
        got: Generation,
    },
    /// A halo row arrived with the wrong number of cells.
    RowLength {
        /// Rank that sent the row.
        peer: Rank,
        /// Number of real columns in this worker's band.
        expected: usize,
        /// Number of cells received.
        got: usize,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer, side } => {
                write!(f, "halo link to rank {peer} ({side} side) disconnected")
            }
            Self::OutOfStep {
                peer,
                expected,
                got,
            } => write!(
                f,
                "rank {peer} sent a halo row for generation {got}, expected {expected}"
            ),
            Self::RowLength {
                peer,
                expected,
                got,
            } => write!(
                f,
                "rank {peer} sent a halo row of {got} cells, expected {expected}"
            ),
        }
    }
}

impl Error for ExchangeError {}

/// Errors from gathering band snapshots at the coordinator.
#[derive(Debug)]
pub enum CollectError {
    /// The coordinator's inbox (or a contributor's outbox) was dropped.
    Disconnected {
        /// Rank that detected the broken channel.
        rank: Rank,
    },
    /// A report arrived for a generation the coordinator already printed.
    StaleReport {
        /// Rank that sent the report.
        rank: Rank,
        /// Generation on the report.
        generation: Generation,
        /// Generation currently being gathered.
        current: Generation,
    },
    /// A report arrived from a rank outside `0..P`.
    UnknownRank {
        /// The offending rank.
        rank: Rank,
    },
    /// Writing the snapshot to the sink failed.
    Io(io::Error),
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { rank } => {
                write!(f, "snapshot channel disconnected at rank {rank}")
            }
            Self::StaleReport {
                rank,
                generation,
                current,
            } => write!(
                f,
                "rank {rank} reported generation {generation} while gathering {current}"
            ),
            Self::UnknownRank { rank } => write!(f, "report from unknown rank {rank}"),
            Self::Io(e) => write!(f, "writing snapshot: {e}"),
        }
    }
}

impl Error for CollectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
