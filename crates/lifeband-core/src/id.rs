//! Strongly-typed identifiers for workers and generations.

use std::fmt;

use crate::cell::Cell;

/// Identifies one worker (and therefore one band) within a run.
///
/// Ranks are dense: a run with `P` workers uses ranks `0..P`. Rank 0 is
/// the coordinator that gathers snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl Rank {
    /// The coordinating rank.
    pub const COORDINATOR: Rank = Rank(0);

    /// Rank as a `usize` index into per-worker tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The cell value this worker writes into cells it makes alive.
    ///
    /// Always `rank + 1`, so a live cell is never confused with [`DEAD`](crate::DEAD).
    pub fn owner_tag(self) -> Cell {
        self.0 + 1
    }

    /// Whether this rank sends first under parity-ordered exchange.
    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }

    /// Whether this is the coordinating rank.
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing generation (timestep) counter.
///
/// Generation 0 is the seeded initial state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
