//! Row-band partitioner and ring topology.

use lifeband_core::{EdgeBehavior, HaloSide, Rank};

use crate::error::PartitionError;

/// Largest number of workers a run may use.
pub const MAX_WORKERS: usize = 4;

/// Ring predecessor and successor of a worker.
///
/// Computed with modular arithmetic on the rank: `prev = (rank + P - 1) % P`
/// and `next = (rank + 1) % P`. With a single worker both are the worker
/// itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingNeighbours {
    /// Worker whose bottom row fills this worker's top halo.
    pub prev: Rank,
    /// Worker whose top row fills this worker's bottom halo.
    pub next: Rank,
}

impl RingNeighbours {
    fn of(rank: u32, workers: u32) -> Self {
        Self {
            prev: Rank((rank + workers - 1) % workers),
            next: Rank((rank + 1) % workers),
        }
    }
}

/// Everything one worker needs to know about its band.
///
/// # Examples
///
/// ```
/// use lifeband_core::Rank;
/// use lifeband_space::Partition;
///
/// let p = Partition::new(24, 24, 4).unwrap();
/// let band = p.layout(Rank(1)).unwrap();
/// assert_eq!(band.band_rows(), 6);
/// assert_eq!(band.first_row(), 6);
/// assert_eq!(band.padded_shape(), (8, 26));
/// assert_eq!(band.neighbours().prev, Rank(0));
/// assert_eq!(band.neighbours().next, Rank(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandLayout {
    rank: Rank,
    workers: usize,
    band_rows: usize,
    cols: usize,
    neighbours: RingNeighbours,
}

impl BandLayout {
    /// Rank owning this band.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Total number of workers in the run.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of real rows in the band (`R / P`).
    pub fn band_rows(&self) -> usize {
        self.band_rows
    }

    /// Number of real columns (`C`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Global index of the band's topmost real row.
    pub fn first_row(&self) -> usize {
        self.rank.index() * self.band_rows
    }

    /// Half-open range of global rows owned by this band.
    pub fn global_rows(&self) -> std::ops::Range<usize> {
        let first = self.first_row();
        first..first + self.band_rows
    }

    /// Buffer shape including halo rows and padding columns:
    /// `(R/P + 2, C + 2)`.
    pub fn padded_shape(&self) -> (usize, usize) {
        (self.band_rows + 2, self.cols + 2)
    }

    /// Number of real cells owned by the band.
    pub fn real_cells(&self) -> usize {
        self.band_rows * self.cols
    }

    /// Ring predecessor and successor.
    pub fn neighbours(&self) -> RingNeighbours {
        self.neighbours
    }

    /// Whether this band holds the global grid's top row.
    pub fn is_first(&self) -> bool {
        self.rank.index() == 0
    }

    /// Whether this band holds the global grid's bottom row.
    pub fn is_last(&self) -> bool {
        self.rank.index() + 1 == self.workers
    }

    /// Whether `side` faces the outside of the global grid.
    pub fn is_global_edge(&self, side: HaloSide) -> bool {
        match side {
            HaloSide::Top => self.is_first(),
            HaloSide::Bottom => self.is_last(),
        }
    }

    /// The worker that fills the `side` halo row, if that link is live.
    ///
    /// Every interior side has a partner. The two global extremes only
    /// have one when rows wrap.
    pub fn halo_partner(&self, side: HaloSide, rows: EdgeBehavior) -> Option<Rank> {
        if self.is_global_edge(side) && !rows.wraps() {
            return None;
        }
        Some(match side {
            HaloSide::Top => self.neighbours.prev,
            HaloSide::Bottom => self.neighbours.next,
        })
    }

    /// Convert a global row into this band's local row index (1-based,
    /// halo rows excluded). Returns `None` if the row is not owned here.
    pub fn local_row(&self, global_row: usize) -> Option<usize> {
        if self.global_rows().contains(&global_row) {
            Some(global_row - self.first_row() + 1)
        } else {
            None
        }
    }
}

/// A validated split of the grid into equal row bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    rows: usize,
    cols: usize,
    workers: usize,
}

impl Partition {
    /// Validate the decomposition of an `rows × cols` grid across
    /// `workers` workers.
    ///
    /// Checks, in order: non-empty grid, at least one worker, rows divide
    /// evenly, at most [`MAX_WORKERS`] workers.
    pub fn new(rows: usize, cols: usize, workers: usize) -> Result<Self, PartitionError> {
        if rows == 0 || cols == 0 {
            return Err(PartitionError::EmptyGrid { rows, cols });
        }
        if workers == 0 {
            return Err(PartitionError::NoWorkers);
        }
        if rows % workers != 0 {
            return Err(PartitionError::UnevenRows { rows, workers });
        }
        if workers > MAX_WORKERS {
            return Err(PartitionError::TooManyWorkers {
                workers,
                max: MAX_WORKERS,
            });
        }
        Ok(Self {
            rows,
            cols,
            workers,
        })
    }

    /// Global row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Global column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Rows per band.
    pub fn band_rows(&self) -> usize {
        self.rows / self.workers
    }

    /// Layout for `rank`, or `None` if the rank is not part of the run.
    pub fn layout(&self, rank: Rank) -> Option<BandLayout> {
        if rank.index() >= self.workers {
            return None;
        }
        Some(BandLayout {
            rank,
            workers: self.workers,
            band_rows: self.band_rows(),
            cols: self.cols,
            neighbours: RingNeighbours::of(rank.0, self.workers as u32),
        })
    }

    /// Layouts for every rank, in rank order.
    pub fn layouts(&self) -> impl Iterator<Item = BandLayout> + '_ {
        (0..self.workers as u32).filter_map(move |r| self.layout(Rank(r)))
    }

    /// Rank owning `global_row`, or `None` if out of range.
    pub fn owner_of_row(&self, global_row: usize) -> Option<Rank> {
        if global_row < self.rows {
            Some(Rank((global_row / self.band_rows()) as u32))
        } else {
            None
        }
    }
}
