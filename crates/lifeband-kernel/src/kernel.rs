//! Neighbour counting and rule application over one band.
//!
//! Edge handling:
//! - Columns never wrap. Contributions from beyond the leftmost or
//!   rightmost real column are skipped for every band.
//! - Halo rows count only where [`RowEdges`] says so. Interior halos
//!   always count; the outward halo of the first and last band counts
//!   only when rows wrap.

use lifeband_arena::{BandStore, CurrentFrame};
use lifeband_core::{is_alive, Cell, EdgeBehavior, HaloSide, DEAD};
use lifeband_space::BandLayout;

use crate::rule::Rule;

/// Which halo rows contribute to neighbour counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowEdges {
    /// Count row 0 when evaluating the topmost real row.
    pub top_halo: bool,
    /// Count row `band_rows + 1` when evaluating the bottommost real row.
    pub bottom_halo: bool,
}

impl RowEdges {
    /// Both halos count (interior band, or any band when rows wrap).
    pub const BOTH: RowEdges = RowEdges {
        top_halo: true,
        bottom_halo: true,
    };

    /// Neither halo counts (a lone bounded band).
    pub const NONE: RowEdges = RowEdges {
        top_halo: false,
        bottom_halo: false,
    };

    /// Derive the halo usage for `layout` under the given row topology.
    ///
    /// A halo counts exactly when the exchanger fills it.
    pub fn for_band(layout: &BandLayout, rows: EdgeBehavior) -> Self {
        Self {
            top_halo: layout.halo_partner(HaloSide::Top, rows).is_some(),
            bottom_halo: layout.halo_partner(HaloSide::Bottom, rows).is_some(),
        }
    }
}

/// Outcome of one [`TransitionKernel::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Live real cells after the step.
    pub alive: usize,
    /// Dead cells that became alive.
    pub births: usize,
    /// Live cells that died.
    pub deaths: usize,
}

/// Applies a [`Rule`] to every real cell of a band.
///
/// Stateless apart from its configuration; one instance per worker.
#[derive(Clone, Copy, Debug)]
pub struct TransitionKernel {
    rule: Rule,
    owner: Cell,
    edges: RowEdges,
}

impl TransitionKernel {
    /// Create a kernel that tags live cells with `owner` and counts the
    /// halo rows selected by `edges`.
    pub fn new(rule: Rule, owner: Cell, edges: RowEdges) -> Self {
        Self { rule, owner, edges }
    }

    /// Live neighbours of real cell `(row, col)` (padded coordinates).
    pub(crate) fn live_neighbours(
        &self,
        frame: &CurrentFrame<'_>,
        band_rows: usize,
        cols: usize,
        row: usize,
        col: usize,
    ) -> u8 {
        debug_assert!((1..=band_rows).contains(&row), "row {row} is not real");
        debug_assert!((1..=cols).contains(&col), "col {col} is not real");
        let mut count = 0u8;
        for nr in row - 1..=row + 1 {
            if nr == 0 && !self.edges.top_halo {
                continue;
            }
            if nr == band_rows + 1 && !self.edges.bottom_halo {
                continue;
            }
            for nc in col - 1..=col + 1 {
                if nr == row && nc == col {
                    continue;
                }
                if nc == 0 || nc == cols + 1 {
                    continue;
                }
                if is_alive(frame.get(nr, nc)) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Compute `next` from `current` for every real cell.
    ///
    /// Only `next` is written; `current` (halos included) is read-only.
    pub fn step(&self, band: &mut BandStore) -> StepStats {
        let band_rows = band.band_rows();
        let cols = band.cols();
        let (current, mut next) = band.frames();
        let mut stats = StepStats::default();

        for row in 1..=band_rows {
            for col in 1..=cols {
                let alive = is_alive(current.get(row, col));
                let n = self.live_neighbours(&current, band_rows, cols, row, col);
                let next_alive = self.rule.next_alive(alive, n);
                next.set(row, col, if next_alive { self.owner } else { DEAD });
                match (alive, next_alive) {
                    (false, true) => stats.births += 1,
                    (true, false) => stats.deaths += 1,
                    _ => {}
                }
                if next_alive {
                    stats.alive += 1;
                }
            }
        }
        stats
    }
}
