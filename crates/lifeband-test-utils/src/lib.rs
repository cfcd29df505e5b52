//! Test utilities and fixtures for lifeband development.
//!
//! Provides a sequential reference stepper ([`reference_step`]) that the
//! distributed engine is checked against, helpers for building bands and
//! grids from literal rows, a cloneable in-memory [`CaptureSink`], and a
//! parser for the coordinator's snapshot text.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use lifeband_arena::BandStore;
use lifeband_core::{is_alive, Cell, EdgeBehavior, Grid, DEAD};

pub use fixtures::{grid_with_cells, PatternFixture};

/// Build a band whose real cells are exactly `rows`.
///
/// Halo rows start zeroed.
///
/// # Panics
///
/// Panics if `rows` is empty or ragged.
pub fn band_from_rows(rows: &[&[Cell]]) -> BandStore {
    assert!(!rows.is_empty(), "band needs at least one row");
    let cols = rows[0].len();
    let mut band = BandStore::new(rows.len(), cols);
    for (r, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), cols, "ragged row {r}");
        for (c, &v) in row.iter().enumerate() {
            band.set(r + 1, c + 1, v).unwrap();
        }
    }
    band
}

/// One Conway (B3/S23) generation of `grid`, computed sequentially.
///
/// Columns never wrap. Rows wrap only under [`EdgeBehavior::Wrap`]. Cells
/// that are alive afterwards are tagged `owner`, so compare distributed
/// results with [`Grid::same_liveness`] when tags differ per band.
pub fn reference_step(grid: &Grid, edge: EdgeBehavior, owner: Cell) -> Grid {
    let rows = grid.rows();
    let cols = grid.cols();
    let mut out = Grid::new(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            let mut n = 0;
            for dr in [-1i64, 0, 1] {
                let nr = r as i64 + dr;
                let nr = if (0..rows as i64).contains(&nr) {
                    nr as usize
                } else if edge.wraps() {
                    nr.rem_euclid(rows as i64) as usize
                } else {
                    continue;
                };
                for dc in [-1i64, 0, 1] {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let nc = c as i64 + dc;
                    if nc < 0 || nc >= cols as i64 {
                        continue;
                    }
                    if grid.get(nr, nc as usize).is_some_and(is_alive) {
                        n += 1;
                    }
                }
            }
            let alive = grid.get(r, c).is_some_and(is_alive);
            let next = matches!((alive, n), (true, 2) | (true, 3) | (false, 3));
            out.set(r, c, if next { owner } else { DEAD });
        }
    }
    out
}

/// Run [`reference_step`] `generations` times.
///
/// Returns every state from the initial one up to and including the
/// final one (`generations + 1` grids).
pub fn reference_history(grid: &Grid, edge: EdgeBehavior, generations: u64) -> Vec<Grid> {
    let mut states = Vec::with_capacity(generations as usize + 1);
    states.push(grid.clone());
    let mut current = grid.clone();
    for _ in 0..generations {
        current = reference_step(&current, edge, 1);
        states.push(current.clone());
    }
    states
}

/// An in-memory `Write` sink that can be cloned into a worker thread and
/// inspected afterwards.
#[derive(Clone, Debug, Default)]
pub struct CaptureSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl Write for CaptureSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A `Write` sink that fails every write, for exercising I/O error paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrokenSink;

impl Write for BrokenSink {
    fn write(&mut self, _data: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

const HEADER_PREFIX: &str = "Complete Grid at time step ";

/// Parse coordinator output into `(generation, grid)` pairs.
///
/// Each block is a `Complete Grid at time step <t>:` header, one line per
/// row of space-separated cell values, and a blank line.
///
/// # Panics
///
/// Panics on malformed text.
pub fn parse_snapshots(text: &str) -> Vec<(u64, Grid)> {
    let mut out = Vec::new();
    let mut lines = text.lines().peekable();
    while let Some(line) = lines.next() {
        if line.is_empty() {
            continue;
        }
        let t: u64 = line
            .strip_prefix(HEADER_PREFIX)
            .and_then(|rest| rest.strip_suffix(':'))
            .unwrap_or_else(|| panic!("expected snapshot header, got {line:?}"))
            .parse()
            .unwrap_or_else(|e| panic!("bad generation in {line:?}: {e}"));

        let mut cells = Vec::new();
        let mut rows = 0;
        let mut cols = None;
        while let Some(row) = lines.next_if(|l| !l.is_empty()) {
            let values: Vec<Cell> = row
                .split_whitespace()
                .map(|v| v.parse().unwrap_or_else(|e| panic!("bad cell {v:?}: {e}")))
                .collect();
            match cols {
                None => cols = Some(values.len()),
                Some(c) => assert_eq!(c, values.len(), "ragged row in snapshot {t}"),
            }
            cells.extend(values);
            rows += 1;
        }
        let grid = Grid::from_cells(rows, cols.unwrap_or(0), cells)
            .unwrap_or_else(|| panic!("snapshot {t} has inconsistent size"));
        out.push((t, grid));
    }
    out
}
