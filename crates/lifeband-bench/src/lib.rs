//! Benchmark profiles for lifeband.
//!
//! - [`reference_profile`]: the default 24x24 grid on 4 workers.
//! - [`stress_profile`]: a 480x480 grid (~230K cells) on 4 workers.
//! - [`seeded_band`]: a randomly populated band for kernel and exchange
//!   micro-benchmarks.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lifeband_arena::{BandError, BandStore};
use lifeband_core::{EdgeBehavior, Rank};
use lifeband_engine::{InitialState, SimConfig};
use lifeband_space::{Partition, PartitionError};

/// The default run: 24x24, 4 workers, 10 generations, 50% random.
pub fn reference_profile(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        ..SimConfig::default()
    }
}

/// A large run: 480x480, 4 workers, 20 generations, wrapping rows.
///
/// Large enough that kernel time dominates the per-generation exchange.
pub fn stress_profile(seed: u64) -> SimConfig {
    SimConfig {
        grid_size: 480,
        workers: 4,
        generations: 20,
        row_edges: EdgeBehavior::Wrap,
        seed,
        initial: InitialState::Random { density: 0.35 },
        ..SimConfig::default()
    }
}

/// Errors building a benchmark band.
#[derive(Debug)]
pub enum ProfileError {
    /// The requested shape is not a valid single-worker partition.
    Partition(PartitionError),
    /// Seeding failed.
    Band(BandError),
}

/// A `band_rows × cols` band seeded at 50% density as rank 0 of a
/// single-worker run.
pub fn seeded_band(band_rows: usize, cols: usize, seed: u64) -> Result<BandStore, ProfileError> {
    let partition = Partition::new(band_rows, cols, 1).map_err(ProfileError::Partition)?;
    let layout = partition
        .layout(Rank(0))
        .ok_or(ProfileError::Partition(PartitionError::NoWorkers))?;
    let mut band = BandStore::new(band_rows, cols);
    InitialState::default()
        .seed_band(&mut band, &layout, seed)
        .map_err(ProfileError::Band)?;
    Ok(band)
}
