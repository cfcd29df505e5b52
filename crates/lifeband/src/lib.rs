//! lifeband: Conway's Game of Life split into row bands, one worker
//! thread per band.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all lifeband sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use lifeband::prelude::*;
//!
//! // A blinker on an 8x8 grid, split across two workers.
//! let sim = Simulation::new(SimConfig {
//!     grid_size: 8,
//!     workers: 2,
//!     generations: 3,
//!     initial: InitialState::Pattern {
//!         pattern: Pattern::Blinker,
//!         origin: (3, 2),
//!     },
//!     ..SimConfig::default()
//! })
//! .unwrap();
//!
//! let mut out = Vec::new();
//! let summary = sim.run(&mut out).unwrap();
//! assert_eq!(summary.final_grid.alive_cells(), vec![(2, 3), (3, 3), (4, 3)]);
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with("Complete Grid at time step 0:\n"));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `lifeband-core` | Ranks, generations, cells, edges, `Grid`, communication errors |
//! | [`space`] | `lifeband-space` | Row-band partitioner and ring neighbours |
//! | [`arena`] | `lifeband-arena` | Double-buffered halo-padded band storage |
//! | [`kernel`] | `lifeband-kernel` | Transition kernel and life-like rules |
//! | [`engine`] | `lifeband-engine` | Halo exchange, collector, workers, `Simulation` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and communication errors (`lifeband-core`).
pub use lifeband_core as types;

/// Row-band partitioning (`lifeband-space`).
///
/// [`space::Partition`] validates the decomposition and hands out a
/// [`space::BandLayout`] per rank.
pub use lifeband_space as space;

/// Band storage (`lifeband-arena`).
pub use lifeband_arena as arena;

/// Transition kernel and rules (`lifeband-kernel`).
pub use lifeband_kernel as kernel;

/// Workers, halo exchange and snapshot collection (`lifeband-engine`).
///
/// [`engine::Simulation`] is the entry point; the lower-level pieces
/// ([`engine::HaloExchanger`], [`engine::Coordinator`],
/// [`engine::Worker`]) are public for custom drivers.
pub use lifeband_engine as engine;

/// Common imports for typical lifeband usage.
pub mod prelude {
    // Core types
    pub use lifeband_core::{Cell, EdgeBehavior, Generation, Grid, Rank};

    // Errors
    pub use lifeband_core::{CollectError, ExchangeError};
    pub use lifeband_engine::{ConfigError, RunError};

    // Kernel
    pub use lifeband_kernel::Rule;

    // Engine
    pub use lifeband_engine::{
        ExchangeOrder, GridCollector, InitialState, Pattern, RunSummary, SimConfig, Simulation,
    };
}
