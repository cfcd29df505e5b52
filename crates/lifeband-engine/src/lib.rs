//! Worker threads, halo exchange and snapshot collection for lifeband.
//!
//! A [`Simulation`] validates a [`SimConfig`], spawns one worker thread
//! per band and drives every worker through the same per-generation
//! cycle:
//!
//! 1. [`HaloExchanger`] refreshes the band's halo rows from its ring
//!    neighbours.
//! 2. The band's real rows are reported to the [`GridCollector`]; rank 0
//!    prints the assembled snapshot.
//! 3. The [`TransitionKernel`](lifeband_kernel::TransitionKernel) computes
//!    the next state into the band's `next` buffer.
//! 4. The band commits `next` into `current`.
//!
//! Workers share no mutable state. Halo rows and band reports travel over
//! `crossbeam-channel` links, and a worker that fails drops its links so
//! its peers fail too instead of blocking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collector;
pub mod config;
pub mod error;
pub mod halo;
pub mod metrics;
pub mod seed;
pub mod worker;
pub mod world;

pub use collector::{format_band, BandReport, Contributor, Coordinator, GridCollector};
pub use config::{ExchangeOrder, SimConfig};
pub use error::{ConfigError, RunError};
pub use halo::{build_links, HaloEndpoints, HaloExchanger, HaloOp, HaloRow};
pub use metrics::{GenerationMetrics, WorkerMetrics};
pub use seed::{InitialState, Pattern, PatternParseError};
pub use worker::{Worker, WorkerOutcome, WorkerPhase};
pub use world::{RunSummary, Simulation};
