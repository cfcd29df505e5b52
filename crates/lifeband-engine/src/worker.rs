//! One worker: a band plus the machinery that advances it.
//!
//! Each generation walks the same phases:
//!
//! ```text
//! Idle → ExchangingHalos → Reporting → ComputingNext → Swapping → Idle
//! ```
//!
//! and after the last generation the worker moves to `Done`. Any error
//! returns immediately; dropping the worker drops its halo links and its
//! collector channel, which unblocks every peer waiting on it.

use std::fmt;
use std::time::Instant;

use tracing::{debug, info_span, trace};

use lifeband_arena::{BandError, BandStore};
use lifeband_core::{Cell, Generation, Rank};
use lifeband_kernel::TransitionKernel;
use lifeband_space::BandLayout;

use crate::collector::{format_band, GridCollector};
use crate::error::RunError;
use crate::halo::HaloExchanger;
use crate::metrics::{GenerationMetrics, WorkerMetrics};
use crate::seed::InitialState;

/// Where a worker is within its generation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Between generations.
    Idle,
    /// Sending boundary rows and waiting for halo rows.
    ExchangingHalos,
    /// Handing the band text to the collector.
    Reporting,
    /// Running the transition kernel into `next`.
    ComputingNext,
    /// Committing `next` into `current`.
    Swapping,
    /// All generations finished.
    Done,
}

impl WorkerPhase {
    /// Whether `self → next` is a legal transition.
    pub fn can_advance_to(self, next: WorkerPhase) -> bool {
        use WorkerPhase::*;
        matches!(
            (self, next),
            (Idle, ExchangingHalos)
                | (ExchangingHalos, Reporting)
                | (Reporting, ComputingNext)
                | (ComputingNext, Swapping)
                | (Swapping, Idle)
                | (Idle, Done)
        )
    }
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ExchangingHalos => "exchanging-halos",
            Self::Reporting => "reporting",
            Self::ComputingNext => "computing-next",
            Self::Swapping => "swapping",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a worker hands back when it finishes.
#[derive(Clone, Debug)]
pub struct WorkerOutcome {
    /// The worker's rank.
    pub rank: Rank,
    /// Global row of the band's first real row.
    pub first_row: usize,
    /// Final real cells, row-major.
    pub cells: Vec<Cell>,
    /// Accumulated metrics.
    pub metrics: WorkerMetrics,
}

/// A band and everything needed to advance it.
pub struct Worker<C: GridCollector> {
    layout: BandLayout,
    band: BandStore,
    exchanger: HaloExchanger,
    kernel: TransitionKernel,
    collector: C,
    phase: WorkerPhase,
    generation: Generation,
    metrics: WorkerMetrics,
}

impl<C: GridCollector> Worker<C> {
    /// Allocate the band for `layout`. The band starts all dead.
    pub fn new(
        layout: BandLayout,
        exchanger: HaloExchanger,
        kernel: TransitionKernel,
        collector: C,
    ) -> Self {
        debug_assert_eq!(layout.rank(), exchanger.rank());
        Self {
            band: BandStore::new(layout.band_rows(), layout.cols()),
            layout,
            exchanger,
            kernel,
            collector,
            phase: WorkerPhase::Idle,
            generation: Generation::default(),
            metrics: WorkerMetrics::default(),
        }
    }

    /// Populate the band's real cells. Returns the number of live cells.
    pub fn seed(&mut self, initial: &InitialState, seed: u64) -> Result<usize, BandError> {
        let placed = initial.seed_band(&mut self.band, &self.layout, seed)?;
        self.metrics.initial_alive = placed;
        self.metrics.final_alive = placed;
        Ok(placed)
    }

    /// The worker's rank.
    pub fn rank(&self) -> Rank {
        self.layout.rank()
    }

    /// The band.
    pub fn band(&self) -> &BandStore {
        &self.band
    }

    /// Current phase.
    pub fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Generation held in `current`.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Metrics accumulated so far.
    pub fn metrics(&self) -> &WorkerMetrics {
        &self.metrics
    }

    fn advance(&mut self, next: WorkerPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal phase transition {} -> {}",
            self.phase,
            next
        );
        trace!(from = %self.phase, to = %next, generation = %self.generation, "phase");
        self.phase = next;
    }

    /// Run one full generation cycle.
    pub fn step(&mut self) -> Result<GenerationMetrics, RunError> {
        let generation = self.generation;

        self.advance(WorkerPhase::ExchangingHalos);
        let start = Instant::now();
        self.exchanger.exchange(&mut self.band, generation)?;
        let exchange_us = start.elapsed().as_micros() as u64;
        trace!(%generation, band = %self.band.render_with_halos(), "halos refreshed");

        self.advance(WorkerPhase::Reporting);
        let start = Instant::now();
        self.collector.collect(generation, format_band(&self.band))?;
        let collect_us = start.elapsed().as_micros() as u64;

        self.advance(WorkerPhase::ComputingNext);
        let start = Instant::now();
        let stats = self.kernel.step(&mut self.band);

        self.advance(WorkerPhase::Swapping);
        self.band.commit();
        let compute_us = start.elapsed().as_micros() as u64;

        self.generation = generation.next();
        self.advance(WorkerPhase::Idle);

        let metrics = GenerationMetrics {
            exchange_us,
            collect_us,
            compute_us,
            stats,
        };
        self.metrics.record(metrics);
        debug!(
            %generation,
            exchange_us,
            collect_us,
            compute_us,
            alive = stats.alive,
            births = stats.births,
            deaths = stats.deaths,
            "generation complete"
        );
        Ok(metrics)
    }

    /// Run `generations` cycles, then finish the collector and hand back
    /// the final band.
    pub fn run(mut self, generations: u64) -> Result<WorkerOutcome, RunError> {
        let span = info_span!("worker", rank = %self.rank());
        let _enter = span.enter();

        for _ in 0..generations {
            self.step()?;
        }
        self.collector.finish()?;
        self.advance(WorkerPhase::Done);
        debug!(alive = self.metrics.final_alive, "worker done");

        Ok(WorkerOutcome {
            rank: self.rank(),
            first_row: self.layout.first_row(),
            cells: self.band.real_cells(),
            metrics: self.metrics,
        })
    }
}
