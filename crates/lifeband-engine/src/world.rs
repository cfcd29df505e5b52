//! Run orchestration: spawn one worker per band, join them and stitch
//! the final grid together.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use tracing::{error, info, warn};

use lifeband_core::Grid;
use lifeband_kernel::{RowEdges, TransitionKernel};
use lifeband_space::Partition;

use crate::collector::{Contributor, Coordinator, GridCollector};
use crate::config::SimConfig;
use crate::error::{ConfigError, RunError};
use crate::halo::{build_links, HaloExchanger};
use crate::metrics::WorkerMetrics;
use crate::seed::InitialState;
use crate::worker::{Worker, WorkerOutcome};

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// The grid after the last generation.
    pub final_grid: Grid,
    /// Generations computed.
    pub generations: u64,
    /// Per-worker metrics, indexed by rank.
    pub workers: Vec<WorkerMetrics>,
    /// Wall-clock time from spawning the first worker to joining the last.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Live cells in the final grid.
    pub fn alive(&self) -> usize {
        self.final_grid.alive_count()
    }
}

/// A validated run, ready to start.
///
/// # Examples
///
/// ```
/// use lifeband_engine::{InitialState, Pattern, SimConfig, Simulation};
///
/// let sim = Simulation::new(SimConfig {
///     grid_size: 8,
///     workers: 2,
///     generations: 4,
///     initial: InitialState::Pattern { pattern: Pattern::Block, origin: (3, 3) },
///     ..SimConfig::default()
/// })
/// .unwrap();
/// let summary = sim.run(std::io::sink()).unwrap();
/// assert_eq!(summary.alive(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    partition: Partition,
}

impl Simulation {
    /// Validate `config`.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let partition = config.validate()?;
        Ok(Self { config, partition })
    }

    /// The configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The band decomposition.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Run every generation, writing one snapshot per generation to `sink`.
    ///
    /// Snapshots show generations `0..generations`, each taken before that
    /// generation's transition; the state after the last transition is
    /// returned in [`RunSummary::final_grid`].
    pub fn run<W: Write + Send>(&self, sink: W) -> Result<RunSummary, RunError> {
        let cfg = &self.config;
        let workers = self.partition.workers();
        info!(
            size = cfg.grid_size,
            workers,
            generations = cfg.generations,
            rows = ?cfg.row_edges,
            order = ?cfg.exchange_order,
            rule = %cfg.rule,
            seed = cfg.seed,
            "starting run"
        );

        let started = Instant::now();
        let results = self.spawn_and_join(sink);
        let elapsed = started.elapsed();

        let outcomes = pick_first_error(results)?;
        let mut final_grid = Grid::new(self.partition.rows(), self.partition.cols());
        let mut metrics = Vec::with_capacity(workers);
        for outcome in outcomes {
            let pasted = final_grid.paste_rows(outcome.first_row, &outcome.cells);
            debug_assert!(pasted, "band {} does not fit the grid", outcome.rank);
            metrics.push(outcome.metrics);
        }

        let summary = RunSummary {
            final_grid,
            generations: cfg.generations,
            workers: metrics,
            elapsed,
        };
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            alive = summary.alive(),
            "run finished"
        );
        Ok(summary)
    }

    fn spawn_and_join<W: Write + Send>(&self, sink: W) -> Vec<Result<WorkerOutcome, RunError>> {
        let cfg = &self.config;
        let workers = self.partition.workers();
        let (report_tx, report_rx) = unbounded();
        let mut coordinator = Some(Coordinator::new(workers, report_rx, sink));

        thread::scope(|s| {
            let mut handles = Vec::with_capacity(workers);
            let mut spawn_failure = None;
            let mut bands = self
                .partition
                .layouts()
                .zip(build_links(&self.partition, cfg.row_edges));

            for (layout, links) in bands.by_ref() {
                let rank = layout.rank();
                let exchanger = HaloExchanger::new(links, cfg.exchange_order);
                let kernel = TransitionKernel::new(
                    cfg.rule,
                    rank.owner_tag(),
                    RowEdges::for_band(&layout, cfg.row_edges),
                );
                let builder = thread::Builder::new().name(format!("lifeband-worker-{rank}"));
                let spawned = match coordinator.take() {
                    Some(collector) => {
                        debug_assert!(rank.is_coordinator());
                        let worker = Worker::new(layout, exchanger, kernel, collector);
                        builder.spawn_scoped(s, move || {
                            drive(worker, &cfg.initial, cfg.seed, cfg.generations)
                        })
                    }
                    None => {
                        let collector = Contributor::new(rank, report_tx.clone());
                        let worker = Worker::new(layout, exchanger, kernel, collector);
                        builder.spawn_scoped(s, move || {
                            drive(worker, &cfg.initial, cfg.seed, cfg.generations)
                        })
                    }
                };
                match spawned {
                    Ok(handle) => handles.push((rank, handle)),
                    Err(e) => {
                        error!(rank = %rank, error = %e, "failed to spawn worker");
                        spawn_failure = Some(RunError::ThreadSpawnFailed {
                            rank,
                            reason: e.to_string(),
                        });
                        break;
                    }
                }
            }
            // Unspawned endpoints and the spare report sender must go before
            // joining, or running workers would wait on them forever.
            drop(bands);
            drop(report_tx);

            let mut results: Vec<_> = handles
                .into_iter()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(RunError::WorkerPanicked { rank }))
                })
                .collect();
            if let Some(e) = spawn_failure {
                results.insert(0, Err(e));
            }
            results
        })
    }
}

/// Seed and run one worker, logging how it ended.
fn drive<C: GridCollector>(
    mut worker: Worker<C>,
    initial: &InitialState,
    seed: u64,
    generations: u64,
) -> Result<WorkerOutcome, RunError> {
    let rank = worker.rank();
    let result = worker
        .seed(initial, seed)
        .map_err(RunError::from)
        .and_then(|_| worker.run(generations));
    if let Err(e) = &result {
        if e.is_disconnect() {
            warn!(rank = %rank, error = %e, "worker stopped after a peer failed");
        } else {
            error!(rank = %rank, error = %e, "worker failed");
        }
    }
    result
}

/// Keep outcomes in rank order, or return the most telling error.
///
/// Disconnections are consequences of some other failure, so a
/// non-disconnect error is preferred when one exists.
fn pick_first_error(
    results: Vec<Result<WorkerOutcome, RunError>>,
) -> Result<Vec<WorkerOutcome>, RunError> {
    let mut outcomes = Vec::with_capacity(results.len());
    let mut first: Option<RunError> = None;
    for result in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                let replace = match &first {
                    None => true,
                    Some(prev) => prev.is_disconnect() && !e.is_disconnect(),
                };
                if replace {
                    first = Some(e);
                }
            }
        }
    }
    match first {
        Some(e) => Err(e),
        None => Ok(outcomes),
    }
}
