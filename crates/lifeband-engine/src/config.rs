//! Run configuration and validation.
//!
//! [`SimConfig`] is the single input to [`Simulation::new`](crate::Simulation::new).
//! [`validate()`](SimConfig::validate) checks every startup invariant and
//! returns the [`Partition`] the workers will use.

use lifeband_core::EdgeBehavior;
use lifeband_kernel::Rule;
use lifeband_space::Partition;

use crate::error::ConfigError;
use crate::seed::InitialState;

// ── ExchangeOrder ──────────────────────────────────────────────────

/// Order of the four halo operations within one exchange.
///
/// Both orders are deadlock-free for every worker count because each
/// directed link buffers one row, so a send never waits for the peer to
/// be inside the matching receive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExchangeOrder {
    /// Post both sends, then wait on both receives.
    #[default]
    PostThenWait,
    /// Even ranks send before receiving on each side, odd ranks receive
    /// before sending.
    Parity,
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Side length `N` of the square grid. Default: 24.
    pub grid_size: i64,
    /// Number of workers `P`. Default: 4. Must divide `N` and be at most 4.
    pub workers: usize,
    /// Number of generations to run. Default: 10.
    pub generations: u64,
    /// Row topology at the top and bottom of the grid. Default: bounded.
    pub row_edges: EdgeBehavior,
    /// Halo operation order. Default: post-then-wait.
    pub exchange_order: ExchangeOrder,
    /// RNG seed for random seeding. Default: 0.
    pub seed: u64,
    /// Initial band contents. Default: 50% random.
    pub initial: InitialState,
    /// Transition rule. Default: B3/S23.
    pub rule: Rule,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 24,
            workers: 4,
            generations: 10,
            row_edges: EdgeBehavior::Absorb,
            exchange_order: ExchangeOrder::PostThenWait,
            seed: 0,
            initial: InitialState::default(),
            rule: Rule::CONWAY,
        }
    }
}

impl SimConfig {
    /// Validate all startup invariants.
    ///
    /// Checks, in order: positive grid size, non-empty worker set, rows
    /// divisible by workers, at most four workers, then the initial
    /// state against the grid.
    pub fn validate(&self) -> Result<Partition, ConfigError> {
        let size = self.size()?;
        let partition = Partition::new(size, size, self.workers)?;
        self.initial.validate(size)?;
        Ok(partition)
    }

    /// The grid side as a `usize`.
    pub fn size(&self) -> Result<usize, ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::NonPositiveSize {
                size: self.grid_size,
            });
        }
        usize::try_from(self.grid_size).map_err(|_| ConfigError::NonPositiveSize {
            size: self.grid_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeband_space::PartitionError;

    use crate::seed::Pattern;

    #[test]
    fn defaults_validate() {
        let cfg = SimConfig::default();
        let p = cfg.validate().unwrap();
        assert_eq!(p.rows(), 24);
        assert_eq!(p.workers(), 4);
        assert_eq!(p.band_rows(), 6);
    }

    #[test]
    fn zero_and_negative_sizes_rejected() {
        for size in [0, -1, i64::MIN] {
            let cfg = SimConfig {
                grid_size: size,
                ..SimConfig::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveSize { size }));
        }
    }

    #[test]
    fn uneven_size_rejected() {
        let cfg = SimConfig {
            grid_size: 10,
            workers: 4,
            ..SimConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Partition(PartitionError::UnevenRows {
                rows: 10,
                workers: 4
            }))
        );
    }

    #[test]
    fn too_many_workers_rejected() {
        let cfg = SimConfig {
            grid_size: 10,
            workers: 5,
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Partition(PartitionError::TooManyWorkers { .. }))
        ));
    }

    #[test]
    fn size_checked_before_partition() {
        let cfg = SimConfig {
            grid_size: 0,
            workers: 0,
            ..SimConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveSize { size: 0 }));
    }

    #[test]
    fn initial_state_checked_last() {
        let cfg = SimConfig {
            grid_size: 4,
            workers: 1,
            initial: InitialState::Pattern {
                pattern: Pattern::Glider,
                origin: (2, 2),
            },
            ..SimConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::PatternOutOfBounds { size: 4, .. })
        ));
    }
}
