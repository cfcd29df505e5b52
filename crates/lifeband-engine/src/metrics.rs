//! Per-generation worker metrics.
//!
//! [`GenerationMetrics`] captures timing and population data for one
//! worker and one generation. [`WorkerMetrics`] accumulates them over the
//! run and is returned in the [`RunSummary`](crate::RunSummary).

use lifeband_kernel::StepStats;

/// Timing and population metrics for one generation of one worker.
///
/// All durations are in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationMetrics {
    /// Time spent in the halo exchange, including waiting on neighbours.
    pub exchange_us: u64,
    /// Time spent reporting the band (and, on rank 0, printing).
    pub collect_us: u64,
    /// Time spent in the transition kernel and commit.
    pub compute_us: u64,
    /// Kernel population counts.
    pub stats: StepStats,
}

impl GenerationMetrics {
    /// Wall-clock total for the generation.
    pub fn total_us(&self) -> u64 {
        self.exchange_us + self.collect_us + self.compute_us
    }
}

/// Accumulated metrics for one worker over a whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerMetrics {
    /// Generations completed.
    pub generations: u64,
    /// Sum of exchange times, in microseconds.
    pub exchange_us: u64,
    /// Sum of collect times, in microseconds.
    pub collect_us: u64,
    /// Sum of compute times, in microseconds.
    pub compute_us: u64,
    /// Total cells born.
    pub births: u64,
    /// Total cells that died.
    pub deaths: u64,
    /// Live cells after seeding.
    pub initial_alive: usize,
    /// Live cells after the last generation.
    pub final_alive: usize,
    /// The most recent generation's metrics.
    pub last: GenerationMetrics,
}

impl WorkerMetrics {
    /// Fold one generation into the totals.
    pub fn record(&mut self, generation: GenerationMetrics) {
        self.generations += 1;
        self.exchange_us += generation.exchange_us;
        self.collect_us += generation.collect_us;
        self.compute_us += generation.compute_us;
        self.births += generation.stats.births as u64;
        self.deaths += generation.stats.deaths as u64;
        self.final_alive = generation.stats.alive;
        self.last = generation;
    }

    /// Mean wall-clock time per generation, in microseconds.
    pub fn mean_generation_us(&self) -> u64 {
        if self.generations == 0 {
            return 0;
        }
        (self.exchange_us + self.collect_us + self.compute_us) / self.generations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = WorkerMetrics::default();
        assert_eq!(m.generations, 0);
        assert_eq!(m.mean_generation_us(), 0);
        assert_eq!(m.last, GenerationMetrics::default());
    }

    #[test]
    fn record_accumulates() {
        let mut m = WorkerMetrics {
            initial_alive: 5,
            final_alive: 5,
            ..WorkerMetrics::default()
        };
        m.record(GenerationMetrics {
            exchange_us: 10,
            collect_us: 20,
            compute_us: 30,
            stats: StepStats {
                alive: 4,
                births: 1,
                deaths: 2,
            },
        });
        m.record(GenerationMetrics {
            exchange_us: 2,
            collect_us: 2,
            compute_us: 2,
            stats: StepStats {
                alive: 3,
                births: 0,
                deaths: 1,
            },
        });
        assert_eq!(m.generations, 2);
        assert_eq!(m.births, 1);
        assert_eq!(m.deaths, 3);
        assert_eq!(m.final_alive, 3);
        assert_eq!(m.initial_alive, 5);
        assert_eq!(m.mean_generation_us(), 33);
        assert_eq!(m.last.total_us(), 6);
    }
}
