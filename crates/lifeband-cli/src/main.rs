//! `lifeband`: run a banded Game of Life and print every generation.
//!
//! # Examples
//!
//! ```bash
//! # 24x24 grid on 4 workers for 10 generations, random 50% start
//! lifeband
//!
//! # Glider on a 32x32 grid whose top and bottom rows wrap
//! lifeband -s 32 -p 4 -g 40 --pattern glider --wrap
//!
//! # HighLife rule, reproducible seed, debug logs on stderr
//! lifeband --rule B36/S23 --seed 7 -v
//! ```
//!
//! Snapshots go to stdout; logs go to stderr. Invalid parameters print a
//! diagnostic and exit successfully without starting any worker. A failure
//! while the workers run exits with a non-zero status.

use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use lifeband_core::EdgeBehavior;
use lifeband_engine::{ConfigError, ExchangeOrder, InitialState, Pattern, SimConfig, Simulation};
use lifeband_kernel::Rule;

/// Banded Game of Life with one worker thread per row band
#[derive(Parser, Debug)]
#[command(name = "lifeband")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Side length N of the square grid
    #[arg(short, long, default_value_t = 24, allow_negative_numbers = true)]
    size: i64,

    /// Number of workers P (1 to 4, must divide N)
    #[arg(short = 'p', long, default_value_t = 4)]
    workers: usize,

    /// Number of generations to print and compute
    #[arg(short, long, default_value_t = 10)]
    generations: u64,

    /// RNG seed for random starts (default: current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Probability that a cell starts alive
    #[arg(long, conflicts_with = "pattern")]
    density: Option<f64>,

    /// Start from a preset: block, blinker, toad, beacon, glider, r-pentomino
    #[arg(long)]
    pattern: Option<String>,

    /// Top-left corner of the pattern as ROW,COL (default: centred)
    #[arg(long, requires = "pattern", value_parser = parse_origin)]
    origin: Option<(usize, usize)>,

    /// Wrap the top and bottom rows into a ring
    #[arg(long)]
    wrap: bool,

    /// Use parity-ordered halo exchange instead of post-then-wait
    #[arg(long)]
    parity: bool,

    /// Life-like rule in B/S notation
    #[arg(long, default_value = "B3/S23")]
    rule: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log errors only
    #[arg(short, long)]
    quiet: bool,
}

fn parse_origin(s: &str) -> Result<(usize, usize), String> {
    let (r, c) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{s}'"))?;
    let r = r.trim().parse().map_err(|e| format!("bad row '{r}': {e}"))?;
    let c = c.trim().parse().map_err(|e| format!("bad column '{c}': {e}"))?;
    Ok((r, c))
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn build_config(cli: &Cli) -> Result<SimConfig, ConfigError> {
    let rule: Rule = cli.rule.parse()?;
    let initial = match (&cli.pattern, cli.density) {
        (Some(name), _) => {
            let pattern: Pattern = name.parse()?;
            let origin = cli.origin.unwrap_or_else(|| centred(pattern, cli.size));
            InitialState::Pattern { pattern, origin }
        }
        (None, Some(density)) => InitialState::Random { density },
        (None, None) => InitialState::default(),
    };
    Ok(SimConfig {
        grid_size: cli.size,
        workers: cli.workers,
        generations: cli.generations,
        row_edges: if cli.wrap {
            EdgeBehavior::Wrap
        } else {
            EdgeBehavior::Absorb
        },
        exchange_order: if cli.parity {
            ExchangeOrder::Parity
        } else {
            ExchangeOrder::PostThenWait
        },
        seed: cli.seed.unwrap_or_else(wall_clock_seed),
        initial,
        rule,
    })
}

fn centred(pattern: Pattern, size: i64) -> (usize, usize) {
    let n = usize::try_from(size).unwrap_or(0);
    let (h, w) = pattern.extent();
    (n.saturating_sub(h) / 2, n.saturating_sub(w) / 2)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let sim = match build_config(&cli).and_then(Simulation::new) {
        Ok(sim) => sim,
        Err(e) => {
            println!("{e}. Exiting.");
            return ExitCode::SUCCESS;
        }
    };
    info!(seed = sim.config().seed, "configuration accepted");

    let stdout = BufWriter::new(io::stdout());
    match sim.run(stdout) {
        Ok(summary) => {
            for (rank, m) in summary.workers.iter().enumerate() {
                debug!(
                    rank,
                    births = m.births,
                    deaths = m.deaths,
                    alive = m.final_alive,
                    mean_generation_us = m.mean_generation_us(),
                    "worker summary"
                );
            }
            info!(
                alive = summary.alive(),
                elapsed_ms = summary.elapsed.as_millis() as u64,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run aborted");
            eprintln!("lifeband: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lifeband").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_config_defaults() {
        let cfg = build_config(&parse(&["--seed", "3"])).unwrap();
        assert_eq!(
            cfg,
            SimConfig {
                seed: 3,
                ..SimConfig::default()
            }
        );
    }

    #[test]
    fn flags_map_to_config() {
        let cfg = build_config(&parse(&[
            "-s", "12", "-p", "3", "-g", "5", "--wrap", "--parity", "--rule", "b36/s23",
            "--density", "0.25", "--seed", "9",
        ]))
        .unwrap();
        assert_eq!(cfg.grid_size, 12);
        assert_eq!(cfg.workers, 3);
        assert_eq!(cfg.generations, 5);
        assert_eq!(cfg.row_edges, EdgeBehavior::Wrap);
        assert_eq!(cfg.exchange_order, ExchangeOrder::Parity);
        assert_eq!(cfg.rule, Rule::new(&[3, 6], &[2, 3]));
        assert_eq!(cfg.initial, InitialState::Random { density: 0.25 });
    }

    #[test]
    fn negative_size_reaches_validation() {
        let cfg = build_config(&parse(&["-s", "-8", "--seed", "1"])).unwrap();
        assert_eq!(
            Simulation::new(cfg).unwrap_err(),
            ConfigError::NonPositiveSize { size: -8 }
        );
    }

    #[test]
    fn pattern_is_centred_by_default() {
        let cfg = build_config(&parse(&["-s", "24", "--pattern", "glider"])).unwrap();
        assert_eq!(
            cfg.initial,
            InitialState::Pattern {
                pattern: Pattern::Glider,
                origin: (10, 10)
            }
        );
        let cfg = build_config(&parse(&["--pattern", "block", "--origin", "2,5"])).unwrap();
        assert_eq!(
            cfg.initial,
            InitialState::Pattern {
                pattern: Pattern::Block,
                origin: (2, 5)
            }
        );
    }

    #[test]
    fn bad_rule_and_pattern_are_config_errors() {
        assert!(matches!(
            build_config(&parse(&["--rule", "3/23"])),
            Err(ConfigError::InvalidRule(_))
        ));
        assert!(matches!(
            build_config(&parse(&["--pattern", "spaceship"])),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn density_conflicts_with_pattern() {
        let err = Cli::try_parse_from(["lifeband", "--pattern", "block", "--density", "0.3"]);
        assert!(err.is_err());
    }

    #[test]
    fn origin_parser() {
        assert_eq!(parse_origin("3, 4"), Ok((3, 4)));
        assert!(parse_origin("3").is_err());
        assert!(parse_origin("a,4").is_err());
    }
}
