//! Initial band contents.
//!
//! Every worker seeds only its own band. Global coordinates are mapped to
//! the band's local rows through its [`BandLayout`], so a pattern that
//! straddles a band boundary is split across the owning workers.

use std::fmt;
use std::str::FromStr;

use lifeband_arena::{BandError, BandStore};
use lifeband_core::is_alive;
use lifeband_space::BandLayout;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::ConfigError;

/// Well-known starting patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// 2x2 still life.
    Block,
    /// Period-2 oscillator, horizontal phase.
    Blinker,
    /// Period-2 oscillator.
    Toad,
    /// Period-2 oscillator made of two diagonal blocks.
    Beacon,
    /// Moves one cell diagonally down-right every four generations.
    Glider,
    /// Methuselah that stabilises after 1103 generations on an unbounded grid.
    RPentomino,
}

impl Pattern {
    /// Every preset, in display order.
    pub const ALL: [Pattern; 6] = [
        Pattern::Block,
        Pattern::Blinker,
        Pattern::Toad,
        Pattern::Beacon,
        Pattern::Glider,
        Pattern::RPentomino,
    ];

    /// Live cells relative to the pattern's top-left corner.
    pub fn offsets(self) -> &'static [(usize, usize)] {
        match self {
            Self::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Self::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Self::Toad => &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
            Self::Beacon => &[
                (0, 0),
                (0, 1),
                (1, 0),
                (1, 1),
                (2, 2),
                (2, 3),
                (3, 2),
                (3, 3),
            ],
            Self::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
            Self::RPentomino => &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
        }
    }

    /// Bounding box `(rows, cols)`.
    pub fn extent(self) -> (usize, usize) {
        self.offsets()
            .iter()
            .fold((0, 0), |(h, w), &(r, c)| (h.max(r + 1), w.max(c + 1)))
    }

    /// Lower-case name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Blinker => "blinker",
            Self::Toad => "toad",
            Self::Beacon => "beacon",
            Self::Glider => "glider",
            Self::RPentomino => "r-pentomino",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a pattern name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternParseError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for PatternParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pattern '{}', expected one of:", self.input)?;
        for p in Pattern::ALL {
            write!(f, " {p}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PatternParseError {}

impl FromStr for Pattern {
    type Err = PatternParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        if key == "rpentomino" {
            return Ok(Self::RPentomino);
        }
        Pattern::ALL
            .into_iter()
            .find(|p| p.name() == key)
            .ok_or_else(|| PatternParseError {
                input: s.to_string(),
            })
    }
}

/// How each band's real cells start out.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialState {
    /// Each real cell is alive with probability `density`.
    Random {
        /// Probability in `[0, 1]`.
        density: f64,
    },
    /// A preset placed with its top-left corner at `origin` (global row,
    /// column).
    Pattern {
        /// Which preset.
        pattern: Pattern,
        /// Global `(row, col)` of the top-left corner.
        origin: (usize, usize),
    },
    /// Explicit live cells in global coordinates.
    Cells(Vec<(usize, usize)>),
}

impl Default for InitialState {
    fn default() -> Self {
        Self::Random { density: 0.5 }
    }
}

impl InitialState {
    /// Check the state against an `size × size` grid.
    pub fn validate(&self, size: usize) -> Result<(), ConfigError> {
        match self {
            Self::Random { density } => {
                if !(0.0..=1.0).contains(density) {
                    return Err(ConfigError::InvalidDensity { value: *density });
                }
            }
            Self::Pattern { .. } | Self::Cells(_) => {
                if let Some((row, col)) = self
                    .fixed_cells()
                    .into_iter()
                    .find(|&(r, c)| r >= size || c >= size)
                {
                    return Err(ConfigError::PatternOutOfBounds { row, col, size });
                }
            }
        }
        Ok(())
    }

    /// Global live cells for the deterministic variants; empty for
    /// [`InitialState::Random`].
    ///
    /// Coordinates past `usize::MAX` saturate, so they always fail the
    /// bounds check in [`InitialState::validate`].
    fn fixed_cells(&self) -> Vec<(usize, usize)> {
        match self {
            Self::Random { .. } => Vec::new(),
            Self::Pattern { pattern, origin } => pattern
                .offsets()
                .iter()
                .map(|&(r, c)| (origin.0.saturating_add(r), origin.1.saturating_add(c)))
                .collect(),
            Self::Cells(cells) => cells.clone(),
        }
    }

    /// Write this state into `band`, tagging live cells with the owner
    /// tag of `layout`'s rank. Returns the number of live cells placed.
    ///
    /// Random seeding draws from a `ChaCha8Rng` keyed on `seed` and the
    /// rank, so the same seed always yields the same grid for a given
    /// worker count.
    pub fn seed_band(
        &self,
        band: &mut BandStore,
        layout: &BandLayout,
        seed: u64,
    ) -> Result<usize, BandError> {
        let owner = layout.rank().owner_tag();
        let mut placed = 0;
        match self {
            Self::Random { density } => {
                let mut rng = ChaCha8Rng::seed_from_u64(band_seed(seed, layout));
                for row in 1..=layout.band_rows() {
                    for col in 1..=layout.cols() {
                        if rng.random_bool(*density) {
                            band.set(row, col, owner)?;
                            placed += 1;
                        }
                    }
                }
            }
            Self::Pattern { .. } | Self::Cells(_) => {
                for (global_row, global_col) in self.fixed_cells() {
                    let Some(row) = layout.local_row(global_row) else {
                        continue;
                    };
                    let col = global_col + 1;
                    if !is_alive(band.get(row, col)?) {
                        placed += 1;
                    }
                    band.set(row, col, owner)?;
                }
            }
        }
        Ok(placed)
    }
}

fn band_seed(seed: u64, layout: &BandLayout) -> u64 {
    seed ^ u64::from(layout.rank().0 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeband_core::Rank;
    use lifeband_space::Partition;

    #[test]
    fn pattern_names_round_trip() {
        for p in Pattern::ALL {
            assert_eq!(p.name().parse::<Pattern>(), Ok(p));
        }
        assert_eq!("R_Pentomino".parse::<Pattern>(), Ok(Pattern::RPentomino));
        assert_eq!("rpentomino".parse::<Pattern>(), Ok(Pattern::RPentomino));
        assert!("gun".parse::<Pattern>().is_err());
    }

    #[test]
    fn extents() {
        assert_eq!(Pattern::Block.extent(), (2, 2));
        assert_eq!(Pattern::Blinker.extent(), (1, 3));
        assert_eq!(Pattern::Beacon.extent(), (4, 4));
        assert_eq!(Pattern::Glider.extent(), (3, 3));
    }

    #[test]
    fn density_is_validated() {
        assert!(InitialState::Random { density: 0.0 }.validate(4).is_ok());
        assert!(InitialState::Random { density: 1.0 }.validate(4).is_ok());
        assert_eq!(
            InitialState::Random { density: 1.5 }.validate(4),
            Err(ConfigError::InvalidDensity { value: 1.5 })
        );
        assert!(InitialState::Random { density: f64::NAN }
            .validate(4)
            .is_err());
    }

    #[test]
    fn pattern_must_fit() {
        let state = InitialState::Pattern {
            pattern: Pattern::Block,
            origin: (3, 0),
        };
        assert_eq!(
            state.validate(4),
            Err(ConfigError::PatternOutOfBounds {
                row: 4,
                col: 0,
                size: 4
            })
        );
        assert!(InitialState::Cells(vec![(0, 4)]).validate(4).is_err());
    }

    #[test]
    fn huge_origin_is_out_of_bounds() {
        let state = InitialState::Pattern {
            pattern: Pattern::Glider,
            origin: (usize::MAX - 1, 0),
        };
        assert!(matches!(
            state.validate(8),
            Err(ConfigError::PatternOutOfBounds { size: 8, .. })
        ));
        let state = InitialState::Pattern {
            pattern: Pattern::Blinker,
            origin: (0, usize::MAX),
        };
        assert!(matches!(
            state.validate(8),
            Err(ConfigError::PatternOutOfBounds { row: 0, .. })
        ));
    }

    #[test]
    fn duplicate_cells_counted_once() {
        let p = Partition::new(4, 4, 1).unwrap();
        let layout = p.layout(Rank(0)).unwrap();
        let mut band = BandStore::new(layout.band_rows(), layout.cols());
        let state = InitialState::Cells(vec![(1, 1), (1, 1), (1, 1), (2, 3)]);
        assert_eq!(state.seed_band(&mut band, &layout, 0), Ok(2));
        assert_eq!(band.alive_count(), 2);
    }

    #[test]
    fn pattern_split_across_bands() {
        let p = Partition::new(8, 8, 2).unwrap();
        let state = InitialState::Pattern {
            pattern: Pattern::Block,
            origin: (3, 2),
        };
        let mut placed = Vec::new();
        for layout in p.layouts() {
            let mut band = BandStore::new(layout.band_rows(), layout.cols());
            let n = state.seed_band(&mut band, &layout, 0).unwrap();
            placed.push(n);
            let tag = layout.rank().owner_tag();
            if layout.rank() == Rank(0) {
                assert_eq!(band.row(4), &[0, 0, tag, tag, 0, 0, 0, 0]);
            } else {
                assert_eq!(band.row(1), &[0, 0, tag, tag, 0, 0, 0, 0]);
            }
        }
        assert_eq!(placed, vec![2, 2]);
    }

    #[test]
    fn random_seeding_is_deterministic_per_rank() {
        let p = Partition::new(8, 8, 2).unwrap();
        let state = InitialState::default();
        let seed_all = |seed| {
            p.layouts()
                .map(|layout| {
                    let mut band = BandStore::new(layout.band_rows(), layout.cols());
                    state.seed_band(&mut band, &layout, seed).unwrap();
                    band.real_cells()
                })
                .collect::<Vec<_>>()
        };
        let a = seed_all(42);
        assert_eq!(a, seed_all(42));
        assert_ne!(a[0], a[1]);
        assert!(a[1].iter().all(|&c| c == 0 || c == 2));
    }

    #[test]
    fn density_extremes() {
        let p = Partition::new(4, 4, 1).unwrap();
        let layout = p.layout(Rank(0)).unwrap();
        let mut full = BandStore::new(4, 4);
        let n = InitialState::Random { density: 1.0 }
            .seed_band(&mut full, &layout, 7)
            .unwrap();
        assert_eq!(n, 16);
        let mut empty = BandStore::new(4, 4);
        let n = InitialState::Random { density: 0.0 }
            .seed_band(&mut empty, &layout, 7)
            .unwrap();
        assert_eq!(n, 0);
    }
}
