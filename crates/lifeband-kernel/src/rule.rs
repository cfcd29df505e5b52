//! Life-like birth/survival rules.

use std::fmt;
use std::str::FromStr;

/// A life-like rule as two neighbour-count bitmasks.
///
/// Bit `n` of `birth` set means a dead cell with `n` live neighbours is
/// born; bit `n` of `survive` set means a live cell with `n` live
/// neighbours stays alive. Counts range over `0..=8`.
///
/// # Examples
///
/// ```
/// use lifeband_kernel::Rule;
///
/// let rule: Rule = "B3/S23".parse().unwrap();
/// assert_eq!(rule, Rule::CONWAY);
/// assert!(rule.next_alive(false, 3));
/// assert!(rule.next_alive(true, 2));
/// assert!(!rule.next_alive(true, 4));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    birth: u16,
    survive: u16,
}

impl Rule {
    /// Conway's Game of Life: born with 3, survives with 2 or 3.
    pub const CONWAY: Rule = Rule {
        birth: 1 << 3,
        survive: (1 << 2) | (1 << 3),
    };

    /// Build a rule from explicit neighbour counts. Counts above 8 are
    /// ignored.
    pub fn new(birth: &[u8], survive: &[u8]) -> Self {
        let mask = |counts: &[u8]| {
            counts
                .iter()
                .filter(|&&n| n <= 8)
                .fold(0u16, |m, &n| m | (1 << n))
        };
        Self {
            birth: mask(birth),
            survive: mask(survive),
        }
    }

    /// Whether a cell is alive next generation.
    #[inline]
    pub fn next_alive(&self, alive: bool, live_neighbours: u8) -> bool {
        let mask = if alive { self.survive } else { self.birth };
        live_neighbours <= 8 && mask & (1 << live_neighbours) != 0
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::CONWAY
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for n in 0..=8 {
            if self.birth & (1 << n) != 0 {
                write!(f, "{n}")?;
            }
        }
        write!(f, "/S")?;
        for n in 0..=8 {
            if self.survive & (1 << n) != 0 {
                write!(f, "{n}")?;
            }
        }
        Ok(())
    }
}

/// Error parsing a rule string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleParseError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for RuleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid rule '{}': expected B<digits>/S<digits>, e.g. B3/S23",
            self.input
        )
    }
}

impl std::error::Error for RuleParseError {}

impl FromStr for Rule {
    type Err = RuleParseError;

    /// Parse `B<digits>/S<digits>` (case-insensitive, digits `0..=8`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RuleParseError {
            input: s.to_string(),
        };
        let upper = s.trim().to_ascii_uppercase();
        let (b, sv) = upper.split_once('/').ok_or_else(err)?;
        let b = b.strip_prefix('B').ok_or_else(err)?;
        let sv = sv.strip_prefix('S').ok_or_else(err)?;
        let digits = |part: &str| -> Result<Vec<u8>, RuleParseError> {
            part.chars()
                .map(|ch| match ch.to_digit(10) {
                    Some(d) if d <= 8 => Ok(d as u8),
                    _ => Err(err()),
                })
                .collect()
        };
        Ok(Self::new(&digits(b)?, &digits(sv)?))
    }
}
