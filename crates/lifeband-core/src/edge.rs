//! Row-edge topology for the global grid.

/// How the global top and bottom edges of the grid behave.
///
/// Columns never wrap regardless of this setting. Rows are exchanged
/// between ring neighbours; this value decides whether the ring is closed
/// (the last band's bottom row neighbours the first band's top row) or
/// open at the two global extremes.
///
/// With `Absorb` the wrap-around link is not exchanged and the kernel
/// treats the outer halo rows of the first and last band as absent. With
/// `Wrap` every halo row is exchanged and counted, giving a cylinder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-grid rows are omitted (bounded top and bottom edges).
    #[default]
    Absorb,
    /// The first and last rows are neighbours (periodic rows).
    Wrap,
}

impl EdgeBehavior {
    /// Whether the ring link between the last and the first band is live.
    pub fn wraps(self) -> bool {
        matches!(self, Self::Wrap)
    }
}

/// One of the two halo rows of a band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HaloSide {
    /// Row 0, filled from the predecessor's bottommost real row.
    Top,
    /// Row `band_rows + 1`, filled from the successor's topmost real row.
    Bottom,
}

impl std::fmt::Display for HaloSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}
