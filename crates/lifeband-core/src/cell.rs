//! Cell encoding.
//!
//! A cell is an unsigned integer: `0` is dead and any positive value is
//! alive. Live cells carry the owner tag (`rank + 1`) of the worker that
//! last made them alive. The tag is provenance only; every rule decision
//! looks at [`is_alive`] and never at the tag value.

/// State of one grid cell.
pub type Cell = u32;

/// The dead cell value.
pub const DEAD: Cell = 0;

/// Whether `cell` is alive.
#[inline]
pub fn is_alive(cell: Cell) -> bool {
    cell != DEAD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_positive_value_is_alive() {
        assert!(!is_alive(DEAD));
        assert!(is_alive(1));
        assert!(is_alive(4));
        assert!(is_alive(u32::MAX));
    }
}
