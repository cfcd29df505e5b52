//! Core types for the lifeband banded Game of Life.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other lifeband crate: worker ranks,
//! generation counters, the cell encoding, row-edge topology, the dense
//! [`Grid`] used when bands are reassembled, and the communication
//! error types raised by halo exchange and snapshot collection.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod edge;
pub mod error;
pub mod grid;
pub mod id;

pub use cell::{is_alive, Cell, DEAD};
pub use edge::{EdgeBehavior, HaloSide};
pub use error::{CollectError, ExchangeError};
pub use grid::Grid;
pub use id::{Generation, Rank};
