//! Domain decomposition for lifeband.
//!
//! A [`Partition`] splits an `R × C` grid into `P` contiguous row bands,
//! one per worker, and hands each worker a [`BandLayout`]: its band
//! height, padded buffer shape, global row offset, and ring neighbours.
//!
//! Validation happens once, at startup, in [`Partition::new`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod partition;

pub use error::PartitionError;
pub use partition::{BandLayout, Partition, RingNeighbours, MAX_WORKERS};
