//! Band storage for lifeband workers.
//!
//! Each worker owns exactly one [`BandStore`]: two equally shaped
//! buffers (`current` and `next`) holding its real rows plus one halo
//! row above, one below, and a zero padding column on each side.
//!
//! The lifecycle per generation is:
//! 1. halo rows of `current` are refreshed via [`BandStore::write_halo`]
//! 2. the kernel reads `current` and writes `next` through
//!    [`BandStore::frames`]
//! 3. [`BandStore::commit`] copies the real region of `next` into `current`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod band;
pub mod error;

pub use band::{BandStore, CurrentFrame, NextFrame};
pub use error::BandError;
