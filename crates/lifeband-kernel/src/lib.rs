//! Transition kernel for lifeband.
//!
//! [`TransitionKernel::step`] advances one band by one generation: it
//! reads the band's `current` buffer (halo rows included where the
//! [`RowEdges`] allow) and writes every real cell of `next`. The rule is
//! a life-like birth/survival [`Rule`], Conway's B3/S23 by default.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod kernel;
pub mod rule;

pub use kernel::{RowEdges, StepStats, TransitionKernel};
pub use rule::{Rule, RuleParseError};
