//! `clump-sim`: a trace-driven simulator comparing a clustered Markov
//! chain (CMC) block-prefetch policy against a sequential read-ahead
//! (RA) baseline.
//!
//! A run feeds a deterministic block-access trace through one [`Engine`]
//! implementation, accumulating hit-rate, prefetch-efficiency, and
//! memory-footprint statistics. See [`driver::run`] for the entry point.

pub mod block;
pub mod cache;
pub mod chain;
pub mod config;
pub mod driver;
pub mod engines;
pub mod error;
pub mod trace;

pub use config::Config;
pub use driver::{run, run_with_trace, SimStats};
pub use engines::Engine;
pub use error::{ConfigError, SimError};

/// Re-exports the pieces most callers need: `use clump_sim::prelude::*;`.
pub mod prelude {
    pub use crate::config::{Config, EngineKind, WorkloadKind};
    pub use crate::driver::{run, run_with_trace, SimStats};
    pub use crate::error::{ConfigError, SimError};
}
