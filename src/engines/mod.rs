//! The two per-access engines the driver can run (spec §2). Generalizes
//! the teacher crate's `CachePolicy`/`PrefetchStrategy` trait-object
//! polymorphism to a single `Engine` seam, since here there is exactly one
//! cache shape and exactly two interchangeable access handlers rather than
//! an open set of policies.

pub mod cmc;
pub mod ra;

pub use cmc::CmcEngine;
pub use ra::RaEngine;

use crate::block::BlockId;
use crate::cache::PrefetchCache;
use crate::chain::Chain;
use crate::config::{Config, EngineKind};

/// A per-access state machine that consults (and owns) a cache, updating
/// whatever internal prediction state it needs along the way.
pub trait Engine {
    /// Handles one access to `block`, returning `true` on a cache hit.
    fn on_access(&mut self, block: BlockId) -> bool;

    /// The engine's cache, for reading prefetch accounting counters.
    fn cache(&self) -> &PrefetchCache;

    /// Rows materialized in the Markov chain. Zero for engines with no
    /// chain (RA).
    fn mc_rows_allocated(&self) -> u64 {
        0
    }

    /// Clusters materialized in the Markov chain. Zero for engines with
    /// no chain (RA).
    fn clusters_allocated(&self) -> u64 {
        0
    }

    /// The engine's Markov chain, for the driver's I2/I3 self-check.
    /// `None` for engines with no chain (RA).
    fn chain(&self) -> Option<&Chain> {
        None
    }
}

/// Builds the engine named by `config.engine`, wired up from the rest of
/// the configuration record.
pub fn build(config: &Config) -> Box<dyn Engine> {
    tracing::info!(engine = ?config.engine, "engine selected");
    match config.engine {
        EngineKind::Cmc => Box::new(CmcEngine::new(
            config.cache_size_blocks,
            config.chunk_size_blocks,
            config.cluster_size_chunks,
            config.prefetch_window_blocks,
            config.block_range,
        )),
        EngineKind::Ra => Box::new(RaEngine::new(config.cache_size_blocks, config.block_range)),
    }
}
