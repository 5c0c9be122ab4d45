//! Simulation configuration record (spec §6).
//!
//! `Config` is the one value external collaborators (the CLI tool, the
//! JSON preset loader — both out of scope here) hand to [`crate::driver`].
//! It derives `serde` so those collaborators have a stable wire shape to
//! target even though loading/saving it is not this crate's job.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Workload pattern used by the trace generator (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    Kvm,
    Kernel,
    Mixed,
    Synthetic,
}

impl Default for WorkloadKind {
    fn default() -> Self {
        WorkloadKind::Kvm
    }
}

/// Which prefetch policy the driver should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Cmc,
    Ra,
}

impl Default for EngineKind {
    fn default() -> Self {
        EngineKind::Cmc
    }
}

fn default_chunk_size_blocks() -> u32 {
    16
}
fn default_cluster_size_chunks() -> u32 {
    64
}
fn default_cache_size_blocks() -> u32 {
    4096
}
fn default_prefetch_window_blocks() -> u32 {
    16
}
fn default_block_range() -> u64 {
    30_000
}
fn default_n_events() -> u64 {
    15_000
}
fn default_sequential_prob() -> f64 {
    0.6
}
fn default_seed() -> u64 {
    42
}
fn default_epoch_size() -> u64 {
    1_000
}

/// Configuration record (spec §6). Every field has a `#[serde(default)]`
/// so a partial document from an external preset loader still resolves
/// to a complete, validated configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_chunk_size_blocks")]
    pub chunk_size_blocks: u32,
    #[serde(default = "default_cluster_size_chunks")]
    pub cluster_size_chunks: u32,
    #[serde(default = "default_cache_size_blocks")]
    pub cache_size_blocks: u32,
    #[serde(default = "default_prefetch_window_blocks")]
    pub prefetch_window_blocks: u32,
    #[serde(default = "default_block_range")]
    pub block_range: u64,
    #[serde(default = "default_n_events")]
    pub n_events: u64,
    #[serde(default)]
    pub workload_kind: WorkloadKind,
    #[serde(default = "default_sequential_prob")]
    pub sequential_prob: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub engine: EngineKind,
    #[serde(default = "default_epoch_size")]
    pub epoch_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size_blocks: default_chunk_size_blocks(),
            cluster_size_chunks: default_cluster_size_chunks(),
            cache_size_blocks: default_cache_size_blocks(),
            prefetch_window_blocks: default_prefetch_window_blocks(),
            block_range: default_block_range(),
            n_events: default_n_events(),
            workload_kind: WorkloadKind::default(),
            sequential_prob: default_sequential_prob(),
            seed: default_seed(),
            engine: EngineKind::default(),
            epoch_size: default_epoch_size(),
        }
    }
}

impl Config {
    /// Checks every field against the constraints in spec §6, stopping at
    /// (and reporting) the first violation. No partial work is started
    /// before this passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=1024).contains(&self.chunk_size_blocks) {
            return Err(ConfigError::new(
                "chunk_size_blocks",
                self.chunk_size_blocks,
                "must be between 1 and 1024",
            ));
        }
        if !(1..=512).contains(&self.cluster_size_chunks) {
            return Err(ConfigError::new(
                "cluster_size_chunks",
                self.cluster_size_chunks,
                "must be between 1 and 512",
            ));
        }
        if self.cache_size_blocks == 0 {
            return Err(ConfigError::new(
                "cache_size_blocks",
                self.cache_size_blocks,
                "must be positive",
            ));
        }
        if self.prefetch_window_blocks > 4 * self.chunk_size_blocks {
            return Err(ConfigError::new(
                "prefetch_window_blocks",
                self.prefetch_window_blocks,
                "must be at most 4 * chunk_size_blocks",
            ));
        }
        if self.block_range == 0 {
            return Err(ConfigError::new(
                "block_range",
                self.block_range,
                "must be positive",
            ));
        }
        if self.n_events == 0 {
            return Err(ConfigError::new(
                "n_events",
                self.n_events,
                "must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.sequential_prob) {
            return Err(ConfigError::new(
                "sequential_prob",
                self.sequential_prob,
                "must be within [0, 1]",
            ));
        }
        if self.epoch_size == 0 {
            return Err(ConfigError::new(
                "epoch_size",
                self.epoch_size,
                "must be positive",
            ));
        }
        Ok(())
    }
}
