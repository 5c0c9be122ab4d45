//! Simulation driver (spec §4.6): feeds a trace to one engine, samples an
//! epoch hit-rate trajectory, and assembles the statistics record.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::config::Config;
use crate::engines::{self, Engine};
use crate::error::SimError;
use crate::trace::TraceGenerator;

/// `(accesses_so_far, hit_rate_so_far)`, sampled every `epoch_size`
/// accesses.
pub type EpochSample = (u64, f64);

/// Statistics record returned by a run (spec §3, §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub prefetch_issued: u64,
    pub prefetch_used: u64,
    pub prefetch_evicted_unused: u64,
    pub mc_rows_allocated: u64,
    pub clusters_allocated: u64,
    pub hit_rate: f64,
    pub prefetch_efficiency: f64,
    pub memory_bytes: u64,
    pub hit_rate_trajectory: Vec<EpochSample>,
}

/// Bytes-per-row used by `memory_bytes`: the paper's six-field row at 4
/// bytes per field.
const BYTES_PER_ROW: u64 = 24;

/// Runs `config.engine` over a trace constructed from `config` itself.
pub fn run(config: &Config) -> Result<SimStats, SimError> {
    config.validate()?;
    let trace = TraceGenerator::new(
        config.workload_kind,
        config.seed,
        config.n_events,
        config.block_range,
        config.sequential_prob,
    );
    run_with_trace(config, trace)
}

/// Runs `config.engine` over an explicitly supplied trace, for callers
/// that want to inject their own access sequence instead of the built-in
/// generator.
pub fn run_with_trace(
    config: &Config,
    trace: impl IntoIterator<Item = BlockId>,
) -> Result<SimStats, SimError> {
    config.validate()?;

    let span = tracing::info_span!(
        "simulation_run",
        engine = ?config.engine,
        workload = ?config.workload_kind,
        seed = config.seed,
        n_events = config.n_events,
    );
    let _guard = span.enter();

    let mut engine = engines::build(config);

    let mut accesses: u64 = 0;
    let mut hits: u64 = 0;
    let mut misses: u64 = 0;
    let mut trajectory = Vec::new();

    for block in trace {
        let hit = engine.on_access(block);
        accesses += 1;
        if hit {
            hits += 1;
        } else {
            misses += 1;
        }

        if accesses % config.epoch_size == 0 {
            let hit_rate = hits as f64 / accesses as f64;
            tracing::debug!(accesses, hit_rate, "epoch sampled");
            trajectory.push((accesses, hit_rate));
        }
    }

    check_invariants(accesses, hits, misses, &engine)?;

    let prefetch_issued = engine.cache().prefetch_issued();
    let prefetch_used = engine.cache().prefetch_used();
    let prefetch_evicted_unused = engine.cache().prefetch_evicted_unused();
    let mc_rows_allocated = engine.mc_rows_allocated();

    Ok(SimStats {
        accesses,
        hits,
        misses,
        prefetch_issued,
        prefetch_used,
        prefetch_evicted_unused,
        mc_rows_allocated,
        clusters_allocated: engine.clusters_allocated(),
        hit_rate: if accesses == 0 {
            0.0
        } else {
            hits as f64 / accesses as f64
        },
        prefetch_efficiency: prefetch_used as f64 / prefetch_issued.max(1) as f64,
        memory_bytes: mc_rows_allocated * BYTES_PER_ROW,
        hit_rate_trajectory: trajectory,
    })
}

/// End-of-run invariant check (spec §8: "must hold at the end of every
/// run"). A failure here means a bug in the engine, not a bad
/// configuration, so it returns `SimError::InvariantViolation` rather
/// than a `ConfigError` — and carries no partial statistics.
fn check_invariants(
    accesses: u64,
    hits: u64,
    misses: u64,
    engine: &dyn Engine,
) -> Result<(), SimError> {
    macro_rules! fail {
        ($invariant:expr, $($detail:tt)*) => {{
            let detail = format!($($detail)*);
            tracing::warn!(invariant = $invariant, %detail, "invariant violation detected");
            return Err(SimError::InvariantViolation {
                invariant: $invariant,
                detail,
            });
        }};
    }

    if hits + misses != accesses {
        fail!(
            "hits + misses == accesses",
            "hits={hits} misses={misses} accesses={accesses}"
        );
    }

    let cache = engine.cache();
    if cache.len() > cache.capacity() {
        fail!(
            "I1: cache size <= cache_size_blocks",
            "len={} capacity={}",
            cache.len(),
            cache.capacity()
        );
    }
    if cache.prefetch_used() > cache.prefetch_issued() {
        fail!(
            "prefetch_used <= prefetch_issued",
            "prefetch_used={} prefetch_issued={}",
            cache.prefetch_used(),
            cache.prefetch_issued()
        );
    }
    if cache.prefetch_evicted_unused() > cache.prefetch_issued() {
        fail!(
            "prefetch_evicted_unused <= prefetch_issued",
            "prefetch_evicted_unused={} prefetch_issued={}",
            cache.prefetch_evicted_unused(),
            cache.prefetch_issued()
        );
    }

    if let Some(chain) = engine.chain() {
        if let Some(invariant) = chain.invariant_violation() {
            fail!(invariant, "chain row ordering check failed");
        }
    }

    Ok(())
}
