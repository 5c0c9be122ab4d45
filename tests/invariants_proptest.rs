//! Property tests over randomized configurations and traces, exercising
//! the quantified invariants of spec §8: the accounting identities, the
//! row ordering/distinctness invariant, the cluster-count bound, and
//! determinism.

use clump_sim::chain::row::MCRow;
use clump_sim::config::{Config, EngineKind, WorkloadKind};
use clump_sim::driver::run;
use proptest::prelude::*;

fn arb_workload() -> impl Strategy<Value = WorkloadKind> {
    prop_oneof![
        Just(WorkloadKind::Kvm),
        Just(WorkloadKind::Kernel),
        Just(WorkloadKind::Mixed),
        Just(WorkloadKind::Synthetic),
    ]
}

fn arb_engine() -> impl Strategy<Value = EngineKind> {
    prop_oneof![Just(EngineKind::Cmc), Just(EngineKind::Ra)]
}

/// Builds a small-but-valid configuration from proptest-generated knobs,
/// keeping every field inside the constraints of spec §6.
fn arb_config() -> impl Strategy<Value = Config> {
    (
        1u32..=64,
        1u32..=32,
        16u32..=512,
        0u32..=4,
        1000u64..=20_000,
        100u64..=3000,
        arb_workload(),
        0.0f64..=1.0,
        0u64..=10_000,
        arb_engine(),
        50u64..=500,
    )
        .prop_map(
            |(
                chunk_size_blocks,
                cluster_size_chunks,
                cache_size_blocks,
                window_chunks,
                block_range,
                n_events,
                workload_kind,
                sequential_prob,
                seed,
                engine,
                epoch_size,
            )| {
                Config {
                    chunk_size_blocks,
                    cluster_size_chunks,
                    cache_size_blocks,
                    // Kept within the `<= 4 * chunk_size_blocks` constraint
                    // by construction rather than rejection-sampled.
                    prefetch_window_blocks: window_chunks * chunk_size_blocks,
                    block_range,
                    n_events,
                    workload_kind,
                    sequential_prob,
                    seed,
                    engine,
                    epoch_size,
                }
            },
        )
}

proptest! {
    /// hits + misses == accesses, prefetch_used <= prefetch_issued, and
    /// prefetch_evicted_unused <= prefetch_issued hold at the end of every
    /// run, for any valid configuration and any of the four workload
    /// kinds and both engines (spec §8, invariant I5).
    #[test]
    fn accounting_identities_hold(cfg in arb_config()) {
        let stats = run(&cfg).expect("constructed config always satisfies §6 constraints");
        prop_assert_eq!(stats.hits + stats.misses, stats.accesses);
        prop_assert!(stats.prefetch_used <= stats.prefetch_issued);
        prop_assert!(stats.prefetch_evicted_unused <= stats.prefetch_issued);
    }

    /// clusters_allocated never exceeds ceil(block_range / (chunk_size *
    /// cluster_size)) (spec §8 end-to-end scenario 6, generalized).
    #[test]
    fn cluster_count_respects_the_block_range_bound(cfg in arb_config()) {
        let stats = run(&cfg).expect("constructed config always satisfies §6 constraints");
        let bound = cfg
            .block_range
            .div_ceil(cfg.chunk_size_blocks as u64 * cfg.cluster_size_chunks as u64);
        prop_assert!(stats.clusters_allocated <= bound);
    }

    /// Running the same (config, seed) twice produces bit-for-bit
    /// identical statistics (spec §8, determinism).
    #[test]
    fn same_config_is_deterministic(cfg in arb_config()) {
        let a = run(&cfg).unwrap();
        let b = run(&cfg).unwrap();
        prop_assert_eq!(a, b);
    }

    /// A Markov row keeps its populated chunk ids pairwise distinct and
    /// its counts in descending order after every observation, for any
    /// sequence of successor chunks (spec §8, I2/I3).
    #[test]
    fn mc_row_stays_well_ordered_under_any_observation_sequence(
        successors in proptest::collection::vec(0u64..12, 1..200),
    ) {
        let mut row = MCRow::empty();
        for s in successors {
            row.observe(s);
            prop_assert!(row.chunks_pairwise_distinct());
            prop_assert!(row.counts_descending());
            prop_assert!(row.populated().len() <= 3);
        }
    }
}
