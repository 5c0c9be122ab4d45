//! Trace generator (spec §4.1): a deterministic, lazily-produced sequence
//! of block accesses over a named workload pattern.
//!
//! Determinism comes from seeding `rand`'s `StdRng` per run rather than
//! reaching for `thread_rng` — the same crate the teacher already used for
//! its random-eviction policy and benchmarks, just seeded instead of
//! system-entropy-backed so `(kind, seed, n_events, block_range)`
//! reproduces bit-for-bit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::block::BlockId;
use crate::config::WorkloadKind;

const SHORT_JUMP_RADIUS: i64 = 64;

#[derive(Debug, Clone, Copy)]
struct Mix {
    sequential: f64,
    short_jump: f64,
    // long_jump is whatever remains; kept implicit to avoid the three
    // probabilities drifting out of sync with rounding.
}

const KVM_MIX: Mix = Mix {
    sequential: 0.40,
    short_jump: 0.35,
};
const KERNEL_MIX: Mix = Mix {
    sequential: 0.30,
    short_jump: 0.20,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Sequential,
    ShortJump,
    LongJump,
}

fn draw_step(mix: Mix, rng: &mut StdRng) -> Step {
    let r: f64 = rng.gen();
    if r < mix.sequential {
        Step::Sequential
    } else if r < mix.sequential + mix.short_jump {
        Step::ShortJump
    } else {
        Step::LongJump
    }
}

/// Lazily produces `n_events` block ids over `[0, block_range)` for the
/// given workload kind and seed. Implements `Iterator` so callers can
/// drive very long traces (spec allows up to 10^9 accesses) without
/// materializing them.
pub struct TraceGenerator {
    kind: WorkloadKind,
    sequential_prob: f64,
    block_range: u64,
    n_events: u64,
    emitted: u64,
    current: Option<BlockId>,
    rng: StdRng,
}

impl TraceGenerator {
    pub fn new(
        kind: WorkloadKind,
        seed: u64,
        n_events: u64,
        block_range: u64,
        sequential_prob: f64,
    ) -> Self {
        Self {
            kind,
            sequential_prob,
            block_range,
            n_events,
            emitted: 0,
            current: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next_block(&mut self) -> BlockId {
        // 50/50 interleave for `Mixed`: each event's distribution is drawn
        // from one of the two tables with equal probability, rather than
        // averaging the tables themselves.
        let mix = match self.kind {
            WorkloadKind::Kvm => KVM_MIX,
            WorkloadKind::Kernel => KERNEL_MIX,
            WorkloadKind::Mixed => {
                if self.rng.gen_bool(0.5) {
                    KVM_MIX
                } else {
                    KERNEL_MIX
                }
            }
            WorkloadKind::Synthetic => Mix {
                sequential: self.sequential_prob,
                short_jump: (1.0 - self.sequential_prob) / 2.0,
            },
        };

        let Some(cur) = self.current else {
            return self.rng.gen_range(0..self.block_range);
        };

        match draw_step(mix, &mut self.rng) {
            Step::Sequential => {
                if cur + 1 < self.block_range {
                    cur + 1
                } else {
                    0
                }
            }
            Step::ShortJump => {
                let lo = cur.saturating_sub(SHORT_JUMP_RADIUS as u64);
                let hi = cur.saturating_add(SHORT_JUMP_RADIUS as u64).min(self.block_range - 1);
                self.rng.gen_range(lo..=hi)
            }
            Step::LongJump => self.rng.gen_range(0..self.block_range),
        }
    }
}

impl Iterator for TraceGenerator {
    type Item = BlockId;

    fn next(&mut self) -> Option<BlockId> {
        if self.emitted >= self.n_events {
            return None;
        }
        let block = self.next_block();
        self.current = Some(block);
        self.emitted += 1;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.n_events - self.emitted) as usize;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_matches_n_events() {
        let gen = TraceGenerator::new(WorkloadKind::Kvm, 1, 500, 1000, 0.0);
        assert_eq!(gen.count(), 500);
    }

    #[test]
    fn every_block_is_within_range() {
        let gen = TraceGenerator::new(WorkloadKind::Kernel, 7, 2000, 300, 0.0);
        for b in gen {
            assert!(b < 300);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let a: Vec<_> = TraceGenerator::new(WorkloadKind::Mixed, 42, 1000, 5000, 0.0).collect();
        let b: Vec<_> = TraceGenerator::new(WorkloadKind::Mixed, 42, 1000, 5000, 0.0).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_diverge() {
        let a: Vec<_> = TraceGenerator::new(WorkloadKind::Kvm, 1, 200, 5000, 0.0).collect();
        let b: Vec<_> = TraceGenerator::new(WorkloadKind::Kvm, 2, 200, 5000, 0.0).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn synthetic_with_sequential_prob_one_is_a_single_run() {
        let trace: Vec<_> = TraceGenerator::new(WorkloadKind::Synthetic, 3, 50, 10_000, 1.0).collect();
        for w in trace.windows(2) {
            // once the run starts, every step should advance by one
            // (allowing for the wrap at block_range, which this range is
            // far too large to hit).
            assert_eq!(w[1], w[0] + 1);
        }
    }

    #[test]
    fn synthetic_with_sequential_prob_zero_never_forces_a_pure_run() {
        // Not a strict assertion on shape (jumps can coincidentally land
        // adjacent); just exercises the all-jump code path without panics.
        let trace: Vec<_> = TraceGenerator::new(WorkloadKind::Synthetic, 9, 2000, 4000, 0.0).collect();
        assert_eq!(trace.len(), 2000);
    }
}
