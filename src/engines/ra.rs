//! The sequential read-ahead baseline (spec §4.5): a simple run detector
//! with an adaptive window, sharing the same cache and accounting rules
//! as the CMC engine so the two are directly comparable.

use crate::block::BlockId;
use crate::cache::{Origin, PrefetchCache};

use super::Engine;

/// 128 KiB at the paper's fixed 4 KiB/block accounting model. The
/// configuration record (spec §6) has no tunable block size, so this
/// ratio is a fixed internal constant rather than a derived one.
const INITIAL_WINDOW_BLOCKS: u32 = 32;
const MAX_WINDOW_BLOCKS: u32 = 512;

pub struct RaEngine {
    cache: PrefetchCache,
    block_range: u64,
    last_block: Option<BlockId>,
    window: u32,
    sequential_streak: u32,
}

impl RaEngine {
    pub fn new(cache_size_blocks: u32, block_range: u64) -> Self {
        Self {
            cache: PrefetchCache::new(cache_size_blocks as usize),
            block_range,
            last_block: None,
            window: INITIAL_WINDOW_BLOCKS,
            sequential_streak: 0,
        }
    }

    fn issue_window(&mut self, block: BlockId) {
        let start = block + 1;
        let end = block
            .saturating_add(self.window as u64)
            .saturating_add(1)
            .min(self.block_range);
        let mut b = start;
        while b < end {
            self.cache.issue_prefetch(b);
            b += 1;
        }
    }
}

impl Engine for RaEngine {
    fn on_access(&mut self, block: BlockId) -> bool {
        // Same cache probe as CMC step 2.
        let hit = self.cache.contains(block);
        if hit {
            self.cache.touch(block);
        } else {
            self.cache.admit(block, Origin::Demand);
        }

        let is_sequential = matches!(self.last_block, Some(last) if block == last + 1);

        if is_sequential {
            self.sequential_streak += 1;
            if self.sequential_streak >= 2 {
                self.window = self.window.saturating_mul(2).min(MAX_WINDOW_BLOCKS);
                self.issue_window(block);
            }
        } else {
            self.sequential_streak = 0;
            self.window = INITIAL_WINDOW_BLOCKS;
        }

        self.last_block = Some(block);
        hit
    }

    fn cache(&self) -> &PrefetchCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_access_is_always_a_miss() {
        let mut e = RaEngine::new(64, 10_000);
        assert!(!e.on_access(0));
    }

    #[test]
    fn no_prefetch_until_two_consecutive_sequential_accesses() {
        let mut e = RaEngine::new(64, 10_000);
        e.on_access(0);
        assert_eq!(e.cache().prefetch_issued(), 0);
        e.on_access(1); // streak == 1, still no prefetch this access
        assert_eq!(e.cache().prefetch_issued(), 0);
        e.on_access(2); // streak == 2, now it prefetches ahead
        assert!(e.cache().prefetch_issued() > 0);
    }

    #[test]
    fn broken_stride_resets_window_and_streak() {
        let mut e = RaEngine::new(64, 10_000);
        e.on_access(0);
        e.on_access(1);
        e.on_access(2); // window doubles to 64
        e.on_access(9000); // breaks the run
        e.on_access(9001);
        e.on_access(9002); // streak reaches 2 again, window back to base*2
        assert_eq!(e.window, INITIAL_WINDOW_BLOCKS * 2);
    }

    #[test]
    fn window_caps_at_max_window() {
        let mut e = RaEngine::new(2048, 100_000);
        for b in 0..40u64 {
            e.on_access(b);
        }
        assert!(e.window <= MAX_WINDOW_BLOCKS);
    }

    #[test]
    fn prefetch_truncates_at_block_range() {
        let mut e = RaEngine::new(64, 10);
        e.on_access(0);
        e.on_access(1);
        e.on_access(2); // would prefetch up to block 2+64, capped at 10
        assert!(e.cache().len() <= 10);
    }
}
