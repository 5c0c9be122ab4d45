//! The CMC policy engine: the eight-step per-access state machine from
//! spec §4.4, coordinating cache lookup/fill, chain update, and predictive
//! prefetch.

use crate::block::{chunk_of, chunk_start, BlockId, ChunkId};
use crate::cache::{Origin, PrefetchCache};
use crate::chain::Chain;

use super::Engine;

pub struct CmcEngine {
    cache: PrefetchCache,
    chain: Chain,
    chunk_size_blocks: u32,
    prefetch_window_blocks: u32,
    block_range: u64,
    /// `prev_chunk` from spec §4.4: the chunk of the previous access, or
    /// `None` before the first access.
    prev_chunk: Option<ChunkId>,
}

impl CmcEngine {
    pub fn new(
        cache_size_blocks: u32,
        chunk_size_blocks: u32,
        cluster_size_chunks: u32,
        prefetch_window_blocks: u32,
        block_range: u64,
    ) -> Self {
        Self {
            cache: PrefetchCache::new(cache_size_blocks as usize),
            chain: Chain::new(cluster_size_chunks),
            chunk_size_blocks,
            prefetch_window_blocks,
            block_range,
            prev_chunk: None,
        }
    }

    /// Issues prefetches for the `prefetch_window_blocks`-long run starting
    /// at `pred_chunk`'s first block, truncated at `block_range` (§4.4
    /// step 6, edge case "prefetch window straddles end of address
    /// space").
    fn issue_window(&mut self, pred_chunk: ChunkId) {
        let start = chunk_start(pred_chunk, self.chunk_size_blocks);
        let end = start
            .saturating_add(self.prefetch_window_blocks as u64)
            .min(self.block_range);
        let mut block = start;
        while block < end {
            self.cache.issue_prefetch(block);
            block += 1;
        }
    }
}

impl Engine for CmcEngine {
    fn on_access(&mut self, block: BlockId) -> bool {
        // Step 1: compute cur_chunk.
        let cur_chunk = chunk_of(block, self.chunk_size_blocks);

        // Step 2: cache probe.
        let hit = self.cache.contains(block);
        if hit {
            self.cache.touch(block);
        } else {
            self.cache.admit(block, Origin::Demand);
        }

        // Step 3: chain transition (self-transitions suppressed).
        if let Some(prev_chunk) = self.prev_chunk {
            if prev_chunk != cur_chunk {
                let outcome = self.chain.record_transition(prev_chunk, cur_chunk);
                if outcome.cluster_created {
                    tracing::debug!(cluster = prev_chunk, "cluster allocated");
                }
                tracing::trace!(from = prev_chunk, to = cur_chunk, "transition observed");
            }
        }

        // Step 4: ensure row for cur_chunk exists.
        let outcome = self.chain.ensure_row(cur_chunk);
        if outcome.cluster_created {
            tracing::debug!(cluster = cur_chunk, "cluster allocated");
        }

        // Step 5 + 6: predict and issue the prefetch window.
        if let Some(pred_chunk) = self.chain.predict(cur_chunk) {
            self.issue_window(pred_chunk);
        }

        // Step 7: advance.
        self.prev_chunk = Some(cur_chunk);

        // Step 8: counters updated in steps 2 and 6 are already committed.
        hit
    }

    fn cache(&self) -> &PrefetchCache {
        &self.cache
    }

    fn mc_rows_allocated(&self) -> u64 {
        self.chain.mc_rows_allocated()
    }

    fn clusters_allocated(&self) -> u64 {
        self.chain.clusters_allocated()
    }

    fn chain(&self) -> Option<&Chain> {
        Some(&self.chain)
    }
}
