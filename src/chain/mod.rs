//! The clustered Markov chain: a sparse `chunk_id -> MCRow` mapping,
//! materialized cluster by cluster (spec §3, §9).
//!
//! Each cluster is a flat `Vec` of `cluster_size_chunks` row slots,
//! pointed to by a top-level `cluster_id -> cluster` map — the "sparse
//! nested mapping via flat arrays with indirection" pattern spec §9
//! calls for. A slot starts as `None` (row not yet created) and becomes
//! `Some(MCRow::empty())` the first time anything writes to it, whether
//! that write is a transition (§4.4 step 3) or the "create MC if absent"
//! step for the current chunk (§4.4 step 4) — see SPEC_FULL.md §3 for why
//! both count toward `mc_rows_allocated`.

pub mod row;

use std::collections::HashMap;

use crate::block::{cluster_of, cluster_offset, ChunkId, ClusterId};
use row::MCRow;

struct Cluster {
    rows: Vec<Option<MCRow>>,
}

impl Cluster {
    fn new(cluster_size_chunks: u32) -> Self {
        Self {
            rows: vec![None; cluster_size_chunks as usize],
        }
    }
}

/// Outcome of ensuring a row exists, so callers can update `Stats`
/// counters without the chain needing to know about `Stats` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowInsertOutcome {
    pub row_created: bool,
    pub cluster_created: bool,
}

pub struct Chain {
    cluster_size_chunks: u32,
    clusters: HashMap<ClusterId, Cluster>,
    clusters_allocated: u64,
    mc_rows_allocated: u64,
}

impl Chain {
    pub fn new(cluster_size_chunks: u32) -> Self {
        Self {
            cluster_size_chunks,
            clusters: HashMap::new(),
            clusters_allocated: 0,
            mc_rows_allocated: 0,
        }
    }

    pub fn clusters_allocated(&self) -> u64 {
        self.clusters_allocated
    }

    pub fn mc_rows_allocated(&self) -> u64 {
        self.mc_rows_allocated
    }

    /// Read-only lookup; `None` if the row has never been created.
    pub fn row(&self, chunk: ChunkId) -> Option<&MCRow> {
        let cluster_id = cluster_of(chunk, self.cluster_size_chunks);
        let offset = cluster_offset(chunk, self.cluster_size_chunks);
        self.clusters
            .get(&cluster_id)
            .and_then(|c| c.rows[offset].as_ref())
    }

    /// CN1 of `chunk`'s row, or `None` if no row or no populated slot.
    pub fn predict(&self, chunk: ChunkId) -> Option<ChunkId> {
        self.row(chunk).and_then(|r| r.predicted())
    }

    /// Creates the row for `chunk` if it does not already exist, allocating
    /// its cluster on demand. Returns what, if anything, was newly
    /// allocated; does not mutate an already-existing row.
    pub fn ensure_row(&mut self, chunk: ChunkId) -> RowInsertOutcome {
        let cluster_id = cluster_of(chunk, self.cluster_size_chunks);
        let offset = cluster_offset(chunk, self.cluster_size_chunks);

        let mut outcome = RowInsertOutcome::default();
        let cluster_size_chunks = self.cluster_size_chunks;
        let cluster = self.clusters.entry(cluster_id).or_insert_with(|| {
            outcome.cluster_created = true;
            Cluster::new(cluster_size_chunks)
        });

        if cluster.rows[offset].is_none() {
            cluster.rows[offset] = Some(MCRow::empty());
            outcome.row_created = true;
            self.mc_rows_allocated += 1;
        }
        if outcome.cluster_created {
            self.clusters_allocated += 1;
        }
        outcome
    }

    /// Records the transition `from -> to` on `from`'s row per spec §4.4
    /// step 3, creating `from`'s row (and cluster) on demand. Does not
    /// touch `to`'s row — `to` gets its own row via `ensure_row` in step 4.
    pub fn record_transition(&mut self, from: ChunkId, to: ChunkId) -> RowInsertOutcome {
        let outcome = self.ensure_row(from);
        let cluster_id = cluster_of(from, self.cluster_size_chunks);
        let offset = cluster_offset(from, self.cluster_size_chunks);
        let row = self.clusters.get_mut(&cluster_id).unwrap().rows[offset]
            .as_mut()
            .unwrap();
        row.observe(to);
        outcome
    }

    /// Checks I2 (CN fields pairwise distinct) and I3 (counts descending
    /// with recency tie-break) over every materialized row, returning the
    /// name of the first violated invariant found, if any. Driven by the
    /// driver's end-of-run self-check (spec §7/§8).
    pub fn invariant_violation(&self) -> Option<&'static str> {
        for cluster in self.clusters.values() {
            for row in cluster.rows.iter().filter_map(|r| r.as_ref()) {
                if !row.chunks_pairwise_distinct() {
                    return Some("I2: CN fields pairwise distinct");
                }
                if !row.counts_descending() {
                    return Some("I3: counts descending with recency tie-break");
                }
            }
        }
        None
    }
}
