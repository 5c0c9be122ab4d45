//! Block/chunk/cluster address arithmetic.
//!
//! The simulator addresses storage at three granularities: the raw block,
//! the chunk (the unit Markov transitions are learned over), and the
//! cluster (the unit at which chain memory is lazily allocated). All three
//! are plain integers; the types here exist so call sites read as intent
//! rather than bare `u64` arithmetic.

/// Identifies a single disk block.
pub type BlockId = u64;

/// Identifies a contiguous run of `chunk_size_blocks` blocks.
pub type ChunkId = u64;

/// Identifies a contiguous run of `cluster_size_chunks` chunks.
pub type ClusterId = u64;

/// `chunk_id = block_id / chunk_size_blocks`.
#[inline]
pub fn chunk_of(block: BlockId, chunk_size_blocks: u32) -> ChunkId {
    block / chunk_size_blocks as u64
}

/// First block belonging to `chunk`.
#[inline]
pub fn chunk_start(chunk: ChunkId, chunk_size_blocks: u32) -> BlockId {
    chunk * chunk_size_blocks as u64
}

/// `cluster_id = chunk_id / cluster_size_chunks`.
#[inline]
pub fn cluster_of(chunk: ChunkId, cluster_size_chunks: u32) -> ClusterId {
    chunk / cluster_size_chunks as u64
}

/// Offset of `chunk` within its cluster, i.e. the row index in the
/// cluster's flat row array.
#[inline]
pub fn cluster_offset(chunk: ChunkId, cluster_size_chunks: u32) -> usize {
    (chunk % cluster_size_chunks as u64) as usize
}
