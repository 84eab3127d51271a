//! Dataset writers
//!
//! Two paths to the same on-disk layout:
//!
//! - [`StreamingVecWriter`] accepts vectors batch-by-batch, appends to a
//!   private temp file, and splits into shards on finalize. Peak memory is
//!   one batch plus one copy buffer.
//! - [`write_vec_shards`] takes an already-materialized vector sequence and
//!   writes every shard concurrently. Memory-heavy; use only when the full
//!   sequence already fits in memory.
//!
//! Both compute the same [`crate::layout::ShardPlan`] and produce
//! byte-identical shard files for the same logical input.

mod parallel;
mod streaming;

pub use parallel::write_vec_shards;
pub use streaming::{StreamingVecWriter, STREAM_TMP_FILE};

/// Copy buffer size for temp-file-to-shard splitting.
pub(crate) const COPY_BUF_SIZE: usize = 8 * 1024 * 1024;
