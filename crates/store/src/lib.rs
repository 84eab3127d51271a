//! vecset-store: vector store management for `.vec` datasets
//!
//! A dataset directory holds fixed-dimension float32 vectors as flat binary
//! shard files plus a `meta.json` side-car manifest. This crate owns that
//! layer end to end:
//!
//! - [`codec`]: little-endian f32 record encode/decode and streaming reads
//! - [`layout`]: the deterministic shard partition and file naming
//! - [`writer`]: the streaming (bounded-memory) and parallel (in-memory)
//!   write paths, which produce byte-identical shard sets
//! - [`manifest`]: the `meta.json` reader/writer
//! - [`dedup`]: offline duplicate removal and re-sharding
//!
//! Single-writer access per dataset directory is assumed; concurrent
//! writers or dedup runs against one directory are the caller's problem to
//! prevent.

pub mod codec;
pub mod dedup;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod writer;

pub use codec::{
    decode_vector, encode_vector, read_vec_file, record_size, write_vec_file, VecFileReader,
};
pub use dedup::{dedup_dataset, DedupOptions, DedupReport, BACKUP_SUFFIX, DEDUP_TMP_FILE};
pub use error::{StoreError, StoreResult};
pub use layout::{
    resolve_shard_paths, shard_file_name, shard_write_paths, ShardInfo, ShardPlan, ShardSlice,
    DOCS_FILE, MANIFEST_FILE, QUERIES_FILE,
};
pub use manifest::DatasetManifest;
pub use writer::{write_vec_shards, StreamingVecWriter, STREAM_TMP_FILE};
