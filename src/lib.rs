//! vecset: embedding vector dataset toolkit
//!
//! Turns raw text into fixed-dimension float32 vectors and persists them as
//! flat `.vec` shard files with a JSON side-car manifest, for consumption by
//! KNN benchmarking tools. Ships a streaming (bounded-memory) writer, a
//! parallel in-memory writer producing byte-identical output, and an offline
//! dedup/re-shard maintenance tool.
//!
//! # Quick Start
//!
//! ```ignore
//! use vecset::{DatasetManifest, StreamingVecWriter};
//!
//! let mut writer = StreamingVecWriter::create(&dir, 1024, 16)?;
//! for batch in batches {
//!     writer.append_batch(&batch)?;
//! }
//! let shards = writer.finalize()?;
//!
//! let mut manifest = DatasetManifest::new(1024, writer.count());
//! manifest.set_shard_layout(&shards);
//! manifest.save(&dir.join("meta.json"))?;
//! ```
//!
//! The store layer ([`store`]) is self-contained; the pipeline layer
//! ([`pipeline`]) adds document loading, chunking, and the embedding HTTP
//! transport used by the `vecset` binary.

pub use vecset_pipeline as pipeline;
pub use vecset_store as store;

pub use vecset_store::*;

pub use vecset_pipeline::{
    chunk_text, run_generate, ChunkOptions, EmbedClient, GenerateConfig, GenerateSummary,
    Granularity, PipelineError, PipelineResult, SourceKind,
};
