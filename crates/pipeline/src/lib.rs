//! vecset-pipeline: text to fixed-dimension vectors
//!
//! The integration glue around the vector store: document sources,
//! sentence/paragraph chunking, the batched embedding HTTP client, and the
//! generate driver that streams embeddings into a sharded dataset.
//!
//! The embedding model itself is an external collaborator: this crate only
//! sends text batches and reshapes the HTTP responses to a fixed dimension.

pub mod chunking;
pub mod config;
pub mod embed;
pub mod error;
pub mod generate;
pub mod sources;

pub use chunking::{chunk_text, ChunkOptions, Granularity};
pub use config::GenerateConfig;
pub use embed::EmbedClient;
pub use error::{PipelineError, PipelineResult};
pub use generate::{run_generate, GenerateSummary};
pub use sources::SourceKind;
