//! Error types for the generation pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use vecset_store::StoreError;

/// Errors produced by config loading, document sources, chunking, and the
/// embedding transport
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configured source name is not recognized
    #[error("unknown source: {name} (expected wikipedia, text_dir, or messages)")]
    UnknownSource {
        /// The unrecognized source name
        name: String,
    },

    /// Configured granularity is not recognized
    #[error("unknown granularity: {name} (expected sentence or paragraph)")]
    UnknownGranularity {
        /// The unrecognized granularity name
        name: String,
    },

    /// The selected source has no path configured
    #[error("{source_name}.path is required when source={source_name}")]
    MissingSourcePath {
        /// Source table missing its path
        source_name: String,
    },

    /// Source file or directory does not exist
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing path
        path: PathBuf,
    },

    /// Configuration is invalid for a reason other than the above
    #[error("invalid config: {reason}")]
    Config {
        /// What is wrong
        reason: String,
    },

    /// Config file could not be parsed
    #[error("config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Glob pattern in the text_dir source is invalid
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// Embedding endpoint request failed
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Embedding endpoint returned a body we can't interpret
    #[error("unexpected embedding response: {reason}")]
    EmbedResponse {
        /// What was wrong with the body
        reason: String,
    },

    /// Embedding endpoint returned the wrong number of vectors
    #[error("embedding batch length {got}, expected {expected}")]
    BatchShape {
        /// Vectors requested
        expected: usize,
        /// Vectors returned
        got: usize,
    },

    /// Vector store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
