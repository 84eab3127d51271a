//! Error types for the vector store layer

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by vec file, writer, manifest, and dedup operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Vector length doesn't match the dataset dimension
    #[error("vector length {got}, expected {expected}")]
    DimensionMismatch {
        /// Dimension the dataset was opened with
        expected: usize,
        /// Actual length of the offending vector
        got: usize,
    },

    /// Dataset dimension must be at least 1
    #[error("invalid dimension: {dim} (must be > 0)")]
    InvalidDimension {
        /// The rejected dimension
        dim: usize,
    },

    /// `finalize()` called on a writer that has already been finalized
    #[error("streaming writer already finalized")]
    AlreadyFinalized,

    /// Dataset manifest file is missing
    #[error("manifest not found: {path}")]
    ManifestNotFound {
        /// Expected manifest path
        path: PathBuf,
    },

    /// Dataset manifest exists but cannot be parsed
    #[error("manifest corrupt: {path} ({reason})")]
    ManifestCorrupt {
        /// Manifest path
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// A shard file required by the manifest is absent
    #[error("shard file not found: {path}")]
    MissingShardFile {
        /// Expected shard path
        path: PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Check if this error is a dataset-configuration problem (missing or
    /// unreadable metadata/files) rather than a data or IO fault.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidDimension { .. }
                | StoreError::ManifestNotFound { .. }
                | StoreError::ManifestCorrupt { .. }
                | StoreError::MissingShardFile { .. }
        )
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = StoreError::DimensionMismatch {
            expected: 1024,
            got: 900,
        };
        assert_eq!(err.to_string(), "vector length 900, expected 1024");
    }

    #[test]
    fn test_is_config_error() {
        assert!(StoreError::ManifestNotFound {
            path: "meta.json".into()
        }
        .is_config_error());
        assert!(StoreError::MissingShardFile {
            path: "docs-shard-3.vec".into()
        }
        .is_config_error());
        assert!(!StoreError::AlreadyFinalized.is_config_error());
        assert!(!StoreError::DimensionMismatch {
            expected: 4,
            got: 3
        }
        .is_config_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
