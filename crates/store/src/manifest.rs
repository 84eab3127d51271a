//! Dataset side-car manifest (`meta.json`)
//!
//! The manifest is the single source of truth for reconstructing the logical
//! vector sequence from a shard set: dimension, record count, and shard
//! layout. Producers also record provenance (source, chunking granularity,
//! model, creation time); the store carries those fields verbatim and only
//! ever rewrites the layout keys it owns.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::layout::ShardInfo;

/// Side-car metadata for one dataset directory.
///
/// Unknown keys round-trip through `extra` untouched, so manifests written
/// by newer producers survive a dedup pass without losing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Vector dimension for every record in the dataset
    pub dim: usize,
    /// Logical document-vector count across all shards
    pub num_docs: u64,

    /// Shard count; absent or ≤ 1 means unsharded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_shards: Option<usize>,
    /// Records per shard, in shard order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_sizes: Option<Vec<u64>>,
    /// First logical record index of each shard, parallel to `shard_sizes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_doc_offsets: Option<Vec<u64>>,

    // Provenance. Opaque to the store; written by the generate pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_query_vectors: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Any additional keys, preserved verbatim on updates the store owns.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DatasetManifest {
    /// Manifest for a fresh dataset with no shard layout or provenance yet.
    pub fn new(dim: usize, num_docs: u64) -> Self {
        DatasetManifest {
            dim,
            num_docs,
            num_shards: None,
            shard_sizes: None,
            shard_doc_offsets: None,
            source: None,
            source_path: None,
            granularity: None,
            model_name: None,
            num_query_vectors: None,
            dataset_name: None,
            created_at: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Effective shard count: absent and 0 both mean 1.
    pub fn effective_num_shards(&self) -> usize {
        self.num_shards.unwrap_or(1).max(1)
    }

    /// Record a shard layout produced by a writer.
    pub fn set_shard_layout(&mut self, shards: &[ShardInfo]) {
        self.num_shards = Some(shards.len());
        self.shard_sizes = Some(shards.iter().map(|s| s.size).collect());
        self.shard_doc_offsets = Some(shards.iter().map(|s| s.offset).collect());
    }

    /// Load a manifest, failing with [`StoreError::ManifestNotFound`] when
    /// the file is absent and [`StoreError::ManifestCorrupt`] when it exists
    /// but does not parse. Consistency with the actual shard files is not
    /// checked here.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::ManifestNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::ManifestCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Persist atomically: write a temp sibling, fsync, rename over the
    /// target. A concurrent reader sees either the old or the new manifest,
    /// never a partial write.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut text = serde_json::to_string_pretty(self).map_err(|e| {
            StoreError::ManifestCorrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        text.push('\n');

        let tmp_path = path.with_extension("json.tmp");
        let mut file = File::create(&tmp_path)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, path)?;

        if let Some(parent) = path.parent() {
            if parent.exists() {
                File::open(parent)?.sync_all()?;
            }
        }
        Ok(())
    }
}
