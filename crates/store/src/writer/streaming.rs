//! Streaming vector writer: append batches to a temp file, shard on finalize.

use byteorder::{LittleEndian, WriteBytesExt};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::codec::{copy_exact, record_size};
use crate::error::{StoreError, StoreResult};
use crate::layout::{shard_write_paths, ShardInfo, ShardPlan, DOCS_FILE};
use crate::writer::COPY_BUF_SIZE;

/// Temp file the writer appends to until finalize.
pub const STREAM_TMP_FILE: &str = "_docs_streaming.vec.tmp";

/// Accepts vectors incrementally and deterministically partitions them into
/// shard files without holding the dataset in memory.
///
/// ```ignore
/// let mut writer = StreamingVecWriter::create(&dir, 1024, 16)?;
/// writer.append_batch(&batch1)?;
/// writer.append_batch(&batch2)?;
/// let shards = writer.finalize()?;
/// ```
///
/// Dimension and shard count are fixed for the writer's lifetime. Any IO
/// error is fatal to the writer instance; the temp file is left on disk for
/// inspection rather than cleaned up. A process killed mid-finalize can
/// likewise leave the temp file and partially written shards behind;
/// recovery is re-running the generation, not automatic.
pub struct StreamingVecWriter {
    dir: PathBuf,
    dim: usize,
    num_shards: usize,
    tmp_path: PathBuf,
    /// `None` once finalized
    file: Option<BufWriter<File>>,
    count: u64,
}

impl StreamingVecWriter {
    /// Open a writer for a dataset directory, creating the directory and
    /// truncating any stale temp file from an earlier failed run.
    pub fn create(dir: &Path, dim: usize, num_shards: usize) -> StoreResult<Self> {
        if dim == 0 {
            return Err(StoreError::InvalidDimension { dim });
        }
        fs::create_dir_all(dir)?;
        let tmp_path = dir.join(STREAM_TMP_FILE);
        let file = BufWriter::new(File::create(&tmp_path)?);
        debug!(dir = %dir.display(), dim, num_shards, "streaming writer opened");
        Ok(StreamingVecWriter {
            dir: dir.to_path_buf(),
            dim,
            num_shards: num_shards.max(1),
            tmp_path,
            file: Some(file),
            count: 0,
        })
    }

    /// Append a batch of vectors to the temp file in order, flushing after
    /// the batch. Returns the running record count.
    pub fn append_batch(&mut self, batch: &[Vec<f32>]) -> StoreResult<u64> {
        let file = self.file.as_mut().ok_or(StoreError::AlreadyFinalized)?;
        for vector in batch {
            if vector.len() != self.dim {
                return Err(StoreError::DimensionMismatch {
                    expected: self.dim,
                    got: vector.len(),
                });
            }
            for &value in vector {
                file.write_f32::<LittleEndian>(value)?;
            }
            self.count += 1;
        }
        file.flush()?;
        Ok(self.count)
    }

    /// Records appended so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Split the temp file into shard files (or rename it, when unsharded)
    /// and return the ordered shard descriptors.
    ///
    /// Finalize is a pure repartition: the shard files concatenated in shard
    /// order are byte-identical to the temp file. Fails with
    /// [`StoreError::AlreadyFinalized`] on a second call.
    pub fn finalize(&mut self) -> StoreResult<Vec<ShardInfo>> {
        let file = self.file.take().ok_or(StoreError::AlreadyFinalized)?;
        // Close the temp handle before renaming or re-reading it.
        file.into_inner().map_err(|e| e.into_error())?.sync_all()?;

        let total = self.count;
        if self.num_shards <= 1 {
            let target = self.dir.join(DOCS_FILE);
            fs::rename(&self.tmp_path, &target)?;
            info!(records = total, path = %target.display(), "finalized unsharded");
            return Ok(vec![ShardInfo {
                path: target,
                size: total,
                offset: 0,
            }]);
        }

        let plan = ShardPlan::new(total, self.num_shards);
        let paths = shard_write_paths(&self.dir, self.num_shards);
        let record_len = record_size(self.dim) as u64;

        let mut src = File::open(&self.tmp_path)?;
        let mut buf = vec![0u8; COPY_BUF_SIZE.min((total.max(1) * record_len) as usize)];
        let mut shards = Vec::with_capacity(self.num_shards);

        for (slice, path) in plan.slices().iter().zip(&paths) {
            let mut dst = File::create(path)?;
            copy_exact(&mut src, &mut dst, slice.size * record_len, &mut buf)?;
            dst.sync_all()?;
            shards.push(ShardInfo {
                path: path.clone(),
                size: slice.size,
                offset: slice.offset,
            });
        }

        fs::remove_file(&self.tmp_path)?;
        info!(
            records = total,
            shards = self.num_shards,
            "finalized sharded dataset"
        );
        Ok(shards)
    }
}
