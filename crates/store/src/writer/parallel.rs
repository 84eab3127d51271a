//! Parallel shard writer over a fully materialized vector sequence.

use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::codec::write_vec_file;
use crate::error::{StoreError, StoreResult};
use crate::layout::{shard_write_paths, ShardInfo, ShardPlan};

/// Partition `vectors` per the shard plan and write every shard file
/// concurrently, one task per shard.
///
/// Tasks are independent: each owns its output file and a disjoint read-only
/// slice of the source, so no locking is involved and completion order is
/// irrelevant. The rayon pool bounds concurrency to available parallelism.
/// Output is byte-identical to [`crate::StreamingVecWriter`] given the same
/// vectors, dimension, and shard count.
pub fn write_vec_shards(
    dir: &Path,
    vectors: &[Vec<f32>],
    dim: usize,
    num_shards: usize,
) -> StoreResult<Vec<ShardInfo>> {
    if dim == 0 {
        return Err(StoreError::InvalidDimension { dim });
    }
    // Validate up front so a bad vector doesn't leave some shards written.
    for vector in vectors {
        if vector.len() != dim {
            return Err(StoreError::DimensionMismatch {
                expected: dim,
                got: vector.len(),
            });
        }
    }

    fs::create_dir_all(dir)?;
    let plan = ShardPlan::new(vectors.len() as u64, num_shards);
    let paths = shard_write_paths(dir, plan.num_shards());
    debug!(
        records = vectors.len(),
        shards = plan.num_shards(),
        "writing shards in parallel"
    );

    plan.slices()
        .par_iter()
        .zip(paths.par_iter())
        .map(|(slice, path)| {
            let start = slice.offset as usize;
            let end = start + slice.size as usize;
            write_vec_file(path, &vectors[start..end], dim)?;
            Ok(ShardInfo {
                path: path.clone(),
                size: slice.size,
                offset: slice.offset,
            })
        })
        .collect()
}
