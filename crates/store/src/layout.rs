//! Shard partitioning and dataset file naming
//!
//! Every writer and the dedup tool derive shard boundaries from the same
//! plan: `total / shards` records per shard, with one extra record for each
//! of the first `total % shards` shards. Downstream consumers address
//! records by (shard, offset), so this partition must be reproduced exactly
//! by every component that touches the layout.

use std::path::{Path, PathBuf};

/// Document vectors file when the dataset is unsharded.
pub const DOCS_FILE: &str = "docs.vec";

/// Query vectors file. Never sharded.
pub const QUERIES_FILE: &str = "queries.vec";

/// Side-car manifest file, one per dataset directory.
pub const MANIFEST_FILE: &str = "meta.json";

/// File name of shard `index` in a sharded dataset.
pub fn shard_file_name(index: usize) -> String {
    format!("docs-shard-{index}.vec")
}

/// One contiguous slice of the logical record sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSlice {
    /// Records in this shard
    pub size: u64,
    /// Index of the shard's first record in the logical sequence
    pub offset: u64,
}

/// Deterministic partition of `total` records into `shards` contiguous,
/// ordered, non-overlapping slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    slices: Vec<ShardSlice>,
}

impl ShardPlan {
    /// Compute the partition. A shard count of 0 is treated as 1.
    pub fn new(total: u64, shards: usize) -> Self {
        let shards = shards.max(1);
        let per_shard = total / shards as u64;
        let remainder = (total % shards as u64) as usize;

        let mut slices = Vec::with_capacity(shards);
        let mut offset = 0u64;
        for i in 0..shards {
            let size = per_shard + u64::from(i < remainder);
            slices.push(ShardSlice { size, offset });
            offset += size;
        }
        ShardPlan { slices }
    }

    /// Ordered shard slices.
    pub fn slices(&self) -> &[ShardSlice] {
        &self.slices
    }

    /// Number of shards in the plan (always ≥ 1).
    pub fn num_shards(&self) -> usize {
        self.slices.len()
    }

    /// Shard sizes in shard order.
    pub fn sizes(&self) -> Vec<u64> {
        self.slices.iter().map(|s| s.size).collect()
    }

    /// Shard record offsets in shard order.
    pub fn offsets(&self) -> Vec<u64> {
        self.slices.iter().map(|s| s.offset).collect()
    }
}

/// One written shard file and its place in the logical sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardInfo {
    /// Shard file path
    pub path: PathBuf,
    /// Records in this shard
    pub size: u64,
    /// Index of the shard's first record in the logical sequence
    pub offset: u64,
}

/// Target paths for writing a dataset with `num_shards` shards:
/// a single `docs.vec` when unsharded, else the enumerated shard files.
pub fn shard_write_paths(dir: &Path, num_shards: usize) -> Vec<PathBuf> {
    if num_shards <= 1 {
        vec![dir.join(DOCS_FILE)]
    } else {
        (0..num_shards).map(|i| dir.join(shard_file_name(i))).collect()
    }
}

/// Ordered shard paths of an existing dataset directory.
///
/// An unsharded dataset normally stores `docs.vec`; some producers write a
/// single `docs-shard-0.vec` instead, so resolution falls back to that when
/// `docs.vec` is absent.
pub fn resolve_shard_paths(dir: &Path, num_shards: usize) -> Vec<PathBuf> {
    if num_shards <= 1 {
        let single = dir.join(DOCS_FILE);
        if single.exists() {
            vec![single]
        } else {
            vec![dir.join(shard_file_name(0))]
        }
    } else {
        (0..num_shards).map(|i| dir.join(shard_file_name(i))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_even_split() {
        let plan = ShardPlan::new(10, 2);
        assert_eq!(plan.sizes(), vec![5, 5]);
        assert_eq!(plan.offsets(), vec![0, 5]);
    }

    #[test]
    fn test_remainder_goes_to_first_shards() {
        let plan = ShardPlan::new(10, 3);
        assert_eq!(plan.sizes(), vec![4, 3, 3]);
        assert_eq!(plan.offsets(), vec![0, 4, 7]);
    }

    #[test]
    fn test_fewer_records_than_shards() {
        let plan = ShardPlan::new(2, 4);
        assert_eq!(plan.sizes(), vec![1, 1, 0, 0]);
        assert_eq!(plan.offsets(), vec![0, 1, 2, 2]);
    }

    #[test]
    fn test_zero_records() {
        let plan = ShardPlan::new(0, 3);
        assert_eq!(plan.sizes(), vec![0, 0, 0]);
        assert_eq!(plan.offsets(), vec![0, 0, 0]);
    }

    #[test]
    fn test_zero_shards_treated_as_one() {
        let plan = ShardPlan::new(7, 0);
        assert_eq!(plan.num_shards(), 1);
        assert_eq!(plan.sizes(), vec![7]);
    }

    #[test]
    fn test_shard_file_name() {
        assert_eq!(shard_file_name(0), "docs-shard-0.vec");
        assert_eq!(shard_file_name(15), "docs-shard-15.vec");
    }

    #[test]
    fn test_write_paths_unsharded() {
        let dir = Path::new("/data/set");
        assert_eq!(shard_write_paths(dir, 0), vec![dir.join("docs.vec")]);
        assert_eq!(shard_write_paths(dir, 1), vec![dir.join("docs.vec")]);
    }

    #[test]
    fn test_write_paths_sharded() {
        let dir = Path::new("/data/set");
        let paths = shard_write_paths(dir, 3);
        assert_eq!(
            paths,
            vec![
                dir.join("docs-shard-0.vec"),
                dir.join("docs-shard-1.vec"),
                dir.join("docs-shard-2.vec"),
            ]
        );
    }

    #[test]
    fn test_resolve_falls_back_to_shard_zero() {
        let temp = tempfile::TempDir::new().unwrap();
        // No docs.vec on disk: unsharded resolution points at shard 0.
        let paths = resolve_shard_paths(temp.path(), 1);
        assert_eq!(paths, vec![temp.path().join("docs-shard-0.vec")]);

        std::fs::write(temp.path().join("docs.vec"), b"").unwrap();
        let paths = resolve_shard_paths(temp.path(), 1);
        assert_eq!(paths, vec![temp.path().join("docs.vec")]);
    }

    proptest! {
        #[test]
        fn prop_sizes_sum_to_total(total in 0u64..100_000, shards in 1usize..64) {
            let plan = ShardPlan::new(total, shards);
            prop_assert_eq!(plan.sizes().iter().sum::<u64>(), total);
        }

        #[test]
        fn prop_offsets_are_cumulative(total in 0u64..100_000, shards in 1usize..64) {
            let plan = ShardPlan::new(total, shards);
            let slices = plan.slices();
            prop_assert_eq!(slices[0].offset, 0);
            for pair in slices.windows(2) {
                prop_assert_eq!(pair[1].offset, pair[0].offset + pair[0].size);
            }
        }

        #[test]
        fn prop_sizes_differ_by_at_most_one(total in 0u64..100_000, shards in 1usize..64) {
            let plan = ShardPlan::new(total, shards);
            let sizes = plan.sizes();
            let min = *sizes.iter().min().unwrap();
            let max = *sizes.iter().max().unwrap();
            prop_assert!(max - min <= 1);
            // The first `total % shards` shards carry the larger size.
            let remainder = (total % shards as u64) as usize;
            for (i, &size) in sizes.iter().enumerate() {
                prop_assert_eq!(size, if i < remainder { max } else { min });
            }
        }
    }
}
