//! The streaming and parallel write paths must produce byte-identical shard
//! sets for the same logical vector sequence and the same (dim, shards).

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use vecset::{write_vec_shards, ShardInfo, StreamingVecWriter};

/// Deterministic mock vectors: record `i` is `[i * 1e-4; dim]` with the
/// index wrapped to keep values exact in f32.
fn mock_vectors(count: usize, dim: usize) -> Vec<Vec<f32>> {
    (0..count)
        .map(|i| vec![(i % 10_000) as f32 * 1e-4; dim])
        .collect()
}

fn stream_write(
    dir: &Path,
    vectors: &[Vec<f32>],
    dim: usize,
    num_shards: usize,
    batch_size: usize,
) -> Vec<ShardInfo> {
    let mut writer = StreamingVecWriter::create(dir, dim, num_shards).unwrap();
    for batch in vectors.chunks(batch_size) {
        writer.append_batch(batch).unwrap();
    }
    writer.finalize().unwrap()
}

fn assert_byte_identical(streaming: &[ShardInfo], parallel: &[ShardInfo]) {
    assert_eq!(streaming.len(), parallel.len());
    for (s, p) in streaming.iter().zip(parallel) {
        assert_eq!(s.size, p.size);
        assert_eq!(s.offset, p.offset);
        assert_eq!(
            s.path.file_name(),
            p.path.file_name(),
            "shard naming must agree across write paths"
        );
        let s_bytes = fs::read(&s.path).unwrap();
        let p_bytes = fs::read(&p.path).unwrap();
        assert_eq!(s_bytes, p_bytes, "shard {:?} differs", s.path.file_name());
    }
}

#[test]
fn equivalence_across_shard_counts_and_batch_sizes() {
    let cases = [
        // (count, dim, shards, batch)
        (0, 4, 1, 7),
        (1, 4, 1, 1),
        (10, 4, 1, 3),
        (10, 4, 3, 3),
        (10, 4, 16, 4), // more shards than records
        (1000, 8, 7, 64),
        (257, 3, 5, 100),
    ];

    for (count, dim, shards, batch) in cases {
        let vectors = mock_vectors(count, dim);
        let stream_dir = TempDir::new().unwrap();
        let parallel_dir = TempDir::new().unwrap();

        let streamed = stream_write(stream_dir.path(), &vectors, dim, shards, batch);
        let written = write_vec_shards(parallel_dir.path(), &vectors, dim, shards).unwrap();

        assert_byte_identical(&streamed, &written);
        assert_eq!(
            streamed.iter().map(|s| s.size).sum::<u64>(),
            count as u64,
            "case ({count}, {dim}, {shards}, {batch})"
        );
    }
}

#[test]
fn concatenated_shards_equal_single_file() {
    let vectors = mock_vectors(100, 6);

    let sharded_dir = TempDir::new().unwrap();
    let single_dir = TempDir::new().unwrap();
    let sharded = stream_write(sharded_dir.path(), &vectors, 6, 4, 9);
    let single = stream_write(single_dir.path(), &vectors, 6, 1, 100);

    let mut concatenated = Vec::new();
    for shard in &sharded {
        concatenated.extend(fs::read(&shard.path).unwrap());
    }
    assert_eq!(concatenated, fs::read(&single[0].path).unwrap());
}

#[test]
fn finalize_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let vectors = mock_vectors(20, 2);
    stream_write(temp.path(), &vectors, 2, 4, 6);

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(names.iter().all(|n| !n.ends_with(".tmp")), "{names:?}");
    assert_eq!(names.iter().filter(|n| n.ends_with(".vec")).count(), 4);
}
