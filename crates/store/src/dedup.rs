//! Offline duplicate removal and re-sharding for an existing dataset.
//!
//! Streams every shard of a dataset in order, drops records whose raw bytes
//! have been seen before (first occurrence wins, in shard-then-offset
//! order), rewrites the unique set across the original shard count, and
//! updates the manifest. Originals are backed up once per file with a
//! `.pre-dedup` suffix; a run that finds no duplicates touches nothing.
//!
//! Identity is the 128-bit xxh3 digest of the raw record, so distinct NaN
//! payloads and `+0.0`/`-0.0` are distinct records. Memory use is one copy
//! buffer plus one digest per unique record, independent of vector bytes.
//!
//! A process killed mid-apply can leave `_dedup_tmp.vec` and partially
//! rewritten shards; recover from the `.pre-dedup` backups by hand.

use rustc_hash::FxHashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_128;

use crate::codec::{copy_exact, read_record_into, record_size};
use crate::error::{StoreError, StoreResult};
use crate::layout::{resolve_shard_paths, shard_write_paths, ShardPlan, MANIFEST_FILE};
use crate::manifest::DatasetManifest;
use crate::writer::COPY_BUF_SIZE;

/// Suffix appended to each original file backed up before rewriting.
pub const BACKUP_SUFFIX: &str = ".pre-dedup";

/// Temp file holding the unique records during an apply pass.
pub const DEDUP_TMP_FILE: &str = "_dedup_tmp.vec";

/// Dedup run options.
#[derive(Debug, Clone)]
pub struct DedupOptions {
    /// Count duplicates without mutating anything
    pub dry_run: bool,
    /// Back up originals before rewriting (`.pre-dedup` siblings)
    pub backup: bool,
}

impl Default for DedupOptions {
    fn default() -> Self {
        DedupOptions {
            dry_run: false,
            backup: true,
        }
    }
}

/// Outcome of a dedup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupReport {
    /// Records scanned across all shards
    pub total: u64,
    /// Distinct records
    pub unique: u64,
    /// Records dropped (or, in dry-run, that would be dropped)
    pub duplicates: u64,
    /// Whether shard files and the manifest were rewritten
    pub resharded: bool,
}

/// Deduplicate a dataset directory in place.
///
/// Dry-run scans and reports without touching disk. Apply streams unique
/// records to a temp file, and only if duplicates were found: backs up the
/// originals (unless disabled), re-shards the unique set over the original
/// shard count, and updates `num_docs`/`shard_sizes`/`shard_doc_offsets`
/// in the manifest, leaving every other manifest field untouched. Running
/// apply twice in a row is a no-op the second time.
pub fn dedup_dataset(dir: &Path, options: &DedupOptions) -> StoreResult<DedupReport> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let mut manifest = DatasetManifest::load(&manifest_path)?;
    if manifest.dim == 0 {
        return Err(StoreError::InvalidDimension { dim: 0 });
    }
    let num_shards = manifest.effective_num_shards();
    let record_len = record_size(manifest.dim);

    let shard_paths = resolve_shard_paths(dir, num_shards);
    for path in &shard_paths {
        if !path.exists() {
            return Err(StoreError::MissingShardFile { path: path.clone() });
        }
    }
    debug!(
        dir = %dir.display(),
        shards = shard_paths.len(),
        dim = manifest.dim,
        "dedup scan starting"
    );

    if options.dry_run {
        let report = scan_duplicates(&shard_paths, record_len)?;
        info!(
            total = report.total,
            duplicates = report.duplicates,
            unique = report.unique,
            "dry-run: no files modified"
        );
        return Ok(report);
    }

    // Single pass: stream every not-yet-seen record to the temp file in
    // first-seen order.
    let tmp_path = dir.join(DEDUP_TMP_FILE);
    let mut seen: FxHashSet<u128> = FxHashSet::default();
    let mut total = 0u64;
    let mut unique = 0u64;
    let mut duplicates = 0u64;
    {
        let mut out = BufWriter::new(File::create(&tmp_path)?);
        let mut record = vec![0u8; record_len];
        for path in &shard_paths {
            let mut reader = BufReader::new(File::open(path)?);
            while read_record_into(&mut reader, &mut record)? {
                total += 1;
                if seen.insert(xxh3_128(&record)) {
                    out.write_all(&record)?;
                    unique += 1;
                } else {
                    duplicates += 1;
                }
            }
        }
        out.flush()?;
    }

    if duplicates == 0 {
        fs::remove_file(&tmp_path)?;
        info!(total, "no duplicates found, nothing to do");
        return Ok(DedupReport {
            total,
            unique,
            duplicates: 0,
            resharded: false,
        });
    }
    info!(total, unique, duplicates, "rewriting dataset");

    if options.backup {
        for path in &shard_paths {
            backup_once(path)?;
        }
        backup_once(&manifest_path)?;
    }

    // Re-shard the unique set over the ORIGINAL shard count.
    let plan = ShardPlan::new(unique, num_shards);
    let write_paths = shard_write_paths(dir, num_shards);
    let mut src = File::open(&tmp_path)?;
    let mut buf = vec![0u8; COPY_BUF_SIZE.min((unique.max(1) as usize) * record_len.max(1))];
    for (slice, path) in plan.slices().iter().zip(&write_paths) {
        let mut dst = File::create(path)?;
        copy_exact(&mut src, &mut dst, slice.size * record_len as u64, &mut buf)?;
        dst.sync_all()?;
    }
    fs::remove_file(&tmp_path)?;

    manifest.num_docs = unique;
    manifest.shard_sizes = Some(plan.sizes());
    manifest.shard_doc_offsets = Some(plan.offsets());
    manifest.save(&manifest_path)?;
    info!(num_docs = unique, shards = num_shards, "manifest updated");

    Ok(DedupReport {
        total,
        unique,
        duplicates,
        resharded: true,
    })
}

/// Count total/duplicate records across the shard set without writing.
fn scan_duplicates(shard_paths: &[PathBuf], record_len: usize) -> StoreResult<DedupReport> {
    let mut seen: FxHashSet<u128> = FxHashSet::default();
    let mut total = 0u64;
    let mut duplicates = 0u64;
    let mut record = vec![0u8; record_len];

    for path in shard_paths {
        let mut reader = BufReader::new(File::open(path)?);
        while read_record_into(&mut reader, &mut record)? {
            total += 1;
            if !seen.insert(xxh3_128(&record)) {
                duplicates += 1;
            }
        }
    }

    Ok(DedupReport {
        total,
        unique: total - duplicates,
        duplicates,
        resharded: false,
    })
}

/// Copy `path` to its `.pre-dedup` sibling unless that backup already
/// exists. Repeated runs never overwrite an earlier backup.
fn backup_once(path: &Path) -> StoreResult<()> {
    let backup = backup_path(path);
    if !backup.exists() {
        fs::copy(path, &backup)?;
        debug!(backup = %backup.display(), "backed up");
    }
    Ok(())
}

/// Backup sibling for a dataset file: the same name with [`BACKUP_SUFFIX`]
/// appended (`docs.vec` → `docs.vec.pre-dedup`).
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(BACKUP_SUFFIX);
    path.with_file_name(name)
}
