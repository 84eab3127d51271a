//! End-to-end generation driver: documents → chunks → vectors → dataset.

use chrono::{SecondsFormat, Utc};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use vecset_store::{
    write_vec_file, DatasetManifest, ShardInfo, StreamingVecWriter, MANIFEST_FILE, QUERIES_FILE,
};

use crate::chunking::chunk_text;
use crate::config::GenerateConfig;
use crate::embed::EmbedClient;
use crate::error::{PipelineError, PipelineResult};
use crate::sources::{load_jsonl, load_messages, load_text_dir, SourceKind};

/// Batches between progress log lines.
const PROGRESS_EVERY: usize = 5;

/// What a generation run produced.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    /// Dataset directory
    pub dataset_dir: PathBuf,
    /// Document vectors written
    pub num_docs: u64,
    /// Query vectors written
    pub num_queries: u64,
    /// Shard layout of the document vectors
    pub shards: Vec<ShardInfo>,
    /// Manifest path
    pub manifest_path: PathBuf,
}

/// Load documents from the configured source.
pub fn load_documents(config: &GenerateConfig, kind: SourceKind) -> PipelineResult<Vec<String>> {
    let path = config
        .source_path(kind)
        .ok_or_else(|| PipelineError::MissingSourcePath {
            source_name: kind.as_str().to_string(),
        })?;
    match kind {
        SourceKind::Wikipedia => {
            load_jsonl(path, &config.wikipedia.text_key, config.wikipedia.max_docs)
        }
        SourceKind::TextDir => load_text_dir(path, &config.text_dir.glob, config.text_dir.max_docs),
        SourceKind::Messages => load_messages(path, config.messages.max_docs),
    }
}

/// Run a full generation: chunk every document, embed batch by batch while
/// streaming vectors to disk, then finalize shards, write `queries.vec`,
/// and write the manifest.
///
/// Query vectors are the first `num_query_vectors` embeddings of the run,
/// captured before they hit the document stream.
pub fn run_generate(config: &GenerateConfig, num_shards: usize) -> PipelineResult<GenerateSummary> {
    let kind = config.source_kind()?;
    let granularity = config.chunk_granularity()?;
    let options = config.chunk_options();

    let documents = load_documents(config, kind)?;
    info!(documents = documents.len(), source = %kind, "loaded documents");

    let mut chunks: Vec<String> = Vec::new();
    for document in &documents {
        chunks.extend(chunk_text(document, granularity, &options));
    }
    info!(chunks = chunks.len(), granularity = %granularity, "chunked documents");
    if chunks.is_empty() {
        return Err(PipelineError::Config {
            reason: "no chunks to embed".to_string(),
        });
    }

    let embedder = &config.embedder;
    if embedder.batch_size == 0 {
        return Err(PipelineError::Config {
            reason: "embedder.batch_size must be > 0".to_string(),
        });
    }
    let client = EmbedClient::new(
        &embedder.url,
        &embedder.model_name,
        embedder.dim,
        Duration::from_secs(embedder.timeout_sec),
    )?;

    let dataset_dir = config.dataset_dir();
    let dim = embedder.dim;
    let num_queries_wanted = config.output.num_query_vectors as usize;
    info!(
        dir = %dataset_dir.display(),
        dim,
        shards = num_shards.max(1),
        batch_size = embedder.batch_size,
        "streaming embeddings to disk"
    );

    let mut writer = StreamingVecWriter::create(&dataset_dir, dim, num_shards)?;
    let mut query_vectors: Vec<Vec<f32>> = Vec::new();
    let total_chunks = chunks.len();
    let total_batches = total_chunks.div_ceil(embedder.batch_size);
    let started = Instant::now();

    for (batch_idx, batch) in chunks.chunks(embedder.batch_size).enumerate() {
        let vectors = client.embed_batch(batch)?;

        if query_vectors.len() < num_queries_wanted {
            let need = num_queries_wanted - query_vectors.len();
            query_vectors.extend(vectors.iter().take(need).cloned());
        }

        let written = writer.append_batch(&vectors)?;

        if (batch_idx + 1) % PROGRESS_EVERY == 0 || batch_idx + 1 == total_batches {
            let elapsed = started.elapsed().as_secs_f64();
            let per_sec = if elapsed > 0.0 {
                written as f64 / elapsed
            } else {
                0.0
            };
            let eta = if per_sec > 0.0 {
                (total_chunks as u64 - written) as f64 / per_sec
            } else {
                0.0
            };
            info!(
                written,
                total = total_chunks,
                batch = batch_idx + 1,
                batches = total_batches,
                vectors_per_sec = per_sec as u64,
                eta_sec = eta as u64,
                "embedding progress"
            );
        }
    }

    let num_docs = writer.count();
    let shards = writer.finalize()?;

    let queries_path = dataset_dir.join(QUERIES_FILE);
    write_vec_file(&queries_path, &query_vectors, dim)?;
    info!(queries = query_vectors.len(), path = %queries_path.display(), "wrote query vectors");

    let mut manifest = DatasetManifest::new(dim, num_docs);
    manifest.source = Some(kind.as_str().to_string());
    manifest.source_path = config
        .source_path(kind)
        .map(|p| p.display().to_string());
    manifest.granularity = Some(granularity.as_str().to_string());
    manifest.model_name = Some(embedder.model_name.clone());
    manifest.num_query_vectors = Some(query_vectors.len() as u64);
    manifest.dataset_name = config.output.name.as_ref().map(|n| n.trim().to_string());
    manifest.created_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    if num_shards > 1 {
        manifest.set_shard_layout(&shards);
    }

    let manifest_path = dataset_dir.join(MANIFEST_FILE);
    manifest.save(&manifest_path)?;
    info!(path = %manifest_path.display(), num_docs, "wrote manifest");

    Ok(GenerateSummary {
        dataset_dir,
        num_docs,
        num_queries: query_vectors.len() as u64,
        shards,
        manifest_path,
    })
}
