//! Generation run configuration (YAML file + CLI overrides).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::chunking::{ChunkOptions, Granularity};
use crate::error::{PipelineError, PipelineResult};
use crate::sources::SourceKind;

/// Full configuration for one generation run.
///
/// Every field has a default so a config file only needs to name what it
/// changes; CLI flags override on top of the parsed file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateConfig {
    /// Document source: `wikipedia`, `text_dir`, or `messages`
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub wikipedia: WikipediaConfig,
    #[serde(default)]
    pub text_dir: TextDirConfig,
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Chunking unit: `sentence` (default) or `paragraph`
    #[serde(default)]
    pub granularity: Option<String>,
    #[serde(default)]
    pub paragraph_delimiter: Option<String>,
    #[serde(default)]
    pub min_sentence_len: Option<usize>,
    #[serde(default)]
    pub min_paragraph_len: Option<usize>,

    #[serde(default)]
    pub embedder: EmbedderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Wikipedia-style JSONL dump source settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    pub path: Option<PathBuf>,
    pub text_key: String,
    pub max_docs: Option<usize>,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        WikipediaConfig {
            path: None,
            text_key: "text".to_string(),
            max_docs: None,
        }
    }
}

/// Plain-text directory source settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextDirConfig {
    pub path: Option<PathBuf>,
    pub glob: String,
    pub max_docs: Option<usize>,
}

impl Default for TextDirConfig {
    fn default() -> Self {
        TextDirConfig {
            path: None,
            glob: "**/*.txt".to_string(),
            max_docs: None,
        }
    }
}

/// Line-delimited message file source settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub path: Option<PathBuf>,
    pub max_docs: Option<usize>,
}

/// Embedding endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub url: String,
    pub model_name: String,
    pub dim: usize,
    pub batch_size: usize,
    pub timeout_sec: u64,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        EmbedderConfig {
            url: "http://localhost:8091".to_string(),
            model_name: "bge_m3".to_string(),
            dim: 1024,
            batch_size: 1000,
            timeout_sec: 120,
        }
    }
}

/// Output dataset settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base output directory
    pub output_dir: PathBuf,
    /// Dataset name; when set the dataset lands in `output_dir/name`
    pub name: Option<String>,
    /// Query vectors to carve off the front of the run
    pub num_query_vectors: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            output_dir: PathBuf::from("data/embeddings"),
            name: None,
            num_query_vectors: 5000,
        }
    }
}

impl GenerateConfig {
    /// Parse a YAML config file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::SourceNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PipelineError::Io(e)
            }
        })?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// The configured source, or an error when unset/unknown.
    pub fn source_kind(&self) -> PipelineResult<SourceKind> {
        match &self.source {
            Some(name) => name.parse(),
            None => Err(PipelineError::Config {
                reason: "source must be set (wikipedia, text_dir, or messages)".to_string(),
            }),
        }
    }

    /// The configured granularity, defaulting to sentence.
    pub fn chunk_granularity(&self) -> PipelineResult<Granularity> {
        match &self.granularity {
            Some(name) => name.parse(),
            None => Ok(Granularity::Sentence),
        }
    }

    /// Chunking knobs with config overrides applied.
    pub fn chunk_options(&self) -> ChunkOptions {
        let mut options = ChunkOptions::default();
        if let Some(delimiter) = &self.paragraph_delimiter {
            options.paragraph_delimiter = delimiter.clone();
        }
        if let Some(min) = self.min_sentence_len {
            options.min_sentence_len = min;
        }
        if let Some(min) = self.min_paragraph_len {
            options.min_paragraph_len = min;
        }
        options
    }

    /// Directory the dataset files land in.
    pub fn dataset_dir(&self) -> PathBuf {
        match &self.output.name {
            Some(name) => self.output.output_dir.join(name.trim()),
            None => self.output.output_dir.clone(),
        }
    }

    /// Path of the selected source (manifest provenance).
    pub fn source_path(&self, kind: SourceKind) -> Option<&PathBuf> {
        match kind {
            SourceKind::Wikipedia => self.wikipedia.path.as_ref(),
            SourceKind::TextDir => self.text_dir.path.as_ref(),
            SourceKind::Messages => self.messages.path.as_ref(),
        }
    }
}
