//! Line-delimited message file source: each non-empty line is one document.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Load documents from a message file, one per non-empty trimmed line.
pub fn load_messages(path: &Path, max_docs: Option<usize>) -> PipelineResult<Vec<String>> {
    if !path.is_file() {
        return Err(PipelineError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let mut messages = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        messages.push(line.to_string());
        if max_docs.is_some_and(|cap| messages.len() >= cap) {
            break;
        }
    }

    debug!(path = %path.display(), messages = messages.len(), "loaded message file");
    Ok(messages)
}
