//! Plain-text directory source: each matching file is one document.

use globset::GlobBuilder;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Load document texts from a directory of plain-text files.
///
/// Files are matched against `glob` (relative to `dir`, `**` crosses
/// directories) and read in sorted path order so runs are deterministic.
/// Unreadable or non-UTF-8 files and files with only whitespace are
/// skipped; `max_docs` caps the documents loaded.
pub fn load_text_dir(dir: &Path, glob: &str, max_docs: Option<usize>) -> PipelineResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(PipelineError::SourceNotFound {
            path: dir.to_path_buf(),
        });
    }

    let matcher = GlobBuilder::new(glob)
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let mut paths: Vec<_> = ignore::WalkBuilder::new(dir)
        .standard_filters(false)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.strip_prefix(dir)
                .map(|rel| matcher.is_match(rel))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut docs = Vec::new();
    for path in &paths {
        let Ok(text) = fs::read_to_string(path) else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        docs.push(text);
        if max_docs.is_some_and(|cap| docs.len() >= cap) {
            break;
        }
    }

    debug!(dir = %dir.display(), files = paths.len(), docs = docs.len(), "loaded text dir");
    Ok(docs)
}
