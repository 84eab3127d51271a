//! Wikipedia-style JSONL dump source: one JSON object per line, document
//! text under a configurable key.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Load document texts from a JSONL dump.
///
/// Blank lines, lines that fail to parse, and objects without a non-empty
/// string at `text_key` are skipped; `max_docs` caps the documents loaded.
pub fn load_jsonl(
    path: &Path,
    text_key: &str,
    max_docs: Option<usize>,
) -> PipelineResult<Vec<String>> {
    if !path.is_file() {
        return Err(PipelineError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let reader = BufReader::new(File::open(path)?);
    let mut docs = Vec::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let text = serde_json::from_str::<serde_json::Value>(line)
            .ok()
            .and_then(|v| v.get(text_key).and_then(|t| t.as_str().map(String::from)));
        match text {
            Some(text) if !text.is_empty() => {
                docs.push(text);
                if max_docs.is_some_and(|cap| docs.len() >= cap) {
                    break;
                }
            }
            _ => skipped += 1,
        }
    }

    debug!(path = %path.display(), docs = docs.len(), skipped, "loaded jsonl dump");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_lines(dir: &TempDir, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.path().join("dump.jsonl");
        let mut f = File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn test_loads_text_key() {
        let temp = TempDir::new().unwrap();
        let path = write_lines(
            &temp,
            &[
                r#"{"title": "A", "text": "alpha body"}"#,
                r#"{"title": "B", "text": "beta body"}"#,
            ],
        );

        let docs = load_jsonl(&path, "text", None).unwrap();
        assert_eq!(docs, vec!["alpha body", "beta body"]);
    }

    #[test]
    fn test_skips_bad_lines() {
        let temp = TempDir::new().unwrap();
        let path = write_lines(
            &temp,
            &[
                r#"{"text": "kept"}"#,
                "",
                "not json at all",
                r#"{"no_text_key": 1}"#,
                r#"{"text": ""}"#,
                r#"{"text": 42}"#,
            ],
        );

        let docs = load_jsonl(&path, "text", None).unwrap();
        assert_eq!(docs, vec!["kept"]);
    }

    #[test]
    fn test_max_docs_cap() {
        let temp = TempDir::new().unwrap();
        let path = write_lines(
            &temp,
            &[r#"{"text": "a"}"#, r#"{"text": "b"}"#, r#"{"text": "c"}"#],
        );

        let docs = load_jsonl(&path, "text", Some(2)).unwrap();
        assert_eq!(docs, vec!["a", "b"]);
    }

    #[test]
    fn test_custom_text_key() {
        let temp = TempDir::new().unwrap();
        let path = write_lines(&temp, &[r#"{"body": "custom"}"#]);

        let docs = load_jsonl(&path, "body", None).unwrap();
        assert_eq!(docs, vec!["custom"]);
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = load_jsonl(&temp.path().join("absent.jsonl"), "text", None);
        assert!(matches!(result, Err(PipelineError::SourceNotFound { .. })));
    }
}
