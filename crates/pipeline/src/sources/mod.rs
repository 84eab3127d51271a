//! Document sources
//!
//! Each source produces a sequence of raw document strings; everything
//! downstream (chunking, embedding, storage) is source-agnostic.

mod jsonl;
mod messages;
mod text_dir;

pub use jsonl::load_jsonl;
pub use messages::load_messages;
pub use text_dir::load_text_dir;

use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// Which document source a run reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Wikipedia-style JSONL dump, one JSON object per line
    Wikipedia,
    /// Directory of plain-text files
    TextDir,
    /// Line-delimited message file
    Messages,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Wikipedia => "wikipedia",
            SourceKind::TextDir => "text_dir",
            SourceKind::Messages => "messages",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wikipedia" => Ok(SourceKind::Wikipedia),
            "text_dir" => Ok(SourceKind::TextDir),
            "messages" => Ok(SourceKind::Messages),
            other => Err(PipelineError::UnknownSource {
                name: other.to_string(),
            }),
        }
    }
}
