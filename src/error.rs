use std::path::PathBuf;

use thiserror::Error;

use crate::tree::Span;

/// Everything that can go wrong while loading inputs or walking a tree.
///
/// `MalformedTree` is recoverable: the walker records it and keeps scoring
/// the rest of the tree. `NestingImbalance` is a walker bug and aborts the
/// whole tree.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("malformed tree at {span}: {reason}")]
    MalformedTree { span: Span, reason: String },

    #[error("nesting imbalance: {detail}")]
    NestingImbalance { detail: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Whether the caller may skip the offending input and carry on.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NestingImbalance { .. } => false,
            Self::File { source, .. } => source.is_recoverable(),
            _ => true,
        }
    }

    /// Attach the input file this error came from.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
