//! Error types surfaced to callers.
//!
//! Only malformed caller input reaches these; geometry and classification
//! problems are recovered inside the pipeline.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no such symbol: {0}")]
    UnknownLabel(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("malformed ink document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
