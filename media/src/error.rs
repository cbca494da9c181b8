use std::path::PathBuf;

use thiserror::Error;

/// Errors from media decoding, encoding, and external tool invocation.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{tool} not found; ensure it is installed and on PATH")]
    ToolNotFound { tool: String },

    #[error("{tool} failed: {stderr}")]
    ToolFailed { tool: String, stderr: String },

    #[error("unsupported wav format in {path}: {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
