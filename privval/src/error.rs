use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrivvalError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid key file {path}: {reason}")]
    InvalidKey { path: PathBuf, reason: String },

    #[error("invalid sign step: {0}")]
    InvalidStep(u8),
}

/// Failure to reset the signing checkpoint, split by which stage failed.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to load private validator file: {0}")]
    Load(#[source] PrivvalError),

    #[error("failed to reset private validator file: {0}")]
    Reset(#[source] PrivvalError),
}
