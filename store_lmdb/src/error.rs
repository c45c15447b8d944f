use rewind_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("schema version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
}

impl From<LmdbError> for StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(what) => StoreError::NotFound(what),
            LmdbError::Serialization(msg) => StoreError::Serialization(msg),
            LmdbError::SchemaMismatch { .. } => StoreError::Corruption(e.to_string()),
            LmdbError::Heed(_) | LmdbError::Io(_) => StoreError::Backend(e.to_string()),
        }
    }
}
