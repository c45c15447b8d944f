//! LMDB storage backend.
//!
//! Implements `StateStore` and `BlockStore` from `rewind-store` using the
//! `heed` LMDB bindings. The two stores live in separate environments, as a
//! node keeps them in separate directories and writes them independently.
//! Records are bincode-encoded; heights are big-endian keys so cursor order
//! matches height order.

pub mod block;
pub mod environment;
pub mod error;
pub mod state;

pub use block::LmdbBlockStore;
pub use environment::{open_env, DEFAULT_MAP_SIZE, SCHEMA_VERSION};
pub use error::LmdbError;
pub use state::LmdbStateStore;

use rewind_types::Height;

pub(crate) fn height_key(height: Height) -> [u8; 8] {
    height.to_be_bytes()
}

pub(crate) fn key_height(key: &[u8]) -> Result<Height, LmdbError> {
    let arr: [u8; 8] = key
        .try_into()
        .map_err(|_| LmdbError::Serialization("invalid height key length".into()))?;
    Ok(Height::from_be_bytes(arr))
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(value).map_err(|e| LmdbError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}
