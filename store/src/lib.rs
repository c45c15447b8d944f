//! Abstract storage traits for node chain state.
//!
//! A node persists two records that are written independently: the block
//! store (append-only block history) and the state store (the latest
//! consensus state plus historical validator sets and consensus params).
//! Every backend (LMDB, in-memory for testing) implements these traits and the
//! repair logic depends only on the traits.

pub mod block;
pub mod error;
pub mod state;

pub use block::BlockStore;
pub use error::StoreError;
pub use state::{validators_save_heights, StateStore};
