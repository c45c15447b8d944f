//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator of the rollback (state store, block store, signing
//! checkpoint) is abstracted behind a trait. This crate provides
//! test-friendly implementations that:
//! - Keep everything in memory and never touch the filesystem
//! - Count mutations so tests can assert "nothing was written"
//! - Can be told to fail specific operations
//!
//! Usage: swap real implementations for nullables in tests.

pub mod checkpoint;
pub mod fixture;
pub mod store;

pub use checkpoint::NullCheckpoint;
pub use fixture::ChainFixture;
pub use store::{NullBlockStore, NullStateStore};
