//! Crash-consistency repair for a node's persisted chain state.
//!
//! The block store and the state store are written one after the other, so
//! a crash in between leaves the block store one block ahead. [`rollback`]
//! tells that benign case apart from an aligned pair it can step back by
//! one height, rebuilds the previous [`State`](rewind_types::State) from
//! block metadata and the stored history, and writes it back.

pub mod alignment;
pub mod error;
pub mod reconstruct;
pub mod rollback;
pub mod version;

pub use alignment::{classify, StoreAlignment, StoreStatus};
pub use error::{ErrorKind, RollbackError};
pub use reconstruct::{reconstruct, RollbackInputs};
pub use rollback::{rollback, Rollback, RollbackOutcome};
pub use version::BuildVersion;
