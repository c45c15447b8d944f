//! Fundamental types for the rewind workspace.
//!
//! This crate defines the records that the state store and block store persist:
//! the consensus [`State`], [`BlockMeta`] headers, historical [`ValidatorSet`]s and
//! [`ConsensusParams`], plus the byte and time newtypes they are built from.

pub mod block;
pub mod error;
pub mod hash;
pub mod keys;
pub mod params;
pub mod state;
pub mod time;
pub mod validator;

pub use block::{BlockId, BlockMeta, Header, PartSetHeader};
pub use error::TypesError;
pub use hash::HexBytes;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use params::{BlockParams, ConsensusParams, EvidenceParams, ValidatorParams, VersionParams};
pub use state::{ConsensusVersion, State, Version, BLOCK_PROTOCOL};
pub use time::Timestamp;
pub use validator::{Validator, ValidatorSet};

/// Block height. Signed to match the persisted record layout, where `-1`
/// never appears on disk but arithmetic below genesis must not wrap.
pub type Height = i64;
