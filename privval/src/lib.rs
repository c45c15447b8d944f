//! File-backed validator signing key and signing checkpoint.
//!
//! A validator keeps two JSON files: the key file (address and Ed25519 key
//! pair) and the state file recording the last height/round/step it signed.
//! The state file is what prevents double-signing after a restart, so it has
//! to be reset whenever the chain state is rolled back past a signed height.

pub mod config;
pub mod error;
pub mod file_pv;
pub mod key;
pub mod sign_state;

mod encoding;

pub use config::{CheckpointReset, PrivValidatorConfig};
pub use error::{CheckpointError, PrivvalError};
pub use file_pv::FilePV;
pub use key::FilePVKey;
pub use sign_state::{LastSignState, SignStep};
