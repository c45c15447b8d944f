//! Cryptographic primitives used by rewind.
//!
//! - **SHA-256** (`tmhash`) for header, validator and parameter hashes
//! - **Simple merkle** root over a list of leaves (RFC 6962 prefixes)
//! - **Ed25519** key derivation for validator keys
//! - Validator address derivation (first 20 bytes of the public key hash)

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{derive_address, ADDRESS_LEN};
pub use hash::{consensus_params_hash, merkle_root, sha256, validator_set_hash};
pub use keys::{keypair_from_private, keypair_from_seed, public_from_private};
