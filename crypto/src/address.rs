//! Validator address derivation.

use rewind_types::{HexBytes, PublicKey};

use crate::hash::sha256;

/// Length of a validator address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Derive a validator address: the first 20 bytes of SHA-256(pubkey).
pub fn derive_address(public_key: &PublicKey) -> HexBytes {
    let digest = sha256(public_key.as_bytes());
    HexBytes::new(&digest[..ADDRESS_LEN])
}
