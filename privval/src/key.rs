//! Validator key file.

use std::path::{Path, PathBuf};

use rewind_crypto::{derive_address, keypair_from_private};
use rewind_types::{HexBytes, KeyPair, PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

use crate::encoding::hex_bytes;
use crate::file_pv::{read_json, write_json_atomic};
use crate::PrivvalError;

/// On-disk layout of the key file.
#[derive(Serialize, Deserialize)]
struct KeyFile {
    #[serde(with = "hex_bytes")]
    address: HexBytes,
    #[serde(with = "hex_bytes")]
    pub_key: HexBytes,
    #[serde(with = "hex_bytes")]
    priv_key: HexBytes,
}

/// The validator's key pair together with where it was loaded from.
pub struct FilePVKey {
    pub address: HexBytes,
    pub keys: KeyPair,
    path: PathBuf,
}

impl FilePVKey {
    pub fn new(private: PrivateKey, path: impl Into<PathBuf>) -> Self {
        let keys = keypair_from_private(private);
        Self {
            address: derive_address(&keys.public),
            keys,
            path: path.into(),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate a key file.
    ///
    /// The stored public key and address must both derive from the private
    /// key; a mismatch means the file was edited or truncated.
    pub fn load(path: &Path) -> Result<Self, PrivvalError> {
        let file: KeyFile = read_json(path)?;
        let invalid = |reason: String| PrivvalError::InvalidKey {
            path: path.to_path_buf(),
            reason,
        };

        let private =
            PrivateKey::from_slice(file.priv_key.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let stored_public =
            PublicKey::from_slice(file.pub_key.as_bytes()).map_err(|e| invalid(e.to_string()))?;

        let key = Self::new(private, path);
        if key.keys.public != stored_public {
            return Err(invalid("public key does not match private key".to_string()));
        }
        if key.address != file.address {
            return Err(invalid(format!(
                "address {} does not match public key (expected {})",
                file.address, key.address
            )));
        }
        Ok(key)
    }

    pub fn save(&self) -> Result<(), PrivvalError> {
        let file = KeyFile {
            address: self.address.clone(),
            pub_key: HexBytes::from(self.keys.public.0),
            priv_key: HexBytes::from(self.keys.private.0),
        };
        write_json_atomic(&self.path, &file)
    }
}
