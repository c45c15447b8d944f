//! `FilePV`: a validator key plus its signing checkpoint, both on disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use rewind_types::PrivateKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{FilePVKey, LastSignState, PrivvalError};

/// File-backed private validator.
pub struct FilePV {
    pub key: FilePVKey,
    pub last_sign_state: LastSignState,
}

impl FilePV {
    /// Create a validator from a private key with a blank checkpoint.
    /// Nothing is written until [`FilePV::save`].
    pub fn new(private: PrivateKey, key_path: &Path, state_path: &Path) -> Self {
        Self {
            key: FilePVKey::new(private, key_path),
            last_sign_state: LastSignState::new(state_path),
        }
    }

    /// Load both files. Either one missing or malformed is an error.
    pub fn load(key_path: &Path, state_path: &Path) -> Result<Self, PrivvalError> {
        let key = FilePVKey::load(key_path)?;
        let last_sign_state = LastSignState::load(state_path)?;
        Ok(Self {
            key,
            last_sign_state,
        })
    }

    pub fn save(&self) -> Result<(), PrivvalError> {
        self.key.save()?;
        self.last_sign_state.save()
    }

    /// Clear last-signed height, round, step and signature, and persist.
    ///
    /// Only the state file is rewritten; the key file is left untouched.
    pub fn reset(&mut self) -> Result<(), PrivvalError> {
        let previous = self.last_sign_state.height;
        self.last_sign_state.clear();
        self.last_sign_state.save()?;
        tracing::info!(
            address = %self.key.address,
            previous_height = previous,
            path = %self.last_sign_state.path().display(),
            "reset private validator sign state"
        );
        Ok(())
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PrivvalError> {
    let text = fs::read_to_string(path).map_err(|source| PrivvalError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PrivvalError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON via a sibling temp file and rename, so a
/// crash never leaves a half-written file behind.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PrivvalError> {
    let write_err = |source| PrivvalError::Write {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_vec_pretty(value).map_err(|source| PrivvalError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let mut file = fs::File::create(tmp_path).map_err(write_err)?;
    file.write_all(&json).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);
    fs::rename(tmp_path, path).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignStep;
    use rewind_types::HexBytes;

    fn write_signed_pv(dir: &Path) -> FilePV {
        let mut pv = FilePV::new(
            PrivateKey([11u8; 32]),
            &dir.join("key.json"),
            &dir.join("state.json"),
        );
        pv.last_sign_state.height = 100;
        pv.last_sign_state.round = 2;
        pv.last_sign_state.step = SignStep::Precommit;
        pv.last_sign_state.signature = Some(HexBytes::new(vec![9; 64]));
        pv.last_sign_state.signbytes = HexBytes::new(vec![1, 2, 3]);
        pv.save().unwrap();
        pv
    }

    #[test]
    fn load_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let pv = write_signed_pv(dir.path());
        let loaded = FilePV::load(&dir.path().join("key.json"), &dir.path().join("state.json"))
            .unwrap();
        assert_eq!(loaded.key.address, pv.key.address);
        assert_eq!(loaded.last_sign_state.height, 100);
        assert_eq!(loaded.last_sign_state.step, SignStep::Precommit);
    }

    #[test]
    fn reset_persists_zero_state() {
        let dir = tempfile::tempdir().unwrap();
        write_signed_pv(dir.path());
        let key_path = dir.path().join("key.json");
        let state_path = dir.path().join("state.json");
        let key_before = fs::read(&key_path).unwrap();

        let mut pv = FilePV::load(&key_path, &state_path).unwrap();
        pv.reset().unwrap();

        let reloaded = FilePV::load(&key_path, &state_path).unwrap();
        assert!(reloaded.last_sign_state.is_zero());
        assert_eq!(fs::read(&key_path).unwrap(), key_before);
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        write_signed_pv(dir.path());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn missing_state_file_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let pv = write_signed_pv(dir.path());
        fs::remove_file(pv.last_sign_state.path()).unwrap();
        assert!(matches!(
            FilePV::load(&dir.path().join("key.json"), &dir.path().join("state.json")),
            Err(PrivvalError::Read { .. })
        ));
    }
}
