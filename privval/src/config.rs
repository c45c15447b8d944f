//! Locating the validator files and resetting the checkpoint through them.

use std::path::PathBuf;

use crate::{CheckpointError, FilePV};

/// Something that can clear the validator's double-signing checkpoint.
pub trait CheckpointReset {
    fn reset_checkpoint(&self) -> Result<(), CheckpointError>;
}

/// Paths to the validator key file and last-sign-state file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivValidatorConfig {
    pub key_file: PathBuf,
    pub state_file: PathBuf,
}

impl PrivValidatorConfig {
    pub fn new(key_file: impl Into<PathBuf>, state_file: impl Into<PathBuf>) -> Self {
        Self {
            key_file: key_file.into(),
            state_file: state_file.into(),
        }
    }
}

impl CheckpointReset for PrivValidatorConfig {
    /// Loads the files only when called, so a rollback that never needs to
    /// reset does not require them to exist.
    fn reset_checkpoint(&self) -> Result<(), CheckpointError> {
        let mut pv =
            FilePV::load(&self.key_file, &self.state_file).map_err(CheckpointError::Load)?;
        pv.reset().map_err(CheckpointError::Reset)
    }
}
