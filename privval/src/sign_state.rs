//! Last-sign-state: the double-signing checkpoint.

use std::path::{Path, PathBuf};

use rewind_types::{Height, HexBytes};
use serde::{Deserialize, Serialize};

use crate::encoding::{hex_bytes, hex_bytes_opt};
use crate::file_pv::{read_json, write_json_atomic};
use crate::PrivvalError;

/// Consensus step a signature was produced at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SignStep {
    #[default]
    None,
    Propose,
    Prevote,
    Precommit,
}

impl TryFrom<u8> for SignStep {
    type Error = PrivvalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Propose),
            2 => Ok(Self::Prevote),
            3 => Ok(Self::Precommit),
            other => Err(PrivvalError::InvalidStep(other)),
        }
    }
}

impl From<SignStep> for u8 {
    fn from(step: SignStep) -> Self {
        step as u8
    }
}

/// The last height/round/step this validator signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSignState {
    pub height: Height,
    pub round: i32,
    pub step: SignStep,
    #[serde(default, with = "hex_bytes_opt")]
    pub signature: Option<HexBytes>,
    #[serde(default, with = "hex_bytes")]
    pub signbytes: HexBytes,

    #[serde(skip)]
    path: PathBuf,
}

impl LastSignState {
    /// A fresh checkpoint that has signed nothing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            height: 0,
            round: 0,
            step: SignStep::None,
            signature: None,
            signbytes: HexBytes::empty(),
            path: path.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, PrivvalError> {
        let mut state: Self = read_json(path)?;
        state.path = path.to_path_buf();
        Ok(state)
    }

    pub fn save(&self) -> Result<(), PrivvalError> {
        write_json_atomic(&self.path, self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything was ever signed.
    pub fn is_zero(&self) -> bool {
        self.height == 0
            && self.round == 0
            && self.step == SignStep::None
            && self.signature.is_none()
            && self.signbytes.is_empty()
    }

    /// Clear the checkpoint in memory.
    pub fn clear(&mut self) {
        self.height = 0;
        self.round = 0;
        self.step = SignStep::None;
        self.signature = None;
        self.signbytes = HexBytes::empty();
    }
}
