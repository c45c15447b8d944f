//! The consensus state snapshot persisted by the state store.

use serde::{Deserialize, Serialize};

use crate::{BlockId, ConsensusParams, Height, HexBytes, Timestamp, ValidatorSet};

/// Version of the block protocol this software speaks.
pub const BLOCK_PROTOCOL: u64 = 11;

/// Protocol versions carried in headers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsensusVersion {
    pub block: u64,
    pub app: u64,
}

/// Software and protocol versions recorded in the state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub consensus: ConsensusVersion,
    pub software: String,
}

/// The consensus-relevant state after executing the block at
/// `last_block_height`.
///
/// `chain_id` and `initial_height` never change after genesis. Both
/// `last_height_validators_changed` and `last_height_consensus_params_changed`
/// are at most `last_block_height + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub version: Version,

    // immutable
    pub chain_id: String,
    pub initial_height: Height,

    pub last_block_height: Height,
    pub last_block_id: BlockId,
    pub last_block_time: Timestamp,

    /// Validators for the next block.
    pub next_validators: ValidatorSet,
    /// Validators for the current block.
    pub validators: ValidatorSet,
    /// Validators that committed the last block.
    pub last_validators: ValidatorSet,
    pub last_height_validators_changed: Height,

    pub consensus_params: ConsensusParams,
    pub last_height_consensus_params_changed: Height,

    /// Merkle root of the results of the transactions in the last block.
    pub last_results_hash: HexBytes,
    /// Application state root after executing the last block.
    pub app_hash: HexBytes,
}

impl State {
    /// Whether the state was never initialised from genesis.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PublicKey, Validator};

    #[test]
    fn default_state_is_empty() {
        assert!(State::default().is_empty());
    }

    #[test]
    fn state_with_validators_is_not_empty() {
        let state = State {
            validators: ValidatorSet::new(vec![Validator {
                address: HexBytes::new(vec![1; 20]),
                pub_key: PublicKey([1; 32]),
                voting_power: 10,
                proposer_priority: 0,
            }]),
            ..State::default()
        };
        assert!(!state.is_empty());
    }
}
