//! State storage trait.

use crate::StoreError;
use rewind_types::{ConsensusParams, Height, State, ValidatorSet};

/// Persistence for the consensus state and its height-indexed history.
pub trait StateStore {
    /// Load the latest state, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<State>, StoreError>;

    /// Persist `state` as the latest state.
    ///
    /// Also writes the validator sets and consensus params the state
    /// implies for the following heights (see [`validators_save_heights`]),
    /// overwriting any existing records at those heights.
    fn save(&self, state: &State) -> Result<(), StoreError>;

    /// Validator set that was active at `height`.
    fn load_validators(&self, height: Height) -> Result<ValidatorSet, StoreError>;

    /// Consensus params in effect at `height`.
    fn load_consensus_params(&self, height: Height) -> Result<ConsensusParams, StoreError>;
}

/// Heights at which `save` writes validator sets, paired with the set.
///
/// `next_validators` always goes to `last_block_height + 2`. At genesis
/// (`last_block_height + 1 == initial_height`) the current `validators` are
/// written at `initial_height` too, since no earlier save recorded them.
/// Consensus params go to `last_block_height + 1`.
pub fn validators_save_heights(state: &State) -> Vec<(Height, &ValidatorSet)> {
    let next_height = state.last_block_height + 1;
    let mut out = Vec::with_capacity(2);
    if next_height == state.initial_height {
        out.push((next_height, &state.validators));
    }
    out.push((next_height + 1, &state.next_validators));
    out
}
