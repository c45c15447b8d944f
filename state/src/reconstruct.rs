//! Derivation of the state one height below an invalid state.

use rewind_types::{
    BlockMeta, ConsensusParams, ConsensusVersion, Height, State, ValidatorSet, Version,
};

use crate::BuildVersion;

/// Everything the previous state is derived from.
pub struct RollbackInputs<'a> {
    /// The state being replaced, at height `n`.
    pub invalid: &'a State,
    /// Metadata of block `n - 1`.
    pub rollback_block: &'a BlockMeta,
    /// Metadata of block `n`.
    pub latest_block: &'a BlockMeta,
    /// Validator set stored at height `n - 1`.
    pub prev_validators: ValidatorSet,
    /// Consensus params stored at height `n`.
    pub prev_params: ConsensusParams,
    /// Whether block `n` will be removed, leaving `n - 1` as the tip.
    pub remove_block: bool,
}

/// Build the state at `rollback_block`'s height from `inputs`.
///
/// Chain id and initial height are copied; the validator triple shifts down
/// one slot; change heights above the rollback height clamp to
/// `rollback height + 1`. Block `n` still carries the hashes when it is kept,
/// otherwise they come from block `n - 1` itself.
pub fn reconstruct(inputs: RollbackInputs<'_>, build: &BuildVersion) -> State {
    let RollbackInputs {
        invalid,
        rollback_block,
        latest_block,
        prev_validators,
        prev_params,
        remove_block,
    } = inputs;
    let rollback_height = rollback_block.header.height;

    let (app_hash, last_results_hash) = if remove_block {
        (
            rollback_block.header.app_hash.clone(),
            rollback_block.header.last_results_hash.clone(),
        )
    } else {
        (
            latest_block.header.last_results_hash.clone(),
            latest_block.header.app_hash.clone(),
        )
    };

    State {
        version: Version {
            consensus: ConsensusVersion {
                block: build.block_protocol,
                app: prev_params.version.app_version,
            },
            software: build.software.clone(),
        },

        chain_id: invalid.chain_id.clone(),
        initial_height: invalid.initial_height,

        last_block_height: rollback_height,
        last_block_id: rollback_block.block_id.clone(),
        last_block_time: rollback_block.header.time,

        next_validators: invalid.validators.clone(),
        validators: invalid.last_validators.clone(),
        last_validators: prev_validators,
        last_height_validators_changed: clamp_change_height(
            invalid.last_height_validators_changed,
            rollback_height,
        ),

        consensus_params: prev_params,
        last_height_consensus_params_changed: clamp_change_height(
            invalid.last_height_consensus_params_changed,
            rollback_height,
        ),

        last_results_hash,
        app_hash,
    }
}

/// A change recorded above the rollback height can only have taken effect
/// going into the new tip, so it becomes `rollback_height + 1`. Lower values
/// are kept as they are.
fn clamp_change_height(changed: Height, rollback_height: Height) -> Height {
    if changed > rollback_height {
        rollback_height.saturating_add(1)
    } else {
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewind_nullables::ChainFixture;

    fn build() -> BuildVersion {
        BuildVersion::new("9.9.9", 42)
    }

    fn inputs<'a>(
        chain: &ChainFixture,
        invalid: &'a State,
        rollback_block: &'a BlockMeta,
        latest_block: &'a BlockMeta,
        remove_block: bool,
    ) -> RollbackInputs<'a> {
        RollbackInputs {
            invalid,
            rollback_block,
            latest_block,
            prev_validators: chain.validators_at(rollback_block.header.height),
            prev_params: chain.params_at(latest_block.header.height),
            remove_block,
        }
    }

    #[test]
    fn clamp_only_above_rollback_height() {
        assert_eq!(clamp_change_height(101, 99), 100);
        assert_eq!(clamp_change_height(100, 99), 100);
        assert_eq!(clamp_change_height(99, 99), 99);
        assert_eq!(clamp_change_height(5, 99), 5);
    }

    #[test]
    fn validators_shift_down_one_slot() {
        let chain = ChainFixture::new(100);
        let invalid = chain.state_at(100);
        let (r, l) = (chain.block_meta(99), chain.block_meta(100));
        let state = reconstruct(inputs(&chain, &invalid, &r, &l, false), &build());

        assert_eq!(state.next_validators, invalid.validators);
        assert_eq!(state.validators, invalid.last_validators);
        assert_eq!(state.last_validators, chain.validators_at(99));
        assert_eq!(state.next_validators, chain.state_at(99).next_validators);
        assert_eq!(state.validators, chain.state_at(99).validators);
    }

    #[test]
    fn identity_fields_come_from_rollback_block() {
        let chain = ChainFixture::new(100);
        let invalid = chain.state_at(100);
        let (r, l) = (chain.block_meta(99), chain.block_meta(100));
        let state = reconstruct(inputs(&chain, &invalid, &r, &l, false), &build());

        assert_eq!(state.last_block_height, 99);
        assert_eq!(state.last_block_id, chain.block_id(99));
        assert_eq!(state.last_block_time, chain.block_time(99));
        assert_eq!(state.chain_id, invalid.chain_id);
        assert_eq!(state.initial_height, invalid.initial_height);
    }

    #[test]
    fn kept_block_supplies_hashes() {
        let chain = ChainFixture::new(100);
        let invalid = chain.state_at(100);
        let (r, l) = (chain.block_meta(99), chain.block_meta(100));
        let state = reconstruct(inputs(&chain, &invalid, &r, &l, false), &build());

        assert_eq!(state.app_hash, l.header.last_results_hash);
        assert_eq!(state.last_results_hash, l.header.app_hash);
    }

    #[test]
    fn removed_block_uses_rollback_block_hashes() {
        let chain = ChainFixture::new(100);
        let invalid = chain.state_at(100);
        let (r, l) = (chain.block_meta(99), chain.block_meta(100));
        let state = reconstruct(inputs(&chain, &invalid, &r, &l, true), &build());

        assert_eq!(state.app_hash, r.header.app_hash);
        assert_eq!(state.last_results_hash, r.header.last_results_hash);
    }

    #[test]
    fn version_from_build_and_params() {
        let chain = ChainFixture::new(100).with_params_upgrade(100, 7);
        let invalid = chain.state_at(100);
        let (r, l) = (chain.block_meta(99), chain.block_meta(100));
        let state = reconstruct(inputs(&chain, &invalid, &r, &l, false), &build());

        assert_eq!(state.version.software, "9.9.9");
        assert_eq!(state.version.consensus.block, 42);
        assert_eq!(state.version.consensus.app, 7);
        assert_eq!(state.consensus_params, chain.params_at(100));
    }

    #[test]
    fn change_heights_clamped() {
        let chain = ChainFixture::new(100).with_params_upgrade(101, 2);
        let invalid = chain.state_at(100);
        assert_eq!(invalid.last_height_validators_changed, 101);
        assert_eq!(invalid.last_height_consensus_params_changed, 101);

        let (r, l) = (chain.block_meta(99), chain.block_meta(100));
        let state = reconstruct(inputs(&chain, &invalid, &r, &l, false), &build());
        assert_eq!(state.last_height_validators_changed, 100);
        assert_eq!(state.last_height_consensus_params_changed, 100);
    }

    #[test]
    fn old_change_heights_kept() {
        let chain = ChainFixture::new(100);
        let mut invalid = chain.state_at(100);
        invalid.last_height_validators_changed = 40;
        let (r, l) = (chain.block_meta(99), chain.block_meta(100));
        let state = reconstruct(inputs(&chain, &invalid, &r, &l, false), &build());
        assert_eq!(state.last_height_validators_changed, 40);
        assert_eq!(state.last_height_consensus_params_changed, 1);
    }
}
