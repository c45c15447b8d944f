//! The rollback procedure.
//!
//! Read both store heights, prove they are in one of the two legal
//! relationships, then either report the pending block (optionally deleting
//! it) or rebuild and persist the state one height lower. Nothing is retried
//! and nothing is written until every input has been loaded.

use rewind_privval::CheckpointReset;
use rewind_store::{BlockStore, StateStore};
use rewind_types::{BlockMeta, Height, HexBytes};

use crate::alignment::{classify, StoreAlignment};
use crate::reconstruct::{reconstruct, RollbackInputs};
use crate::{BuildVersion, RollbackError};

/// Height and app hash the node will resume from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollbackOutcome {
    pub height: Height,
    pub app_hash: HexBytes,
}

/// A configured rollback over borrowed collaborators.
///
/// Must only run while the node is stopped: nothing here guards against a
/// concurrent writer.
pub struct Rollback<'a, B: ?Sized, S: ?Sized, C: ?Sized> {
    block_store: &'a B,
    state_store: &'a S,
    checkpoint: &'a C,
    build: &'a BuildVersion,
    remove_block: bool,
}

impl<'a, B, S, C> Rollback<'a, B, S, C>
where
    B: BlockStore + ?Sized,
    S: StateStore + ?Sized,
    C: CheckpointReset + ?Sized,
{
    pub fn new(
        block_store: &'a B,
        state_store: &'a S,
        checkpoint: &'a C,
        build: &'a BuildVersion,
    ) -> Self {
        Self {
            block_store,
            state_store,
            checkpoint,
            build,
            remove_block: false,
        }
    }

    /// Also delete the dangling block and reset the signing checkpoint.
    pub fn remove_block(mut self, remove_block: bool) -> Self {
        self.remove_block = remove_block;
        self
    }

    pub fn run(&self) -> Result<RollbackOutcome, RollbackError> {
        let invalid = self
            .state_store
            .load()
            .map_err(|e| RollbackError::read("failed to load state", e))?
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RollbackError::not_found("no state found"))?;

        let height = self
            .block_store
            .height()
            .map_err(|e| RollbackError::read("failed to read blockstore height", e))?;

        match classify(invalid.last_block_height, height)? {
            StoreAlignment::PendingBlock => {
                // Persistence of blocks and state is not atomic: the node
                // stopped after saving block `height` but before saving the
                // state for it.
                tracing::info!(height, "invalid state in the latest block height");
                if self.remove_block {
                    tracing::warn!(height, "removing pending block");
                    self.block_store.delete_latest_block().map_err(|e| {
                        RollbackError::write("failed to remove final block from blockstore", e)
                    })?;
                }
                return Ok(RollbackOutcome {
                    height: invalid.last_block_height,
                    app_hash: invalid.app_hash,
                });
            }
            StoreAlignment::Aligned => {}
        }

        let rollback_height = invalid.last_block_height.checked_sub(1).ok_or_else(|| {
            RollbackError::not_found(format!(
                "no height below {} to roll back to",
                invalid.last_block_height
            ))
        })?;
        let rollback_block = self.load_block_meta(rollback_height)?;
        // The app hash and results hash for a height are only agreed upon in
        // the following block.
        let latest_block = self.load_block_meta(invalid.last_block_height)?;

        let prev_validators = self
            .state_store
            .load_validators(rollback_height)
            .map_err(|e| {
                RollbackError::read(
                    format!("failed to load validator set at height {rollback_height}"),
                    e,
                )
            })?;
        // Params for R are stored under R + 1, the height they were decided at.
        let params_height = invalid.last_block_height;
        let prev_params = self
            .state_store
            .load_consensus_params(params_height)
            .map_err(|e| {
                RollbackError::read(
                    format!("failed to load consensus params at height {params_height}"),
                    e,
                )
            })?;

        let rolled_back = reconstruct(
            RollbackInputs {
                invalid: &invalid,
                rollback_block: &rollback_block,
                latest_block: &latest_block,
                prev_validators,
                prev_params,
                remove_block: self.remove_block,
            },
            self.build,
        );

        // Overwrites the invalid state. The validator sets and params written
        // alongside it match what is already stored at those heights.
        self.state_store
            .save(&rolled_back)
            .map_err(|e| RollbackError::write("failed to save rolled back state", e))?;
        tracing::info!(
            from = invalid.last_block_height,
            to = rolled_back.last_block_height,
            app_hash = %rolled_back.app_hash,
            "saved rolled back state"
        );

        if self.remove_block {
            tracing::warn!(height, "removing block");
            self.block_store.delete_latest_block().map_err(|e| {
                RollbackError::write("failed to remove final block from blockstore", e)
            })?;
            self.checkpoint
                .reset_checkpoint()
                .map_err(RollbackError::checkpoint)?;
        }

        Ok(RollbackOutcome {
            height: rolled_back.last_block_height,
            app_hash: rolled_back.app_hash,
        })
    }

    fn load_block_meta(&self, height: Height) -> Result<BlockMeta, RollbackError> {
        let meta = self.block_store.load_block_meta(height).map_err(|e| {
            RollbackError::read(format!("failed to load block at height {height}"), e)
        })?;
        meta.ok_or_else(|| RollbackError::not_found(format!("block at height {height} not found")))
    }
}

/// Overwrite the state at height `n` with the state at `n - 1`.
///
/// When the block store is one block ahead, the state is left alone and
/// `remove_block` only discards that pending block. When both stores are at
/// `n`, the state for `n - 1` is rebuilt and saved; with `remove_block` block
/// `n` is then deleted and the signing checkpoint reset. Application state is
/// not touched.
pub fn rollback<B, S, C>(
    block_store: &B,
    state_store: &S,
    remove_block: bool,
    checkpoint: &C,
    build: &BuildVersion,
) -> Result<RollbackOutcome, RollbackError>
where
    B: BlockStore + ?Sized,
    S: StateStore + ?Sized,
    C: CheckpointReset + ?Sized,
{
    Rollback::new(block_store, state_store, checkpoint, build)
        .remove_block(remove_block)
        .run()
}
