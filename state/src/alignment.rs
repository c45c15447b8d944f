//! How the block store height relates to the state store height.

use rewind_store::{BlockStore, StateStore};
use rewind_types::Height;

use crate::RollbackError;

/// A valid relationship between the two stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreAlignment {
    /// The block store holds one block the state never advanced past.
    PendingBlock,
    /// Both stores are at the same height.
    Aligned,
}

/// Classify a (state height, block height) pair. Anything other than
/// equal or block-store-one-ahead is an invariant violation.
pub fn classify(
    state_height: Height,
    block_height: Height,
) -> Result<StoreAlignment, RollbackError> {
    if state_height.checked_add(1) == Some(block_height) {
        Ok(StoreAlignment::PendingBlock)
    } else if block_height == state_height {
        Ok(StoreAlignment::Aligned)
    } else {
        Err(RollbackError::invariant(state_height, block_height))
    }
}

/// A read-only snapshot of both stores' heights.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreStatus {
    pub state_height: Height,
    pub block_base: Height,
    pub block_height: Height,
}

impl StoreStatus {
    pub fn read<B, S>(block_store: &B, state_store: &S) -> Result<Self, RollbackError>
    where
        B: BlockStore + ?Sized,
        S: StateStore + ?Sized,
    {
        let state = state_store
            .load()
            .map_err(|e| RollbackError::read("failed to load state", e))?
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RollbackError::not_found("no state found"))?;
        let block_base = block_store
            .base()
            .map_err(|e| RollbackError::read("failed to read blockstore base", e))?;
        let block_height = block_store
            .height()
            .map_err(|e| RollbackError::read("failed to read blockstore height", e))?;
        Ok(Self {
            state_height: state.last_block_height,
            block_base,
            block_height,
        })
    }

    pub fn alignment(&self) -> Result<StoreAlignment, RollbackError> {
        classify(self.state_height, self.block_height)
    }
}
