//! Block storage trait.

use crate::StoreError;
use rewind_types::{BlockMeta, Height};

/// Read access to committed block metadata plus removal of the tip.
pub trait BlockStore {
    /// Lowest height still held (0 when empty).
    fn base(&self) -> Result<Height, StoreError>;

    /// Height of the most recent block (0 when empty).
    fn height(&self) -> Result<Height, StoreError>;

    /// Metadata of the block at `height`, or `None` if not held.
    fn load_block_meta(&self, height: Height) -> Result<Option<BlockMeta>, StoreError>;

    /// Remove the block at `height()` and everything indexed under it.
    ///
    /// Only the most recent block can be removed. Fails with
    /// [`StoreError::Empty`] when there is nothing to remove.
    fn delete_latest_block(&self) -> Result<(), StoreError>;
}
