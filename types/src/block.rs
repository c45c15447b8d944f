//! Block identity and header metadata as kept by the block store.

use serde::{Deserialize, Serialize};

use crate::{ConsensusVersion, Height, HexBytes, Timestamp};

/// Header of the part set a block was gossiped as.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartSetHeader {
    pub total: u32,
    pub hash: HexBytes,
}

/// Identifies a block by its header hash and part set header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    pub hash: HexBytes,
    pub part_set_header: PartSetHeader,
}

impl BlockId {
    /// Whether this is the zero block id used before the first block.
    pub fn is_zero(&self) -> bool {
        self.hash.is_empty() && self.part_set_header == PartSetHeader::default()
    }
}

/// A block header.
///
/// Execution is deferred by one block: `app_hash` and `last_results_hash`
/// describe the state after executing the block at `height - 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: ConsensusVersion,
    pub chain_id: String,
    pub height: Height,
    pub time: Timestamp,
    pub last_block_id: BlockId,
    pub last_commit_hash: HexBytes,
    pub data_hash: HexBytes,
    pub validators_hash: HexBytes,
    pub next_validators_hash: HexBytes,
    pub consensus_hash: HexBytes,
    pub app_hash: HexBytes,
    pub last_results_hash: HexBytes,
    pub evidence_hash: HexBytes,
    pub proposer_address: HexBytes,
}

/// Header and identity of one committed block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMeta {
    pub block_id: BlockId,
    pub block_size: u64,
    pub header: Header,
    pub num_txs: u64,
}

impl BlockMeta {
    pub fn height(&self) -> Height {
        self.header.height
    }
}
