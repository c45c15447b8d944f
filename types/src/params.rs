//! Consensus parameters, versioned by the height they take effect at.

use serde::{Deserialize, Serialize};

/// Parameters that govern consensus on a chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    pub block: BlockParams,
    pub evidence: EvidenceParams,
    pub validator: ValidatorParams,
    pub version: VersionParams,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParams {
    /// Maximum block size in bytes.
    pub max_bytes: i64,
    /// Maximum gas per block; `-1` means unlimited.
    pub max_gas: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceParams {
    pub max_age_num_blocks: i64,
    /// Maximum evidence age in nanoseconds.
    pub max_age_duration_nanos: u64,
    pub max_bytes: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorParams {
    pub pub_key_types: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionParams {
    /// Version of the application that produced these parameters.
    pub app_version: u64,
}

impl Default for BlockParams {
    fn default() -> Self {
        Self {
            max_bytes: 22_020_096, // 21 MB
            max_gas: -1,
        }
    }
}

impl Default for EvidenceParams {
    fn default() -> Self {
        Self {
            max_age_num_blocks: 100_000,
            max_age_duration_nanos: 48 * 3600 * 1_000_000_000,
            max_bytes: 1_048_576, // 1 MB
        }
    }
}

impl Default for ValidatorParams {
    fn default() -> Self {
        Self {
            pub_key_types: vec!["ed25519".to_string()],
        }
    }
}
