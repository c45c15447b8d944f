//! SHA-256 hashing and merkle roots for headers and validator sets.

use rewind_types::{ConsensusParams, HexBytes, ValidatorSet};
use sha2::{Digest, Sha256};

const LEAF_PREFIX: u8 = 0;
const INNER_PREFIX: u8 = 1;

/// Compute the SHA-256 hash of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

fn leaf_hash(leaf: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(leaf);
    hasher.finalize().into()
}

fn inner_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Merkle root of `leaves`, splitting at the largest power of two below the
/// leaf count. The root of an empty list is the hash of the empty string.
pub fn merkle_root<T: AsRef<[u8]>>(leaves: &[T]) -> [u8; 32] {
    match leaves.len() {
        0 => sha256(&[]),
        1 => leaf_hash(leaves[0].as_ref()),
        n => {
            let k = split_point(n);
            let left = merkle_root(&leaves[..k]);
            let right = merkle_root(&leaves[k..]);
            inner_hash(&left, &right)
        }
    }
}

fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k * 2 < n {
        k *= 2;
    }
    k
}

/// Hash of a validator set as recorded in block headers.
///
/// Each leaf is the validator's public key followed by its big-endian voting
/// power. Proposer priority is excluded because it changes every round.
pub fn validator_set_hash(set: &ValidatorSet) -> HexBytes {
    let leaves: Vec<Vec<u8>> = set
        .validators
        .iter()
        .map(|v| {
            let mut leaf = Vec::with_capacity(40);
            leaf.extend_from_slice(v.pub_key.as_bytes());
            leaf.extend_from_slice(&v.voting_power.to_be_bytes());
            leaf
        })
        .collect();
    HexBytes::from(merkle_root(&leaves))
}

/// Hash of the consensus parameters that blocks commit to.
pub fn consensus_params_hash(params: &ConsensusParams) -> HexBytes {
    let mut bytes = Vec::with_capacity(24);
    bytes.extend_from_slice(&params.block.max_bytes.to_be_bytes());
    bytes.extend_from_slice(&params.block.max_gas.to_be_bytes());
    bytes.extend_from_slice(&params.version.app_version.to_be_bytes());
    HexBytes::from(sha256(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewind_types::{PublicKey, Validator};

    fn validator(seed: u8, power: i64) -> Validator {
        Validator {
            address: HexBytes::new(vec![seed; 20]),
            pub_key: PublicKey([seed; 32]),
            voting_power: power,
            proposer_priority: 0,
        }
    }

    #[test]
    fn sha256_known_vector() {
        let h = sha256(b"abc");
        assert_eq!(
            HexBytes::from(h).to_string(),
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
        );
    }

    #[test]
    fn merkle_empty_is_empty_hash() {
        let leaves: [&[u8]; 0] = [];
        assert_eq!(merkle_root(&leaves), sha256(b""));
    }

    #[test]
    fn merkle_single_leaf_is_prefixed() {
        assert_ne!(merkle_root(&[b"a"]), sha256(b"a"));
    }

    #[test]
    fn merkle_order_matters() {
        assert_ne!(merkle_root(&[b"a", b"b"]), merkle_root(&[b"b", b"a"]));
    }

    #[test]
    fn split_point_is_largest_power_below() {
        assert_eq!(split_point(2), 1);
        assert_eq!(split_point(3), 2);
        assert_eq!(split_point(4), 2);
        assert_eq!(split_point(5), 4);
    }

    #[test]
    fn validator_hash_ignores_priority() {
        let a = ValidatorSet::new(vec![validator(1, 10)]);
        let mut b = a.clone();
        b.validators[0].proposer_priority = 99;
        assert_eq!(validator_set_hash(&a), validator_set_hash(&b));
    }

    #[test]
    fn validator_hash_tracks_power() {
        let a = ValidatorSet::new(vec![validator(1, 10)]);
        let b = ValidatorSet::new(vec![validator(1, 11)]);
        assert_ne!(validator_set_hash(&a), validator_set_hash(&b));
    }

    #[test]
    fn params_hash_tracks_app_version() {
        let a = ConsensusParams::default();
        let mut b = a.clone();
        b.version.app_version = 2;
        assert_ne!(consensus_params_hash(&a), consensus_params_hash(&b));
    }
}
