//! Deterministic chain history for rollback tests.
//!
//! A `ChainFixture` describes a chain from `initial_height` to `tip` in which
//! every record is derived from its height: the validator set rotates every
//! block, app and results hashes are height-tagged digests, and consensus
//! params may be upgraded once. Tests build the stores from it and compare
//! the outcome of a rollback against `state_at`.

use rewind_crypto::{
    consensus_params_hash, derive_address, keypair_from_seed, sha256, validator_set_hash,
};
use rewind_types::{
    BlockId, BlockMeta, ConsensusParams, ConsensusVersion, Header, Height, HexBytes,
    PartSetHeader, State, Timestamp, Validator, ValidatorSet, Version, BLOCK_PROTOCOL,
};

use crate::{NullBlockStore, NullStateStore};

/// Genesis time used by every fixture (2023-11-14T22:13:20Z).
const GENESIS_SECS: u64 = 1_700_000_000;
const BLOCK_INTERVAL_SECS: u64 = 6;

#[derive(Clone, Debug)]
pub struct ChainFixture {
    pub chain_id: String,
    pub initial_height: Height,
    pub tip: Height,
    pub software: String,
    params_upgrade: Option<(Height, u64)>,
}

impl ChainFixture {
    /// A chain starting at height 1 whose state and blocks reach `tip`.
    pub fn new(tip: Height) -> Self {
        Self {
            chain_id: "rewind-test".to_string(),
            initial_height: 1,
            tip,
            software: "0.0.0-fixture".to_string(),
            params_upgrade: None,
        }
    }

    pub fn with_initial_height(mut self, initial_height: Height) -> Self {
        self.initial_height = initial_height;
        self
    }

    /// From `height` on, consensus params carry `app_version`.
    pub fn with_params_upgrade(mut self, height: Height, app_version: u64) -> Self {
        self.params_upgrade = Some((height, app_version));
        self
    }

    /// The validator set that signs block `height`.
    pub fn validators_at(&self, height: Height) -> ValidatorSet {
        let base = (height.rem_euclid(200) as u8).wrapping_add(1);
        let validators = (0..3u8)
            .map(|i| {
                let kp = keypair_from_seed(&[base.wrapping_add(i * 50); 32]);
                Validator {
                    address: derive_address(&kp.public),
                    pub_key: kp.public,
                    voting_power: 10 + i64::from(i),
                    proposer_priority: i64::from(i),
                }
            })
            .collect();
        ValidatorSet::new(validators)
    }

    pub fn params_at(&self, height: Height) -> ConsensusParams {
        let mut params = ConsensusParams::default();
        params.version.app_version = match self.params_upgrade {
            Some((at, version)) if height >= at => version,
            _ => 1,
        };
        params
    }

    /// App hash after executing block `height`.
    pub fn app_hash_after(&self, height: Height) -> HexBytes {
        tagged_hash(b"app", height)
    }

    /// Results hash of the transactions in block `height`.
    pub fn results_hash_after(&self, height: Height) -> HexBytes {
        tagged_hash(b"results", height)
    }

    pub fn block_id(&self, height: Height) -> BlockId {
        BlockId {
            hash: tagged_hash(b"block", height),
            part_set_header: PartSetHeader {
                total: 1,
                hash: tagged_hash(b"parts", height),
            },
        }
    }

    pub fn block_time(&self, height: Height) -> Timestamp {
        let offset = (height - self.initial_height).max(0) as u64;
        Timestamp::from_secs(GENESIS_SECS + offset * BLOCK_INTERVAL_SECS)
    }

    /// Metadata of block `height`. Its header carries the hashes produced
    /// by executing `height - 1`.
    pub fn block_meta(&self, height: Height) -> BlockMeta {
        let last_block_id = if height == self.initial_height {
            BlockId::default()
        } else {
            self.block_id(height - 1)
        };
        let params = self.params_at(height);
        BlockMeta {
            block_id: self.block_id(height),
            block_size: 1024,
            header: Header {
                version: ConsensusVersion {
                    block: BLOCK_PROTOCOL,
                    app: params.version.app_version,
                },
                chain_id: self.chain_id.clone(),
                height,
                time: self.block_time(height),
                last_block_id,
                last_commit_hash: tagged_hash(b"commit", height - 1),
                data_hash: tagged_hash(b"data", height),
                validators_hash: validator_set_hash(&self.validators_at(height)),
                next_validators_hash: validator_set_hash(&self.validators_at(height + 1)),
                consensus_hash: consensus_params_hash(&params),
                app_hash: self.app_hash_after(height - 1),
                last_results_hash: self.results_hash_after(height - 1),
                evidence_hash: HexBytes::empty(),
                proposer_address: self.validators_at(height).validators[2].address.clone(),
            },
            num_txs: 2,
        }
    }

    /// The state the node holds after executing block `height`.
    pub fn state_at(&self, height: Height) -> State {
        let next_params = self.params_at(height + 1);
        let params_changed = match self.params_upgrade {
            Some((at, _)) if at <= height + 1 => at,
            _ => self.initial_height,
        };
        State {
            version: Version {
                consensus: ConsensusVersion {
                    block: BLOCK_PROTOCOL,
                    app: next_params.version.app_version,
                },
                software: self.software.clone(),
            },
            chain_id: self.chain_id.clone(),
            initial_height: self.initial_height,
            last_block_height: height,
            last_block_id: self.block_id(height),
            last_block_time: self.block_time(height),
            next_validators: self.validators_at(height + 2),
            validators: self.validators_at(height + 1),
            last_validators: self.validators_at(height),
            last_height_validators_changed: height + 1,
            consensus_params: next_params,
            last_height_consensus_params_changed: params_changed,
            last_results_hash: self.results_hash_after(height),
            app_hash: self.app_hash_after(height),
        }
    }

    /// A state store holding `state_at(tip)` and the full history behind it.
    pub fn state_store(&self) -> NullStateStore {
        let store = NullStateStore::new();
        for height in self.initial_height..=self.tip + 2 {
            store.put_validators(height, self.validators_at(height));
        }
        for height in self.initial_height..=self.tip + 1 {
            store.put_consensus_params(height, self.params_at(height));
        }
        store.put_state(self.state_at(self.tip));
        store
    }

    /// A block store holding blocks `initial_height..=height`.
    pub fn block_store(&self, height: Height) -> NullBlockStore {
        let store = NullBlockStore::new();
        for h in self.initial_height..=height {
            store
                .save_block_meta(self.block_meta(h))
                .expect("fixture heights are contiguous");
        }
        store
    }
}

fn tagged_hash(tag: &[u8], height: Height) -> HexBytes {
    let mut input = tag.to_vec();
    input.extend_from_slice(&height.to_be_bytes());
    HexBytes::from(sha256(&input))
}
