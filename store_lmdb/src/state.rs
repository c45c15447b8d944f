//! LMDB implementation of StateStore.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env};

use rewind_store::{validators_save_heights, StateStore, StoreError};
use rewind_types::{ConsensusParams, Height, State, ValidatorSet};

use crate::environment::{check_schema, open_env};
use crate::{decode, encode, height_key, LmdbError};

const STATE_KEY: &[u8] = b"stateKey";

/// State store backed by its own LMDB environment.
pub struct LmdbStateStore {
    env: Env,
    state_db: Database<Bytes, Bytes>,
    validators_db: Database<Bytes, Bytes>,
    params_db: Database<Bytes, Bytes>,
}

impl LmdbStateStore {
    /// Open or create the state store at `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        let env = open_env(path, 4, map_size)?;
        let mut wtxn = env.write_txn()?;
        check_schema(&env, &mut wtxn)?;
        let state_db = env.create_database(&mut wtxn, Some("state"))?;
        let validators_db = env.create_database(&mut wtxn, Some("validators"))?;
        let params_db = env.create_database(&mut wtxn, Some("consensus_params"))?;
        wtxn.commit()?;
        Ok(Self {
            env,
            state_db,
            validators_db,
            params_db,
        })
    }

    /// Store a validator set at `height` outside of a state save. Used when
    /// importing history.
    pub fn put_validators(&self, height: Height, set: &ValidatorSet) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.validators_db
            .put(&mut wtxn, &height_key(height), &encode(set)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// Store consensus params at `height` outside of a state save.
    pub fn put_consensus_params(
        &self,
        height: Height,
        params: &ConsensusParams,
    ) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.params_db
            .put(&mut wtxn, &height_key(height), &encode(params)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl StateStore for LmdbStateStore {
    fn load(&self) -> Result<Option<State>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.state_db.get(&rtxn, STATE_KEY).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    /// The state and its history records are written in one transaction.
    fn save(&self, state: &State) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for (height, set) in validators_save_heights(state) {
            self.validators_db
                .put(&mut wtxn, &height_key(height), &encode(set)?)
                .map_err(LmdbError::from)?;
        }
        self.params_db
            .put(
                &mut wtxn,
                &height_key(state.last_block_height + 1),
                &encode(&state.consensus_params)?,
            )
            .map_err(LmdbError::from)?;
        self.state_db
            .put(&mut wtxn, STATE_KEY, &encode(state)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(height = state.last_block_height, "saved state");
        Ok(())
    }

    fn load_validators(&self, height: Height) -> Result<ValidatorSet, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .validators_db
            .get(&rtxn, &height_key(height))
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("validator set at height {height}")))?;
        Ok(decode(bytes)?)
    }

    fn load_consensus_params(&self, height: Height) -> Result<ConsensusParams, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .params_db
            .get(&rtxn, &height_key(height))
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("consensus params at height {height}")))?;
        Ok(decode(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAP_SIZE;
    use rewind_nullables::ChainFixture;

    fn temp_store() -> (tempfile::TempDir, LmdbStateStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LmdbStateStore::open(dir.path(), DEFAULT_MAP_SIZE).expect("open store");
        (dir, store)
    }

    #[test]
    fn empty_store_loads_none() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let (_dir, store) = temp_store();
        let state = ChainFixture::new(20).state_at(20);
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), state);
    }

    #[test]
    fn save_writes_next_validators_and_params() {
        let (_dir, store) = temp_store();
        let chain = ChainFixture::new(20);
        store.save(&chain.state_at(20)).unwrap();
        assert_eq!(store.load_validators(22).unwrap(), chain.validators_at(22));
        assert_eq!(store.load_consensus_params(21).unwrap(), chain.params_at(21));
    }

    #[test]
    fn missing_history_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(store.load_validators(5).unwrap_err().is_not_found());
        assert!(store.load_consensus_params(5).unwrap_err().is_not_found());
    }

    #[test]
    fn reopen_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = ChainFixture::new(3).state_at(3);
        {
            let store = LmdbStateStore::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
            store.save(&state).unwrap();
        }
        let store = LmdbStateStore::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), state);
    }
}
