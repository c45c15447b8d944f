//! Nullable stores: thread-safe in-memory state and block stores for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use rewind_store::{validators_save_heights, BlockStore, StateStore, StoreError};
use rewind_types::{BlockMeta, ConsensusParams, Height, State, ValidatorSet};

/// An in-memory state store.
#[derive(Default)]
pub struct NullStateStore {
    state: Mutex<Option<State>>,
    validators: Mutex<BTreeMap<Height, ValidatorSet>>,
    params: Mutex<BTreeMap<Height, ConsensusParams>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl NullStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the latest state directly, without touching the history tables
    /// or the save counter.
    pub fn put_state(&self, state: State) {
        *self.state.lock().unwrap() = Some(state);
    }

    pub fn put_validators(&self, height: Height, set: ValidatorSet) {
        self.validators.lock().unwrap().insert(height, set);
    }

    pub fn put_consensus_params(&self, height: Height, params: ConsensusParams) {
        self.params.lock().unwrap().insert(height, params);
    }

    pub fn remove_validators(&self, height: Height) {
        self.validators.lock().unwrap().remove(&height);
    }

    pub fn remove_consensus_params(&self, height: Height) {
        self.params.lock().unwrap().remove(&height);
    }

    /// Make every subsequent `save` fail.
    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The currently stored state, if any.
    pub fn state(&self) -> Option<State> {
        self.state.lock().unwrap().clone()
    }
}

impl StateStore for NullStateStore {
    fn load(&self) -> Result<Option<State>, StoreError> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn save(&self, state: &State) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("save disabled".to_string()));
        }
        {
            let mut validators = self.validators.lock().unwrap();
            for (height, set) in validators_save_heights(state) {
                validators.insert(height, set.clone());
            }
        }
        self.params
            .lock()
            .unwrap()
            .insert(state.last_block_height + 1, state.consensus_params.clone());
        *self.state.lock().unwrap() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_validators(&self, height: Height) -> Result<ValidatorSet, StoreError> {
        self.validators
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("validator set at height {height}")))
    }

    fn load_consensus_params(&self, height: Height) -> Result<ConsensusParams, StoreError> {
        self.params
            .lock()
            .unwrap()
            .get(&height)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("consensus params at height {height}")))
    }
}

/// An in-memory block store holding a contiguous run of block metadata.
#[derive(Default)]
pub struct NullBlockStore {
    inner: Mutex<BlockIndex>,
    deletes: AtomicUsize,
    fail_deletes: AtomicBool,
}

#[derive(Default)]
struct BlockIndex {
    base: Height,
    height: Height,
    metas: BTreeMap<Height, BlockMeta>,
}

impl NullBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block. It must extend the current tip unless the store is empty.
    pub fn save_block_meta(&self, meta: BlockMeta) -> Result<(), StoreError> {
        let mut index = self.inner.lock().unwrap();
        let height = meta.height();
        if index.height == 0 {
            index.base = height;
        } else if index.height.checked_add(1) != Some(height) {
            return Err(StoreError::NonContiguous {
                height: index.height,
                got: height,
            });
        }
        index.height = height;
        index.metas.insert(height, meta);
        Ok(())
    }

    /// Drop the metadata at `height` while leaving base and height as they
    /// are, simulating a hole in the index.
    pub fn forget_block_meta(&self, height: Height) -> Option<BlockMeta> {
        self.inner.lock().unwrap().metas.remove(&height)
    }

    /// Make every subsequent `delete_latest_block` fail.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Number of successful `delete_latest_block` calls.
    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

impl BlockStore for NullBlockStore {
    fn base(&self) -> Result<Height, StoreError> {
        Ok(self.inner.lock().unwrap().base)
    }

    fn height(&self) -> Result<Height, StoreError> {
        Ok(self.inner.lock().unwrap().height)
    }

    fn load_block_meta(&self, height: Height) -> Result<Option<BlockMeta>, StoreError> {
        Ok(self.inner.lock().unwrap().metas.get(&height).cloned())
    }

    fn delete_latest_block(&self) -> Result<(), StoreError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("delete disabled".to_string()));
        }
        let mut index = self.inner.lock().unwrap();
        if index.height == 0 {
            return Err(StoreError::Empty);
        }
        let tip = index.height;
        index.metas.remove(&tip);
        if tip == index.base {
            index.base = 0;
            index.height = 0;
        } else {
            index.height = tip - 1;
        }
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
