//! LMDB implementation of BlockStore.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env};

use rewind_store::{BlockStore, StoreError};
use rewind_types::{BlockMeta, Height};

use crate::environment::{check_schema, open_env};
use crate::{decode, encode, height_key, key_height, LmdbError};

/// Block metadata store backed by its own LMDB environment.
///
/// Base and height are the first and last keys of the metadata table.
pub struct LmdbBlockStore {
    env: Env,
    metas_db: Database<Bytes, Bytes>,
}

impl LmdbBlockStore {
    /// Open or create the block store at `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        let env = open_env(path, 2, map_size)?;
        let mut wtxn = env.write_txn()?;
        check_schema(&env, &mut wtxn)?;
        let metas_db = env.create_database(&mut wtxn, Some("block_metas"))?;
        wtxn.commit()?;
        Ok(Self { env, metas_db })
    }

    /// Append block metadata. Must extend the current tip unless empty.
    pub fn save_block_meta(&self, meta: &BlockMeta) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let tip = self
            .metas_db
            .last(&wtxn)
            .map_err(LmdbError::from)?
            .map(|(key, _)| key_height(key))
            .transpose()?;
        if let Some(tip) = tip {
            if meta.height() != tip + 1 {
                return Err(StoreError::NonContiguous {
                    height: tip,
                    got: meta.height(),
                });
            }
        }
        self.metas_db
            .put(&mut wtxn, &height_key(meta.height()), &encode(meta)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn edge(&self, last: bool) -> Result<Height, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let entry = if last {
            self.metas_db.last(&rtxn)
        } else {
            self.metas_db.first(&rtxn)
        }
        .map_err(LmdbError::from)?;
        match entry {
            Some((key, _)) => Ok(key_height(key)?),
            None => Ok(0),
        }
    }
}

impl BlockStore for LmdbBlockStore {
    fn base(&self) -> Result<Height, StoreError> {
        self.edge(false)
    }

    fn height(&self) -> Result<Height, StoreError> {
        self.edge(true)
    }

    fn load_block_meta(&self, height: Height) -> Result<Option<BlockMeta>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .metas_db
            .get(&rtxn, &height_key(height))
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn delete_latest_block(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let tip = self
            .metas_db
            .last(&wtxn)
            .map_err(LmdbError::from)?
            .map(|(key, _)| key.to_vec())
            .ok_or(StoreError::Empty)?;
        let height = key_height(&tip)?;
        self.metas_db
            .delete(&mut wtxn, &tip)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(height, "deleted latest block");
        Ok(())
    }
}
