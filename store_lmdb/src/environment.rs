//! LMDB environment setup and schema versioning.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RwTxn};

use crate::LmdbError;

/// Default memory map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// Layout version written to every environment's `meta` database.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Open or create an LMDB environment at `path`.
pub fn open_env(path: &Path, max_dbs: u32, map_size: usize) -> Result<Env, LmdbError> {
    std::fs::create_dir_all(path)?;
    // SAFETY: the environment is opened once per process and the node that
    // normally owns these files is not running.
    let env = unsafe {
        EnvOpenOptions::new()
            .map_size(map_size)
            .max_dbs(max_dbs)
            .open(path)?
    };
    tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");
    Ok(env)
}

/// Create (or open) the `meta` database and check its schema version,
/// stamping fresh environments with [`SCHEMA_VERSION`].
pub(crate) fn check_schema(env: &Env, wtxn: &mut RwTxn) -> Result<(), LmdbError> {
    let meta_db: Database<Bytes, Bytes> = env.create_database(wtxn, Some("meta"))?;
    let existing = meta_db.get(wtxn, SCHEMA_VERSION_KEY)?.map(<[u8]>::to_vec);
    match existing {
        Some(bytes) => {
            let arr: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                LmdbError::Serialization("schema_version has unexpected byte length".to_string())
            })?;
            let found = u32::from_le_bytes(arr);
            if found != SCHEMA_VERSION {
                return Err(LmdbError::SchemaMismatch {
                    found,
                    expected: SCHEMA_VERSION,
                });
            }
        }
        None => {
            meta_db.put(wtxn, SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_le_bytes())?;
        }
    }
    Ok(())
}
