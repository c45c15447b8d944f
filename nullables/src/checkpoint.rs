//! Nullable signing checkpoint.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rewind_privval::{CheckpointError, CheckpointReset, PrivvalError};

/// Records how many times it was reset; can be told to fail.
#[derive(Default)]
pub struct NullCheckpoint {
    resets: AtomicUsize,
    fail: AtomicBool,
}

impl NullCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// A checkpoint whose reset always fails.
    pub fn failing() -> Self {
        let checkpoint = Self::new();
        checkpoint.fail.store(true, Ordering::SeqCst);
        checkpoint
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl CheckpointReset for NullCheckpoint {
    fn reset_checkpoint(&self) -> Result<(), CheckpointError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CheckpointError::Reset(PrivvalError::Write {
                path: "null_checkpoint".into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "reset disabled"),
            }));
        }
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
