//! Rollback error taxonomy.

use std::error::Error as StdError;

use rewind_privval::CheckpointError;
use rewind_store::StoreError;
use rewind_types::Height;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// What went wrong, for callers that need to branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// State, block metadata, validator set or consensus params missing.
    NotFound,
    /// Block store height is neither equal to nor one above the state height.
    InvariantViolation,
    /// A store read failed for a reason other than absence.
    StoreRead,
    /// Saving the state or deleting the block failed.
    StoreWriteFailure,
    /// The signing checkpoint could not be reset after the rollback was written.
    CheckpointResetFailure,
}

/// A rollback failure: its kind, a human-readable context and the cause.
#[derive(Debug, Error)]
#[error("{context}")]
pub struct RollbackError {
    kind: ErrorKind,
    context: String,
    #[source]
    source: Option<BoxError>,
}

impl RollbackError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub(crate) fn not_found(context: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            context: context.into(),
            source: None,
        }
    }

    pub(crate) fn invariant(state_height: Height, block_height: Height) -> Self {
        Self {
            kind: ErrorKind::InvariantViolation,
            context: format!(
                "statestore height ({state_height}) is not one below or equal to blockstore height ({block_height})"
            ),
            source: None,
        }
    }

    /// Wrap a failed read. Absence maps to `NotFound`, anything else to `StoreRead`.
    pub(crate) fn read(context: impl Into<String>, err: StoreError) -> Self {
        let kind = if err.is_not_found() {
            ErrorKind::NotFound
        } else {
            ErrorKind::StoreRead
        };
        Self {
            kind,
            context: context.into(),
            source: Some(Box::new(err)),
        }
    }

    pub(crate) fn write(context: impl Into<String>, err: StoreError) -> Self {
        Self {
            kind: ErrorKind::StoreWriteFailure,
            context: context.into(),
            source: Some(Box::new(err)),
        }
    }

    pub(crate) fn checkpoint(err: CheckpointError) -> Self {
        Self {
            kind: ErrorKind::CheckpointResetFailure,
            context: "state was rolled back but the signing checkpoint was not reset".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn invariant_message_names_both_heights() {
        let err = RollbackError::invariant(100, 105);
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(
            err.to_string(),
            "statestore height (100) is not one below or equal to blockstore height (105)"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn absent_read_is_not_found() {
        let err = RollbackError::read("load validators", StoreError::NotFound("x".into()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.source().is_some());
    }

    #[test]
    fn backend_read_is_store_read() {
        let err = RollbackError::read("load validators", StoreError::Backend("io".into()));
        assert_eq!(err.kind(), ErrorKind::StoreRead);
    }

    #[test]
    fn write_keeps_cause() {
        let err = RollbackError::write("save", StoreError::Backend("disk full".into()));
        assert_eq!(err.kind(), ErrorKind::StoreWriteFailure);
        assert_eq!(err.source().unwrap().to_string(), "storage backend error: disk full");
    }
}
