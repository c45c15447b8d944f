//! Software and protocol versions stamped into a rebuilt state.

use rewind_types::BLOCK_PROTOCOL;

/// Versions of the running build, passed in rather than read from globals
/// so reconstruction is a pure function of its inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildVersion {
    pub software: String,
    pub block_protocol: u64,
}

impl BuildVersion {
    pub fn new(software: impl Into<String>, block_protocol: u64) -> Self {
        Self {
            software: software.into(),
            block_protocol,
        }
    }

    /// This crate's version and the block protocol it speaks.
    pub fn current() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"), BLOCK_PROTOCOL)
    }
}
