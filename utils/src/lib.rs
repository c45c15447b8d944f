//! Shared utilities for rewind.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
