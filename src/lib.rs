// file: src/lib.rs
// version: 1.0.0
// guid: 0be0abe3-890e-4ad3-a2c4-c200fed3ae61

//! # Host Post-Install
//!
//! Single-pass configurator for a freshly provisioned Ubuntu/Debian host:
//! package upgrade, declared package set, config fragments, an SSH key for
//! the invoking user and SSH daemon hardening. Every step after the root
//! check is best-effort; the log file is the record of what went wrong.

pub mod cli;
pub mod config;
pub mod error;
pub mod installer;
pub mod logging;
pub mod prompt;
pub mod steps;
pub mod system;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{PostInstallError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
