// file: src/system/privilege.rs
// version: 1.0.0
// guid: 5893a63e-41db-4b54-817f-a14509dc816b

//! Superuser precondition

use crate::error::PostInstallError;
use crate::Result;
use tracing::error;

/// Check if the effective user is root
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Fail with a permission error unless running as root
pub fn require_root() -> Result<()> {
    check_euid(unsafe { libc::geteuid() })
}

fn check_euid(euid: u32) -> Result<()> {
    if euid == 0 {
        return Ok(());
    }

    error!("This program must be run as root (effective uid is {})", euid);
    Err(PostInstallError::permission(format!(
        "effective uid {} is not root",
        euid
    )))
}
