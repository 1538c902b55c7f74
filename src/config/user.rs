// file: src/config/user.rs
// version: 1.0.0
// guid: def1ecf4-36cc-4d39-aa1f-cb910000ba1b

//! Target user resolution from the password database

use crate::error::PostInstallError;
use crate::Result;
use std::ffi::{CStr, CString};
use std::path::{Path, PathBuf};

/// The (normally non-root) user whose home directory gets configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUser {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
}

impl TargetUser {
    pub fn new(name: impl Into<String>, uid: u32, gid: u32, home: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            uid,
            gid,
            home: home.into(),
        }
    }

    /// Look a user up by name with `getpwnam_r`
    pub fn lookup(name: &str) -> Result<Self> {
        let c_name = CString::new(name)
            .map_err(|_| PostInstallError::user(format!("invalid user name: {:?}", name)))?;

        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut buf = vec![0 as libc::c_char; 16 * 1024];
        let mut found: *mut libc::passwd = std::ptr::null_mut();

        let rc = unsafe {
            libc::getpwnam_r(
                c_name.as_ptr(),
                &mut pwd,
                buf.as_mut_ptr(),
                buf.len(),
                &mut found,
            )
        };

        if rc != 0 {
            return Err(PostInstallError::user(format!(
                "getpwnam_r failed for {}: {}",
                name,
                std::io::Error::from_raw_os_error(rc)
            )));
        }
        if found.is_null() {
            return Err(PostInstallError::user(format!("no such user: {}", name)));
        }

        // pw_dir points into `buf`, which is still alive here
        let home = unsafe { CStr::from_ptr(pwd.pw_dir) }
            .to_string_lossy()
            .into_owned();

        Ok(Self::new(name, pwd.pw_uid, pwd.pw_gid, home))
    }

    pub fn ssh_dir(&self) -> PathBuf {
        self.home.join(".ssh")
    }

    pub fn authorized_keys(&self) -> PathBuf {
        self.ssh_dir().join("authorized_keys")
    }

    /// Path of a dotfile in the user's home, e.g. `.bashrc`
    pub fn home_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.home.join(name)
    }
}
