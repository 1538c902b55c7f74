// file: src/system/files.rs
// version: 1.0.0
// guid: c77acb01-6075-46e3-8c0d-58d624d257dc

//! File helpers: appends, ownership, modes and atomic rewrites

use crate::Result;
use std::fs::{self, OpenOptions, Permissions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::unix::fs::{chown, PermissionsExt};
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Append `content` to `path`, creating it if missing. A newline is
/// inserted first when the existing file does not end with one.
pub fn append_text(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;

    let len = file.metadata()?.len();
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }

    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Append a single line, newline-terminated
pub fn append_line(path: &Path, line: &str) -> Result<()> {
    append_text(path, &format!("{}\n", line))
}

pub fn set_owner(path: &Path, uid: u32, gid: u32) -> Result<()> {
    chown(path, Some(uid), Some(gid))?;
    Ok(())
}

/// `chown -R uid:gid path`
pub fn set_owner_recursive(path: &Path, uid: u32, gid: u32) -> Result<()> {
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        // lchown semantics: never follow a symlink out of the tree
        std::os::unix::fs::lchown(entry.path(), Some(uid), Some(gid))?;
    }
    Ok(())
}

pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    fs::set_permissions(path, Permissions::from_mode(mode))?;
    Ok(())
}

/// Replace `path` with `contents` via a temp file in the same directory and
/// a rename. The original file's permission bits are kept.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let original_mode = fs::metadata(path).ok().map(|m| m.permissions().mode());

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents.as_bytes())?;
    temp.as_file().sync_all()?;
    if let Some(mode) = original_mode {
        fs::set_permissions(temp.path(), Permissions::from_mode(mode))?;
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
