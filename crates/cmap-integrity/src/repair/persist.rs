//! Backup and atomic write-back

use crate::error::{IntegrityError, IntegrityResult};
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Timestamp format of backup suffixes, microsecond resolution
pub const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// `<path>.backup.<stamp>`
#[must_use]
pub fn backup_path_for(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".backup.");
    name.push(at.format(BACKUP_STAMP_FORMAT).to_string());
    PathBuf::from(name)
}

/// Copy `path` to its backup sibling and flush the copy to disk
pub fn create_backup(path: &Path, at: DateTime<Utc>) -> IntegrityResult<PathBuf> {
    let backup = backup_path_for(path, at);
    let wrap = |source: std::io::Error| IntegrityError::Backup {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    };

    if backup.exists() {
        return Err(wrap(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "backup already exists",
        )));
    }
    fs::copy(path, &backup).map_err(wrap)?;
    File::open(&backup).and_then(|f| f.sync_all()).map_err(wrap)?;
    Ok(backup)
}

/// Replace `path` with `contents` via a synced temporary sibling and rename
///
/// The original is never truncated in place, so a failed write leaves it
/// intact. Permissions of an existing file are carried over.
pub fn write_document(path: &Path, contents: &str) -> IntegrityResult<()> {
    let err = |source: std::io::Error| IntegrityError::write_error(path, source);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(err)?;
    tmp.write_all(contents.as_bytes()).map_err(err)?;
    tmp.write_all(b"\n").map_err(err)?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(err)?;
    }
    tmp.as_file().sync_all().map_err(err)?;
    tmp.persist(path).map_err(|e| err(e.error))?;
    Ok(())
}
