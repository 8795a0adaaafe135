//! File pre-conditions shared by every codec.
//!
//! Reads require an existing, regular, readable, non-empty file whose extension
//! matches the codec. Writes require a matching extension, create missing
//! parent directories and replace the target atomically.

use super::formats::Format;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

fn storage_error(path: &Path, detail: impl std::fmt::Display) -> Error {
    Error::Storage(format!("{}: {detail}", path.display()))
}

/// Fails unless `path` carries the extension of `format` (case-insensitive).
///
/// # Errors
///
/// Returns [`Error::Storage`] naming the expected extension.
pub fn check_extension(path: &Path, format: Format) -> Result<()> {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
    if matches {
        Ok(())
    } else {
        Err(storage_error(
            path,
            format!(
                "expected a .{} file for {format} format",
                format.extension()
            ),
        ))
    }
}

/// Checks read pre-conditions and returns the file content.
///
/// # Errors
///
/// Returns [`Error::Storage`] if the file is missing, not a regular file,
/// has the wrong extension, cannot be read or is empty.
pub fn read_checked(path: &Path, format: Format) -> Result<String> {
    if !path.exists() {
        return Err(storage_error(path, "file does not exist"));
    }
    if !path.is_file() {
        return Err(storage_error(path, "not a regular file"));
    }
    check_extension(path, format)?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| storage_error(path, format!("file cannot be read: {e}")))?;
    if content.trim().is_empty() {
        return Err(storage_error(path, "file is empty"));
    }

    Ok(content)
}

/// Checks write pre-conditions, creating missing parent directories.
///
/// # Errors
///
/// Returns [`Error::Storage`] if the extension does not match or the
/// directories cannot be created.
pub fn prepare_write(path: &Path, format: Format) -> Result<()> {
    check_extension(path, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            storage_error(
                path,
                format!("cannot create directory {}: {e}", parent.display()),
            )
        })?;
    }

    Ok(())
}

/// Writes `content` to a temporary file next to `path`, then renames it over `path`.
///
/// A failed write leaves any previous file untouched.
///
/// # Errors
///
/// Returns [`Error::Storage`] if the temporary file cannot be written or persisted.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| storage_error(path, format!("cannot create temporary file: {e}")))?;
    tmp.write_all(content.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| storage_error(path, format!("write failed: {e}")))?;
    tmp.persist(path)
        .map_err(|e| storage_error(path, format!("cannot replace file: {}", e.error)))?;

    Ok(())
}
