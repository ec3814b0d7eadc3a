//! Filesystem helpers for the build tree.

use std::fs;
use std::path::Path;

use crate::error::Error;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), Error> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| Error::Io {
            context: format!("failed to create directory: {}", path.display()),
            source,
        })?;
    }
    Ok(())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|source| Error::Io {
        context: format!("failed to write file: {}", path.display()),
        source,
    })
}
