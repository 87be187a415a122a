use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::FactorError;

/// Writes through a temp file in the destination directory, then renames it
/// into place. A failed write never leaves a truncated file at `destination`.
pub fn write_atomic(destination: &Path, content: &[u8]) -> Result<(), FactorError> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| FactorError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix(".ff-regional")
        .tempfile_in(parent)
        .map_err(|err| FactorError::Filesystem(err.to_string()))?;
    temp.write_all(content)
        .map_err(|err| FactorError::Filesystem(err.to_string()))?;
    temp.persist(destination)
        .map_err(|err| FactorError::Filesystem(format!("{}: {err}", destination.display())))?;
    Ok(())
}
