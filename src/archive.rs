use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::FactorError;
use crate::parser::{self, RawBlock};

/// Opens `archive_path`, finds the entry named `entry_name` and scans it for
/// the first factor block. Lines are decoded one at a time and reading stops
/// once the block ends, so bytes after it are never inspected.
pub fn read_block(archive_path: &Path, entry_name: &str) -> Result<RawBlock, FactorError> {
    if !archive_path.is_file() {
        return Err(FactorError::ArchiveNotFound(archive_path.to_path_buf()));
    }
    let file = fs::File::open(archive_path).map_err(|err| {
        FactorError::Filesystem(format!("open zip {}: {err}", archive_path.display()))
    })?;
    let mut archive = ZipArchive::new(file).map_err(|err| malformed(archive_path, err))?;

    let entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(FactorError::EntryNotFound {
                path: archive_path.to_path_buf(),
                entry: entry_name.to_string(),
            });
        }
        Err(err) => return Err(malformed(archive_path, err)),
    };

    parser::parse_reader(entry_name, BufReader::new(entry))
}

/// Lists entry names, mostly useful for diagnostics when an entry is missing.
pub fn entry_names(archive_path: &Path) -> Result<Vec<String>, FactorError> {
    let file = fs::File::open(archive_path).map_err(|err| {
        FactorError::Filesystem(format!("open zip {}: {err}", archive_path.display()))
    })?;
    let archive = ZipArchive::new(file).map_err(|err| malformed(archive_path, err))?;
    Ok(archive.file_names().map(str::to_string).collect())
}

fn malformed(path: &Path, err: impl std::fmt::Display) -> FactorError {
    FactorError::MalformedArchive {
        path: PathBuf::from(path),
        message: err.to_string(),
    }
}
