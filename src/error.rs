use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification used for exit codes and by callers that only care
/// whether a failure was a missing input or malformed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Parse,
    Network,
    Config,
    Io,
    Output,
}

#[derive(Debug, Error, Diagnostic)]
pub enum FactorError {
    #[error("invalid dataset identifier: {0}")]
    InvalidDatasetId(String),

    #[error("archive not found: {0}")]
    ArchiveNotFound(PathBuf),

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid config value: {0}")]
    InvalidConfig(String),

    #[error("malformed archive {path}: {message}")]
    MalformedArchive { path: PathBuf, message: String },

    #[error("entry {entry} not found in archive {path}")]
    EntryNotFound { path: PathBuf, entry: String },

    #[error("{entry} line {line} is not valid UTF-8")]
    InvalidEncoding { entry: String, line: usize },

    #[error("failed to read entry {entry}: {message}")]
    EntryRead { entry: String, message: String },

    #[error("no factor header row found in {source_name}")]
    HeaderNotFound { source_name: String },

    #[error("{source_name} line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        source_name: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{source_name} data row {row}: expected {expected} fields, found {found}")]
    RowWidth {
        source_name: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{source_name}: duplicate period {period}")]
    DuplicatePeriod { source_name: String, period: String },

    #[error("period key is not an integer: {0:?}")]
    InvalidPeriod(String),

    #[error("download request failed: {0}")]
    Http(String),

    #[error("download returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to render workbook: {0}")]
    Workbook(String),
}

impl FactorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FactorError::ArchiveNotFound(_) | FactorError::ConfigNotFound(_) => ErrorKind::NotFound,
            FactorError::MalformedArchive { .. }
            | FactorError::EntryNotFound { .. }
            | FactorError::InvalidEncoding { .. }
            | FactorError::EntryRead { .. }
            | FactorError::HeaderNotFound { .. }
            | FactorError::FieldCount { .. }
            | FactorError::RowWidth { .. }
            | FactorError::DuplicatePeriod { .. }
            | FactorError::InvalidPeriod(_) => ErrorKind::Parse,
            FactorError::Http(_) | FactorError::HttpStatus { .. } => ErrorKind::Network,
            FactorError::InvalidDatasetId(_)
            | FactorError::ConfigRead(_)
            | FactorError::ConfigParse(_)
            | FactorError::InvalidConfig(_) => ErrorKind::Config,
            FactorError::Filesystem(_) => ErrorKind::Io,
            FactorError::Workbook(_) => ErrorKind::Output,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}
