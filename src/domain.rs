use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FactorError;

/// Everything from this marker onward is dropped from an archive name to get
/// the stem of the CSV entry stored inside it.
pub const ARCHIVE_MARKER: &str = "_CSV";

/// Spelling differences between archive names and the entries inside them.
/// Applied in order to the derived entry name.
pub const ENTRY_NAME_FIXUPS: &[(&str, &str)] = &[("Mom", "MOM")];

/// Name of one upstream archive, e.g. `North_America_5_Factors_CSV.zip`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetId(String);

impl DatasetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the CSV entry expected inside this dataset's archive.
    pub fn entry_name(&self) -> String {
        entry_name_for(&self.0)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetId {
    type Err = FactorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let is_valid = !trimmed.is_empty()
            && !trimmed.contains(['/', '\\'])
            && trimmed != "."
            && trimmed != "..";
        if !is_valid {
            return Err(FactorError::InvalidDatasetId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for DatasetId {
    type Error = FactorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatasetId> for String {
    fn from(value: DatasetId) -> Self {
        value.0
    }
}

/// Derives the CSV entry name from an archive file name or path.
pub fn entry_name_for(archive_name: &str) -> String {
    let base = archive_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(archive_name);
    let stem = match base.find(ARCHIVE_MARKER) {
        Some(pos) => &base[..pos],
        None => base,
    };
    let mut entry = format!("{stem}.csv");
    for (from, to) in ENTRY_NAME_FIXUPS {
        if entry.contains(from) {
            entry = entry.replace(from, to);
        }
    }
    entry
}
