use std::path::PathBuf;

use tracing::{debug, info};

use crate::archive;
use crate::domain::DatasetId;
use crate::error::FactorError;
use crate::table::ParsedTable;

/// Tables keyed by dataset, in the order the datasets were configured.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    entries: Vec<(DatasetId, ParsedTable)>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the table for `id`. Replacing keeps the original position.
    pub fn insert(&mut self, id: DatasetId, table: ParsedTable) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = table,
            None => self.entries.push((id, table)),
        }
    }

    pub fn get(&self, id: &DatasetId) -> Option<&ParsedTable> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DatasetId, &ParsedTable)> {
        self.entries.iter().map(|(id, table)| (id, table))
    }

    pub fn ids(&self) -> impl Iterator<Item = &DatasetId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(DatasetId, ParsedTable)> for TableSet {
    fn from_iter<T: IntoIterator<Item = (DatasetId, ParsedTable)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (id, table) in iter {
            set.insert(id, table);
        }
        set
    }
}

/// Reads previously downloaded archives from one directory.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    data_dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn archive_path(&self, id: &DatasetId) -> PathBuf {
        self.data_dir.join(id.as_str())
    }

    /// Loads every dataset in order. All archives must be present before any
    /// is parsed, and the first failure aborts the load.
    pub fn load_all(&self, datasets: &[DatasetId]) -> Result<TableSet, FactorError> {
        if let Some(missing) = datasets
            .iter()
            .map(|id| self.archive_path(id))
            .find(|path| !path.is_file())
        {
            return Err(FactorError::ArchiveNotFound(missing));
        }

        let mut tables = TableSet::new();
        for id in datasets {
            let table = self.load_one(id)?;
            tables.insert(id.clone(), table);
        }
        info!(datasets = tables.len(), dir = %self.data_dir.display(), "loaded factor tables");
        Ok(tables)
    }

    pub fn load_one(&self, id: &DatasetId) -> Result<ParsedTable, FactorError> {
        let path = self.archive_path(id);
        if !path.is_file() {
            return Err(FactorError::ArchiveNotFound(path));
        }
        let entry_name = id.entry_name();
        debug!(dataset = %id, entry = %entry_name, "reading entry");
        let block = match archive::read_block(&path, &entry_name) {
            Ok(block) => block,
            Err(err @ FactorError::EntryNotFound { .. }) => {
                if let Ok(names) = archive::entry_names(&path) {
                    debug!(dataset = %id, available = ?names, "entry missing from archive");
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let table = ParsedTable::from_block(&entry_name, block)?;
        debug!(dataset = %id, rows = table.len(), columns = ?table.value_columns(), "parsed table");
        Ok(table)
    }
}
