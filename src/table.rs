use std::collections::HashSet;

use crate::error::FactorError;
use crate::parser::RawBlock;

/// Period-indexed table of raw string values. The period column is kept
/// as the index and is not repeated in `rows`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One column pulled out of a table, paired with its period keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(String, String)>,
}

impl ParsedTable {
    /// Builds a table from a captured header and its rows.
    ///
    /// The first header field is the period column. An unset header, a row of
    /// the wrong width, or a repeated period are all rejected.
    pub fn build(
        source_name: &str,
        header: Option<Vec<String>>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, FactorError> {
        let Some(header) = header.filter(|header| !header.is_empty()) else {
            return Err(FactorError::HeaderNotFound {
                source_name: source_name.to_string(),
            });
        };

        let mut seen = HashSet::with_capacity(rows.len());
        let mut index = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (position, mut row) in rows.into_iter().enumerate() {
            if row.len() != header.len() {
                return Err(FactorError::RowWidth {
                    source_name: source_name.to_string(),
                    row: position + 1,
                    expected: header.len(),
                    found: row.len(),
                });
            }
            let period = row.remove(0);
            if !seen.insert(period.clone()) {
                return Err(FactorError::DuplicatePeriod {
                    source_name: source_name.to_string(),
                    period,
                });
            }
            index.push(period);
            values.push(row);
        }

        Ok(Self {
            columns: header,
            index,
            rows: values,
        })
    }

    pub fn from_block(source_name: &str, block: RawBlock) -> Result<Self, FactorError> {
        Self::build(source_name, block.header, block.rows)
    }

    /// All columns including the leading period column.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn value_columns(&self) -> &[String] {
        &self.columns[1..]
    }

    pub fn periods(&self) -> &[String] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.value_position(name).is_some()
    }

    pub fn get(&self, period: &str, column: &str) -> Option<&str> {
        let col = self.value_position(column)?;
        let row = self.index.iter().position(|key| key == period)?;
        Some(self.rows[row][col].as_str())
    }

    /// Copies `column` out as a series labeled `label`.
    pub fn column(&self, column: &str, label: &str) -> Option<Series> {
        let col = self.value_position(column)?;
        let points = self
            .index
            .iter()
            .zip(&self.rows)
            .map(|(period, row)| (period.clone(), row[col].clone()))
            .collect();
        Some(Series {
            label: label.to_string(),
            points,
        })
    }

    fn value_position(&self, name: &str) -> Option<usize> {
        self.value_columns().iter().position(|column| column == name)
    }
}
