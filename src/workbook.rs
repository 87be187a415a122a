use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::aggregate::CombinedTable;
use crate::error::FactorError;
use crate::fs_util::write_atomic;
use crate::parser::PERIOD_COLUMN;

/// Renders combined tables into one `.xlsx` file, one sheet per factor.
#[derive(Debug, Default)]
pub struct WorkbookWriter;

impl WorkbookWriter {
    pub fn new() -> Self {
        Self
    }

    /// Builds the whole workbook in memory. Nothing touches the filesystem.
    pub fn render(&self, tables: &[CombinedTable]) -> Result<Vec<u8>, FactorError> {
        let mut workbook = Workbook::new();
        for table in tables {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(table.factor()).map_err(workbook_error)?;
            write_sheet(worksheet, table)?;
        }
        workbook.save_to_buffer().map_err(workbook_error)
    }

    /// Renders and then commits the file in one rename, so a failure leaves
    /// any previous file at `path` untouched and never creates a partial one.
    pub fn write(&self, path: &Path, tables: &[CombinedTable]) -> Result<(), FactorError> {
        let bytes = self.render(tables)?;
        write_atomic(path, &bytes)?;
        info!(path = %path.display(), sheets = tables.len(), "wrote workbook");
        Ok(())
    }
}

fn write_sheet(worksheet: &mut Worksheet, table: &CombinedTable) -> Result<(), FactorError> {
    worksheet
        .write_string(0, 0, PERIOD_COLUMN)
        .map_err(workbook_error)?;
    for (position, dataset) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, column_number(position + 1)?, dataset.as_str())
            .map_err(workbook_error)?;
    }

    for (position, row) in table.rows().iter().enumerate() {
        let row_number = u32::try_from(position + 1)
            .map_err(|_| FactorError::Workbook("too many rows".to_string()))?;
        write_cell(worksheet, row_number, 0, &row.period)?;
        for (col, cell) in row.cells.iter().enumerate() {
            if let Some(value) = cell {
                write_cell(worksheet, row_number, column_number(col + 1)?, value)?;
            }
        }
    }
    Ok(())
}

/// Numeric text becomes a number cell; anything else is kept as a string.
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), FactorError> {
    let written = match value.parse::<f64>() {
        Ok(number) if number.is_finite() => worksheet.write_number(row, col, number),
        _ => worksheet.write_string(row, col, value),
    };
    written.map_err(workbook_error)?;
    Ok(())
}

fn column_number(position: usize) -> Result<u16, FactorError> {
    u16::try_from(position).map_err(|_| FactorError::Workbook("too many columns".to_string()))
}

fn workbook_error(err: XlsxError) -> FactorError {
    FactorError::Workbook(err.to_string())
}
