use std::io::BufRead;

use crate::error::FactorError;

/// Canonical name given to the first (period) column of every block.
pub const PERIOD_COLUMN: &str = "DATEYM";

/// Header rows that open a factor block: the 5-factor layout and the
/// momentum layout.
pub const HEADER_PREFIXES: &[&str] = &[",Mkt-RF", ",WML"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    SeekingHeader,
    CollectingRows,
    Done,
}

/// Header and data rows captured from the first factor block of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBlock {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

/// Line-at-a-time scanner for the first factor block in a file.
#[derive(Debug)]
pub struct BlockScanner {
    source_name: String,
    state: ScanState,
    line_no: usize,
    block: RawBlock,
}

impl BlockScanner {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            state: ScanState::SeekingHeader,
            line_no: 0,
            block: RawBlock::default(),
        }
    }

    /// Feeds one line. Lines arriving after the block has ended are ignored.
    pub fn push_line(&mut self, line: &str) -> Result<ScanState, FactorError> {
        self.line_no += 1;
        let line = line.trim_end();
        match self.state {
            ScanState::SeekingHeader => {
                if HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
                    let mut header = split_fields(line);
                    header[0] = PERIOD_COLUMN.to_string();
                    self.block.header = Some(header);
                    self.state = ScanState::CollectingRows;
                }
            }
            ScanState::CollectingRows => {
                if line.is_empty() {
                    self.state = ScanState::Done;
                } else {
                    let row = split_fields(line);
                    let expected = self.block.header.as_ref().map_or(0, Vec::len);
                    if row.len() != expected {
                        return Err(FactorError::FieldCount {
                            source_name: self.source_name.clone(),
                            line: self.line_no,
                            expected,
                            found: row.len(),
                        });
                    }
                    self.block.rows.push(row);
                }
            }
            ScanState::Done => {}
        }
        Ok(self.state)
    }

    pub fn finish(self) -> RawBlock {
        self.block
    }
}

/// Scans `lines` and returns the first factor block. Stops reading once the
/// block's terminating blank line is seen.
pub fn parse_block<'a, I>(source_name: &str, lines: I) -> Result<RawBlock, FactorError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scanner = BlockScanner::new(source_name);
    for line in lines {
        if scanner.push_line(line)? == ScanState::Done {
            break;
        }
    }
    Ok(scanner.finish())
}

/// Same as [`parse_block`] over raw bytes. Each line is checked as UTF-8 only
/// when it is reached, so anything after the block may hold any encoding.
pub fn parse_reader<R: BufRead>(source_name: &str, reader: R) -> Result<RawBlock, FactorError> {
    let mut scanner = BlockScanner::new(source_name);
    for (index, line) in reader.split(b'\n').enumerate() {
        let bytes = line.map_err(|err| FactorError::EntryRead {
            entry: source_name.to_string(),
            message: err.to_string(),
        })?;
        let line = std::str::from_utf8(&bytes).map_err(|_| FactorError::InvalidEncoding {
            entry: source_name.to_string(),
            line: index + 1,
        })?;
        if scanner.push_line(line)? == ScanState::Done {
            break;
        }
    }
    Ok(scanner.finish())
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',').map(|field| field.trim().to_string()).collect()
}
