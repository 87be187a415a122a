use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::domain::DatasetId;
use crate::error::FactorError;
use crate::loader::TableSet;
use crate::table::Series;

/// First period kept when no cutoff is configured: July 1995, where all five
/// regional momentum series have history.
pub const DEFAULT_MIN_PERIOD: i64 = 199507;

pub const DEFAULT_FACTORS: &[&str] = &["SMB", "HML", "RMW", "CMA", "WML"];

/// Lower bound applied to the rows of every combined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodCutoff {
    Fixed(i64),
    /// Latest first period among the contributing series of each factor.
    CommonStart,
}

impl Default for PeriodCutoff {
    fn default() -> Self {
        PeriodCutoff::Fixed(DEFAULT_MIN_PERIOD)
    }
}

impl fmt::Display for PeriodCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodCutoff::Fixed(period) => write!(f, "{period}"),
            PeriodCutoff::CommonStart => write!(f, "common-start"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRow {
    pub period: String,
    pub cells: Vec<Option<String>>,
}

/// One factor's columns from every dataset that carries it, aligned by period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedTable {
    factor: String,
    columns: Vec<DatasetId>,
    rows: Vec<CombinedRow>,
}

impl CombinedTable {
    pub fn factor(&self) -> &str {
        &self.factor
    }

    pub fn columns(&self) -> &[DatasetId] {
        &self.columns
    }

    pub fn rows(&self) -> &[CombinedRow] {
        &self.rows
    }

    pub fn periods(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.period.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    pub fn get(&self, period: &str, dataset: &DatasetId) -> Option<&str> {
        let col = self.columns.iter().position(|id| id == dataset)?;
        self.rows
            .iter()
            .find(|row| row.period == period)
            .and_then(|row| row.cells[col].as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct FactorAggregator {
    factors: Vec<String>,
    cutoff: PeriodCutoff,
}

impl FactorAggregator {
    pub fn new(factors: Vec<String>, cutoff: PeriodCutoff) -> Self {
        Self { factors, cutoff }
    }

    /// Combines every configured factor, in configured order.
    pub fn aggregate_all(&self, tables: &TableSet) -> Result<Vec<CombinedTable>, FactorError> {
        self.factors
            .iter()
            .map(|factor| self.aggregate(tables, factor))
            .collect()
    }

    pub fn aggregate(&self, tables: &TableSet, factor: &str) -> Result<CombinedTable, FactorError> {
        let mut columns = Vec::new();
        let mut series = Vec::new();
        for (id, table) in tables.iter() {
            if let Some(column) = table.column(factor, id.as_str()) {
                columns.push(id.clone());
                series.push(column);
            }
        }

        let width = series.len();
        let mut aligned: BTreeMap<i64, CombinedRow> = BTreeMap::new();
        let mut first_periods = Vec::with_capacity(width);
        for (position, column) in series.into_iter().enumerate() {
            let Series { label, points } = column;
            let mut first: Option<i64> = None;
            for (period, value) in points {
                let key = period_value(&period)?;
                first = Some(first.map_or(key, |current| current.min(key)));
                let row = aligned.entry(key).or_insert_with(|| CombinedRow {
                    period: period.clone(),
                    cells: vec![None; width],
                });
                // Distinct spellings of one period in the same series ("199507", "0199507").
                if row.cells[position].is_some() {
                    return Err(FactorError::DuplicatePeriod {
                        source_name: label,
                        period,
                    });
                }
                row.cells[position] = Some(value);
            }
            first_periods.extend(first);
        }

        let min_period = match self.cutoff {
            PeriodCutoff::Fixed(period) => period,
            PeriodCutoff::CommonStart => first_periods.into_iter().max().unwrap_or(i64::MIN),
        };
        let rows: Vec<CombinedRow> = aligned.split_off(&min_period).into_values().collect();
        debug!(
            factor,
            datasets = columns.len(),
            rows = rows.len(),
            min_period,
            "combined factor"
        );

        Ok(CombinedTable {
            factor: factor.to_string(),
            columns,
            rows,
        })
    }
}

/// Integer value of a `YYYYMM` period key.
pub fn period_value(period: &str) -> Result<i64, FactorError> {
    period
        .trim()
        .parse::<i64>()
        .map_err(|_| FactorError::InvalidPeriod(period.to_string()))
}
