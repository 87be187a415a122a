use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::aggregate::{DEFAULT_FACTORS, DEFAULT_MIN_PERIOD, PeriodCutoff};
use crate::domain::DatasetId;
use crate::error::FactorError;

pub const DEFAULT_CONFIG_FILE: &str = "ff-regional.json";
pub const DEFAULT_OUTPUT: &str = "result.xlsx";
pub const DEFAULT_BASE_URL: &str = "https://mba.tuck.dartmouth.edu/pages/faculty/ken.french/ftp";

pub const FIVE_FACTOR_DATASETS: &[&str] = &[
    "North_America_5_Factors_CSV.zip",
    "Europe_5_Factors_CSV.zip",
    "Japan_5_Factors_CSV.zip",
    "Asia_Pacific_ex_Japan_5_Factors_CSV.zip",
    "Emerging_5_Factors_CSV.zip",
];

pub const MOMENTUM_DATASETS: &[&str] = &[
    "North_America_Mom_Factor_CSV.zip",
    "Europe_Mom_Factor_CSV.zip",
    "Japan_Mom_Factor_CSV.zip",
    "Asia_Pacific_ex_Japan_Mom_Factor_CSV.zip",
    "Emerging_Mom_Factor_CSV.zip",
];

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub datasets: Option<Vec<String>>,
    #[serde(default)]
    pub factors: Option<Vec<String>>,
    #[serde(default)]
    pub min_period: Option<CutoffEntry>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

/// `min_period` accepts either a `YYYYMM` integer or `"common-start"`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CutoffEntry {
    Period(i64),
    Named(String),
}

impl TryFrom<CutoffEntry> for PeriodCutoff {
    type Error = FactorError;

    fn try_from(entry: CutoffEntry) -> Result<Self, Self::Error> {
        match entry {
            CutoffEntry::Period(period) => Ok(PeriodCutoff::Fixed(period)),
            CutoffEntry::Named(name) => parse_cutoff(&name),
        }
    }
}

pub fn parse_cutoff(value: &str) -> Result<PeriodCutoff, FactorError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("common-start") {
        return Ok(PeriodCutoff::CommonStart);
    }
    value
        .parse::<i64>()
        .map(PeriodCutoff::Fixed)
        .map_err(|_| FactorError::InvalidConfig(format!("min_period: {value}")))
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub datasets: Vec<DatasetId>,
    pub factors: Vec<String>,
    pub cutoff: PeriodCutoff,
    pub data_dir: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads `path`, or `ff-regional.json` when present, and falls back to the
    /// built-in defaults otherwise.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, FactorError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if !config_path.exists() {
            if path.is_some() {
                return Err(FactorError::ConfigNotFound(config_path));
            }
            return Self::resolve_config(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| FactorError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| FactorError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, FactorError> {
        let base_url = config
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if base_url.is_empty() {
            return Err(FactorError::InvalidConfig("base_url is empty".to_string()));
        }

        let datasets = config
            .datasets
            .unwrap_or_else(default_datasets)
            .iter()
            .map(|value| value.parse())
            .collect::<Result<Vec<DatasetId>, FactorError>>()?;
        if datasets.is_empty() {
            return Err(FactorError::InvalidConfig("datasets is empty".to_string()));
        }

        let factors = config.factors.unwrap_or_else(default_factors);
        if factors.iter().any(|factor| factor.trim().is_empty()) {
            return Err(FactorError::InvalidConfig(
                "factor names must not be empty".to_string(),
            ));
        }

        let cutoff = config
            .min_period
            .map(PeriodCutoff::try_from)
            .transpose()?
            .unwrap_or(PeriodCutoff::Fixed(DEFAULT_MIN_PERIOD));

        let data_dir = config
            .data_dir
            .map(Utf8PathBuf::from)
            .unwrap_or_else(default_data_dir);
        let output = config
            .output
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT));

        Ok(ResolvedConfig {
            base_url,
            datasets,
            factors,
            cutoff,
            data_dir,
            output,
        })
    }
}

/// Five-factor files first, then momentum files, each North America, Europe,
/// Japan, Asia Pacific ex Japan, Emerging.
pub fn default_datasets() -> Vec<String> {
    FIVE_FACTOR_DATASETS
        .iter()
        .chain(MOMENTUM_DATASETS)
        .map(|name| name.to_string())
        .collect()
}

pub fn default_factors() -> Vec<String> {
    DEFAULT_FACTORS.iter().map(|name| name.to_string()).collect()
}

/// Archives land in a directory named after today's date, `YYYYMMDD`.
pub fn default_data_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(chrono::Local::now().format("%Y%m%d").to_string())
}
