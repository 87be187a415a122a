use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::info;

use crate::domain::DatasetId;
use crate::error::FactorError;
use crate::fs_util::write_atomic;

/// Where dataset archives come from.
pub trait FactorSource {
    /// Fetches `dataset` and stores it at `destination`, returning the byte count.
    fn download(&self, dataset: &DatasetId, destination: &Path) -> Result<u64, FactorError>;
}

#[derive(Clone)]
pub struct HttpFactorSource {
    client: Client,
    base_url: String,
}

impl HttpFactorSource {
    pub fn new(base_url: &str) -> Result<Self, FactorError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("ff-regional/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| FactorError::Http(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| FactorError::Http(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn dataset_url(&self, dataset: &DatasetId) -> String {
        dataset_url(&self.base_url, dataset)
    }
}

impl FactorSource for HttpFactorSource {
    fn download(&self, dataset: &DatasetId, destination: &Path) -> Result<u64, FactorError> {
        let url = self.dataset_url(dataset);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| FactorError::Http(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| format!("request for {url} failed"));
            return Err(FactorError::HttpStatus { status, message });
        }
        let bytes = response
            .bytes()
            .map_err(|err| FactorError::Http(err.to_string()))?;
        write_atomic(destination, &bytes)?;
        Ok(bytes.len() as u64)
    }
}

pub fn dataset_url(base_url: &str, dataset: &DatasetId) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), dataset.as_str())
}

/// Downloads every dataset into `data_dir`, one at a time, stopping at the
/// first failure.
pub fn download_all(
    source: &dyn FactorSource,
    datasets: &[DatasetId],
    data_dir: &Path,
) -> Result<u64, FactorError> {
    fs::create_dir_all(data_dir).map_err(|err| FactorError::Filesystem(err.to_string()))?;
    let mut total = 0;
    for dataset in datasets {
        let destination = data_dir.join(dataset.as_str());
        let size = source.download(dataset, &destination)?;
        info!(dataset = %dataset, bytes = size, "downloaded archive");
        total += size;
    }
    Ok(total)
}
