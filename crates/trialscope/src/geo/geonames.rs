//! GeoNames postal-code dump geocoder.
//!
//! The dump is tab-separated, one place per line:
//! `country_code, postal_code, place_name, state_name, state_code, ...`.
//! Mirrors of it sometimes carry a header row, which is skipped.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use super::Geocoder;
use crate::error::{Result, TrialscopeError};

/// Default download location of the US postal-code dump.
pub const DEFAULT_GEONAMES_URL: &str =
    "https://symerio.github.io/postal-codes-data/data/geonames/US.txt";

/// Environment variable overriding [`DEFAULT_GEONAMES_URL`].
pub const GEONAMES_URL_ENV: &str = "TRIALSCOPE_GEONAMES_URL";

const POSTAL_CODE_FIELD: usize = 1;
const STATE_CODE_FIELD: usize = 4;

/// Geocoder backed by a GeoNames postal-code table.
#[derive(Debug, Clone)]
pub struct GeoNamesGeocoder {
    states: HashMap<String, String>,
}

impl GeoNamesGeocoder {
    /// Load the dump from a local file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| TrialscopeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read GeoNames dump");
        Self::from_bytes(&bytes)
    }

    /// Download the dump from [`geonames_url`].
    pub fn from_env() -> Result<Self> {
        Self::fetch(&geonames_url())
    }

    /// Download the dump from `url`.
    pub fn fetch(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| TrialscopeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(url, "downloading GeoNames postal codes");
        let response = client
            .get(url)
            .send()
            .map_err(|e| TrialscopeError::Geocoder(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(TrialscopeError::Geocoder(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| TrialscopeError::Geocoder(format!("Failed to read {}: {}", url, e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a dump already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_reader(bytes);

        let mut states = HashMap::new();
        for result in reader.records() {
            let record = result?;
            let (Some(zip), Some(state)) = (
                record.get(POSTAL_CODE_FIELD).map(str::trim),
                record.get(STATE_CODE_FIELD).map(str::trim),
            ) else {
                continue;
            };

            if zip.is_empty() || state.is_empty() || zip.eq_ignore_ascii_case("postal_code") {
                continue;
            }
            // A postal code spanning several places keeps its first state
            states
                .entry(zip.to_string())
                .or_insert_with(|| state.to_string());
        }

        if states.is_empty() {
            return Err(TrialscopeError::EmptyData(
                "GeoNames dump contains no postal codes".to_string(),
            ));
        }

        debug!(postal_codes = states.len(), "parsed GeoNames dump");
        Ok(Self { states })
    }

    /// Number of postal codes known.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Dump location: `TRIALSCOPE_GEONAMES_URL` when set and non-blank, else
/// [`DEFAULT_GEONAMES_URL`].
pub fn geonames_url() -> String {
    resolve_url(std::env::var(GEONAMES_URL_ENV).ok())
}

fn resolve_url(configured: Option<String>) -> String {
    configured
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_GEONAMES_URL.to_string())
}

impl Geocoder for GeoNamesGeocoder {
    fn query(&self, zip_codes: &BTreeSet<String>) -> Result<HashMap<String, Option<String>>> {
        Ok(zip_codes
            .iter()
            .map(|zip| (zip.clone(), self.states.get(zip).cloned()))
            .collect())
    }

    fn name(&self) -> &str {
        "geonames"
    }
}
