//! Postal-code to US-state lookup and geo enrichment.
//!
//! The lookup itself is an external capability behind [`Geocoder`]. Two
//! implementations ship with the crate:
//!
//! - [`GeoNamesGeocoder`] reads a GeoNames postal-code dump, from disk or
//!   downloaded over HTTP (`TRIALSCOPE_GEONAMES_URL` overrides the source).
//! - [`StaticGeocoder`] answers from an in-memory map, for fixtures and tests.

mod enrich;
mod geonames;

use std::collections::{BTreeSet, HashMap};

use crate::error::Result;

pub use enrich::{clean_zip, enrich_with_states};
pub use geonames::{geonames_url, GeoNamesGeocoder, DEFAULT_GEONAMES_URL, GEONAMES_URL_ENV};

/// Resolves 5-digit postal codes to two-letter state codes.
///
/// Implementations must be thread-safe (Send + Sync) so an explorer holding
/// one can be shared.
pub trait Geocoder: Send + Sync {
    /// Look up every code in `zip_codes`.
    ///
    /// Unknown codes map to `None` or are left out of the result.
    fn query(&self, zip_codes: &BTreeSet<String>) -> Result<HashMap<String, Option<String>>>;

    /// Name of this geocoder (for logging).
    fn name(&self) -> &str;
}

/// Geocoder answering from a fixed postal-code → state map.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    states: HashMap<String, String>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a postal code → state entry.
    pub fn with_entry(mut self, zip: impl Into<String>, state: impl Into<String>) -> Self {
        self.states.insert(zip.into(), state.into());
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn query(&self, zip_codes: &BTreeSet<String>) -> Result<HashMap<String, Option<String>>> {
        Ok(zip_codes
            .iter()
            .map(|zip| (zip.clone(), self.states.get(zip).cloned()))
            .collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_geocoder_reports_unknown_codes() {
        let geocoder = StaticGeocoder::new().with_entry("94305", "CA");
        let zips: BTreeSet<String> = ["94305", "00000"].iter().map(|s| s.to_string()).collect();
        let result = geocoder.query(&zips).unwrap();

        assert_eq!(result["94305"].as_deref(), Some("CA"));
        assert_eq!(result["00000"], None);
    }
}
