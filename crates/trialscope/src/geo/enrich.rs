//! Zip cleaning and state-code attachment.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::Geocoder;
use crate::error::Result;
use crate::table::TrialTable;

static FIVE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{5}").unwrap());

/// First run of five consecutive digits in a free-text postal code.
///
/// `"94305-1234"` and `"CA 94305"` both clean to `94305`; `"9430"` has no
/// run and yields `None`.
pub fn clean_zip(raw: &str) -> Option<String> {
    FIVE_DIGITS.find(raw).map(|m| m.as_str().to_string())
}

/// Derive the geo-enriched table from `table`.
///
/// Records without a 5-digit zip are dropped. The geocoder is queried once
/// with the unique cleaned zips; records whose zip has no state keep
/// `state_code = None` and drop out of state-grouped statistics only.
pub fn enrich_with_states(table: &TrialTable, geocoder: &dyn Geocoder) -> Result<TrialTable> {
    let mut records = Vec::with_capacity(table.len());
    for record in table {
        if let Some(zip) = record.first_zipcode.as_deref().and_then(clean_zip) {
            let mut row = record.clone();
            row.zip_clean = Some(zip);
            records.push(row);
        }
    }

    let unique: BTreeSet<String> = records.iter().filter_map(|r| r.zip_clean.clone()).collect();
    let zip_to_state: HashMap<String, String> = if unique.is_empty() {
        HashMap::new()
    } else {
        geocoder
            .query(&unique)?
            .into_iter()
            .filter_map(|(zip, state)| state.map(|s| (zip, s)))
            .collect()
    };

    for row in &mut records {
        row.state_code = row
            .zip_clean
            .as_ref()
            .and_then(|zip| zip_to_state.get(zip).cloned());
    }

    let unresolved = unique.len() - unique.iter().filter(|z| zip_to_state.contains_key(*z)).count();
    if unresolved > 0 {
        warn!(
            geocoder = geocoder.name(),
            unresolved,
            "postal codes without a state code"
        );
    }
    debug!(
        kept = records.len(),
        dropped = table.len() - records.len(),
        unique_zips = unique.len(),
        "geo enrichment"
    );

    Ok(TrialTable::from_parts(
        std::sync::Arc::new(table.schema().with_geo()),
        records,
    ))
}
