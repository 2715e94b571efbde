//! Known columns of the trial dataset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Header names accepted as the identifier column when none is configured,
/// in order of preference.
pub const ID_CANDIDATES: &[&str] = &[
    "nct_id",
    "nct_number",
    "nct number",
    "nctid",
    "trial_id",
    "id",
];

/// A column the aggregation pipeline knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Trial identifier (mandatory).
    Id,
    /// Main trial category.
    Category,
    /// Zero or more sub-categories encoded as text.
    SubCategory,
    /// English listed as an inclusion criterion.
    EnglishIsInclusion,
    /// Non-English speakers listed as an exclusion criterion.
    NonEnglishIsExclusion,
    /// Comma-separated additional languages.
    OtherLanguageCriteria,
    /// Free-text postal code of the first trial site.
    FirstZipcode,
    /// Cleaned 5-digit postal code (geo-enriched tables only).
    ZipClean,
    /// Two-letter US state code (geo-enriched tables only).
    StateCode,
}

impl Column {
    /// Source columns that may be absent without failing the load.
    pub const OPTIONAL: [Column; 6] = [
        Column::Category,
        Column::SubCategory,
        Column::EnglishIsInclusion,
        Column::NonEnglishIsExclusion,
        Column::OtherLanguageCriteria,
        Column::FirstZipcode,
    ];

    /// Header name of the column in the source file.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Category => "category",
            Column::SubCategory => "sub_category",
            Column::EnglishIsInclusion => "english_is_inclusion",
            Column::NonEnglishIsExclusion => "non_english_is_exclusion",
            Column::OtherLanguageCriteria => "other_language_criteria",
            Column::FirstZipcode => "first_zipcode",
            Column::ZipClean => "zip_clean",
            Column::StateCode => "state_code",
        }
    }

    /// Columns holding boolean-like flags.
    pub fn is_flag(&self) -> bool {
        matches!(self, Column::EnglishIsInclusion | Column::NonEnglishIsExclusion)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
