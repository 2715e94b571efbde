//! Pure aggregation functions over trial table snapshots.
//!
//! Nothing here mutates its input. Every ratio goes through [`percentage`]
//! or [`average`], which return `None` for a zero denominator.

mod counts;
mod language;
mod multi_value;
mod ratio;

pub use counts::{boolean_sum, count_categorical};
pub use language::{split_languages, summarize_language, LanguageShare, LanguageSummary};
pub use multi_value::{explode_multi_value, parse_multi_value};
pub use ratio::{average, format_ratio, percentage, round1, NOT_APPLICABLE};
