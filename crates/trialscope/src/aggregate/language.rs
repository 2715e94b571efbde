//! Additional-language criteria statistics.

use indexmap::IndexMap;
use serde::Serialize;

use super::ratio::{average, percentage, round1};
use crate::schema::Column;
use crate::table::TrialTable;

/// Split an `other_language_criteria` cell into trimmed pieces.
///
/// Pieces are not deduplicated: `"Spanish, Spanish"` is two mentions.
pub fn split_languages(cell: &str) -> Vec<String> {
    cell.split(',').map(|piece| piece.trim().to_string()).collect()
}

/// Language statistics for a set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LanguageSummary {
    /// Records with a non-missing `other_language_criteria`.
    pub trials_with_other_language: usize,
    /// Language pieces listed across those records.
    pub total_language_mentions: usize,
    /// Mentions per language, most frequent first.
    pub language_counts: IndexMap<String, usize>,
}

/// One bar of the language breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub trials: usize,
    /// Share of trials with additional languages, rounded to one decimal.
    pub percentage: Option<f64>,
}

impl LanguageSummary {
    /// Mean number of languages per trial listing any.
    pub fn average_per_trial(&self) -> Option<f64> {
        average(self.total_language_mentions, self.trials_with_other_language)
    }

    /// Per-language bars, least frequent first (bottom-up horizontal chart).
    pub fn breakdown(&self) -> Vec<LanguageShare> {
        let mut shares: Vec<LanguageShare> = self
            .language_counts
            .iter()
            .map(|(language, &trials)| LanguageShare {
                language: language.clone(),
                trials,
                percentage: percentage(trials, self.trials_with_other_language).map(round1),
            })
            .collect();
        shares.sort_by_key(|share| share.trials);
        shares
    }
}

/// Summarize additional-language criteria over `table`.
///
/// An absent column or a table without any languages yields all zeros.
pub fn summarize_language(table: &TrialTable) -> LanguageSummary {
    let mut summary = LanguageSummary::default();
    if !table.has_column(Column::OtherLanguageCriteria) {
        return summary;
    }

    for languages in table.iter().filter_map(|r| r.other_languages.as_ref()) {
        summary.trials_with_other_language += 1;
        summary.total_language_mentions += languages.len();
        for language in languages {
            *summary
                .language_counts
                .entry(language.clone())
                .or_insert(0) += 1;
        }
    }

    summary.language_counts.sort_by(|_, a, _, b| b.cmp(a));
    summary
}
