//! Serializable per-tab results handed to a renderer.
//!
//! Each view is computed fresh from already-loaded tables and a selection.
//! Percentages are rounded to one decimal; `None` means not applicable.

use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregate::{
    boolean_sum, count_categorical, explode_multi_value, parse_multi_value, percentage, round1,
    summarize_language, LanguageShare,
};
use crate::export::export_file_name;
use crate::filter::{filter_by_category, filter_by_subcategory, select_state, Selector};
use crate::input::SourceMetadata;
use crate::schema::Column;
use crate::table::TrialTable;

pub const ALL_CATEGORIES: &str = "All Categories";
pub const ALL_SUB_CATEGORIES: &str = "All Sub-Categories";
pub const ALL_STATES: &str = "All States";

fn pct(part: usize, whole: usize) -> Option<f64> {
    percentage(part, whole).map(round1)
}

/// One slice of a pie chart or one region of a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub value: String,
    pub count: usize,
    pub percentage: Option<f64>,
}

fn shares(counts: &IndexMap<String, usize>, whole: usize) -> Vec<Share> {
    counts
        .iter()
        .map(|(value, &count)| Share {
            value: value.clone(),
            count,
            percentage: pct(count, whole),
        })
        .collect()
}

fn options(all_label: &str, values: impl IntoIterator<Item = String>) -> Vec<String> {
    std::iter::once(all_label.to_string()).chain(values).collect()
}

/// Language-criteria metrics of a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaMetrics {
    pub selected_trials: usize,
    pub english_inclusion: usize,
    pub english_inclusion_pct: Option<f64>,
    pub non_english_exclusion: usize,
    pub non_english_exclusion_pct: Option<f64>,
    pub trials_with_other_language: usize,
    pub other_language_pct: Option<f64>,
    pub total_language_mentions: usize,
    pub average_languages_per_trial: Option<f64>,
    /// Least frequent language first.
    pub language_breakdown: Vec<LanguageShare>,
}

impl CriteriaMetrics {
    /// Metrics of `selection`; every "% of selected trials" uses its row count.
    pub fn compute(selection: &TrialTable) -> Self {
        let selected_trials = selection.len();
        let english_inclusion = boolean_sum(selection, Column::EnglishIsInclusion);
        let non_english_exclusion = boolean_sum(selection, Column::NonEnglishIsExclusion);
        let language = summarize_language(selection);

        Self {
            selected_trials,
            english_inclusion,
            english_inclusion_pct: pct(english_inclusion, selected_trials),
            non_english_exclusion,
            non_english_exclusion_pct: pct(non_english_exclusion, selected_trials),
            trials_with_other_language: language.trials_with_other_language,
            other_language_pct: pct(language.trials_with_other_language, selected_trials),
            total_language_mentions: language.total_language_mentions,
            average_languages_per_trial: language.average_per_trial().map(round1),
            language_breakdown: language.breakdown(),
        }
    }
}

/// The category tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub total_trials: usize,
    pub has_category: bool,
    /// Most frequent first; percentages of records with a category.
    pub categories: Vec<Share>,
    pub options: Vec<String>,
    pub selection: String,
    pub export_file: String,
    pub metrics: CriteriaMetrics,
}

impl CategoryView {
    /// Build the tab for `base` under `category`. Also returns the selected rows.
    pub fn build(base: &TrialTable, category: &Selector<String>) -> (Self, TrialTable) {
        let counts = count_categorical(base, Column::Category);
        let categorized: usize = counts.values().sum();
        let selected = filter_by_category(base, category);
        let selection = category.label(ALL_CATEGORIES);

        let view = Self {
            total_trials: base.len(),
            has_category: base.has_column(Column::Category),
            categories: shares(&counts, categorized),
            options: options(ALL_CATEGORIES, counts.keys().cloned()),
            export_file: export_file_name(&selection),
            selection,
            metrics: CriteriaMetrics::compute(&selected),
        };
        (view, selected)
    }
}

/// The sub-category section, built from a category selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubCategoryView {
    pub has_sub_category: bool,
    /// Rows of the exploded view (one per token).
    pub exploded_rows: usize,
    /// Most frequent first; percentages of the exploded row count.
    pub sub_categories: Vec<Share>,
    pub options: Vec<String>,
    pub selection: String,
    pub export_file: String,
    /// Percentages against the un-exploded selection.
    pub metrics: CriteriaMetrics,
}

impl SubCategoryView {
    /// Build the section for the category-filtered `table` under `sub_category`.
    /// Also returns the selected (un-exploded) rows.
    pub fn build(table: &TrialTable, sub_category: &Selector<String>) -> (Self, TrialTable) {
        let exploded = explode_multi_value(table, Column::SubCategory, parse_multi_value);
        let counts = count_categorical(&exploded, Column::SubCategory);
        let selected = filter_by_subcategory(table, &exploded, sub_category);
        let selection = sub_category.label(ALL_SUB_CATEGORIES);

        let view = Self {
            has_sub_category: table.has_column(Column::SubCategory),
            exploded_rows: exploded.len(),
            sub_categories: shares(&counts, exploded.len()),
            options: options(ALL_SUB_CATEGORIES, counts.keys().cloned()),
            export_file: export_file_name(&selection),
            selection,
            metrics: CriteriaMetrics::compute(&selected),
        };
        (view, selected)
    }
}

/// The geographic tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateView {
    /// Trials per state for the choropleth, most frequent first.
    pub states: Vec<Share>,
    /// `All States` then state codes in alphabetical order.
    pub options: Vec<String>,
    pub selection: String,
    pub total_in_selection: usize,
    /// Share of the whole base table.
    pub percentage_of_all: Option<f64>,
    pub export_file: String,
    pub metrics: CriteriaMetrics,
}

impl StateView {
    /// Build the tab from the geo-enriched and base tables under `state`.
    /// Also returns the selected base rows.
    pub fn build(
        geo: &TrialTable,
        base: &TrialTable,
        state: &Selector<String>,
    ) -> (Self, TrialTable) {
        let counts = count_categorical(geo, Column::StateCode);
        let located: usize = counts.values().sum();
        let mut codes: Vec<String> = counts.keys().cloned().collect();
        codes.sort();

        let selected = select_state(geo, base, state);
        let selection = state.label(ALL_STATES);

        let view = Self {
            states: shares(&counts, located),
            options: options(ALL_STATES, codes),
            total_in_selection: selected.len(),
            percentage_of_all: if selected.is_empty() {
                None
            } else {
                pct(selected.len(), base.len())
            },
            export_file: export_file_name(&selection),
            selection,
            metrics: CriteriaMetrics::compute(&selected),
        };
        (view, selected)
    }
}

/// What `inspect` reports about a loaded source.
#[derive(Debug, Clone, Serialize)]
pub struct InspectView {
    pub source: SourceMetadata,
    pub id_column: String,
    pub trials: usize,
    pub present_columns: Vec<Column>,
    pub missing_columns: Vec<Column>,
}

impl InspectView {
    pub fn build(source: SourceMetadata, table: &TrialTable) -> Self {
        let schema = table.schema();
        let missing_columns = schema.missing_optional();
        let present_columns = Column::OPTIONAL
            .iter()
            .copied()
            .filter(|c| !missing_columns.contains(c))
            .collect();

        Self {
            source,
            id_column: schema.id_column.clone(),
            trials: table.len(),
            present_columns,
            missing_columns,
        }
    }
}
