//! Property-based tests for the trialscope aggregation pipeline.
//!
//! These tests generate random trial tables and cell values and check that
//! parsing, aggregation and filtering keep their invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p trialscope --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p trialscope --test property_tests
//! ```

use proptest::prelude::*;

use trialscope::aggregate::{
    count_categorical, explode_multi_value, parse_multi_value, summarize_language,
};
use trialscope::filter::{filter_by_category, filter_by_subcategory, select_state};
use trialscope::input::Parser;
use trialscope::{export_csv, Column, FieldValue, Selector, TrialTable};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary printable cell text, including brackets, quotes and commas.
fn any_cell() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,\\[\\]'\"\\-]{0,40}"
}

fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("Cancers".to_string()),
        Just("Cardiovascular Diseases".to_string()),
        Just("Other / Special Populations".to_string()),
    ]
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Hypertension".to_string()),
        Just("Stroke".to_string()),
        Just("Heart Failure".to_string()),
        Just("Atrial Fibrillation".to_string()),
    ]
}

/// A sub-category cell in one of the encodings found in real exports.
fn sub_category() -> impl Strategy<Value = String> {
    prop::collection::vec(token(), 0..4).prop_flat_map(|tokens| {
        let plain = tokens.join(", ");
        let bracketed = format!(
            "[{}]",
            tokens
                .iter()
                .map(|t| format!("'{}'", t))
                .collect::<Vec<_>>()
                .join(", ")
        );
        prop_oneof![Just(plain), Just(bracketed)]
    })
}

fn languages() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("Spanish".to_string()),
            Just("Chinese".to_string()),
            Just("Vietnamese".to_string()),
        ],
        0..4,
    )
    .prop_map(|langs| langs.join(", "))
}

fn flag() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1".to_string()),
        Just("0".to_string()),
        Just("true".to_string()),
        Just("".to_string()),
    ]
}

fn zip() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("94305".to_string()),
        Just("02115-1234".to_string()),
        Just("10001".to_string()),
        Just("n/a".to_string()),
        Just("123".to_string()),
    ]
}

type Row = (String, String, String, String, String, String);

fn rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((category(), sub_category(), flag(), flag(), languages(), zip()), 1..30)
}

fn csv_quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn build_table(rows: &[Row]) -> TrialTable {
    let mut csv = String::from(
        "id,category,sub_category,english_is_inclusion,non_english_is_exclusion,other_language_criteria,first_zipcode\n",
    );
    for (i, (cat, sub, eng, non_eng, langs, zip)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "T{},{},{},{},{},{},{}\n",
            i,
            csv_quote(cat),
            csv_quote(sub),
            eng,
            non_eng,
            csv_quote(langs),
            zip
        ));
    }
    let raw = Parser::new().parse_bytes(csv.as_bytes(), b',').unwrap();
    TrialTable::from_raw(&raw, None).unwrap()
}

// =============================================================================
// Multi-value parsing
// =============================================================================

mod multi_value_properties {
    use super::*;

    proptest! {
        #[test]
        fn parse_never_panics_and_yields_trimmed_tokens(cell in any_cell()) {
            let tokens = parse_multi_value(&FieldValue::Text(cell));
            for t in &tokens {
                prop_assert!(!t.is_empty());
                prop_assert_eq!(t.trim(), t.as_str());
            }
        }

        #[test]
        fn parse_is_deterministic(cell in any_cell()) {
            let value = FieldValue::Text(cell);
            prop_assert_eq!(parse_multi_value(&value), parse_multi_value(&value));
        }

        #[test]
        fn bracketed_and_plain_encodings_agree(tokens in prop::collection::vec(token(), 0..5)) {
            let plain = FieldValue::Text(tokens.join(", "));
            let quoted: Vec<String> = tokens.iter().map(|t| format!("'{}'", t)).collect();
            let bracketed = FieldValue::Text(format!("[{}]", quoted.join(", ")));

            prop_assert_eq!(parse_multi_value(&plain), tokens.clone());
            prop_assert_eq!(parse_multi_value(&bracketed), tokens);
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

mod aggregation_properties {
    use super::*;

    proptest! {
        #[test]
        fn category_counts_sum_to_non_missing(rows in rows()) {
            let table = build_table(&rows);
            let counts = count_categorical(&table, Column::Category);
            let non_missing = table.iter().filter(|r| r.category.is_some()).count();

            prop_assert_eq!(counts.values().sum::<usize>(), non_missing);
        }

        #[test]
        fn category_counts_are_descending(rows in rows()) {
            let table = build_table(&rows);
            let counts: Vec<usize> = count_categorical(&table, Column::Category)
                .values()
                .copied()
                .collect();
            prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));
        }

        #[test]
        fn explode_yields_one_row_per_token(rows in rows()) {
            let table = build_table(&rows);
            let exploded = explode_multi_value(&table, Column::SubCategory, parse_multi_value);
            let expected: usize = table
                .iter()
                .map(|r| parse_multi_value(&r.sub_category).len())
                .sum();

            prop_assert_eq!(exploded.len(), expected);
        }

        #[test]
        fn mentions_bound_trials_with_languages(rows in rows()) {
            let table = build_table(&rows);
            let summary = summarize_language(&table);

            prop_assert!(summary.total_language_mentions >= summary.trials_with_other_language);
            prop_assert_eq!(
                summary.language_counts.values().sum::<usize>(),
                summary.total_language_mentions
            );
        }
    }
}

// =============================================================================
// Filtering and export
// =============================================================================

mod filter_properties {
    use super::*;

    proptest! {
        #[test]
        fn all_selector_is_identity(rows in rows()) {
            let table = build_table(&rows);
            let exploded = explode_multi_value(&table, Column::SubCategory, parse_multi_value);

            prop_assert_eq!(&filter_by_category(&table, &Selector::All), &table);
            prop_assert_eq!(&filter_by_subcategory(&table, &exploded, &Selector::All), &table);
            prop_assert_eq!(&select_state(&table, &table, &Selector::All), &table);
        }

        #[test]
        fn category_filter_matches_count(rows in rows(), wanted in category()) {
            let table = build_table(&rows);
            let counts = count_categorical(&table, Column::Category);
            let filtered = filter_by_category(&table, &Selector::Only(wanted.clone()));

            prop_assert!(filtered.iter().all(|r| r.category.as_deref() == Some(wanted.as_str())));
            prop_assert_eq!(filtered.len(), counts.get(&wanted).copied().unwrap_or(0));
        }

        #[test]
        fn subcategory_filter_is_subset_without_duplicates(rows in rows(), wanted in token()) {
            let table = build_table(&rows);
            let exploded = explode_multi_value(&table, Column::SubCategory, parse_multi_value);
            let selector = Selector::Only(wanted.clone());
            let filtered = filter_by_subcategory(&table, &exploded, &selector);

            let mut ids = filtered.ids();
            let before = ids.len();
            ids.dedup();
            prop_assert_eq!(ids.len(), before);
            prop_assert!(filtered.len() <= table.len());
            prop_assert!(filtered
                .iter()
                .all(|r| parse_multi_value(&r.sub_category).contains(&wanted)));
        }

        #[test]
        fn export_is_deterministic(rows in rows()) {
            let table = build_table(&rows);
            prop_assert_eq!(export_csv(&table).unwrap(), export_csv(&table).unwrap());
        }
    }
}
