//! Parsing and exploding multi-valued fields.

use crate::schema::{Column, FieldValue};
use crate::table::{TrialRecord, TrialTable};

/// Normalize a multi-valued field into zero or more trimmed tokens.
///
/// Never fails: anything that cannot be read as a list yields no tokens.
///
/// - missing or numeric values yield nothing;
/// - lists are returned as-is;
/// - `"[A, 'B']"` is split inside the brackets, with quotes stripped;
/// - `"A, B"` is split on commas;
/// - any other text is a single token.
///
/// Text with unbalanced brackets, or a list literal holding nested
/// brackets, is malformed and yields nothing. Balanced brackets inside
/// plain text (`"Stroke [suspected]"`) are part of the token.
pub fn parse_multi_value(value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::Missing | FieldValue::Number(_) => Vec::new(),
        FieldValue::List(items) => items.clone(),
        FieldValue::Text(text) => parse_text(text),
    }
}

fn parse_text(text: &str) -> Vec<String> {
    let value = text.trim();
    if value.is_empty() {
        return Vec::new();
    }

    if value.len() >= 2 && value.starts_with('[') && value.ends_with(']') {
        return parse_bracketed(&value[1..value.len() - 1]).unwrap_or_default();
    }
    if !brackets_balanced(value) {
        return Vec::new();
    }

    if value.contains(',') {
        split_non_empty(value, |item| item.trim())
    } else {
        vec![value.to_string()]
    }
}

/// Every `]` closes an earlier `[` and none is left open.
fn brackets_balanced(value: &str) -> bool {
    let mut depth = 0usize;
    for c in value.chars() {
        match c {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn parse_bracketed(body: &str) -> Option<Vec<String>> {
    if body.contains(['[', ']']) {
        return None;
    }

    Some(split_non_empty(body, |item| {
        item.trim().trim_matches(|c| c == '\'' || c == '"').trim()
    }))
}

fn split_non_empty(value: &str, clean: impl Fn(&str) -> &str) -> Vec<String> {
    value
        .split(',')
        .map(clean)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// One output row per token of `column`, other fields copied unchanged.
///
/// Records yielding no tokens produce no rows, so they drop out of any
/// statistic computed on the exploded table. Absent columns explode to an
/// empty table.
pub fn explode_multi_value(
    table: &TrialTable,
    column: Column,
    parse_fn: impl Fn(&FieldValue) -> Vec<String>,
) -> TrialTable {
    if !table.has_column(column) {
        return table.derive(Vec::new());
    }

    let rows = table
        .iter()
        .flat_map(|record| {
            parse_fn(&field(record, column))
                .into_iter()
                .map(move |token| with_token(record, column, token))
        })
        .collect();

    table.derive(rows)
}

fn field(record: &TrialRecord, column: Column) -> FieldValue {
    match column {
        Column::SubCategory => record.sub_category.clone(),
        Column::OtherLanguageCriteria => record
            .other_languages
            .clone()
            .map_or(FieldValue::Missing, FieldValue::List),
        other => record
            .categorical(other)
            .map_or(FieldValue::Missing, FieldValue::from),
    }
}

fn with_token(record: &TrialRecord, column: Column, token: String) -> TrialRecord {
    let mut row = record.clone();
    match column {
        Column::Id => row.id = token,
        Column::Category => row.category = Some(token),
        Column::SubCategory => row.sub_category = FieldValue::Text(token),
        Column::OtherLanguageCriteria => row.other_languages = Some(vec![token]),
        Column::FirstZipcode => row.first_zipcode = Some(token),
        Column::ZipClean => row.zip_clean = Some(token),
        Column::StateCode => row.state_code = Some(token),
        Column::EnglishIsInclusion | Column::NonEnglishIsExclusion => {}
    }
    row
}
