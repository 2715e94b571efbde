//! Drill-down selectors.
//!
//! Category and sub-category selections chain: the sub-category filter runs
//! on the category-filtered table. State selection is an independent
//! narrowing of the base table. Selecting [`Selector::All`] is the identity.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::aggregate::parse_multi_value;
use crate::schema::Column;
use crate::table::TrialTable;

/// A dropdown selection: everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Selector::All
    }
}

impl<T> Selector<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    pub fn as_only(&self) -> Option<&T> {
        match self {
            Selector::All => None,
            Selector::Only(value) => Some(value),
        }
    }
}

impl<T: fmt::Display> Selector<T> {
    /// Label shown for this selection; `all_label` stands in for `All`.
    pub fn label(&self, all_label: &str) -> String {
        match self {
            Selector::All => all_label.to_string(),
            Selector::Only(value) => value.to_string(),
        }
    }
}

impl Selector<String> {
    /// Read a selection typed by a user. `"all"` (any case), an empty
    /// string, or `all_label` itself select everything.
    pub fn parse(input: &str, all_label: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case(all_label)
        {
            Selector::All
        } else {
            Selector::Only(trimmed.to_string())
        }
    }
}

impl<T> From<Option<T>> for Selector<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selector::All, Selector::Only)
    }
}

/// Rows whose category equals the selection exactly.
pub fn filter_by_category(table: &TrialTable, category: &Selector<String>) -> TrialTable {
    match category {
        Selector::All => table.clone(),
        Selector::Only(wanted) => {
            table.retain_where(|r| r.category.as_deref() == Some(wanted.as_str()))
        }
    }
}

/// Rows of the un-exploded `table` whose sub-categories contain the token.
///
/// `exploded` is the sub-category explosion of `table`; a token missing from
/// it matches nothing. Otherwise the sub-category field is re-parsed per
/// record, so a record matches once however many of its tokens match.
pub fn filter_by_subcategory(
    table: &TrialTable,
    exploded: &TrialTable,
    sub_category: &Selector<String>,
) -> TrialTable {
    match sub_category {
        Selector::All => table.clone(),
        Selector::Only(wanted) => {
            if !exploded
                .iter()
                .any(|r| r.categorical(Column::SubCategory) == Some(wanted.as_str()))
            {
                return table.retain_where(|_| false);
            }
            table.retain_where(|r| parse_multi_value(&r.sub_category).iter().any(|t| t == wanted))
        }
    }
}

/// Identifiers selected by a state.
///
/// `All` yields every identifier of `base`; a state yields the identifiers
/// of geo-enriched records carrying that code. Intersect the result with
/// `base` through [`restrict_to_ids`]: the geo table lacks rows whose zip
/// could not be cleaned.
pub fn filter_by_state(
    geo: &TrialTable,
    base: &TrialTable,
    state: &Selector<String>,
) -> Vec<String> {
    match state {
        Selector::All => base.ids(),
        Selector::Only(code) => geo
            .iter()
            .filter(|r| r.state_code.as_deref() == Some(code.as_str()))
            .map(|r| r.id.clone())
            .collect(),
    }
}

/// Rows of `base` whose identifier is in `ids`, in `base` order.
pub fn restrict_to_ids(base: &TrialTable, ids: &[String]) -> TrialTable {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    base.retain_where(|r| wanted.contains(r.id.as_str()))
}

/// The base-table rows selected by a state.
pub fn select_state(geo: &TrialTable, base: &TrialTable, state: &Selector<String>) -> TrialTable {
    match state {
        Selector::All => base.clone(),
        Selector::Only(_) => restrict_to_ids(base, &filter_by_state(geo, base, state)),
    }
}
