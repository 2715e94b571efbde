//! Value counts and flag sums.

use indexmap::IndexMap;

use crate::schema::Column;
use crate::table::TrialTable;

/// Exact value counts of `column`, most frequent first.
///
/// Missing values are not counted. Ties keep first-appearance order. An
/// absent column yields an empty map.
pub fn count_categorical(table: &TrialTable, column: Column) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    if !table.has_column(column) {
        return counts;
    }

    for value in table.iter().filter_map(|r| r.categorical(column)) {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    // Stable, so equal counts stay in first-appearance order
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Number of records with a true flag in `column`.
///
/// Missing cells count as false; absent or non-flag columns sum to zero.
pub fn boolean_sum(table: &TrialTable, column: Column) -> usize {
    if !column.is_flag() || !table.has_column(column) {
        return 0;
    }
    table.iter().filter(|r| r.flag(column)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;

    fn table(csv: &str) -> TrialTable {
        let raw = Parser::new().parse_bytes(csv.as_bytes(), b',').unwrap();
        TrialTable::from_raw(&raw, None).unwrap()
    }

    #[test]
    fn test_count_categorical_orders_by_frequency() {
        let t = table("id,category\n1,Lifestyle\n2,CVD\n3,CVD\n4,\n5,Metabolic\n");
        let counts = count_categorical(&t, Column::Category);

        let entries: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(entries, vec![("CVD", 2), ("Lifestyle", 1), ("Metabolic", 1)]);
        assert_eq!(counts.values().sum::<usize>(), 4);
    }

    #[test]
    fn test_count_categorical_absent_column_is_empty() {
        let t = table("id\n1\n2\n");
        assert!(count_categorical(&t, Column::Category).is_empty());
        assert!(count_categorical(&t, Column::StateCode).is_empty());
    }

    #[test]
    fn test_boolean_sum() {
        let t = table(
            "id,english_is_inclusion,non_english_is_exclusion\n1,1,0\n2,True,\n3,0,yes\n4,,NA\n",
        );
        assert_eq!(boolean_sum(&t, Column::EnglishIsInclusion), 2);
        assert_eq!(boolean_sum(&t, Column::NonEnglishIsExclusion), 1);
        assert_eq!(boolean_sum(&t, Column::Category), 0);
    }

    #[test]
    fn test_boolean_sum_absent_column_is_zero() {
        let t = table("id,category\n1,CVD\n");
        assert_eq!(boolean_sum(&t, Column::EnglishIsInclusion), 0);
    }
}
