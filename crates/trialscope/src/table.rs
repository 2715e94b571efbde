//! Typed trial records and immutable table snapshots.

use std::sync::Arc;

use tracing::debug;

use crate::aggregate::{parse_multi_value, split_languages};
use crate::error::Result;
use crate::input::RawTable;
use crate::schema::{parse_flag, Column, FieldValue, TableSchema};

/// One row of the trial dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    /// Value of the identifier column.
    pub id: String,
    /// 0-based position of the row in the source file.
    pub position: usize,
    pub category: Option<String>,
    pub sub_category: FieldValue,
    pub english_is_inclusion: bool,
    pub non_english_is_exclusion: bool,
    /// Trimmed language pieces; `None` when the cell is missing.
    pub other_languages: Option<Vec<String>>,
    pub first_zipcode: Option<String>,
    pub zip_clean: Option<String>,
    pub state_code: Option<String>,
    /// Source cells in header order, used for export.
    pub cells: Vec<String>,
}

impl TrialRecord {
    /// Build a typed record from a raw source row.
    pub fn from_row(schema: &TableSchema, position: usize, row: &[String]) -> Self {
        let cell = |column: Column| {
            schema
                .position(column)
                .and_then(|pos| row.get(pos))
                .map(|s| s.as_str())
        };
        let text = |column: Column| -> Option<String> {
            cell(column)
                .filter(|s| !RawTable::is_null_value(s))
                .map(|s| s.trim().to_string())
        };

        let id = text(Column::Id).unwrap_or_else(|| format!("row-{}", position + 1));
        let sub_category = match cell(Column::SubCategory).map(FieldValue::from_cell) {
            None | Some(FieldValue::Missing) => FieldValue::Missing,
            Some(raw) => FieldValue::List(parse_multi_value(&raw)),
        };

        Self {
            id,
            position,
            category: text(Column::Category),
            sub_category,
            english_is_inclusion: cell(Column::EnglishIsInclusion).is_some_and(parse_flag),
            non_english_is_exclusion: cell(Column::NonEnglishIsExclusion).is_some_and(parse_flag),
            other_languages: cell(Column::OtherLanguageCriteria)
                .filter(|s| !RawTable::is_null_value(s))
                .map(split_languages),
            first_zipcode: text(Column::FirstZipcode),
            zip_clean: None,
            state_code: None,
            cells: row.to_vec(),
        }
    }

    /// Scalar value of a column for value counting, if it has one.
    ///
    /// A sub-category holding several tokens has no single value; explode
    /// the table first to count tokens.
    pub fn categorical(&self, column: Column) -> Option<&str> {
        match column {
            Column::Id => Some(self.id.as_str()),
            Column::Category => self.category.as_deref(),
            Column::SubCategory => match &self.sub_category {
                FieldValue::Text(s) => Some(s.as_str()),
                FieldValue::List(tokens) if tokens.len() == 1 => Some(tokens[0].as_str()),
                _ => None,
            },
            Column::EnglishIsInclusion | Column::NonEnglishIsExclusion => {
                Some(if self.flag(column) { "true" } else { "false" })
            }
            Column::OtherLanguageCriteria => None,
            Column::FirstZipcode => self.first_zipcode.as_deref(),
            Column::ZipClean => self.zip_clean.as_deref(),
            Column::StateCode => self.state_code.as_deref(),
        }
    }

    /// Boolean value of a flag column; every other column reads as `false`.
    pub fn flag(&self, column: Column) -> bool {
        match column {
            Column::EnglishIsInclusion => self.english_is_inclusion,
            Column::NonEnglishIsExclusion => self.non_english_is_exclusion,
            _ => false,
        }
    }
}

/// An immutable, ordered snapshot of trial records.
///
/// Filters and aggregations never mutate a table; they return new ones that
/// share the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialTable {
    schema: Arc<TableSchema>,
    records: Vec<TrialRecord>,
}

impl TrialTable {
    /// Type a raw table, resolving the schema once.
    pub fn from_raw(raw: &RawTable, id_column: Option<&str>) -> Result<Self> {
        let schema = TableSchema::resolve(&raw.headers, id_column)?;
        let records: Vec<TrialRecord> = raw
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| TrialRecord::from_row(&schema, position, row))
            .collect();

        debug!(
            records = records.len(),
            id_column = %schema.id_column,
            missing = ?schema.missing_optional(),
            "typed trial table"
        );

        Ok(Self {
            schema: Arc::new(schema),
            records,
        })
    }

    /// Assemble a table from an existing schema and records.
    pub fn from_parts(schema: Arc<TableSchema>, records: Vec<TrialRecord>) -> Self {
        Self { schema, records }
    }

    /// A table with the same schema holding `records`.
    pub fn derive(&self, records: Vec<TrialRecord>) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            records,
        }
    }

    /// Rows satisfying `keep`, in their original order.
    pub fn retain_where(&self, mut keep: impl FnMut(&TrialRecord) -> bool) -> Self {
        self.derive(self.records.iter().filter(|r| keep(r)).cloned().collect())
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn shared_schema(&self) -> Arc<TableSchema> {
        Arc::clone(&self.schema)
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrialRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.schema.has(column)
    }

    /// Identifiers in row order.
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a TrialTable {
    type Item = &'a TrialRecord;
    type IntoIter = std::slice::Iter<'a, TrialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
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
    fn test_from_raw_types_every_known_column() {
        let t = table(
            "id,category,sub_category,english_is_inclusion,non_english_is_exclusion,other_language_criteria,first_zipcode\n\
             1,CVD,\"Hypertension, Stroke\",1,0,\"Spanish, French\",94305\n",
        );
        let r = &t.records()[0];

        assert_eq!(r.id, "1");
        assert_eq!(r.category.as_deref(), Some("CVD"));
        assert_eq!(
            r.sub_category,
            FieldValue::List(vec!["Hypertension".into(), "Stroke".into()])
        );
        assert!(r.english_is_inclusion);
        assert!(!r.non_english_is_exclusion);
        assert_eq!(
            r.other_languages,
            Some(vec!["Spanish".to_string(), "French".to_string()])
        );
        assert_eq!(r.first_zipcode.as_deref(), Some("94305"));
        assert_eq!(r.state_code, None);
    }

    #[test]
    fn test_missing_cells_become_absent() {
        let t = table("id,category,sub_category,other_language_criteria\n1,,NA,\n");
        let r = &t.records()[0];

        assert_eq!(r.category, None);
        assert_eq!(r.sub_category, FieldValue::Missing);
        assert_eq!(r.other_languages, None);
        assert!(!r.english_is_inclusion);
    }

    #[test]
    fn test_missing_identifier_cell_gets_row_label() {
        let t = table("id,category\n,CVD\n7,CVD\n");
        assert_eq!(t.ids(), vec!["row-1".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_retain_where_keeps_order_and_schema() {
        let t = table("id,category\n1,A\n2,B\n3,A\n");
        let only_a = t.retain_where(|r| r.category.as_deref() == Some("A"));

        assert_eq!(only_a.ids(), vec!["1".to_string(), "3".to_string()]);
        assert_eq!(only_a.schema(), t.schema());
    }
}
