//! Table-level schema, resolved once when a source is loaded.

use indexmap::IndexMap;
use serde::Serialize;

use super::column::{Column, ID_CANDIDATES};
use crate::error::{Result, TrialscopeError};

/// Where each known column lives in the source, and which ones are present.
///
/// The identifier column is required. Every other known column is optional:
/// when absent, the statistics that read it degrade to zero or "not
/// applicable" instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Source headers in file order. Export reproduces this order.
    pub headers: Vec<String>,
    /// Header of the identifier column as it appears in the file.
    pub id_column: String,
    #[serde(skip)]
    id_position: usize,
    /// Present optional columns and their source positions.
    optional: IndexMap<Column, usize>,
    /// Whether `zip_clean` and `state_code` have been derived.
    pub geo: bool,
}

impl TableSchema {
    /// Resolve known columns against a header row.
    ///
    /// `id_column` names the identifier explicitly; otherwise the first
    /// header matching [`ID_CANDIDATES`] is used.
    pub fn resolve(headers: &[String], id_column: Option<&str>) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
        };

        let id_position = match id_column {
            Some(name) => find(name),
            None => ID_CANDIDATES.iter().find_map(|candidate| find(candidate)),
        }
        .ok_or_else(|| TrialscopeError::MissingColumn {
            column: id_column.unwrap_or(Column::Id.name()).to_string(),
            available: headers.to_vec(),
        })?;

        let optional = Column::OPTIONAL
            .iter()
            .filter_map(|column| find(column.name()).map(|pos| (*column, pos)))
            .collect();

        Ok(Self {
            headers: headers.to_vec(),
            id_column: headers[id_position].clone(),
            id_position,
            optional,
            geo: false,
        })
    }

    /// Copy of this schema with the geo columns marked as derived.
    pub fn with_geo(&self) -> Self {
        Self {
            geo: true,
            ..self.clone()
        }
    }

    /// Whether a column can be read from tables with this schema.
    pub fn has(&self, column: Column) -> bool {
        match column {
            Column::Id => true,
            Column::ZipClean | Column::StateCode => self.geo,
            other => self.optional.contains_key(&other),
        }
    }

    /// Source position of a column read from the file.
    pub fn position(&self, column: Column) -> Option<usize> {
        match column {
            Column::Id => Some(self.id_position),
            other => self.optional.get(&other).copied(),
        }
    }

    /// Optional source columns that were not found.
    pub fn missing_optional(&self) -> Vec<Column> {
        Column::OPTIONAL
            .iter()
            .copied()
            .filter(|c| !self.optional.contains_key(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_detects_identifier_and_optional_columns() {
        let schema = TableSchema::resolve(
            &headers(&["NCT_ID", "Category", "first_zipcode"]),
            None,
        )
        .unwrap();

        assert_eq!(schema.id_column, "NCT_ID");
        assert_eq!(schema.position(Column::Id), Some(0));
        assert_eq!(schema.position(Column::Category), Some(1));
        assert!(schema.has(Column::FirstZipcode));
        assert!(!schema.has(Column::SubCategory));
        assert!(!schema.has(Column::StateCode));
        assert_eq!(
            schema.missing_optional(),
            vec![
                Column::SubCategory,
                Column::EnglishIsInclusion,
                Column::NonEnglishIsExclusion,
                Column::OtherLanguageCriteria,
            ]
        );
    }

    #[test]
    fn test_resolve_prefers_configured_identifier() {
        let schema =
            TableSchema::resolve(&headers(&["id", "registry_key"]), Some("registry_key")).unwrap();
        assert_eq!(schema.id_column, "registry_key");
    }

    #[test]
    fn test_missing_identifier_is_an_error() {
        let err = TableSchema::resolve(&headers(&["category", "sub_category"]), None).unwrap_err();
        match err {
            TrialscopeError::MissingColumn { column, available } => {
                assert_eq!(column, "id");
                assert_eq!(available.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_with_geo_exposes_derived_columns() {
        let schema = TableSchema::resolve(&headers(&["id"]), None).unwrap().with_geo();
        assert!(schema.has(Column::ZipClean));
        assert!(schema.has(Column::StateCode));
    }
}
