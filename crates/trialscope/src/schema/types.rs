//! Cell-level value types.

/// A loosely-typed cell of a multi-valued field.
///
/// Sources encode multi-valued fields inconsistently: missing, plain text,
/// delimited text, text that looks like a list literal, or an already parsed
/// list. Loading normalizes `sub_category` into [`FieldValue::List`];
/// exploded rows carry [`FieldValue::Text`] holding a single token.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Missing,
    Text(String),
    Number(f64),
    List(Vec<String>),
}

impl FieldValue {
    /// Build a value from a raw source cell, mapping null tokens to `Missing`.
    pub fn from_cell(cell: &str) -> Self {
        if crate::input::RawTable::is_null_value(cell) {
            FieldValue::Missing
        } else {
            FieldValue::Text(cell.to_string())
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Interpret a boolean-like cell. Unrecognized encodings read as `false`.
pub fn parse_flag(cell: &str) -> bool {
    let trimmed = cell.trim();
    ["1", "1.0", "true", "t", "yes", "y"]
        .iter()
        .any(|truthy| trimmed.eq_ignore_ascii_case(truthy))
}
