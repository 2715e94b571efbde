//! Schema types: known columns, their presence in a source, and cell values.

mod column;
mod table;
mod types;

pub use column::{Column, ID_CANDIDATES};
pub use table::TableSchema;
pub use types::{parse_flag, FieldValue};
