//! Error types for the trialscope library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for trialscope operations.
///
/// Load failures (`Io`, `Csv`, `EmptyData`, `MissingColumn`) are fatal and
/// surfaced to the caller as-is; nothing retries them.
#[derive(Debug, Error)]
pub enum TrialscopeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data rows.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A mandatory column could not be found in the source.
    #[error("Missing column '{column}' (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// Postal-code lookup failed.
    #[error("Geocoder error: {0}")]
    Geocoder(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for trialscope operations.
pub type Result<T> = std::result::Result<T, TrialscopeError>;
