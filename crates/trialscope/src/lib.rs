//! Trialscope: language-criteria analysis of clinical trial datasets.
//!
//! Trialscope loads a table of trials annotated with category, sub-category
//! and language-criteria columns, and answers drill-down questions about it:
//! how many trials require English, which additional languages are listed,
//! how trials spread over categories and US states.
//!
//! # Core Principles
//!
//! - **Read-only**: Loaded tables are immutable snapshots; filters return new tables
//! - **Typed at load**: List-like columns are parsed once, never re-read as text
//! - **Explicit caching**: Loads are memoized by the [`TrialExplorer`] that owns them
//!
//! # Example
//!
//! ```no_run
//! use trialscope::{CategoryView, Selector, TrialExplorer};
//!
//! let explorer = TrialExplorer::new();
//! let trials = explorer.load_trials("trials.csv").unwrap();
//!
//! let (view, _selected) = CategoryView::build(&trials, &Selector::All);
//! println!("Trials: {}", view.total_trials);
//! println!("English inclusion: {}", view.metrics.english_inclusion);
//! ```

pub mod aggregate;
pub mod error;
pub mod export;
pub mod filter;
pub mod geo;
pub mod input;
pub mod schema;
pub mod table;
pub mod view;

mod explorer;

pub use crate::explorer::{
    ExplorerConfig, GeocoderSource, LoadCache, LoadKind, LoaderConfig, TrialExplorer,
};
pub use error::{Result, TrialscopeError};
pub use export::{export_csv, export_file_name, save_export};
pub use filter::Selector;
pub use geo::{GeoNamesGeocoder, Geocoder, StaticGeocoder};
pub use input::SourceMetadata;
pub use schema::{Column, FieldValue, TableSchema};
pub use table::{TrialRecord, TrialTable};
pub use view::{CategoryView, CriteriaMetrics, InspectView, StateView, SubCategoryView};
