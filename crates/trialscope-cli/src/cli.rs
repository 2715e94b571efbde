//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use trialscope::input::ParserConfig;
use trialscope::{ExplorerConfig, GeocoderSource, LoaderConfig};

/// Trialscope: language-criteria analysis of clinical trials
#[derive(Parser)]
#[command(name = "trialscope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show source metadata and which analysis columns are present
    Inspect {
        /// Path to the trials file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        load: LoadArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Category and sub-category breakdown with language criteria metrics
    Categories {
        /// Path to the trials file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Category to drill into (default: all categories)
        #[arg(short, long)]
        category: Option<String>,

        /// Sub-category to drill into within the category
        #[arg(short, long)]
        sub_category: Option<String>,

        #[command(flatten)]
        load: LoadArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trials per US state with language criteria metrics
    States {
        /// Path to the trials file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Two-letter state code to drill into (default: all states)
        #[arg(long)]
        state: Option<String>,

        #[command(flatten)]
        geo: GeoArgs,

        #[command(flatten)]
        load: LoadArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the trials of a selection as CSV
    Export {
        /// Path to the trials file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Category to export
        #[arg(short, long, conflicts_with = "state")]
        category: Option<String>,

        /// Sub-category to export (within --category if given)
        #[arg(short, long, conflicts_with = "state")]
        sub_category: Option<String>,

        /// State to export
        #[arg(long)]
        state: Option<String>,

        /// Output directory (file name follows the selection)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Write the CSV to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        #[command(flatten)]
        geo: GeoArgs,

        #[command(flatten)]
        load: LoadArgs,
    },
}

/// Options controlling how the trials file is read.
#[derive(Args, Clone, Debug, Default)]
pub struct LoadArgs {
    /// Identifier column (default: auto-detect nct_id, trial_id, id, ...)
    #[arg(long)]
    pub id_column: Option<String>,

    /// Field delimiter (default: auto-detect)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Read at most this many data rows
    #[arg(long)]
    pub max_rows: Option<usize>,
}

impl LoadArgs {
    pub fn loader_config(&self) -> Result<LoaderConfig, String> {
        let delimiter = match self.delimiter {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(c) => {
                return Err(format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    c
                ))
            }
            None => None,
        };

        Ok(LoaderConfig {
            parser: ParserConfig {
                delimiter,
                max_rows: self.max_rows,
                ..ParserConfig::default()
            },
            id_column: self.id_column.clone(),
        })
    }
}

/// Where postal codes are resolved to states.
#[derive(Args, Clone, Debug, Default)]
pub struct GeoArgs {
    /// Local GeoNames postal-code dump (US.txt)
    #[arg(long, value_name = "PATH")]
    pub geonames: Option<PathBuf>,

    /// Download URL of the dump (default: $TRIALSCOPE_GEONAMES_URL or the public mirror)
    #[arg(long, value_name = "URL", conflicts_with = "geonames")]
    pub geonames_url: Option<String>,
}

impl GeoArgs {
    pub fn source(&self) -> GeocoderSource {
        match &self.geonames {
            Some(path) => GeocoderSource::File(path.clone()),
            None => GeocoderSource::Download(self.geonames_url.clone()),
        }
    }
}

/// Build the explorer configuration for a command.
pub fn explorer_config(load: &LoadArgs, geo: Option<&GeoArgs>) -> Result<ExplorerConfig, String> {
    Ok(ExplorerConfig {
        loader: load.loader_config()?,
        geocoder: geo.map(GeoArgs::source).unwrap_or_default(),
    })
}
