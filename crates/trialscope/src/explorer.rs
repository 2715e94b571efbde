//! Main explorer struct: memoized loading of the trial tables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::error::{Result, TrialscopeError};
use crate::geo::{enrich_with_states, GeoNamesGeocoder, Geocoder};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::table::TrialTable;

/// Configuration for loading a trial dataset.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Header of the identifier column (None = auto-detect).
    pub id_column: Option<String>,
}

/// Where the postal-code lookup comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GeocoderSource {
    /// No geocoder; geographic loads fail with a configuration error.
    #[default]
    None,
    /// A GeoNames dump on disk.
    File(PathBuf),
    /// Download the GeoNames dump (None = `TRIALSCOPE_GEONAMES_URL` or the default mirror).
    Download(Option<String>),
}

/// Configuration for an explorer.
#[derive(Debug, Clone, Default)]
pub struct ExplorerConfig {
    pub loader: LoaderConfig,
    pub geocoder: GeocoderSource,
}

/// Which table a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
    /// The typed base table.
    Trials,
    /// The base table joined with state codes.
    GeoEnriched,
}

/// Memoized load results keyed by `(LoadKind, path)`.
///
/// The dataset is read-only input, so entries are never invalidated: they
/// live as long as the cache. A hit returns the same `Arc` as the first load.
#[derive(Debug, Default)]
pub struct LoadCache {
    tables: RwLock<HashMap<(LoadKind, PathBuf), Arc<TrialTable>>>,
    sources: RwLock<HashMap<PathBuf, SourceMetadata>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table, if loaded.
    pub fn get(&self, kind: LoadKind, path: &Path) -> Option<Arc<TrialTable>> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(kind, path.to_path_buf()))
            .cloned()
    }

    /// Cached table, or the result of `load` stored for next time.
    ///
    /// Failed loads are not cached.
    pub fn get_or_try_insert(
        &self,
        kind: LoadKind,
        path: &Path,
        load: impl FnOnce() -> Result<TrialTable>,
    ) -> Result<Arc<TrialTable>> {
        if let Some(table) = self.get(kind, path) {
            debug!(?kind, path = %path.display(), "load cache hit");
            return Ok(table);
        }

        let table = Arc::new(load()?);
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let entry = tables
            .entry((kind, path.to_path_buf()))
            .or_insert_with(|| Arc::clone(&table));
        info!(?kind, path = %path.display(), rows = entry.len(), "load cache filled");
        Ok(Arc::clone(entry))
    }

    /// Source metadata recorded when `path` was first parsed.
    pub fn source(&self, path: &Path) -> Option<SourceMetadata> {
        self.sources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    fn record_source(&self, path: &Path, metadata: SourceMetadata) {
        self.sources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), metadata);
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads trial datasets and remembers what it loaded.
pub struct TrialExplorer {
    config: LoaderConfig,
    parser: Parser,
    geocoder: Option<Arc<dyn Geocoder>>,
    cache: LoadCache,
}

impl TrialExplorer {
    /// Create an explorer with default configuration and no geocoder.
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create an explorer with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self {
            config,
            parser,
            geocoder: None,
            cache: LoadCache::new(),
        }
    }

    /// Create an explorer from a full configuration, building its geocoder.
    pub fn from_config(config: ExplorerConfig) -> Result<Self> {
        let explorer = Self::with_config(config.loader);
        let explorer = match config.geocoder {
            GeocoderSource::None => explorer,
            GeocoderSource::File(path) => {
                explorer.with_geocoder(GeoNamesGeocoder::from_path(path)?)
            }
            GeocoderSource::Download(Some(url)) => {
                explorer.with_geocoder(GeoNamesGeocoder::fetch(&url)?)
            }
            GeocoderSource::Download(None) => {
                explorer.with_geocoder(GeoNamesGeocoder::from_env()?)
            }
        };
        Ok(explorer)
    }

    /// Add the geocoder used by [`TrialExplorer::load_geo_enriched`].
    pub fn with_geocoder(mut self, geocoder: impl Geocoder + 'static) -> Self {
        self.geocoder = Some(Arc::new(geocoder));
        self
    }

    pub fn has_geocoder(&self) -> bool {
        self.geocoder.is_some()
    }

    /// Load and type the trial table at `path`.
    ///
    /// Repeated calls with the same path return the cached table without
    /// reading the file again.
    pub fn load_trials(&self, path: impl AsRef<Path>) -> Result<Arc<TrialTable>> {
        let path = path.as_ref();
        self.cache.get_or_try_insert(LoadKind::Trials, path, || {
            let (raw, source) = self.parser.parse_file(path)?;
            let table = TrialTable::from_raw(&raw, self.config.id_column.as_deref())?;
            self.cache.record_source(path, source);
            Ok(table)
        })
    }

    /// Load the trial table at `path` joined with US state codes.
    ///
    /// Queries the geocoder once per path; later calls hit the cache.
    pub fn load_geo_enriched(&self, path: impl AsRef<Path>) -> Result<Arc<TrialTable>> {
        let path = path.as_ref();
        let geocoder = self.geocoder.as_ref().ok_or_else(|| {
            TrialscopeError::Config("No geocoder configured for geographic analysis".to_string())
        })?;

        self.cache.get_or_try_insert(LoadKind::GeoEnriched, path, || {
            let base = self.load_trials(path)?;
            enrich_with_states(&base, geocoder.as_ref())
        })
    }

    /// Metadata of a source already loaded through this explorer.
    pub fn source_metadata(&self, path: impl AsRef<Path>) -> Option<SourceMetadata> {
        self.cache.source(path.as_ref())
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }
}

impl Default for TrialExplorer {
    fn default() -> Self {
        Self::new()
    }
}
