//! Runtime configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::catalog::Catalog;
use crate::error::ParseError;

/// Result cache lifetime used by the original dashboard
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

/// Top-level dashboard configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub store: StoreConfig,
    pub cache: CacheConfig,
    /// Alternate catalog file; the built-in catalog is used when absent
    pub catalog: Option<PathBuf>,
}

impl DashboardConfig {
    /// Load a config from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        crate::parser::parse_config_file(path)
    }

    /// Load the configured catalog, or the built-in one
    pub fn load_catalog(&self) -> Result<Catalog, ParseError> {
        match &self.catalog {
            Some(path) => Catalog::from_file(path),
            None => Catalog::builtin(),
        }
    }
}

/// Where the store finds its tables
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory scanned for `<table>.csv` / `<table>.parquet` files
    pub data_dir: PathBuf,
    pub format: TableFormat,
    /// Explicit table name → file path; takes precedence over the scan
    pub tables: BTreeMap<String, PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            format: TableFormat::Csv,
            tables: BTreeMap::new(),
        }
    }
}

/// On-disk table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Parquet => "parquet",
        }
    }

    /// Format implied by a file extension, if it is one we can read
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(TableFormat::Csv),
            "parquet" => Some(TableFormat::Parquet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}
