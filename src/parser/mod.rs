//! Catalog and config parser (verb module)
//!
//! Transforms YAML files into catalog and config types.

use std::path::Path;
use serde::de::DeserializeOwned;
use crate::catalog::Catalog;
use crate::config::DashboardConfig;
use crate::error::ParseError;

/// Parse a catalog from a YAML file
pub fn parse_catalog_file<P: AsRef<Path>>(path: P) -> Result<Catalog, ParseError> {
    parse_catalog_str(&read(path)?)
}

/// Parse a catalog from a YAML string
pub fn parse_catalog_str(yaml: &str) -> Result<Catalog, ParseError> {
    let catalog: Catalog = serde_yaml::from_str(yaml)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Parse a dashboard config from a YAML file
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<DashboardConfig, ParseError> {
    parse_config_str(&read(path)?)
}

/// Parse a dashboard config from a YAML string
///
/// An empty document yields the default config.
pub fn parse_config_str(yaml: &str) -> Result<DashboardConfig, ParseError> {
    if yaml.trim().is_empty() {
        return Ok(DashboardConfig::default());
    }
    parse_yaml(yaml)
}

fn parse_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T, ParseError> {
    serde_yaml::from_str(yaml).map_err(ParseError::from)
}

fn read<P: AsRef<Path>>(path: P) -> Result<String, ParseError> {
    let path_str = path.as_ref().display().to_string();
    std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
        path: path_str,
        source: e,
    })
}
