//! Dataset catalog (noun module)
//!
//! Describes which physical tables back each logical dataset and how each
//! semantic field may be spelled in those tables.

mod dataset;
mod field;

pub use dataset::DatasetDescriptor;
pub use field::{ParseFieldError, SemanticField};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use crate::error::ParseError;

const BUILTIN_CATALOG: &str = include_str!("phonepe.yaml");

/// The full set of datasets the dashboard may query
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Catalog {
    pub datasets: Vec<DatasetDescriptor>,
}

impl Catalog {
    /// The catalog for the PhonePe Pulse tables, compiled into the binary
    pub fn builtin() -> Result<Self, ParseError> {
        crate::parser::parse_catalog_str(BUILTIN_CATALOG)
    }

    /// Load a catalog from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        crate::parser::parse_catalog_file(path)
    }

    /// Get a dataset by logical name
    pub fn get_dataset(&self, name: &str) -> Option<&DatasetDescriptor> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// All physical table names, sorted and deduplicated
    pub fn tables(&self) -> Vec<&str> {
        let mut tables: Vec<&str> = self.datasets.iter().map(|d| d.table.as_str()).collect();
        tables.sort();
        tables.dedup();
        tables
    }

    /// Check structural rules the YAML shape alone cannot express
    pub fn validate(&self) -> Result<(), ParseError> {
        let mut seen = HashSet::new();
        for dataset in &self.datasets {
            if !seen.insert(dataset.name.as_str()) {
                return Err(ParseError::Invalid(format!(
                    "dataset '{}' is defined more than once",
                    dataset.name
                )));
            }
            if dataset.table.trim().is_empty() {
                return Err(ParseError::Invalid(format!(
                    "dataset '{}' has no table",
                    dataset.name
                )));
            }
            for (field, candidates) in &dataset.fields {
                if candidates.iter().all(|c| c.trim().is_empty()) {
                    return Err(ParseError::Invalid(format!(
                        "dataset '{}' lists no spellings for field '{}'",
                        dataset.name, field
                    )));
                }
            }
        }
        Ok(())
    }
}
