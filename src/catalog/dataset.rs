//! Dataset descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::field::SemanticField;

/// One logical dataset backed by a physical table
///
/// Each semantic field carries an ordered list of acceptable column spellings.
/// Order encodes priority: the first spelling present in the live table wins.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetDescriptor {
    pub name: String,
    /// Physical table name, as stored
    pub table: String,
    pub label: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<SemanticField, Vec<String>>,
}

impl DatasetDescriptor {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            label: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field<I, S>(mut self, field: SemanticField, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .insert(field, candidates.into_iter().map(Into::into).collect());
        self
    }

    /// Candidate spellings for a field, highest priority first
    pub fn candidates(&self, field: SemanticField) -> &[String] {
        self.fields.get(&field).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn has_field(&self, field: SemanticField) -> bool {
        !self.candidates(field).is_empty()
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.table)
    }
}
