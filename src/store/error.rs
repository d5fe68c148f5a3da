use std::fmt;
use std::path::PathBuf;

/// Errors raised by the relational store
#[derive(Debug)]
pub enum StoreError {
    /// The store could not be reached or opened
    Unavailable(String),
    /// The store was closed with `Store::close`
    Closed,
    Io { path: PathBuf, source: std::io::Error },
    /// Query planning or execution failed
    Query(datafusion::error::DataFusionError),
    /// A result column could not be converted into table cells
    Conversion(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(reason) => write!(f, "Store unavailable: {}", reason),
            StoreError::Closed => write!(f, "Store is closed"),
            StoreError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            StoreError::Query(e) => write!(f, "Query failed: {}", e),
            StoreError::Conversion(msg) => write!(f, "Result conversion failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Query(e) => Some(e),
            _ => None,
        }
    }
}

impl From<datafusion::error::DataFusionError> for StoreError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        StoreError::Query(err)
    }
}
