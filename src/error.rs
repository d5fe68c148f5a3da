//! Error types for pulsescope

use std::fmt;

/// Errors that can occur while loading a catalog or config file
#[derive(Debug)]
pub enum ParseError {
    /// IO error reading file
    Io {
        path: String,
        source: std::io::Error,
    },
    /// YAML deserialization error
    Yaml {
        source: serde_yaml::Error,
    },
    /// Well-formed YAML that breaks a catalog or config rule
    Invalid(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            ParseError::Yaml { source } => {
                write!(f, "Invalid YAML: {}", source)
            }
            ParseError::Invalid(msg) => {
                write!(f, "Invalid definition: {}", msg)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io { source, .. } => Some(source),
            ParseError::Yaml { source } => Some(source),
            ParseError::Invalid(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        ParseError::Yaml { source: err }
    }
}
