use std::fmt;

use crate::query::SelectionError;

/// Errors that stop a render cycle before any query runs
#[derive(Debug)]
pub enum RenderError {
    /// No year, quarter or state chosen
    EmptySelection(SelectionError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptySelection(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::EmptySelection(e) => Some(e),
        }
    }
}

impl From<SelectionError> for RenderError {
    fn from(err: SelectionError) -> Self {
        RenderError::EmptySelection(err)
    }
}
