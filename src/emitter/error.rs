//! Emitter errors

use std::fmt;

#[derive(Debug)]
pub enum EmitError {
    /// Query selects nothing
    EmptyQuery,
    /// IN predicate with no values
    EmptyInList(String),
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::EmptyQuery => {
                write!(f, "Query must group by or aggregate at least one column")
            }
            EmitError::EmptyInList(column) => {
                write!(f, "IN filter on '{}' has no values", column)
            }
        }
    }
}

impl std::error::Error for EmitError {}
