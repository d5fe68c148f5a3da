use std::fmt;

/// Errors from table operations
#[derive(Debug)]
pub enum TableError {
    UnknownColumn(String),
    RowWidth { expected: usize, actual: usize },
    Csv(csv::Error),
    Io(std::io::Error),
    Encoding(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::UnknownColumn(name) => write!(f, "Column '{}' not found", name),
            TableError::RowWidth { expected, actual } => {
                write!(f, "Row has {} values, table has {} columns", actual, expected)
            }
            TableError::Csv(e) => write!(f, "CSV error: {}", e),
            TableError::Io(e) => write!(f, "IO error: {}", e),
            TableError::Encoding(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Csv(e) => Some(e),
            TableError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Csv(err)
    }
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::Io(err)
    }
}
