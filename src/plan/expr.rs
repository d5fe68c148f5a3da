//! Filter expressions

use std::fmt;

/// A bound filter value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(i) => write!(f, "{}", i),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

/// A WHERE-clause conjunct
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// column IN (values)
    In { column: String, values: Vec<Literal> },
    /// column = value
    Eq { column: String, value: Literal },
}

impl Predicate {
    pub fn is_in<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Literal>,
    {
        Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Predicate::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::In { column, .. } | Predicate::Eq { column, .. } => column,
        }
    }
}
