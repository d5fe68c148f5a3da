//! SQL emitter
//!
//! Transforms an AggregateQuery into SQL text plus bind values. Filter values
//! only ever travel as bind values; identifiers are quoted.

use std::fmt;
use std::str::FromStr;
use crate::plan::{AggregateQuery, Literal, Predicate};
use super::error::EmitError;

/// Placeholder syntax of the target driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// `$1, $2, ...` (PostgreSQL, DataFusion)
    #[default]
    Numbered,
    /// `?` (SQLite, DuckDB); identifiers stay double-quoted, so not MySQL
    Positional,
}

impl FromStr for ParamStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numbered" | "dollar" | "postgres" => Ok(ParamStyle::Numbered),
            "positional" | "question" | "sqlite" => Ok(ParamStyle::Positional),
            _ => Err(format!("Unknown parameter style '{}'. Valid options: numbered, positional", s)),
        }
    }
}

/// SQL text and its bind values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Literal>,
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Emit a multi-line SQL statement for an aggregate query
pub fn emit_sql(query: &AggregateQuery, style: ParamStyle) -> Result<SqlStatement, EmitError> {
    if query.group_by.is_empty() && query.measures.is_empty() {
        return Err(EmitError::EmptyQuery);
    }

    let mut params = Vec::new();

    let mut select_items: Vec<String> = query
        .group_by
        .iter()
        .map(|g| format!("{} AS {}", quote_ident(&g.column), quote_ident(&g.alias)))
        .collect();
    select_items.extend(query.measures.iter().map(|m| {
        format!("SUM({}) AS {}", quote_ident(&m.column), quote_ident(&m.alias))
    }));

    let mut sql = format!(
        "SELECT {}\nFROM {}",
        select_items.join(", "),
        quote_ident(&query.table)
    );

    if !query.filters.is_empty() {
        let conjuncts = query
            .filters
            .iter()
            .map(|p| emit_predicate(p, style, &mut params))
            .collect::<Result<Vec<_>, _>>()?;
        sql.push_str(&format!("\nWHERE {}", conjuncts.join(" AND ")));
    }

    if !query.group_by.is_empty() {
        let group_cols: Vec<String> = query.group_by.iter().map(|g| quote_ident(&g.column)).collect();
        sql.push_str(&format!("\nGROUP BY {}", group_cols.join(", ")));
    }

    if !query.order_by.is_empty() {
        let keys: Vec<String> = query.order_by.iter().map(|k| quote_ident(k)).collect();
        sql.push_str(&format!("\nORDER BY {}", keys.join(", ")));
    }

    Ok(SqlStatement { sql, params })
}

/// Double-quote an identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn emit_predicate(
    predicate: &Predicate,
    style: ParamStyle,
    params: &mut Vec<Literal>,
) -> Result<String, EmitError> {
    match predicate {
        Predicate::In { column, values } => {
            if values.is_empty() {
                return Err(EmitError::EmptyInList(column.clone()));
            }
            let placeholders: Vec<String> = values
                .iter()
                .map(|v| bind(v, style, params))
                .collect();
            Ok(format!("{} IN ({})", quote_ident(column), placeholders.join(", ")))
        }
        Predicate::Eq { column, value } => {
            Ok(format!("{} = {}", quote_ident(column), bind(value, style, params)))
        }
    }
}

fn bind(value: &Literal, style: ParamStyle, params: &mut Vec<Literal>) -> String {
    params.push(value.clone());
    match style {
        ParamStyle::Numbered => format!("${}", params.len()),
        ParamStyle::Positional => "?".to_string(),
    }
}
