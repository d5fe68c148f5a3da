//! SQL emitter (verb module)
//!
//! Transforms an AggregateQuery into parameterized SQL.

mod error;
mod sql;

pub use error::EmitError;
pub use sql::{emit_sql, quote_ident, ParamStyle, SqlStatement};
