//! Logical query types (noun module)
//!
//! A single-table grouped aggregation: the only shape the dashboard issues.
//! Every identifier in here has already been checked against the live schema.

mod expr;
mod query;

pub use expr::{Literal, Predicate};
pub use query::{AggregateQuery, GroupColumn, Measure};
