//! Aggregation query builder
//!
//! Turns a `QueryKind` plus its scoped `QueryParams` into an `AggregateQuery`
//! over real column names, or reports which fields could not be resolved.

mod build;

pub use build::{plan_query, required_fields, Planned};
