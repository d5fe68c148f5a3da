//! Relational store seam
//!
//! The dashboard only ever reads: it lists a table's columns and runs grouped
//! aggregations. `DataFusionStore` serves both from CSV/Parquet files or from
//! in-memory record batches.

mod convert;
mod error;
mod session;

pub use error::StoreError;
pub use session::DataFusionStore;

use futures::future::BoxFuture;

use crate::plan::AggregateQuery;
use crate::table::ResultTable;

/// A read-only store the dashboard issues queries against
pub trait Store: Send + Sync {
    /// Cheap liveness probe
    fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Column names of `table` exactly as stored; empty when the table does not exist
    fn column_names<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>>;

    /// Run a grouped aggregation; output columns are the query's aliases
    fn execute<'a>(&'a self, query: &'a AggregateQuery) -> BoxFuture<'a, Result<ResultTable, StoreError>>;

    /// Release the store; later calls fail with `StoreError::Closed`
    fn close(&self) -> BoxFuture<'_, Result<(), StoreError>>;
}
