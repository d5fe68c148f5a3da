//! Shared test utilities for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use datafusion::arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use datafusion::arrow::datatypes::{DataType, Field, Schema};
use datafusion::arrow::record_batch::RecordBatch;
use futures::future::BoxFuture;
use futures::FutureExt;

use pulsescope::{
    parser, AggregateQuery, Catalog, DashboardContext, DataFusionStore, FilterSelection, ResultTable, Store,
    StoreError, Value,
};

/// Load a catalog fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> Catalog {
    let path = format!("tests/test_data/{}", name);
    parser::parse_catalog_file(&path).unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

pub fn selection(years: &[i64], quarters: &[i64], states: &[&str]) -> FilterSelection {
    FilterSelection::new(years.iter().copied(), quarters.iter().copied(), states.iter().copied())
        .expect("selection should be non-empty")
}

// =============================================================================
// In-memory tables
// =============================================================================

/// One column of a fixture table
pub enum Col {
    Text(Vec<&'static str>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

/// Build a record batch from named columns
pub fn batch(columns: Vec<(&str, Col)>) -> RecordBatch {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for (name, col) in columns {
        match col {
            Col::Text(v) => {
                fields.push(Field::new(name, DataType::Utf8, true));
                arrays.push(Arc::new(StringArray::from(v)));
            }
            Col::Int(v) => {
                fields.push(Field::new(name, DataType::Int64, true));
                arrays.push(Arc::new(Int64Array::from(v)));
            }
            Col::Float(v) => {
                fields.push(Field::new(name, DataType::Float64, true));
                arrays.push(Arc::new(Float64Array::from(v)));
            }
        }
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("valid fixture batch")
}

/// Payment categories, with the upper-case `Quater` spelling of the original dumps
pub fn aggre_transaction() -> RecordBatch {
    batch(vec![
        (
            "State",
            Col::Text(vec!["Karnataka", "Karnataka", "Karnataka", "Kerala", "Kerala", "Goa", "Karnataka"]),
        ),
        ("Year", Col::Int(vec![2022, 2022, 2022, 2022, 2021, 2022, 2021])),
        ("Quater", Col::Int(vec![1, 2, 1, 1, 1, 1, 3])),
        (
            "Transaction_type",
            Col::Text(vec![
                "Peer-to-peer payments",
                "Peer-to-peer payments",
                "Merchant payments",
                "Peer-to-peer payments",
                "Peer-to-peer payments",
                "Merchant payments",
                "Recharge & bill payments",
            ]),
        ),
        ("Transaction_count", Col::Int(vec![10, 20, 5, 3, 7, 1, 2])),
        ("Transaction_amount", Col::Float(vec![100.0, 200.0, 50.0, 30.0, 70.0, 10.0, 20.0])),
    ])
}

/// District transactions with camelCase measures and lower-case state names
pub fn map_transaction() -> RecordBatch {
    batch(vec![
        ("State", Col::Text(vec!["karnataka", "kerala", "kerala", "goa"])),
        ("Year", Col::Int(vec![2021, 2022, 2022, 2022])),
        ("Quarter", Col::Int(vec![1, 1, 2, 4])),
        ("transactionCount", Col::Int(vec![4, 6, 8, 1])),
        ("transactionAmount", Col::Float(vec![40.0, 60.0, 80.0, 10.0])),
    ])
}

pub fn aggre_user() -> RecordBatch {
    batch(vec![
        ("State", Col::Text(vec!["Kerala", "Kerala", "Goa", "Goa"])),
        ("Year", Col::Int(vec![2022, 2022, 2022, 2021])),
        ("Quater", Col::Int(vec![1, 1, 1, 1])),
        ("Brand", Col::Text(vec!["Xiaomi", "Samsung", "Xiaomi", "Vivo"])),
        ("Count", Col::Int(vec![50, 30, 5, 9])),
    ])
}

pub fn map_user() -> RecordBatch {
    batch(vec![
        (
            "State",
            Col::Text(vec!["Karnataka", "Kerala", "andaman and nicobar islands", "Karnataka"]),
        ),
        ("Year", Col::Int(vec![2022, 2022, 2022, 2021])),
        ("Quarter", Col::Int(vec![1, 1, 1, 1])),
        ("registeredUsers", Col::Int(vec![1000, 400, 20, 900])),
        ("appOpens", Col::Int(vec![5000, 0, 100, 4000])),
    ])
}

pub fn top_user() -> RecordBatch {
    batch(vec![
        ("State", Col::Text(vec!["Kerala", "Karnataka"])),
        ("Year", Col::Int(vec![2022, 2022])),
        ("Quater", Col::Int(vec![1, 2])),
        ("registeredUsers", Col::Int(vec![70, 90])),
    ])
}

/// No amount column under any accepted spelling
pub fn map_insurance_without_amount() -> RecordBatch {
    batch(vec![
        ("State", Col::Text(vec!["Kerala"])),
        ("Year", Col::Int(vec![2022])),
        ("Quarter", Col::Int(vec![1])),
        ("insurance_count", Col::Int(vec![3])),
        ("premium", Col::Float(vec![300.0])),
    ])
}

pub fn map_insurance() -> RecordBatch {
    batch(vec![
        ("State", Col::Text(vec!["Kerala", "Karnataka", "Karnataka"])),
        ("Year", Col::Int(vec![2022, 2022, 2020])),
        ("Quarter", Col::Int(vec![1, 1, 1])),
        ("Insurance_count", Col::Int(vec![3, 5, 1])),
        ("Insurance_amount", Col::Float(vec![300.0, 500.0, 100.0])),
    ])
}

/// Every table except `Top_insurance`
pub fn fixture_store() -> DataFusionStore {
    let store = DataFusionStore::new();
    store.register_batches("Aggre_transaction", vec![aggre_transaction()]).unwrap();
    store.register_batches("Map_transaction", vec![map_transaction()]).unwrap();
    store.register_batches("Aggre_user", vec![aggre_user()]).unwrap();
    store.register_batches("Map_user", vec![map_user()]).unwrap();
    store.register_batches("Top_user", vec![top_user()]).unwrap();
    store.register_batches("Map_insurance", vec![map_insurance()]).unwrap();
    store
}

pub async fn fixture_context() -> DashboardContext<CountingStore<DataFusionStore>> {
    DashboardContext::init(
        CountingStore::new(fixture_store()),
        Catalog::builtin().unwrap(),
        Duration::from_secs(600),
    )
    .await
    .expect("fixture store answers ping")
}

// =============================================================================
// Store wrappers
// =============================================================================

/// Counts the round trips made to an inner store
pub struct CountingStore<S> {
    pub inner: S,
    executes: AtomicUsize,
    introspections: AtomicUsize,
    closed: Arc<AtomicBool>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            executes: AtomicUsize::new(0),
            introspections: AtomicUsize::new(0),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn executes(&self) -> usize {
        self.executes.load(Ordering::SeqCst)
    }

    pub fn introspections(&self) -> usize {
        self.introspections.load(Ordering::SeqCst)
    }

    /// Set once the inner store closed successfully; outlives the wrapper
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

impl<S: Store> Store for CountingStore<S> {
    fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        self.inner.ping()
    }

    fn column_names<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        self.introspections.fetch_add(1, Ordering::SeqCst);
        self.inner.column_names(table)
    }

    fn execute<'a>(&'a self, query: &'a AggregateQuery) -> BoxFuture<'a, Result<ResultTable, StoreError>> {
        self.executes.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(query)
    }

    fn close(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        async move {
            self.inner.close().await?;
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }
}

/// Answers schema questions but fails every query
pub struct FailingQueries {
    pub inner: DataFusionStore,
}

impl Store for FailingQueries {
    fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        self.inner.ping()
    }

    fn column_names<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        self.inner.column_names(table)
    }

    fn execute<'a>(&'a self, query: &'a AggregateQuery) -> BoxFuture<'a, Result<ResultTable, StoreError>> {
        let table = query.table.clone();
        async move { Err(StoreError::Unavailable(format!("lost connection while reading {}", table))) }.boxed()
    }

    fn close(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        self.inner.close()
    }
}

// =============================================================================
// Table inspection
// =============================================================================

/// Rows sorted by their rendered cells, for order-insensitive comparisons
pub fn sorted_rows(table: &ResultTable) -> Vec<Vec<Value>> {
    let mut rows = table.rows().to_vec();
    rows.sort_by_key(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>());
    rows
}

/// One column rendered as strings, top to bottom
pub fn column_strings(table: &ResultTable, column: &str) -> Vec<String> {
    table
        .column(column)
        .unwrap_or_else(|e| panic!("no column {}: {}", column, e))
        .iter()
        .map(|v| v.to_string())
        .collect()
}
