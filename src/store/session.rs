use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use datafusion::arrow::record_batch::RecordBatch;
use datafusion::common::{Column, TableReference};
use datafusion::datasource::MemTable;
use datafusion::functions_aggregate::expr_fn::sum;
use datafusion::logical_expr::{in_list, lit, Expr, SortExpr};
use datafusion::prelude::{CsvReadOptions, ParquetReadOptions, SessionContext};
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, info};

use super::convert::batches_to_table;
use super::error::StoreError;
use super::Store;
use crate::config::{StoreConfig, TableFormat};
use crate::plan::{AggregateQuery, Literal, Predicate};
use crate::table::ResultTable;

/// Store backed by a DataFusion session
///
/// Table names are registered and looked up verbatim (no case folding), so
/// `Aggre_transaction` and `aggre_transaction` are different tables.
pub struct DataFusionStore {
    ctx: SessionContext,
    tables: Mutex<BTreeSet<String>>,
    closed: AtomicBool,
}

impl Default for DataFusionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFusionStore {
    /// An empty store; register tables before querying
    pub fn new() -> Self {
        Self {
            ctx: SessionContext::new(),
            tables: Mutex::new(BTreeSet::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Open the tables described by `config`
    ///
    /// With an explicit `tables` map only those files are registered (relative
    /// paths are taken from `data_dir`). Otherwise every file in `data_dir`
    /// with the configured format's extension becomes a table named after its
    /// file stem.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = Self::new();

        if config.tables.is_empty() {
            let entries = std::fs::read_dir(&config.data_dir).map_err(|e| {
                StoreError::Unavailable(format!(
                    "cannot read data directory '{}': {}",
                    config.data_dir.display(),
                    e
                ))
            })?;

            let mut files: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file() && TableFormat::from_path(path) == Some(config.format))
                .collect();
            files.sort();

            for path in files {
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                store.register_file(name, &path, config.format).await?;
            }
        } else {
            for (name, path) in &config.tables {
                let path = if path.is_relative() {
                    config.data_dir.join(path)
                } else {
                    path.clone()
                };
                let format = TableFormat::from_path(&path).unwrap_or(config.format);
                store.register_file(name, &path, format).await?;
            }
        }

        info!(tables = store.table_names().len(), data_dir = %config.data_dir.display(), "store opened");
        Ok(store)
    }

    /// Register a CSV (with header row) or Parquet file under `name`
    pub async fn register_file(&self, name: &str, path: &Path, format: TableFormat) -> Result<(), StoreError> {
        std::fs::metadata(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let location = path.to_string_lossy().to_string();

        let df = match format {
            TableFormat::Csv => {
                self.ctx
                    .read_csv(location.as_str(), CsvReadOptions::new().has_header(true))
                    .await?
            }
            TableFormat::Parquet => {
                self.ctx
                    .read_parquet(location.as_str(), ParquetReadOptions::default())
                    .await?
            }
        };
        self.ctx.register_table(TableReference::bare(name), df.into_view())?;

        debug!(table = name, path = %path.display(), "registered table");
        self.registry().insert(name.to_string());
        Ok(())
    }

    /// Register in-memory batches under `name`; all batches share one schema
    pub fn register_batches(&self, name: &str, batches: Vec<RecordBatch>) -> Result<(), StoreError> {
        let schema = batches
            .first()
            .map(|b| b.schema())
            .ok_or_else(|| StoreError::Conversion(format!("no batches given for table '{}'", name)))?;
        let provider = MemTable::try_new(schema, vec![batches])?;
        self.ctx.register_table(TableReference::bare(name), Arc::new(provider))?;

        debug!(table = name, "registered in-memory table");
        self.registry().insert(name.to_string());
        Ok(())
    }

    /// Names of every registered table, sorted
    pub fn table_names(&self) -> Vec<String> {
        self.registry().iter().cloned().collect()
    }

    fn registry(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    async fn run(&self, query: &AggregateQuery) -> Result<ResultTable, StoreError> {
        let mut df = self.ctx.table(TableReference::bare(query.table.as_str())).await?;

        for predicate in &query.filters {
            df = df.filter(predicate_expr(predicate))?;
        }

        let group_exprs: Vec<Expr> = query.group_by.iter().map(|g| column(&g.column)).collect();
        let aggr_exprs: Vec<Expr> = query
            .measures
            .iter()
            .map(|m| sum(column(&m.column)).alias(m.alias.as_str()))
            .collect();
        df = df.aggregate(group_exprs, aggr_exprs)?;

        let projection: Vec<Expr> = query
            .group_by
            .iter()
            .map(|g| column(&g.column).alias(g.alias.as_str()))
            .chain(query.measures.iter().map(|m| column(&m.alias)))
            .collect();
        df = df.select(projection)?;

        if !query.order_by.is_empty() {
            let sort_exprs: Vec<SortExpr> = query.order_by.iter().map(|c| column(c).sort(true, false)).collect();
            df = df.sort(sort_exprs)?;
        }

        let batches = df.collect().await?;
        batches_to_table(&query.output_columns(), &batches)
    }
}

impl Store for DataFusionStore {
    fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        async move {
            self.ensure_open()?;
            self.ctx
                .sql("SELECT 1")
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?
                .collect()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Ok(())
        }
        .boxed()
    }

    fn column_names<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
        async move {
            self.ensure_open()?;
            let reference = TableReference::bare(table);
            if !self.ctx.table_exist(reference.clone())? {
                return Ok(Vec::new());
            }
            let provider = self.ctx.table_provider(reference).await?;
            Ok(provider
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().to_string())
                .collect())
        }
        .boxed()
    }

    fn execute<'a>(&'a self, query: &'a AggregateQuery) -> BoxFuture<'a, Result<ResultTable, StoreError>> {
        async move {
            self.ensure_open()?;
            self.run(query).await
        }
        .boxed()
    }

    fn close(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        async move {
            if self.closed.swap(true, Ordering::AcqRel) {
                return Ok(());
            }
            let names: Vec<String> = std::mem::take(&mut *self.registry()).into_iter().collect();
            for name in &names {
                self.ctx.deregister_table(TableReference::bare(name.as_str()))?;
            }
            info!(tables = names.len(), "store closed");
            Ok(())
        }
        .boxed()
    }
}

/// Unqualified column reference that keeps the exact spelling
fn column(name: &str) -> Expr {
    Expr::Column(Column::new_unqualified(name))
}

fn literal(value: &Literal) -> Expr {
    match value {
        Literal::Int(i) => lit(*i),
        Literal::String(s) => lit(s.clone()),
    }
}

fn predicate_expr(predicate: &Predicate) -> Expr {
    match predicate {
        Predicate::In { column: name, values } if values.is_empty() => {
            debug!(column = name.as_str(), "empty IN list matches nothing");
            lit(false)
        }
        Predicate::In { column: name, values } => {
            in_list(column(name), values.iter().map(literal).collect(), false)
        }
        Predicate::Eq { column: name, value } => column(name).eq(literal(value)),
    }
}
