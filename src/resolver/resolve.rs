use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use super::columns::TableColumns;
use crate::catalog::{DatasetDescriptor, SemanticField};
use crate::store::{Store, StoreError};

/// Semantic fields of one dataset mapped to real column names
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub table: String,
    columns: BTreeMap<SemanticField, String>,
    missing: Vec<SemanticField>,
}

impl ResolvedColumns {
    /// Resolve `fields` of `dataset` against an already fetched column set
    pub fn from_parts(dataset: &DatasetDescriptor, live: &TableColumns, fields: &[SemanticField]) -> Self {
        let mut columns = BTreeMap::new();
        let mut missing = Vec::new();
        for &field in fields {
            if columns.contains_key(&field) || missing.contains(&field) {
                continue;
            }
            match live.resolve(dataset.candidates(field)) {
                Some(real) => {
                    columns.insert(field, real.to_string());
                }
                None => missing.push(field),
            }
        }

        Self {
            table: dataset.table.clone(),
            columns,
            missing,
        }
    }

    pub fn get(&self, field: SemanticField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// Fields none of whose candidates exist in the table, in request order
    pub fn missing(&self) -> &[SemanticField] {
        &self.missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Schema resolver with a per-table column cache
///
/// Schemas are assumed stable for the life of the resolver, so each table is
/// introspected at most once (barring concurrent first access).
#[derive(Debug, Default)]
pub struct ColumnResolver {
    tables: RwLock<HashMap<String, Arc<TableColumns>>>,
}

impl ColumnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live columns of `table`; an unknown table yields an empty set
    pub async fn table_columns<S: Store + ?Sized>(
        &self,
        store: &S,
        table: &str,
    ) -> Result<Arc<TableColumns>, StoreError> {
        let cached = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(table)
            .cloned();
        if let Some(columns) = cached {
            trace!(table, "column cache hit");
            return Ok(columns);
        }

        let names = store.column_names(table).await?;
        debug!(table, columns = names.len(), "introspected table");
        let columns = Arc::new(TableColumns::new(names));
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(table.to_string(), Arc::clone(&columns));
        Ok(columns)
    }

    /// Resolve one field's candidate list against `table`
    ///
    /// `Ok(None)` means no candidate exists; that is not an error.
    pub async fn resolve<S, C>(
        &self,
        store: &S,
        table: &str,
        candidates: &[C],
    ) -> Result<Option<String>, StoreError>
    where
        S: Store + ?Sized,
        C: AsRef<str>,
    {
        let columns = self.table_columns(store, table).await?;
        Ok(columns.resolve(candidates).map(str::to_string))
    }

    /// Resolve every field in `fields` for one dataset
    pub async fn resolve_dataset<S: Store + ?Sized>(
        &self,
        store: &S,
        dataset: &DatasetDescriptor,
        fields: &[SemanticField],
    ) -> Result<ResolvedColumns, StoreError> {
        let live = self.table_columns(store, &dataset.table).await?;
        Ok(ResolvedColumns::from_parts(dataset, &live, fields))
    }

    /// Number of tables introspected so far
    pub fn cached_tables(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Forget every cached column set
    pub fn clear(&self) {
        self.tables.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::AggregateQuery;
    use crate::table::ResultTable;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SchemaOnly {
        tables: HashMap<String, Vec<String>>,
        lookups: AtomicUsize,
    }

    impl SchemaOnly {
        fn new(table: &str, columns: &[&str]) -> Self {
            let mut tables = HashMap::new();
            tables.insert(table.to_string(), columns.iter().map(|c| c.to_string()).collect());
            Self { tables, lookups: AtomicUsize::new(0) }
        }
    }

    impl Store for SchemaOnly {
        fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>> {
            async { Ok(()) }.boxed()
        }

        fn column_names<'a>(&'a self, table: &'a str) -> BoxFuture<'a, Result<Vec<String>, StoreError>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let columns = self.tables.get(table).cloned().unwrap_or_default();
            async move { Ok(columns) }.boxed()
        }

        fn execute<'a>(&'a self, query: &'a AggregateQuery) -> BoxFuture<'a, Result<ResultTable, StoreError>> {
            async move { Ok(ResultTable::new(query.output_columns())) }.boxed()
        }

        fn close(&self) -> BoxFuture<'_, Result<(), StoreError>> {
            async { Ok(()) }.boxed()
        }
    }

    fn transactions() -> DatasetDescriptor {
        DatasetDescriptor::new("aggregated_transaction", "Aggre_transaction")
            .with_field(SemanticField::State, ["state", "State"])
            .with_field(SemanticField::Quarter, ["quater", "Quater"])
            .with_field(SemanticField::Count, ["Transaction_count", "transactionCount"])
            .with_field(SemanticField::Amount, ["Transaction_amount", "transactionAmount"])
    }

    #[tokio::test]
    async fn test_resolve_is_case_insensitive() {
        let store = SchemaOnly::new("Aggre_transaction", &["STATE", "Quater"]);
        let resolver = ColumnResolver::new();
        assert_eq!(
            resolver.resolve(&store, "Aggre_transaction", &["state"]).await.unwrap(),
            Some("STATE".to_string())
        );
        assert_eq!(
            resolver.resolve(&store, "Aggre_transaction", &["quarter"]).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_introspects_each_table_once() {
        let store = SchemaOnly::new("Aggre_transaction", &["State"]);
        let resolver = ColumnResolver::new();
        for _ in 0..3 {
            resolver.resolve(&store, "Aggre_transaction", &["state"]).await.unwrap();
        }
        resolver.resolve(&store, "Missing", &["state"]).await.unwrap();
        resolver.resolve(&store, "Missing", &["state"]).await.unwrap();
        assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.cached_tables(), 2);

        resolver.clear();
        resolver.resolve(&store, "Aggre_transaction", &["state"]).await.unwrap();
        assert_eq!(store.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_resolve_dataset_reports_missing_fields() {
        let store = SchemaOnly::new(
            "Aggre_transaction",
            &["State", "Year", "Quater", "Transaction_type", "Transaction_count"],
        );
        let resolver = ColumnResolver::new();
        let resolved = resolver
            .resolve_dataset(
                &store,
                &transactions(),
                &[
                    SemanticField::State,
                    SemanticField::Quarter,
                    SemanticField::Count,
                    SemanticField::Amount,
                    SemanticField::Year,
                ],
            )
            .await
            .unwrap();

        assert_eq!(resolved.table, "Aggre_transaction");
        assert_eq!(resolved.get(SemanticField::State), Some("State"));
        assert_eq!(resolved.get(SemanticField::Quarter), Some("Quater"));
        assert_eq!(resolved.get(SemanticField::Count), Some("Transaction_count"));
        // no candidates declared for year, and no amount column in the table
        assert_eq!(resolved.missing(), [SemanticField::Amount, SemanticField::Year]);
        assert!(!resolved.is_complete());
    }
}
