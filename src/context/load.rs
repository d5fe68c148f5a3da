use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::catalog::{Catalog, SemanticField};
use crate::emitter::{emit_sql, ParamStyle};
use crate::planner::{plan_query, required_fields, Planned};
use crate::query::{FilterSelection, QueryKind, QueryParams};
use crate::resolver::ColumnResolver;
use crate::store::{Store, StoreError};
use crate::table::{ResultTable, Value};

/// One query's result as handed to the presentation layer
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Arc<ResultTable>,
    /// Set when the query could not run and `table` is the empty placeholder
    pub warning: Option<String>,
}

impl Loaded {
    fn empty(columns: Vec<String>, warning: String) -> Self {
        Self {
            table: Arc::new(ResultTable::new(columns)),
            warning: Some(warning),
        }
    }
}

/// Years and quarters present in the data, ascending
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Periods {
    pub years: Vec<i64>,
    pub quarters: Vec<i64>,
}

type CacheKey = (QueryKind, QueryParams);

pub struct DashboardContext<S> {
    store: S,
    catalog: Catalog,
    resolver: ColumnResolver,
    results: ResultCache<CacheKey, Loaded>,
}

impl<S: Store> DashboardContext<S> {
    /// Probe the store and build the context
    ///
    /// A store that does not answer the probe is fatal: no context is built.
    pub async fn init(store: S, catalog: Catalog, ttl: Duration) -> Result<Self, StoreError> {
        store.ping().await.map_err(|e| match e {
            StoreError::Unavailable(_) => e,
            other => StoreError::Unavailable(other.to_string()),
        })?;
        info!(
            datasets = catalog.datasets.len(),
            ttl_secs = ttl.as_secs(),
            "dashboard context ready"
        );

        Ok(Self {
            store,
            catalog,
            resolver: ColumnResolver::new(),
            results: ResultCache::new(ttl),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolver(&self) -> &ColumnResolver {
        &self.resolver
    }

    /// Number of memoized query results
    pub fn cached_results(&self) -> usize {
        self.results.len()
    }

    /// Run `kind` for a user selection
    ///
    /// The selection is masked down to the filters `kind` uses before it
    /// becomes the cache key, so yearly queries share one entry across year
    /// and state changes.
    pub async fn load(&self, kind: &QueryKind, selection: &FilterSelection) -> Result<Loaded, StoreError> {
        self.load_with(kind, QueryParams::for_kind(kind, selection)).await
    }

    /// Run `kind` with explicit parameters, through the result cache
    pub async fn load_with(&self, kind: &QueryKind, params: QueryParams) -> Result<Loaded, StoreError> {
        let key = (kind.clone(), params.clone());
        self.results
            .get_or_compute(key, || self.compute(kind, &params))
            .await
    }

    /// Resolve columns and plan `kind` without running it
    ///
    /// `None` when the catalog has no dataset for the query.
    pub async fn plan(&self, kind: &QueryKind, params: &QueryParams) -> Result<Option<Planned>, StoreError> {
        let Some(dataset) = self.catalog.get_dataset(kind.shape().dataset) else {
            return Ok(None);
        };
        let fields = required_fields(kind, params);
        let resolved = self
            .resolver
            .resolve_dataset(&self.store, dataset, &fields)
            .await?;
        Ok(Some(plan_query(kind, params, &resolved)))
    }

    async fn compute(&self, kind: &QueryKind, params: &QueryParams) -> Result<Loaded, StoreError> {
        let dataset_name = kind.shape().dataset;
        let Some(planned) = self.plan(kind, params).await? else {
            warn!(query = %kind, dataset = dataset_name, "dataset missing from catalog");
            return Ok(Loaded::empty(
                kind.output_columns(),
                format!("Dataset '{}' is not in the catalog", dataset_name),
            ));
        };

        match planned {
            Planned::Unresolved { table, columns, missing } => {
                let names: Vec<&str> = missing.iter().map(SemanticField::as_str).collect();
                warn!(query = %kind, table = %table, missing = ?names, "no matching column, returning empty result");
                let candidates: Vec<String> = missing
                    .iter()
                    .map(|f| {
                        let spellings = self
                            .catalog
                            .get_dataset(dataset_name)
                            .map(|d| d.candidates(*f))
                            .unwrap_or_default();
                        format!("{} {:?}", f, spellings)
                    })
                    .collect();
                Ok(Loaded::empty(
                    columns,
                    format!(
                        "No matching column found for {} in candidates: {}",
                        table,
                        candidates.join(", ")
                    ),
                ))
            }
            Planned::Ready(query) => {
                match emit_sql(&query, ParamStyle::Numbered) {
                    Ok(statement) => debug!(
                        query = %kind,
                        sql = %statement.sql,
                        params = statement.params.len(),
                        "executing"
                    ),
                    Err(e) => debug!(query = %kind, error = %e, "executing unprintable query"),
                }
                let table = self.store.execute(&query).await?;
                debug!(query = %kind, rows = table.len(), "query finished");
                Ok(Loaded {
                    table: Arc::new(table),
                    warning: None,
                })
            }
        }
    }

    /// Distinct years and quarters, for filter defaults
    pub async fn available_periods(&self) -> Result<Periods, StoreError> {
        let loaded = self
            .load_with(&QueryKind::AvailablePeriods, QueryParams::unfiltered())
            .await?;
        let table = &loaded.table;

        let collect = |column: &str| -> BTreeSet<i64> {
            table
                .column(column)
                .map(|values| values.into_iter().filter_map(period_number).collect())
                .unwrap_or_default()
        };

        Ok(Periods {
            years: collect("Year").into_iter().collect(),
            quarters: collect("Quarter").into_iter().collect(),
        })
    }

    /// Drop cached results and close the store
    pub async fn shutdown(self) -> Result<(), StoreError> {
        self.results.clear();
        self.resolver.clear();
        self.store.close().await?;
        info!("dashboard context shut down");
        Ok(())
    }
}

fn period_number(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}
