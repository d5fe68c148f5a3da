//! pulsescope - Column-resolving aggregation queries for the PhonePe Pulse dashboard
//!
//! This library provides:
//! - Dataset catalog types (Catalog, DatasetDescriptor, SemanticField)
//! - Catalog and config parsing from YAML
//! - Schema resolution against tables whose column spellings drift
//! - Query planning for the dashboard's fixed query catalogue
//! - Parameterized SQL emission
//! - State name normalization onto the India boundary dataset keys
//! - A TTL result cache and a DataFusion-backed store
//! - The six case-study render cycles
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `catalog/` - datasets and the candidate spellings of each semantic field
//! - `query/` - filter selections, query kinds and their scoped parameters
//! - `plan/` - single-table grouped aggregations over real column names
//! - `table/` - flat result tables and CSV export
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML → Catalog / DashboardConfig
//! - `resolver/` - Catalog + live schema → ResolvedColumns
//! - `planner/` - QueryKind + QueryParams + ResolvedColumns → AggregateQuery
//! - `emitter/` - AggregateQuery → SQL text + bind values
//! - `normalizer/` - free-text state name → boundary key
//! - `cache/` - memoize results for a fixed TTL
//! - `store/` - run AggregateQuery → ResultTable
//! - `context/` - wire the above together behind init / load / shutdown
//! - `dashboard/` - case study → sections of charts and tables
//!
//! # Example
//!
//! ```ignore
//! use pulsescope::{Catalog, DashboardContext, DataFusionStore, FilterSelection, QueryKind};
//!
//! let store = DataFusionStore::open(&config.store).await?;
//! let ctx = DashboardContext::init(store, Catalog::builtin()?, config.cache.ttl()).await?;
//! let selection = FilterSelection::new([2022], [1, 2, 3, 4], ["Karnataka", "Kerala"])?;
//! let loaded = ctx.load(&QueryKind::PaymentCategoriesByState, &selection).await?;
//! println!("{}", loaded.table.to_csv()?);
//! ctx.shutdown().await?;
//! ```

pub mod catalog;
pub mod config;
pub mod query;
pub mod plan;
pub mod table;
pub mod parser;
pub mod resolver;
pub mod normalizer;
pub mod planner;
pub mod emitter;
pub mod cache;
pub mod store;
pub mod context;
pub mod dashboard;
pub mod error;

// Re-export commonly used types
pub use catalog::{Catalog, DatasetDescriptor, SemanticField};
pub use config::{CacheConfig, DashboardConfig, StoreConfig, TableFormat};
pub use query::{FilterScope, FilterSelection, QueryKind, QueryParams, SelectionError};
pub use plan::{AggregateQuery, Literal, Predicate};
pub use table::{ResultTable, TableError, Value};
pub use resolver::{ColumnResolver, ResolvedColumns, TableColumns};
pub use normalizer::normalize_state;
pub use planner::{plan_query, Planned};
pub use emitter::{emit_sql, EmitError, ParamStyle, SqlStatement};
pub use cache::ResultCache;
pub use store::{DataFusionStore, Store, StoreError};
pub use context::{DashboardContext, Loaded, Periods};
pub use dashboard::{render, CaseStudy, RenderError, RenderOptions, RenderReport};
pub use error::ParseError;
