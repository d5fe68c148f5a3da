//! Time-bounded memoization of query results

mod result_cache;

pub use result_cache::ResultCache;
