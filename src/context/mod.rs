//! Dashboard context
//!
//! The one explicitly constructed object holding the store, the catalog, the
//! column cache and the result cache. Built once with `init`, released with
//! `shutdown`.

mod load;

pub use load::{DashboardContext, Loaded, Periods};
