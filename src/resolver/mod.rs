//! Column resolution
//!
//! Each semantic field of a dataset is known under a short, ordered list of
//! spellings. The resolver asks the store which columns a table really has
//! (once per table for the life of the resolver) and picks the first
//! candidate present, ignoring case.

mod columns;
mod resolve;

pub use columns::TableColumns;
pub use resolve::{ColumnResolver, ResolvedColumns};
