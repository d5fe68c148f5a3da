//! Query request types (noun module)
//!
//! What the analyst selected, which builder function to run, and the subset
//! of the selection each builder function actually filters on.

mod kind;
mod selection;

pub use kind::{FilterScope, QueryKind, QueryShape};
pub use selection::{FilterSelection, QueryParams, SelectionError};
