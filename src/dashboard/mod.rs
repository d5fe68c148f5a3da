//! Case-study render cycles
//!
//! Each case study is a fixed sequence of queries and derived tables. The
//! output is presentation-ready: chart descriptors plus the tables behind
//! them. Drawing is left to whoever consumes the report.

mod case;
mod error;
mod render;
mod section;

pub use case::{CaseStudy, ParseCaseStudyError};
pub use error::RenderError;
pub use render::{render, render_selection, RenderOptions};
pub use section::{Chart, Download, RenderReport, Section, GEO_COLUMN};
