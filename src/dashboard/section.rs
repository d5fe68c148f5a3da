use serde::Serialize;
use std::sync::Arc;

use super::case::CaseStudy;
use crate::table::ResultTable;

/// Column holding boundary-dataset keys on choropleth tables
pub const GEO_COLUMN: &str = "State_geo";

/// What the presentation layer should draw for a section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    /// India map keyed by `State_geo`
    Choropleth {
        value: String,
        title: String,
        log_scale: bool,
        color_scale: String,
    },
    Line {
        x: String,
        y: Vec<String>,
        color: Option<String>,
    },
    Bar {
        x: String,
        y: String,
        color: Option<String>,
        stacked: bool,
        title: String,
    },
    Pie {
        names: String,
        values: String,
        title: String,
    },
}

impl Chart {
    pub fn choropleth(value: &str, title: &str) -> Self {
        Chart::Choropleth {
            value: value.to_string(),
            title: title.to_string(),
            log_scale: false,
            color_scale: "Viridis".to_string(),
        }
    }

    pub fn line(x: &str, y: &[&str]) -> Self {
        Chart::Line {
            x: x.to_string(),
            y: y.iter().map(|s| s.to_string()).collect(),
            color: None,
        }
    }

    pub fn bar(x: &str, y: &str, title: &str) -> Self {
        Chart::Bar {
            x: x.to_string(),
            y: y.to_string(),
            color: None,
            stacked: false,
            title: title.to_string(),
        }
    }

    pub fn pie(names: &str, values: &str, title: &str) -> Self {
        Chart::Pie {
            names: names.to_string(),
            values: values.to_string(),
            title: title.to_string(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Chart::Choropleth { title, .. } | Chart::Bar { title, .. } | Chart::Pie { title, .. } => Some(title),
            Chart::Line { .. } => None,
        }
    }
}

/// A table offered as a CSV file
#[derive(Debug, Clone, Serialize)]
pub struct Download {
    pub file_name: String,
    #[serde(skip)]
    pub table: Arc<ResultTable>,
}

/// One heading of a rendered case study
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub chart: Chart,
    pub table: ResultTable,
    pub download: Option<Download>,
}

impl Section {
    /// An empty table means "nothing to display", not an error
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Output of one render cycle
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub case: CaseStudy,
    pub sections: Vec<Section>,
    /// Non-fatal problems met while rendering, in order
    pub warnings: Vec<String>,
}

impl RenderReport {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn downloads(&self) -> impl Iterator<Item = &Download> {
        self.sections.iter().filter_map(|s| s.download.as_ref())
    }
}
