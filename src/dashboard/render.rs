use std::sync::Arc;

use tracing::{info, warn};

use super::case::CaseStudy;
use super::error::RenderError;
use super::section::{Chart, Download, RenderReport, Section, GEO_COLUMN};
use crate::context::DashboardContext;
use crate::normalizer::normalize_value;
use crate::query::{FilterSelection, QueryKind};
use crate::store::Store;
use crate::table::{ResultTable, TableError, Value};

const TOP_N: usize = 10;
const CATEGORY_SPLIT_TITLE: &str = "Top 10 States — Payment Category Amount Split";

/// Per-render knobs that are not part of the filter selection
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Restrict the device-brand breakdown to one state
    pub brand_state: Option<String>,
}

/// Validate raw filter choices, then render
///
/// An empty year, quarter or state list blocks the whole cycle: no query runs.
pub async fn render_selection<S: Store>(
    ctx: &DashboardContext<S>,
    case: CaseStudy,
    years: &[i64],
    quarters: &[i64],
    states: &[String],
    options: &RenderOptions,
) -> Result<RenderReport, RenderError> {
    let selection = FilterSelection::new(
        years.iter().copied(),
        quarters.iter().copied(),
        states.iter().cloned(),
    )?;
    Ok(render(ctx, case, &selection, options).await)
}

/// Run one case study top to bottom
///
/// Queries run one after another. A failing query or derivation costs only
/// its own sections; the failure is logged and listed in `warnings`.
pub async fn render<S: Store>(
    ctx: &DashboardContext<S>,
    case: CaseStudy,
    selection: &FilterSelection,
    options: &RenderOptions,
) -> RenderReport {
    let mut cycle = Cycle {
        ctx,
        selection,
        report: RenderReport {
            case,
            sections: Vec::new(),
            warnings: Vec::new(),
        },
    };

    match case {
        CaseStudy::TransactionDynamics => cycle.transaction_dynamics().await,
        CaseStudy::DeviceDominance => cycle.device_dominance(options).await,
        CaseStudy::InsurancePenetration => {
            cycle
                .statewise_study(StatewiseStudy {
                    statewise: QueryKind::InsuranceByState,
                    yearly: QueryKind::InsuranceByYear,
                    map_value: "Insurance_amount",
                    map_title: "Insurance Amount by State",
                    yearly_title: "Yearly Growth (Insurance Amount & Count)",
                    yearly_values: &["Insurance_amount", "Insurance_count"],
                    top_value: "Insurance_amount",
                    top_title: "Top 10 States by Insurance Amount",
                    closing_value: "Insurance_count",
                    closing_title: "Top 10 States by Insurance Count",
                })
                .await
        }
        CaseStudy::MarketExpansion => {
            cycle
                .statewise_study(StatewiseStudy {
                    statewise: QueryKind::TransactionsByState,
                    yearly: QueryKind::TransactionsByYear,
                    map_value: "Amount",
                    map_title: "Transaction Amount by State",
                    yearly_title: "Yearly Growth (Transaction Amount & Count)",
                    yearly_values: &["Amount", "Transactions"],
                    top_value: "Amount",
                    top_title: "Top 10 States by Transaction Amount",
                    closing_value: "Transactions",
                    closing_title: "Top 10 States by Transaction Count",
                })
                .await
        }
        CaseStudy::UserEngagement => cycle.user_engagement().await,
        CaseStudy::InsuranceEngagement => {
            cycle
                .statewise_study(StatewiseStudy {
                    statewise: QueryKind::InsuranceEngagementByState,
                    yearly: QueryKind::InsuranceEngagementByYear,
                    map_value: "Insurance_amount",
                    map_title: "Insurance Amount by State",
                    yearly_title: "Yearly Growth (Insurance Amount & Count)",
                    yearly_values: &["Insurance_amount", "Insurance_count"],
                    top_value: "Insurance_amount",
                    top_title: "Top 10 States by Insurance Amount",
                    closing_value: "Insurance_count",
                    closing_title: "Top 10 States by Insurance Count",
                })
                .await
        }
    }

    info!(
        case = case.slug(),
        sections = cycle.report.sections.len(),
        warnings = cycle.report.warnings.len(),
        "rendered case study"
    );
    cycle.report
}

/// The map / trend / top-10 layout shared by the per-state studies
struct StatewiseStudy {
    statewise: QueryKind,
    yearly: QueryKind,
    map_value: &'static str,
    map_title: &'static str,
    yearly_title: &'static str,
    yearly_values: &'static [&'static str],
    top_value: &'static str,
    top_title: &'static str,
    closing_value: &'static str,
    closing_title: &'static str,
}

struct Cycle<'a, S> {
    ctx: &'a DashboardContext<S>,
    selection: &'a FilterSelection,
    report: RenderReport,
}

impl<S: Store> Cycle<'_, S> {
    async fn load(&mut self, kind: QueryKind) -> Option<Arc<ResultTable>> {
        match self.ctx.load(&kind, self.selection).await {
            Ok(loaded) => {
                if let Some(warning) = loaded.warning {
                    self.report.warnings.push(warning);
                }
                Some(loaded.table)
            }
            Err(e) => {
                warn!(query = %kind, error = %e, "query failed, skipping its sections");
                self.report.warnings.push(format!("Failed to load {}: {}", kind, e));
                None
            }
        }
    }

    fn push(&mut self, title: &str, chart: Chart, table: Result<ResultTable, TableError>, download: Option<Download>) {
        match table {
            Ok(table) => self.report.sections.push(Section {
                title: title.to_string(),
                chart,
                table,
                download,
            }),
            Err(e) => self.skip(title, e),
        }
    }

    fn skip(&mut self, title: &str, error: TableError) {
        warn!(section = title, error = %error, "could not derive section table");
        self.report.warnings.push(format!("Skipped '{}': {}", title, error));
    }

    fn download(&self, table: &Arc<ResultTable>) -> Option<Download> {
        (!table.is_empty()).then(|| Download {
            file_name: self.report.case.download_name().to_string(),
            table: Arc::clone(table),
        })
    }

    fn map(&mut self, table: &ResultTable, chart: Chart, download: Option<Download>) {
        let title = chart.title().unwrap_or_default().to_string();
        self.push(&title, chart, with_geo(table), download);
    }

    fn top10(&mut self, table: &ResultTable, value: &str, title: &str) {
        let top = table.sorted_desc(value).map(|t| t.head(TOP_N));
        self.push(title, Chart::bar("State", value, title), top, None);
    }

    fn yearly(&mut self, table: &ResultTable, title: &str, values: &[&str]) {
        self.push(title, Chart::line("Year", values), Ok(table.clone()), None);
    }

    /// Stacked category split over the ten states with the largest total amount
    async fn category_split(&mut self, categories: Option<&Arc<ResultTable>>) {
        let categories = match categories {
            Some(table) => Arc::clone(table),
            None => match self.load(QueryKind::PaymentCategoriesByState).await {
                Some(table) => table,
                None => return,
            },
        };

        let split = top_state_split(&categories);
        let chart = Chart::Bar {
            x: "State".into(),
            y: "Txn_amount".into(),
            color: Some("Category".into()),
            stacked: true,
            title: CATEGORY_SPLIT_TITLE.into(),
        };
        self.push(CATEGORY_SPLIT_TITLE, chart, split, None);
    }

    async fn transaction_dynamics(&mut self) {
        const MAP_TITLE: &str = "Total Transaction Amount by State";

        let by_state = self.load(QueryKind::PaymentCategoriesByState).await;
        let totals = match by_state.as_ref().map(|c| c.sum_by("State", "Txn_amount")) {
            Some(Ok(totals)) => Some(Arc::new(totals)),
            Some(Err(e)) => {
                self.skip(MAP_TITLE, e);
                None
            }
            None => None,
        };

        if let Some(totals) = &totals {
            let download = self.download(totals);
            self.map(totals, Chart::choropleth("Txn_amount", MAP_TITLE), download);
        }

        if let Some(trend) = self.load(QueryKind::PaymentCategoryTrend).await {
            let chart = Chart::Line {
                x: "Year".into(),
                y: vec!["Txn_amount".into()],
                color: Some("Category".into()),
            };
            self.push("Yearly Trend by Category", chart, Ok((*trend).clone()), None);
        }

        if let Some(overall) = self.load(QueryKind::PaymentCategoriesOverall).await {
            self.push(
                "Amount Share by Category",
                Chart::pie("Category", "Txn_amount", "Amount Share by Category"),
                Ok((*overall).clone()),
                None,
            );
            self.push(
                "Transaction Count by Category",
                Chart::bar("Category", "Txn_count", "Transaction Count by Category"),
                overall.sorted_desc("Txn_count"),
                None,
            );
        }

        if let Some(categories) = &by_state {
            self.category_split(Some(categories)).await;
        }
        if let Some(totals) = &totals {
            self.top10(totals, "Txn_amount", "Top 10 States by Total Transaction Amount");
        }
    }

    async fn device_dominance(&mut self, options: &RenderOptions) {
        let users = self.load(QueryKind::UsersByState).await;
        if let Some(users) = &users {
            let download = self.download(users);
            self.map(users, Chart::choropleth("Users", "Registered Users by State"), download);
            let app_opens = Chart::Choropleth {
                value: "AppOpens".into(),
                title: "App Opens by State".into(),
                log_scale: true,
                color_scale: "Plasma".into(),
            };
            self.map(users, app_opens, None);
        }

        if let Some(yearly) = self.load(QueryKind::UsersByYear).await {
            self.yearly(&yearly, "Yearly Growth (Users & App Opens)", &["Users", "AppOpens"]);
        }

        let brand_state = options.brand_state.clone().filter(|s| !s.trim().is_empty());
        if let Some(brands) = self.load(QueryKind::BrandDistribution { state: brand_state }).await {
            self.push(
                "Registered Users by Brand",
                Chart::pie("Brand", "Users", "Registered Users by Brand"),
                Ok((*brands).clone()),
                None,
            );
            self.push(
                "Users by Brand",
                Chart::bar("Brand", "Users", "Users by Brand"),
                brands.sorted_desc("Users"),
                None,
            );
        }

        self.category_split(None).await;

        if let Some(users) = &users {
            self.top10(users, "Users", "Top 10 States by Registered Users");
        }
    }

    async fn statewise_study(&mut self, study: StatewiseStudy) {
        let by_state = self.load(study.statewise).await;
        if let Some(table) = &by_state {
            let download = self.download(table);
            self.map(table, Chart::choropleth(study.map_value, study.map_title), download);
        }

        if let Some(yearly) = self.load(study.yearly).await {
            self.yearly(&yearly, study.yearly_title, study.yearly_values);
        }

        if let Some(table) = &by_state {
            self.top10(table, study.top_value, study.top_title);
        }

        self.category_split(None).await;

        if let Some(table) = &by_state {
            self.top10(table, study.closing_value, study.closing_title);
        }
    }

    async fn user_engagement(&mut self) {
        let top_users = self.load(QueryKind::TopUsersByState).await;
        if let Some(table) = &top_users {
            let download = self.download(table);
            self.map(table, Chart::choropleth("TopUsers", "Top Users by State"), download);
        }

        if let Some(yearly) = self.load(QueryKind::TopUsersByYear).await {
            self.yearly(&yearly, "Yearly Growth (Top Users)", &["TopUsers"]);
        }

        if let Some(table) = &top_users {
            self.top10(table, "TopUsers", "Top 10 States by Top Users");
        }

        self.category_split(None).await;

        if let Some(overall) = self.load(QueryKind::PaymentCategoriesOverall).await {
            self.push(
                "Payment Category Amount Share (Overall)",
                Chart::pie("Category", "Txn_amount", "Payment Category Amount Share (Overall)"),
                Ok((*overall).clone()),
                None,
            );
        }
    }
}

/// Add the boundary-key column a choropleth locates regions by
fn with_geo(table: &ResultTable) -> Result<ResultTable, TableError> {
    if table.column_index(GEO_COLUMN).is_some() {
        return Ok(table.clone());
    }
    table.with_derived_column(GEO_COLUMN, "State", normalize_value)
}

/// Category rows of the ten states with the largest summed amount
fn top_state_split(categories: &ResultTable) -> Result<ResultTable, TableError> {
    let leaders: Vec<Value> = categories
        .sum_by("State", "Txn_amount")?
        .sorted_desc("Txn_amount")?
        .head(TOP_N)
        .column("State")?
        .into_iter()
        .cloned()
        .collect();
    categories.filter_in("State", &leaders)
}
