use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pulsescope::dashboard::{render_selection, Chart};
use pulsescope::normalizer::{is_boundary_key, INDIA_STATES};
use pulsescope::{
    emit_sql, normalize_state, CaseStudy, DashboardConfig, DashboardContext, DataFusionStore, FilterSelection,
    ParamStyle, Planned, QueryKind, QueryParams, RenderOptions, RenderReport, SemanticField,
};

#[derive(Parser)]
#[command(name = "pulsescope")]
#[command(about = "PhonePe Pulse case studies over column-drifting tables")]
#[command(version)]
struct Args {
    /// Dashboard config YAML (store location, cache TTL, catalog)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the table files; overrides the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one case study
    Render {
        /// Case study: 1-6, its slug, or its title
        #[arg(long, default_value = "transaction-dynamics")]
        case: CaseStudy,

        #[command(flatten)]
        filters: Filters,

        /// Restrict the device-brand breakdown to one state
        #[arg(long)]
        brand_state: Option<String>,

        /// Write the state-level CSV downloads into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the SQL each query would run against the current tables
    Sql {
        /// Single query to show; all queries when omitted
        #[arg(long)]
        query: Option<QueryKind>,

        #[command(flatten)]
        filters: Filters,

        /// Placeholder style: numbered ($1) or positional (?)
        #[arg(long, default_value = "numbered")]
        param_style: ParamStyle,
    },
    /// Show the boundary key for free-text state names
    Normalize {
        names: Vec<String>,
    },
    /// Show which live column each catalog field resolves to
    Columns,
    /// List the years and quarters present in the data
    Periods,
}

/// Year / quarter / state filters; empty means everything available
#[derive(ClapArgs)]
struct Filters {
    #[arg(long, value_delimiter = ',')]
    years: Vec<i64>,

    #[arg(long, value_delimiter = ',')]
    quarters: Vec<i64>,

    #[arg(long, value_delimiter = ',')]
    states: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Commands::Normalize { names } = &args.command {
        handle_normalize(names);
        return Ok(());
    }

    let config = load_config(args.config.as_deref(), args.data_dir)?;
    let store = DataFusionStore::open(&config.store)
        .await
        .with_context(|| format!("Failed to open tables in '{}'", config.store.data_dir.display()))?;
    let catalog = config.load_catalog().context("Failed to load catalog")?;
    let ctx = DashboardContext::init(store, catalog, config.cache.ttl())
        .await
        .context("Failed to connect to the data store")?;

    let result = match args.command {
        Commands::Render {
            case,
            filters,
            brand_state,
            out_dir,
            json,
        } => handle_render(&ctx, case, filters, brand_state, out_dir, json).await,
        Commands::Sql {
            query,
            filters,
            param_style,
        } => handle_sql(&ctx, query, filters, param_style).await,
        Commands::Columns => handle_columns(&ctx).await,
        Commands::Periods => handle_periods(&ctx).await,
        Commands::Normalize { .. } => Ok(()),
    };

    ctx.shutdown().await?;
    result
}

fn load_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> anyhow::Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.store.data_dir = dir;
    }
    Ok(config)
}

/// Fill empty filters from the data, the way the dashboard preselects everything
async fn selection_from(ctx: &DashboardContext<DataFusionStore>, filters: Filters) -> anyhow::Result<FilterSelection> {
    let Filters {
        mut years,
        mut quarters,
        mut states,
    } = filters;

    if years.is_empty() || quarters.is_empty() {
        let periods = ctx.available_periods().await?;
        if years.is_empty() {
            years = periods.years;
        }
        if quarters.is_empty() {
            quarters = periods.quarters;
        }
    }
    if states.is_empty() {
        states = INDIA_STATES.iter().map(|s| s.to_string()).collect();
    }

    Ok(FilterSelection::new(years, quarters, states)?)
}

async fn handle_render(
    ctx: &DashboardContext<DataFusionStore>,
    case: CaseStudy,
    filters: Filters,
    brand_state: Option<String>,
    out_dir: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let selection = selection_from(ctx, filters).await?;
    let years: Vec<i64> = selection.years().iter().copied().collect();
    let quarters: Vec<i64> = selection.quarters().iter().copied().collect();
    let states: Vec<String> = selection.states().iter().cloned().collect();
    let options = RenderOptions { brand_state };

    let report = render_selection(ctx, case, &years, &quarters, &states, &options).await?;

    if let Some(dir) = &out_dir {
        write_downloads(&report, dir)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn write_downloads(report: &RenderReport, dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create '{}'", dir.display()))?;
    for download in report.downloads() {
        let path = dir.join(&download.file_name);
        let file = fs::File::create(&path).with_context(|| format!("Failed to create '{}'", path.display()))?;
        download.table.write_csv(file)?;
        info!(path = %path.display(), rows = download.table.len(), "wrote download");
    }
    Ok(())
}

fn print_report(report: &RenderReport) {
    println!("{}", report.case.title());
    println!("{}", "=".repeat(report.case.title().len()));

    for section in &report.sections {
        println!();
        println!("## {} [{}]", section.title, chart_kind(&section.chart));
        if section.is_empty() {
            println!("(no data)");
            continue;
        }
        println!("{}", section.table.columns().join(" | "));
        for row in section.table.rows() {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            println!("{}", cells.join(" | "));
        }
        if let Some(download) = &section.download {
            println!("download: {}", download.file_name);
        }
    }

    for warning in &report.warnings {
        warn!("{}", warning);
        eprintln!("warning: {}", warning);
    }
}

fn chart_kind(chart: &Chart) -> &'static str {
    match chart {
        Chart::Choropleth { .. } => "map",
        Chart::Line { .. } => "line",
        Chart::Bar { .. } => "bar",
        Chart::Pie { .. } => "pie",
    }
}

async fn handle_sql(
    ctx: &DashboardContext<DataFusionStore>,
    query: Option<QueryKind>,
    filters: Filters,
    style: ParamStyle,
) -> anyhow::Result<()> {
    let selection = selection_from(ctx, filters).await?;
    let kinds = match query {
        Some(kind) => vec![kind],
        None => QueryKind::all(),
    };

    for kind in kinds {
        println!("-- {}", kind);
        let params = match kind {
            QueryKind::AvailablePeriods => QueryParams::unfiltered(),
            _ => QueryParams::for_kind(&kind, &selection),
        };
        match ctx.plan(&kind, &params).await? {
            None => println!("-- dataset '{}' is not in the catalog", kind.shape().dataset),
            Some(Planned::Unresolved { table, missing, .. }) => {
                let names: Vec<&str> = missing.iter().map(SemanticField::as_str).collect();
                println!("-- {}: no matching column for {}", table, names.join(", "));
            }
            Some(Planned::Ready(plan)) => {
                let statement = emit_sql(&plan, style)?;
                println!("{};", statement.sql);
                if !statement.params.is_empty() {
                    let params: Vec<String> = statement.params.iter().map(|p| p.to_string()).collect();
                    println!("-- params: {}", params.join(", "));
                }
            }
        }
        println!();
    }
    Ok(())
}

fn handle_normalize(names: &[String]) {
    for name in names {
        let key = normalize_state(name);
        let note = if is_boundary_key(&key) { "" } else { "  (not a boundary key)" };
        println!("{} -> {}{}", name, key, note);
    }
}

async fn handle_columns(ctx: &DashboardContext<DataFusionStore>) -> anyhow::Result<()> {
    for dataset in &ctx.catalog().datasets {
        let fields: Vec<SemanticField> = dataset.fields.keys().copied().collect();
        let resolved = ctx
            .resolver()
            .resolve_dataset(ctx.store(), dataset, &fields)
            .await?;

        println!("{} ({})", dataset.name, dataset.table);
        for field in &fields {
            match resolved.get(*field) {
                Some(column) => println!("  {:<18} {}", field.as_str(), column),
                None => println!("  {:<18} -- none of {:?}", field.as_str(), dataset.candidates(*field)),
            }
        }
    }
    Ok(())
}

async fn handle_periods(ctx: &DashboardContext<DataFusionStore>) -> anyhow::Result<()> {
    let periods = ctx.available_periods().await?;
    if periods.years.is_empty() {
        bail!("No periods found; is the transaction table present?");
    }
    let join = |values: &[i64]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
    println!("years:    {}", join(&periods.years));
    println!("quarters: {}", join(&periods.quarters));
    Ok(())
}
