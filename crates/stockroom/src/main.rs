use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::{de::DeserializeOwned, Serialize};
use stockroom::config::ListOptions;
use stockroom::table::{page_table, Table};
use stockroom::{
    monthly_totals, CategoryStat, Config, InventorySummary, JsonFileSource, MonthlyTotal, Order,
    Product, RecordKind, RecordSource, RecordView, Sale, SalesOverview, Store, Supplier, ViewConfig,
};
use stockroom_export::{ExportDestination, ExportFormat, Exporter};
use stockroom_query::{parse_date, Record};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Inventory, order and sales listings from JSON exports of the backend.
#[derive(Parser)]
#[command(name = "stockroom", version, about)]
struct Cli {
    /// Config file (defaults to $STOCKROOM_CONFIG, then the built-in views)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log more; repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show one page of a view
    List {
        /// View name, e.g. inventory, orders, sales, stores, reports
        view: String,
        /// JSON array of records
        file: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        /// Page number, clamped to the available pages
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Records per page (defaults to the view's page size)
        #[arg(long)]
        per_page: Option<usize>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Export every record a view's filters select
    Export {
        view: String,
        file: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
        /// csv, json or yaml
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Output file, or a directory to write <view>.<format> into
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Inventory figures for a products file
    Summary {
        file: PathBuf,
        /// Sales file for the revenue overview
        #[arg(long, value_name = "PATH")]
        sales: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Append a record to a view's file
    Add {
        view: String,
        file: PathBuf,
        /// The record as a JSON object
        #[arg(long)]
        json: String,
    },
    /// Change fields of the record with the given id
    Update {
        view: String,
        file: PathBuf,
        id: String,
        /// Fields to set, as a JSON object
        #[arg(long)]
        json: String,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive text searched in the view's search fields
    #[arg(long)]
    search: Option<String>,
    /// First day of the date range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    from: Option<NaiveDate>,
    /// Last day of the date range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    to: Option<NaiveDate>,
    /// Exact value of the view's category field
    #[arg(long)]
    category: Option<String>,
    /// Field to sort by (defaults to the view's sort)
    #[arg(long)]
    sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    desc: bool,
}

impl FilterArgs {
    fn options(&self, page: usize, per_page: Option<usize>) -> ListOptions {
        ListOptions {
            search: self.search.clone(),
            from: self.from,
            to: self.to,
            category: self.category.clone(),
            sort: self.sort.clone(),
            descending: self.desc,
            page,
            per_page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{}' is not a date, expected YYYY-MM-DD", s))
}

/// Runs `$body` with `$t` bound to the model type of `$kind`.
macro_rules! with_model {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            RecordKind::Products => {
                type $t = Product;
                $body
            }
            RecordKind::Orders => {
                type $t = Order;
                $body
            }
            RecordKind::Sales => {
                type $t = Sale;
                $body
            }
            RecordKind::Stores => {
                type $t = Store;
                $body
            }
            RecordKind::Suppliers => {
                type $t = Supplier;
                $body
            }
        }
    };
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::resolve(cli.config.as_deref())?;
    match cli.command {
        Command::List {
            view,
            file,
            filters,
            page,
            per_page,
            format,
        } => {
            let settings = config.view(&view)?;
            let options = filters.options(page, per_page);
            with_model!(settings.kind, T => list::<T>(&view, settings, &file, &options, format))
        }
        Command::Export {
            view,
            file,
            filters,
            format,
            out,
        } => {
            let settings = config.view(&view)?;
            let options = filters.options(1, None);
            let destination = match out {
                Some(path) if path.is_dir() => {
                    ExportDestination::File(path.join(format.file_name(&view)))
                }
                other => ExportDestination::from_path(other),
            };
            with_model!(settings.kind, T => export::<T>(&view, settings, &file, &options, format, &destination))
        }
        Command::Summary {
            file,
            sales,
            format,
        } => summary(&file, sales.as_deref(), format),
        Command::Add { view, file, json } => {
            let settings = config.view(&view)?;
            let data = parse_object(&json)?;
            with_model!(settings.kind, T => add::<T>(settings, &file, data))
        }
        Command::Update {
            view,
            file,
            id,
            json,
        } => {
            let settings = config.view(&view)?;
            let data = parse_object(&json)?;
            with_model!(settings.kind, T => update::<T>(settings, &file, &id, data))
        }
    }
}

/// `-v` sets the level; otherwise `RUST_LOG`, defaulting to warnings.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_view<T>(settings: &ViewConfig, file: &Path) -> RecordView<JsonFileSource<T>>
where
    T: Serialize + DeserializeOwned,
{
    RecordView::new(JsonFileSource::new(file).id_field(settings.id_field.as_str()))
}

fn list<T>(
    name: &str,
    settings: &ViewConfig,
    file: &Path,
    options: &ListOptions,
    format: Format,
) -> Result<()>
where
    T: Record + Serialize + DeserializeOwned,
{
    let query = settings.list_query(name, options)?;
    let mut view = open_view::<T>(settings, file);
    let page = view
        .list(&query)
        .with_context(|| format!("listing {} from {}", name, file.display()))?;
    debug!(view = name, shown = page.len(), matching = page.total_matching, "listed page");

    match format {
        Format::Table => {
            let fallback = T::field_names().unwrap_or_default();
            print!("{}", page_table(&page, &settings.columns, fallback));
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&page)?),
    }
    Ok(())
}

fn export<T>(
    name: &str,
    settings: &ViewConfig,
    file: &Path,
    options: &ListOptions,
    format: ExportFormat,
    destination: &ExportDestination,
) -> Result<()>
where
    T: Record + Serialize + DeserializeOwned,
{
    let query = settings.list_query(name, options)?;
    let mut view = open_view::<T>(settings, file);
    let records = view.records()?;
    let matching = query
        .matching(records)
        .with_context(|| format!("filtering {} from {}", name, file.display()))?;

    Exporter::new(format)
        .columns(settings.export_columns())
        .export(&matching, destination)
        .with_context(|| format!("exporting {}", name))?;
    info!(view = name, records = matching.len(), %format, "exported");
    if let ExportDestination::File(path) = destination {
        eprintln!("Exported {} records to {}", matching.len(), path.display());
    }
    Ok(())
}

fn add<T>(settings: &ViewConfig, file: &Path, data: serde_json::Value) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let mut view = open_view::<T>(settings, file);
    let item = view
        .create(data)
        .with_context(|| format!("adding a record to {}", file.display()))?;
    let count = view.records()?.len();
    println!("{}", serde_json::to_string_pretty(&item)?);
    eprintln!("Added record to {} ({} records)", file.display(), count);
    Ok(())
}

fn update<T>(settings: &ViewConfig, file: &Path, id: &str, data: serde_json::Value) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    let mut view = open_view::<T>(settings, file);
    let item = view
        .update(id, data)
        .with_context(|| format!("updating {} in {}", id, file.display()))?;
    println!("{}", serde_json::to_string_pretty(&item)?);
    Ok(())
}

fn parse_object(json: &str) -> Result<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_str(json).context("--json is not valid JSON")?;
    if !value.is_object() {
        bail!("--json must be a JSON object");
    }
    Ok(value)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryReport {
    inventory: InventorySummary,
    categories: Vec<CategoryStat>,
    monthly: Vec<MonthlyTotal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sales: Option<SalesOverview>,
}

fn summary(file: &Path, sales: Option<&Path>, format: Format) -> Result<()> {
    let products: Vec<Product> = JsonFileSource::new(file)
        .fetch_all()
        .with_context(|| format!("reading products from {}", file.display()))?;
    let sales = match sales {
        Some(path) => {
            let sales: Vec<Sale> = JsonFileSource::new(path)
                .fetch_all()
                .with_context(|| format!("reading sales from {}", path.display()))?;
            Some(SalesOverview::from_sales(&sales))
        }
        None => None,
    };

    let report = SummaryReport {
        inventory: InventorySummary::from_products(&products),
        categories: CategoryStat::from_products(&products),
        monthly: monthly_totals(&products),
        sales,
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Table => print!("{}", render_summary(&report)),
    }
    Ok(())
}

fn render_summary(report: &SummaryReport) -> String {
    let inv = &report.inventory;
    let mut out = String::new();

    let mut overview = Table::new(["Inventory", ""]);
    overview.row(["Total products".to_string(), inv.total_products.to_string()]);
    overview.row(["Total value".to_string(), format!("{:.2}", inv.total_value)]);
    overview.row(["Low stock".to_string(), inv.low_stock.to_string()]);
    overview.row(["Out of stock".to_string(), inv.out_of_stock.to_string()]);
    overview.row(["Categories".to_string(), inv.categories.len().to_string()]);
    if let Some(sales) = &report.sales {
        overview.row(["Sales".to_string(), sales.sales.to_string()]);
        overview.row(["Revenue".to_string(), format!("{:.2}", sales.revenue)]);
        overview.row(["Profit".to_string(), format!("{:.2}", sales.profit)]);
    }
    out.push_str(&overview.render());

    if !report.categories.is_empty() {
        let mut categories = Table::new(["Category", "Turnover", "Count", "Average"]);
        for stat in &report.categories {
            categories.row([
                stat.category.clone(),
                format!("{:.2}", stat.turnover),
                stat.count.to_string(),
                format!("{:.2}", stat.average),
            ]);
        }
        out.push('\n');
        out.push_str(&categories.render());
    }

    if !report.monthly.is_empty() {
        let mut monthly = Table::new(["Month", "Stock Value"]);
        for month in &report.monthly {
            monthly.row([month.month.clone(), format!("{:.2}", month.total)]);
        }
        out.push('\n');
        out.push_str(&monthly.render());
    }
    out
}
