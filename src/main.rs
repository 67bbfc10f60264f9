// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use employee_dashboard::columns::{self, ColumnField};
use employee_dashboard::grid::{self, ColumnFilter, GridQuery, SortDirection};
use employee_dashboard::{
    export_csv, export_to_path, logging, registry, CellRenderers, DashboardConfig, EmployeeStore,
    ExportScope, SummaryCache,
};
use std::io;
use std::path::PathBuf;

/// Employee Dashboard - summary cards and employee grid in the terminal
#[derive(Parser, Debug)]
#[command(name = "employee-dashboard")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Replacement employee dataset (JSON); defaults to the embedded one
    #[arg(short = 'D', long, global = true)]
    data: Option<PathBuf>,

    /// Dashboard config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive terminal dashboard (default)
    Tui,

    /// Print the four summary statistics
    Summary {
        /// Output JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// Print one page of the employee grid
    List {
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Rows per page (10 or 20)
        #[arg(long)]
        page_size: Option<usize>,

        /// Column field to sort by (e.g. salary, hireDate)
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Only these departments (repeatable)
        #[arg(long)]
        department: Vec<String>,

        /// Only these locations (repeatable)
        #[arg(long)]
        location: Vec<String>,

        /// Only active employees
        #[arg(long)]
        active_only: bool,
    },

    /// Export the employee table as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Which employees to include: all or active
        #[arg(long)]
        scope: Option<ExportScope>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::default_filter(cli.verbose));

    let mut config = DashboardConfig::load(cli.config.as_deref()).context("loading config")?;
    if let Some(data) = cli.data {
        config.data_path = Some(data);
    }

    registry::initialize();
    let store = load_store(&config)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => run_ui_mode(store, config),
        Commands::Summary { json } => run_summary(&store, json),
        Commands::List {
            page,
            page_size,
            sort,
            desc,
            department,
            location,
            active_only,
        } => {
            let mut query = GridQuery::new().with_page_size(page_size.unwrap_or(config.page_size))?;
            if let Some(field) = sort {
                let field: ColumnField = field.parse()?;
                let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
                query.set_sort(field, direction)?;
            }
            if !department.is_empty() {
                query.set_filter(ColumnField::Department, ColumnFilter::Set(department))?;
            }
            if !location.is_empty() {
                query.set_filter(ColumnField::Location, ColumnFilter::Set(location))?;
            }
            if active_only {
                query.set_filter(ColumnField::IsActive, ColumnFilter::Boolean(true))?;
            }
            query.set_page(page);
            run_list(&store, &config, &query)
        }
        Commands::Export { output, scope } => {
            let scope = scope.unwrap_or(config.export_scope);
            run_export(&store, output, scope)
        }
    }
}

fn load_store(config: &DashboardConfig) -> Result<EmployeeStore> {
    match &config.data_path {
        Some(path) => EmployeeStore::from_path(path)
            .with_context(|| format!("loading dataset {}", path.display())),
        None => EmployeeStore::embedded().context("loading embedded dataset"),
    }
}

fn run_summary(store: &EmployeeStore, json: bool) -> Result<()> {
    let mut cache = SummaryCache::new();
    let stats = cache.get(&store.shared());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Employee Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for card in stats.cards() {
        println!("{:<18} {}", card.label, card.value);
    }
    if !stats.has_active_employees() {
        println!("\n(no active employees)");
    }

    Ok(())
}

fn run_list(store: &EmployeeStore, config: &DashboardConfig, query: &GridQuery) -> Result<()> {
    let page = grid::apply(store.get_all(), query)?;
    let renderers = CellRenderers::new(config.render_options());
    let fields = columns::fields();

    println!("{}", columns::headers().join(" | "));
    for record in &page.rows {
        println!("{}", renderers.render_row(&fields, record).join(" | "));
    }
    println!(
        "\n{} to {} of {}  (page {} of {})",
        page.first_row,
        page.last_row,
        page.total_rows,
        page.page + 1,
        page.page_count
    );

    Ok(())
}

fn run_export(store: &EmployeeStore, output: Option<PathBuf>, scope: ExportScope) -> Result<()> {
    match output {
        Some(path) => {
            let rows = export_to_path(&path, store.get_all(), scope)
                .with_context(|| format!("exporting to {}", path.display()))?;
            eprintln!("✓ Exported {} employees to {}", rows, path.display());
        }
        None => {
            export_csv(io::stdout().lock(), store.get_all(), scope)?;
        }
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: EmployeeStore, config: DashboardConfig) -> Result<()> {
    tracing::info!(records = store.len(), "starting terminal dashboard");

    let mut app = ui::App::new(store, config)?;
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: EmployeeStore, _config: DashboardConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the summary/list/export subcommands");
    std::process::exit(1);
}
