//! CLI entry point for the restaurant dashboard.
//!
//! Loads and cleans the listing once, then serves the dashboard's data for a
//! set of filter selections: the location list, the full JSON report, a
//! preview table, a CSV export, or an interactive session that recomputes on
//! every change.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use restaurant_dash::analyzers::analyzer::analyze;
use restaurant_dash::{
    cache::DatasetCache,
    config::DashboardConfig,
    dataset::CleanTable,
    filter::{FilterParams, PreviewSize, filter},
    output::{export_csv, preview, print_pretty, write_json},
};
use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "restaurant_dash")]
#[command(about = "Restaurant listing analysis dashboard", long_about = None)]
struct Cli {
    /// Dataset to load (overrides config and DASHBOARD_DATA_PATH)
    #[arg(short, long, global = true, value_name = "CSV")]
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Location to show (defaults to the first in sorted order)
    #[arg(short, long)]
    location: Option<String>,

    /// Minimum rating, inclusive
    #[arg(long)]
    min_rating: Option<f64>,

    /// Maximum cost for two, inclusive (defaults to the observed maximum)
    #[arg(long)]
    max_cost: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the distinct locations in the cleaned dataset
    Locations,
    /// Compute all metrics and chart tables as JSON
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the first rows of the filtered view as CSV
    Preview {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of rows to show (5-50)
        #[arg(short = 'n', long)]
        rows: Option<usize>,
    },
    /// Export the filtered view to a CSV file
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "filtered.csv")]
        output: PathBuf,
    },
    /// Read `key=value` filter changes from stdin and print a report after each
    Interactive,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/restaurant_dash.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("restaurant_dash.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::resolve(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let mut cache = DatasetCache::new(&config.data_path, config.columns.clone());

    match cli.command {
        Commands::Locations => {
            let table = cache.get()?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for location in table.locations() {
                writeln!(out, "{location}")?;
            }
        }
        Commands::Report { filter, output } => {
            let table = cache.get()?;
            let params = resolve_params(&table, &filter)?;
            let report = analyze(&table, &params, &config);
            print_pretty(&report.metrics);

            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create '{}'", path.display()))?;
                    write_json(file, &report)?;
                    info!(path = %path.display(), "Report written");
                }
                None => write_json(std::io::stdout().lock(), &report)?,
            }
        }
        Commands::Preview { filter: args, rows } => {
            let table = cache.get()?;
            let params = resolve_params(&table, &args)?;
            let size = PreviewSize::new(rows.unwrap_or(config.preview_rows))?;

            let view = filter(&table, &params);
            preview(&view, table.headers(), size).write_csv(std::io::stdout().lock())?;
        }
        Commands::Export {
            filter: args,
            output,
        } => {
            let table = cache.get()?;
            let params = resolve_params(&table, &args)?;

            let view = filter(&table, &params);
            export_csv(&output, &view, table.headers())?;
            info!(path = %output.display(), rows = view.len(), "Filtered rows exported");
        }
        Commands::Interactive => interactive(&mut cache, &config)?,
    }

    Ok(())
}

/// Fills unset filter arguments with the dashboard defaults and validates
/// the result against the loaded table.
fn resolve_params(table: &CleanTable, args: &FilterArgs) -> Result<FilterParams> {
    let Some(defaults) = FilterParams::defaults_for(table) else {
        bail!("dataset has no locations to filter on");
    };

    let params = FilterParams {
        location: args.location.clone().unwrap_or(defaults.location),
        min_rating: args.min_rating.unwrap_or(defaults.min_rating),
        max_cost: args.max_cost.unwrap_or(defaults.max_cost),
    };
    params.validate(table)?;

    Ok(params)
}

/// Applies one `key=value` line to the current filter selections.
fn apply_setting(args: &mut FilterArgs, line: &str) -> Result<()> {
    let Some((key, value)) = line.split_once('=') else {
        bail!("expected key=value, got '{line}'");
    };
    let value = value.trim();

    match key.trim() {
        "location" => args.location = Some(value.to_string()),
        "min_rating" => args.min_rating = Some(value.parse::<f64>().context("min_rating")?),
        "max_cost" => args.max_cost = Some(value.parse::<f64>().context("max_cost")?),
        other => bail!("unknown setting '{other}'"),
    }

    Ok(())
}

/// Recomputes the report after every filter change read from stdin.
///
/// Lines are `location=<name>`, `min_rating=<f64>`, `max_cost=<f64>`,
/// `reload` or `quit`. The cleaned table is reused until the source file
/// changes.
#[tracing::instrument(skip_all, fields(path = %cache.path().display()))]
fn interactive(cache: &mut DatasetCache, config: &DashboardConfig) -> Result<()> {
    let mut args = FilterArgs::default();
    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "reload" => cache.invalidate(),
            setting => {
                if let Err(e) = apply_setting(&mut args, setting) {
                    warn!(error = %e, "Ignoring input");
                    continue;
                }
            }
        }

        let table = cache.get()?;
        match resolve_params(&table, &args) {
            Ok(params) => {
                let report = analyze(&table, &params, config);
                write_json(std::io::stdout().lock(), &report)?;
            }
            Err(e) => warn!(error = %e, "Invalid selection"),
        }
    }

    info!(loads = cache.loads(), "Interactive session finished");
    Ok(())
}
