//! CLI entry point for the bikeshare statistics tool.
//!
//! `explore` runs the interactive prompt loop; `report` computes the same
//! statistics for filters given on the command line.

use anyhow::Result;
use bikeshare_stats::config::{CityConfig, DEFAULT_DATA_DIR};
use bikeshare_stats::filter::TripFilter;
use bikeshare_stats::input::{Validated, parse_city, parse_day, parse_month};
use bikeshare_stats::output::Format;
use bikeshare_stats::session::{self, LinePrompter, SessionOptions};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file mapping city codes to CSV paths (overrides --data-dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick a city and filters, then show statistics
    Explore {
        /// Output format for the statistics
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// CSV file to append a summary row to after each run
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
    /// Compute statistics once for the given filters
    Report {
        /// City code: C (Chicago), N (New York City) or W (Washington)
        #[arg(long)]
        city: String,

        /// Month 1-6, or "all"
        #[arg(long, default_value = "all")]
        month: String,

        /// Full weekday name such as Sunday, or "all"
        #[arg(long, default_value = "all")]
        day: String,

        /// Output format for the statistics
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

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
    let config = city_config(cli.config.as_deref(), cli.data_dir)?;

    let stdout = std::io::stdout();

    match cli.command {
        Commands::Explore { format, export } => {
            let options = SessionOptions { format, export };
            let mut prompter = LinePrompter::new(std::io::stdin().lock(), std::io::stdout());
            session::run(&config, &mut prompter, &mut stdout.lock(), &options)?;
        }
        Commands::Report {
            city,
            month,
            day,
            format,
            export,
        } => {
            let city = accepted(parse_city(&city), "city", &city)?;
            let month = accepted(parse_month(&month), "month", &month)?;
            let day = accepted(parse_day(&day), "day", &day)?;
            let filter = TripFilter::new(month, day);

            let table = session::load_filtered(&config, city, filter)?;
            let report = session::analyze(city, filter, &table);
            let options = SessionOptions { format, export };
            session::publish(&report, &options, &mut stdout.lock())?;
        }
    }

    Ok(())
}

/// Builds the city mapping once: an explicit config file wins, then
/// `--data-dir`, then `BIKESHARE_DATA_DIR`, then `./data`.
fn city_config(config: Option<&Path>, data_dir: Option<PathBuf>) -> Result<CityConfig> {
    if let Some(path) = config {
        info!(path = %path.display(), "Loading city config");
        return Ok(CityConfig::load(path)?);
    }

    let dir = data_dir
        .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    info!(data_dir = %dir.display(), "Using data directory");
    Ok(CityConfig::with_data_dir(dir))
}

/// Command-line filters use the same accepted values as the prompts.
fn accepted<T>(value: Validated<T>, what: &str, raw: &str) -> Result<T> {
    value
        .accepted()
        .ok_or_else(|| anyhow::anyhow!("invalid {what}: {raw:?}"))
}
