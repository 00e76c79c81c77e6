//! CLI entry point for promote_stats.
//!
//! Collects a campaign's statistics from the promotion platform, or evaluates
//! saved page/export snapshots offline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use promote_stats::{
    Collector, Config, Statistics,
    graph::parse_graph,
    header::{InfoRowExtractor, parse_header},
    output::{render_json, write_graph_csv},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "promote_stats")]
#[command(about = "Collect advertising campaign statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a campaign's dashboard and graph export and print its statistics
    Collect {
        /// Campaign identifier as used in the platform's URLs
        #[arg(value_name = "CAMPAIGN_ID")]
        campaign_id: String,

        /// Platform base URL (overrides PROMOTE_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Also write the daily series to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Compute statistics from a saved dashboard page and graph export
    Inspect {
        /// Saved dashboard HTML
        #[arg(long)]
        page: String,

        /// Saved tab-separated graph export
        #[arg(long)]
        graph: String,

        /// Identifier used in error messages
        #[arg(long, default_value = "local")]
        campaign_id: String,

        /// Also write the daily series to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect {
            campaign_id,
            base_url,
            csv,
        } => {
            let mut config = Config::from_env();
            if let Some(base_url) = base_url {
                config = config.with_base_url(base_url);
            }
            info!(base_url = %config.base_url, "Collecting campaign statistics");

            let collector = Collector::from_config(&config)?;
            let stats = match collector.collect(&campaign_id).await {
                Ok(stats) => stats,
                Err(e) => {
                    let kind = e.kind();
                    error!(
                        campaign_id = %campaign_id,
                        kind = ?kind,
                        status_hint = kind.status_hint(),
                        error = %e,
                        "Collection failed"
                    );
                    return Err(e.into());
                }
            };

            emit(&stats, csv.as_deref())?;
        }
        Commands::Inspect {
            page,
            graph,
            campaign_id,
            csv,
        } => {
            let page_html = std::fs::read_to_string(&page)
                .with_context(|| format!("reading dashboard snapshot {page}"))?;
            let export = std::fs::read_to_string(&graph)
                .with_context(|| format!("reading graph snapshot {graph}"))?;

            let header = parse_header(&InfoRowExtractor::default(), &campaign_id, &page_html)?;
            let days = parse_graph(&export)?;
            let stats = Statistics::compute(&campaign_id, header, days)?;

            emit(&stats, csv.as_deref())?;
        }
    }

    Ok(())
}

/// Prints statistics as JSON on stdout and optionally writes the daily CSV.
fn emit(stats: &Statistics, csv: Option<&str>) -> Result<()> {
    println!("{}", render_json(stats)?);

    if let Some(path) = csv {
        write_graph_csv(path, stats.graph_stats())?;
        info!(path, days = stats.graph_stats().len(), "Daily series written");
    }
    Ok(())
}

/// Colored stderr logging plus a JSON daily-rolling log file.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/promote_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("promote_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(file_guard)
}
