//! CLI entry point for the menu rater.
//!
//! Reads the menu catalog and every person's rating file, then writes a
//! single HTML report to stdout. Any error aborts the run before output.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use menu_rater::{
    aggregate::AggregateOptions,
    config::{DEFAULT_MENU_PATH, DEFAULT_RATINGS_DIR, ReportConfig},
    output::{log_stats, write_report},
    report::build_report,
};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "menu_rater")]
#[command(about = "Generate an HTML report of menu ratings", long_about = None)]
struct Cli {
    /// CSV file listing menu items (number,name)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MENU_PATH)]
    menu: PathBuf,

    /// Directory with one ratings CSV per person
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_RATINGS_DIR)]
    ratings: PathBuf,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();
    let cli = Cli::parse();

    let config = ReportConfig::new(cli.menu, cli.ratings);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Report generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ReportConfig) -> Result<()> {
    let report = build_report(config, AggregateOptions::default())
        .context("failed to build report")?;

    log_stats(&report)?;

    let stdout = std::io::stdout().lock();
    write_report(&report, stdout).context("failed to write report")?;

    info!(
        items = report.items.len(),
        people = report.stats.len(),
        "Report generated"
    );
    Ok(())
}

/// Span open/close lines stay out of stderr so a failed run prints only the
/// error line.
const STDERR_SPAN_EVENTS: FmtSpan = FmtSpan::NONE;

/// Logging setup: colored stderr, plus a JSON rolling log file when
/// `LOG_FILE_PATH` is set. Stdout is reserved for the report.
fn init_logging() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(STDERR_SPAN_EVENTS)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_path = Path::new(&log_file_path);
            let log_dir = log_path.parent().unwrap_or(Path::new("logs"));
            let log_file_name = log_path
                .file_name()
                .unwrap_or(OsStr::new("menu_rater.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(env_filter("RUST_LOG_JSON", "debug"));

            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

/// Reads directives from `var`, falling back to `default` when unset or invalid.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["menu_rater"]).unwrap();
        assert_eq!(cli.menu, PathBuf::from("menu.csv"));
        assert_eq!(cli.ratings, PathBuf::from("ratings"));
    }

    #[test]
    fn test_stderr_omits_span_events() {
        assert_eq!(STDERR_SPAN_EVENTS, FmtSpan::NONE);
    }

    #[test]
    fn test_cli_paths() {
        let cli =
            Cli::try_parse_from(["menu_rater", "--menu", "data/menu.csv", "-r", "data/ratings"])
                .unwrap();
        assert_eq!(cli.menu, PathBuf::from("data/menu.csv"));
        assert_eq!(cli.ratings, PathBuf::from("data/ratings"));
    }
}
