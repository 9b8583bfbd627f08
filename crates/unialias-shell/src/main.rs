//! UniAlias headless shell.
//!
//! Runs every window of the quick-launch layer in one process and drives
//! them from a line prompt: the hotkey, typing, keys and clicks are commands,
//! window state and rendered content are printed.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use unialias_core::DEFAULT_MAX_CANDIDATES;
use unialias_core::config::Directories;

mod app;
mod host;
mod repl;
mod table;

/// UniAlias shell - type aliases, get characters
#[derive(Parser, Debug)]
#[command(name = "unialias-shell")]
#[command(version, about, long_about = None)]
struct Args {
    /// Keep settings, window storage and datasets under this directory
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Read `*.csv` datasets from this directory
    #[arg(long, value_name = "DIR")]
    dataset_dir: Option<PathBuf>,

    /// Candidates shown per query
    #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
    max_results: usize,

    /// Also print debug logs to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Log to a timestamped file under `log_dir`, with `latest.log` pointing at
/// it. The prompt shares the terminal, so stderr only gets warnings unless
/// `verbose` is set. Debug builds default to debug level, release to info.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(log_dir: &Path, verbose: bool) -> Option<WorkerGuard> {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "unialias_core={default_level},unialias_shell={default_level}"
        ))
    });
    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(stderr_level);

    let file = match std::fs::create_dir_all(log_dir) {
        Ok(()) => Some(log_file(log_dir)),
        Err(e) => {
            eprintln!("Cannot create log directory {}: {e}", log_dir.display());
            None
        }
    };
    let (file_writer, guard) = file.unzip();
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true)
            .with_filter(filter)
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
    guard
}

/// Open a fresh timestamped log file and point `latest.log` at it.
fn log_file(log_dir: &Path) -> (NonBlocking, WorkerGuard) {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("unialias-shell-{timestamp}.log");
    let log_path = log_dir.join(&log_filename);

    #[cfg(unix)]
    {
        let latest = log_dir.join("latest.log");
        let _ = std::fs::remove_file(&latest);
        let _ = std::os::unix::fs::symlink(&log_path, &latest);
    }

    eprintln!("Logging to: {}", log_path.display());
    tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, &log_filename))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut dirs = match args.base_dir {
        Some(base) => Directories::with_base(base),
        None => Directories::new().context("Could not determine the home directory")?,
    };
    if let Some(dataset_dir) = args.dataset_dir {
        dirs.datasets = dataset_dir;
    }

    let _log_guard = setup_logging(&dirs.data.join("logs"), args.verbose);

    info!("Starting UniAlias shell...");
    app::run(app::Options {
        dirs,
        max_results: args.max_results,
    })
    .await
}
