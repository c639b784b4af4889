//! Logging setup for embedding applications
//
// Call `logging::init(verbose)` once at startup and keep the returned guard
// alive; dropping it flushes and closes the log file.
//
// Filtering comes from `RUST_LOG`, defaulting to `info`. Each run logs into its
// own timestamped folder under the platform data directory.

use anyhow::Context;
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

pub struct LogGuard(#[allow(dead_code)] tracing_appender::non_blocking::WorkerGuard);

/// Install the global subscriber.
///
/// - `verbose`: also log to stdout
pub fn init(verbose: bool) -> anyhow::Result<LogGuard> {
    let proj_dirs = ProjectDirs::from("com", "Canvas", "Canvas_Editor")
        .context("Could not determine app data directory")?;
    init_in(&proj_dirs.data_dir().join("logs"), verbose)
}

/// Install the global subscriber, logging under `logs_dir`.
pub fn init_in(logs_dir: &Path, verbose: bool) -> anyhow::Result<LogGuard> {
    let log_folder = run_folder(logs_dir, Local::now());
    fs::create_dir_all(&log_folder)
        .with_context(|| format!("Failed to create log folder {}", log_folder.display()))?;

    let log_path = log_folder.join("canvas.log");
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // File log: plain formatting, no ANSI codes
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    let installed = if verbose {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true);
        registry.with(console_layer).try_init()
    } else {
        registry.try_init()
    };
    installed.context("A global tracing subscriber is already installed")?;

    tracing::info!("Logging to {}", log_path.display());
    Ok(LogGuard(guard))
}

/// Folder for one run's logs
pub fn run_folder(logs_dir: &Path, now: DateTime<Local>) -> PathBuf {
    logs_dir.join(now.format("%Y-%m-%d_%H-%M-%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_run_folder_is_timestamped() {
        let now = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .unwrap();
        assert_eq!(
            run_folder(Path::new("/tmp/logs"), now),
            PathBuf::from("/tmp/logs/2024-03-09_14-05-07")
        );
    }
}
