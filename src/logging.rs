//! Log sink setup
//!
//! The terminal belongs to the UI, so logs go to `esimstore.log` in the data
//! directory instead of stderr. `RUST_LOG` overrides the configured level.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Name of the log file inside the data directory
pub const LOG_FILE_NAME: &str = "esimstore.log";

/// Filter from `RUST_LOG`, or `default_level` when it is unset or invalid
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Opens (appending) the log file, creating the directory if needed
pub fn open_log_file(data_dir: &Path) -> io::Result<(File, PathBuf)> {
    fs::create_dir_all(data_dir)?;
    let path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// Installs the global subscriber writing to the log file
///
/// Returns the log file path. Fails if the file cannot be opened; the caller
/// decides whether running without logs is acceptable.
pub fn init(data_dir: &Path, default_level: &str) -> io::Result<PathBuf> {
    let (file, path) = open_log_file(data_dir)?;

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
    if result.is_err() {
        // Already installed, e.g. by a test harness
        tracing::debug!("tracing subscriber already set");
    }

    Ok(path)
}
