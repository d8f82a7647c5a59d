//! Log file setup
//!
//! The terminal belongs to the dashboard while it runs, so tracing output is
//! written to a file instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "wxdash=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// `<data_local_dir>/wxdash.log`, falling back to the working directory
pub fn default_log_path() -> PathBuf {
    ProjectDirs::from("", "", "wxdash")
        .map(|dirs| dirs.data_local_dir().join("wxdash.log"))
        .unwrap_or_else(|| PathBuf::from("wxdash.log"))
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    let open_error = |source| LoggingError::Open {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(open_error)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_error)
}

/// Installs the global subscriber writing to `path`
pub fn init(path: &Path) -> Result<(), LoggingError> {
    let file = open_log_file(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))
}
