//! Tracing subscriber setup.
//!
//! The terminal interface owns the alternate screen, so logs only reach stderr in console mode. A
//! log file works with both front-ends.

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use color_eyre::eyre::{Report, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Where log records are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Destination {
    /// Plain-text file, truncated on startup.
    File(PathBuf),
    /// Standard error, with colors.
    Stderr,
    /// Logging stays off.
    Disabled,
}

impl Destination {
    /// Picks the destination for the given front-end.
    pub(crate) fn select(log_file: Option<&Path>, console: bool) -> Self {
        match (log_file, console) {
            (Some(path), _) => Self::File(path.to_path_buf()),
            (None, true) => Self::Stderr,
            (None, false) => Self::Disabled,
        }
    }
}

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `info`.
///
/// # Errors
///
/// - [`std::io::Error`] if the log file cannot be created
/// - a subscriber was already installed
pub(crate) fn init(destination: &Destination) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match destination {
        Destination::File(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init()
            .map_err(Report::msg),
        Destination::Stderr => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(Report::msg),
        Destination::Disabled => Ok(()),
    }
}
