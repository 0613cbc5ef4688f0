//! Logging setup bound to a project's logs directory
//!
//! Installs a `tracing` subscriber with a console layer and a non-blocking
//! file layer. The returned [`WorkerGuard`] flushes the file writer when
//! dropped, so the caller (normally [`ProjectScaffold`]) must hold it for the
//! lifetime of the run.
//!
//! [`ProjectScaffold`]: crate::project::ProjectScaffold

use crate::{FilesystemError, FsResult};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Options for project logging
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Whether to also log to stderr
    pub console: bool,

    /// Minimum level for the console layer
    pub console_level: Level,

    /// Minimum level for the file layer
    pub file_level: Level,

    /// Include the date in the log file name
    pub dated: bool,

    /// Use the UTC date rather than the local date for dated file names
    pub utc: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            console: true,
            console_level: Level::INFO,
            file_level: Level::DEBUG,
            dated: false,
            utc: false,
        }
    }
}

/// Installs the global tracing subscriber with a file layer at `log_file`
///
/// The file is opened in append mode so repeated runs of the same project
/// accumulate into one log. If a global subscriber is already installed
/// (e.g. by the host application), the existing subscriber wins and only the
/// file guard is returned; the first initialization in a process is the one
/// that sticks.
pub fn init_logging(log_file: &Path, options: &LogOptions) -> FsResult<WorkerGuard> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| FilesystemError::Write {
            path: log_file.to_path_buf(),
            source,
        })?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(LevelFilter::from_level(options.file_level));

    let console_layer = options.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(LevelFilter::from_level(options.console_level))
    });

    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    Ok(guard)
}
