use crate::project::filename::{random_basename, sanitize};
use crate::project::logging::{init_logging, LogOptions};
use crate::{FilesystemError, FsResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_appender::non_blocking::WorkerGuard;

/// Pre-created directory layout for a named scraping project
///
/// Construction derives a root directory from the sanitized project name,
/// eagerly creates the `data`, `logs`, `temp`, and `databases`
/// subdirectories, and exposes them as immutable paths for the rest of the
/// run. Creation is idempotent: scaffolding the same name twice succeeds and
/// yields identical paths. Nothing is ever deleted; cleanup belongs to the
/// caller.
///
/// # Example
///
/// ```no_run
/// use scrapkit::project::ProjectScaffold;
///
/// let scaffold = ProjectScaffold::create("app store scraper").unwrap();
/// assert!(scaffold.data_dir().is_dir());
/// ```
pub struct ProjectScaffold {
    name: String,
    root: PathBuf,
    data_dir: PathBuf,
    logs_dir: PathBuf,
    temp_dir: PathBuf,
    databases_dir: PathBuf,
    started: Instant,
    log_guard: Option<WorkerGuard>,
}

impl std::fmt::Debug for ProjectScaffold {
    // manual impl: the log writer guard has no Debug
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectScaffold")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("logging", &self.log_guard.is_some())
            .finish()
    }
}

impl ProjectScaffold {
    /// Creates a scaffold rooted in the current working directory
    pub fn create(name: &str) -> FsResult<Self> {
        let cwd = std::env::current_dir()?;
        Self::create_in(name, &cwd)
    }

    /// Creates a scaffold from a `[project]` config table
    pub fn from_config(config: &crate::config::ProjectConfig) -> FsResult<Self> {
        match &config.parent_dir {
            Some(dir) => Self::create_in(&config.name, Path::new(dir)),
            None => Self::create(&config.name),
        }
    }

    /// Creates a scaffold rooted in the given parent directory
    ///
    /// The project name is sanitized before any path is derived, so
    /// traversal sequences and separators in `name` cannot escape `parent`.
    /// Fails with [`FilesystemError::InvalidName`] when nothing survives
    /// sanitization, or [`FilesystemError::CreateDir`] when the filesystem
    /// refuses a directory.
    pub fn create_in(name: &str, parent: &Path) -> FsResult<Self> {
        let sanitized = sanitize(name);
        if sanitized.is_empty() {
            return Err(FilesystemError::InvalidName(name.to_string()));
        }

        let root = parent.join(&sanitized);
        let data_dir = root.join("data");
        let logs_dir = root.join("logs");
        let temp_dir = root.join("temp");
        let databases_dir = root.join("databases");

        for dir in [&root, &data_dir, &logs_dir, &temp_dir, &databases_dir] {
            std::fs::create_dir_all(dir).map_err(|source| FilesystemError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(Self {
            name: sanitized,
            root,
            data_dir,
            logs_dir,
            temp_dir,
            databases_dir,
            started: Instant::now(),
            log_guard: None,
        })
    }

    /// The sanitized project name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for scraped output data
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory for log files
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Directory for temporary working files
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Directory for local database instances and their backups
    pub fn databases_dir(&self) -> &Path {
        &self.databases_dir
    }

    /// Time elapsed since the scaffold was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Installs tracing with a file sink under the logs directory
    ///
    /// The scaffold holds the writer guard, so file logging stays alive
    /// exactly as long as the scaffold does.
    pub fn init_logging(&mut self, options: LogOptions) -> FsResult<()> {
        let log_file = self.log_file_path(options.dated, options.utc);
        let guard = init_logging(&log_file, &options)?;
        self.log_guard = Some(guard);
        tracing::debug!(log_file = %log_file.display(), "Project logging initialized");
        Ok(())
    }

    /// Derives the log file path, optionally prefixed with today's date
    pub fn log_file_path(&self, dated: bool, utc: bool) -> PathBuf {
        let file_name = if dated {
            let date = if utc {
                chrono::Utc::now().date_naive()
            } else {
                chrono::Local::now().date_naive()
            };
            format!("{}_{}.log", date.format("%Y-%m-%d"), self.name)
        } else {
            format!("{}.log", self.name)
        };
        self.logs_dir.join(file_name)
    }

    /// Derives a path inside the temp directory
    ///
    /// A missing `name` yields a random basename; a provided name is
    /// sanitized. The extension is used without its leading dot.
    pub fn temp_file_path(&self, name: Option<&str>, extension: &str) -> PathBuf {
        let base = match name {
            Some(n) => {
                let sanitized = sanitize(n.trim());
                if sanitized.is_empty() {
                    random_basename()
                } else {
                    sanitized
                }
            }
            None => random_basename(),
        };
        let ext = extension.trim().trim_start_matches('.');
        self.temp_dir.join(format!("{}.{}", base, ext))
    }

    /// Saves text content into the temp directory, returning the written path
    pub fn save_temp_text(
        &self,
        name: Option<&str>,
        extension: Option<&str>,
        content: &str,
    ) -> FsResult<PathBuf> {
        crate::output::save_text(&self.temp_dir, name, extension, content)
    }

    /// Saves a JSON-serializable value into the temp directory
    pub fn save_temp_json<T: Serialize>(&self, name: Option<&str>, value: &T) -> FsResult<PathBuf> {
        crate::output::save_json(&self.temp_dir, name, value)
    }
}
