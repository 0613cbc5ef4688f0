//! Database backups, one-shot and periodic
//!
//! A backup is three timestamped dumps — schema, roles, data — written into
//! a destination directory via the Supabase CLI. The periodic variant runs
//! on a tokio interval until shut down; an in-flight backup always finishes
//! before shutdown completes.

use crate::config::DbConfig;
use crate::db::manager::SUPABASE_HINT;
use crate::db::runner::{require_tool, run_cli};
use crate::DbResult;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const DUMP_TIMEOUT: Duration = Duration::from_secs(300);

/// Paths of one completed backup
#[derive(Debug, Clone)]
pub struct BackupFiles {
    pub schema: PathBuf,
    pub roles: PathBuf,
    pub data: PathBuf,
}

/// Dumps schema, roles, and data for `db_url` into `dest_dir`
///
/// The destination directory is created if missing; files are stamped with
/// the local time so successive backups never collide.
pub async fn backup(config: &DbConfig, db_url: &str, dest_dir: &Path) -> DbResult<BackupFiles> {
    let cli = require_tool(&config.supabase_cli, SUPABASE_HINT)?;

    std::fs::create_dir_all(dest_dir)?;
    let stamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();
    let files = backup_paths(dest_dir, &stamp);

    tracing::info!(dest = %dest_dir.display(), "Backing up database");

    let dumps: [(&Path, &[&str]); 3] = [
        (&files.schema, &[]),
        (&files.roles, &["--role-only"]),
        (&files.data, &["--data-only"]),
    ];
    for (path, extra_args) in dumps {
        let path_arg = path.to_string_lossy().to_string();
        let mut args = vec!["db", "dump", "--db-url", db_url, "-f", path_arg.as_str()];
        args.extend_from_slice(extra_args);

        let output = run_cli(&cli, &args, None, None, DUMP_TIMEOUT).await?;
        output.require_success()?;
    }

    tracing::info!("Backup completed");
    Ok(files)
}

fn backup_paths(dest_dir: &Path, stamp: &str) -> BackupFiles {
    BackupFiles {
        schema: dest_dir.join(format!("{}_schema.sql", stamp)),
        roles: dest_dir.join(format!("{}_roles.sql", stamp)),
        data: dest_dir.join(format!("{}_data.sql", stamp)),
    }
}

/// Handle for a running periodic-backup task
#[derive(Debug)]
pub struct BackupHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl BackupHandle {
    /// Signals the task to stop and waits for an in-flight backup to finish
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// Spawns a task that backs up `db_url` every `interval`
///
/// The first backup runs after one full interval, not immediately. A failed
/// backup is logged and the schedule keeps going.
pub fn spawn_periodic_backup(
    config: DbConfig,
    db_url: String,
    dest_dir: PathBuf,
    interval: Duration,
) -> BackupHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick completes immediately; consume it
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(error) = backup(&config, &db_url, &dest_dir).await {
                        tracing::error!(
                            error = %crate::format_error(&error),
                            "Periodic backup failed"
                        );
                    }
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    BackupHandle {
        stop: stop_tx,
        task,
    }
}
