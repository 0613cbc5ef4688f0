//! Thin wrappers around a local database developer stack
//!
//! This module handles:
//! - Discovering the Supabase and psql CLIs on PATH
//! - Starting/stopping a per-project database instance and capturing its
//!   endpoints
//! - Listing tables, describing columns, and running SQL via psql
//! - One-shot and periodic timestamped backups
//!
//! Everything here shells out; there is no embedded driver and no state
//! beyond the endpoints captured at startup.

mod backup;
mod manager;
mod psql;
mod runner;

pub use backup::{backup, spawn_periodic_backup, BackupFiles, BackupHandle};
pub use manager::{DbEndpoints, DbManager};
pub use psql::{column_details, list_tables, run_sql};
pub use runner::{find_tool, require_tool, tool_available, CliOutput};
