//! Project scaffolding and run utilities
//!
//! This module handles:
//! - Deriving and eagerly creating a project's directory layout
//! - Binding a tracing log file to the project's logs directory
//! - File name sanitization and random id generation
//! - Elapsed-time measurement for scrape runs

mod filename;
mod logging;
mod scaffold;
mod stopwatch;

pub use filename::{random_basename, random_id, sanitize, sanitize_unique};
pub use logging::{init_logging, LogOptions};
pub use scaffold::ProjectScaffold;
pub use stopwatch::Stopwatch;
