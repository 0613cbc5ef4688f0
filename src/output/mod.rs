//! Output helpers for scraped data
//!
//! This module handles:
//! - Appending records to newline-delimited JSON files
//! - Saving text, line collections, and JSON values with sanitized or
//!   randomly generated file names

mod files;
mod ndjson;

pub use files::{save_json, save_lines, save_text};
pub use ndjson::NdjsonWriter;
