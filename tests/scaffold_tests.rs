//! Integration tests for project scaffolding and output helpers

use scrapkit::config::{load_config, Config};
use scrapkit::output::NdjsonWriter;
use scrapkit::project::ProjectScaffold;
use scrapkit::FilesystemError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[derive(Debug, Serialize, Deserialize)]
struct Listing {
    id: u64,
    title: String,
}

#[test]
fn test_scaffold_twice_yields_identical_paths() {
    let parent = TempDir::new().unwrap();

    let first = ProjectScaffold::create_in("price watcher", parent.path()).unwrap();
    // Drop nothing, create again with the same name
    let second = ProjectScaffold::create_in("price watcher", parent.path()).unwrap();

    assert_eq!(first.root(), second.root());
    assert_eq!(first.data_dir(), second.data_dir());
    assert_eq!(first.logs_dir(), second.logs_dir());
    assert_eq!(first.temp_dir(), second.temp_dir());
    assert_eq!(first.databases_dir(), second.databases_dir());
    assert!(second.root().is_dir());
}

#[test]
fn test_unsafe_name_never_escapes_parent() {
    let parent = TempDir::new().unwrap();

    let scaffold = ProjectScaffold::create_in("../../../tmp/escape", parent.path()).unwrap();
    assert!(scaffold.root().starts_with(parent.path()));

    // A name with nothing usable fails rather than scaffolding a stray root
    let result = ProjectScaffold::create_in("../..", parent.path());
    assert!(matches!(result, Err(FilesystemError::InvalidName(_))));
}

#[test]
fn test_temp_saving_and_ndjson_roundtrip() {
    let parent = TempDir::new().unwrap();
    let scaffold = ProjectScaffold::create_in("collector", parent.path()).unwrap();

    let text_path = scaffold
        .save_temp_text(Some("raw page"), Some("html"), "<html></html>")
        .unwrap();
    assert!(text_path.starts_with(scaffold.temp_dir()));
    assert_eq!(
        std::fs::read_to_string(&text_path).unwrap(),
        "<html></html>"
    );

    let json_path = scaffold
        .save_temp_json(Some("cookies"), &serde_json::json!({"session": "abc"}))
        .unwrap();
    assert!(json_path.to_string_lossy().ends_with("cookies.json"));

    let writer = NdjsonWriter::new(scaffold.data_dir().join("listings.ndjson"));
    writer
        .append(&Listing {
            id: 1,
            title: "one".to_string(),
        })
        .unwrap();
    writer
        .append(&Listing {
            id: 2,
            title: "two".to_string(),
        })
        .unwrap();

    let content = std::fs::read_to_string(writer.path()).unwrap();
    let listings: Vec<Listing> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[1].title, "two");
}

#[test]
fn test_config_drives_scaffold() {
    let parent = TempDir::new().unwrap();

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "[project]\nname = \"configured run\"\nparent-dir = \"{}\"\n",
        parent.path().display()
    )
    .unwrap();
    file.flush().unwrap();

    let config: Config = load_config(file.path()).unwrap();
    let project = config.project.expect("project table present");
    let scaffold = ProjectScaffold::from_config(&project).unwrap();

    assert_eq!(scaffold.name(), "configured_run");
    assert!(scaffold.root().starts_with(parent.path()));
    assert!(scaffold.logs_dir().is_dir());
}

#[test]
fn test_logging_writes_into_logs_dir() {
    let parent = TempDir::new().unwrap();
    let mut scaffold = ProjectScaffold::create_in("logged run", parent.path()).unwrap();

    scaffold
        .init_logging(scrapkit::project::LogOptions {
            console: false,
            ..Default::default()
        })
        .unwrap();
    tracing::info!("scrape starting");

    let log_file = scaffold.log_file_path(false, false);
    assert!(log_file.exists());
}
