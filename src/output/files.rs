use crate::project::{random_basename, sanitize};
use crate::{FilesystemError, FsResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Writes text content into `dir`, returning the written path
///
/// A missing `name` gets a random basename; a provided name is sanitized.
/// The extension defaults to `txt`.
pub fn save_text(
    dir: &Path,
    name: Option<&str>,
    extension: Option<&str>,
    content: &str,
) -> FsResult<PathBuf> {
    let path = target_path(dir, name, extension.unwrap_or("txt"));
    std::fs::write(&path, content).map_err(|source| FilesystemError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Writes a collection of lines joined with newlines into `dir`
pub fn save_lines<I, S>(dir: &Path, name: Option<&str>, lines: I) -> FsResult<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = lines
        .into_iter()
        .map(|line| line.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    save_text(dir, name, Some("txt"), &joined)
}

/// Writes a JSON-serializable value into `dir` as pretty-printed JSON
pub fn save_json<T: Serialize>(dir: &Path, name: Option<&str>, value: &T) -> FsResult<PathBuf> {
    let content = serde_json::to_string_pretty(value)?;
    let path = target_path(dir, name, "json");
    std::fs::write(&path, content).map_err(|source| FilesystemError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn target_path(dir: &Path, name: Option<&str>, extension: &str) -> PathBuf {
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
    dir.join(format!("{}.{}", base, ext))
}
