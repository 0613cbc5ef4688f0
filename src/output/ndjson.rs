use crate::{FilesystemError, FsResult};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends records to a newline-delimited JSON file
///
/// Each [`append`](NdjsonWriter::append) serializes one record to a single
/// JSON line. The file is created on first append and opened in append mode
/// every time, so interleaved runs against the same path never clobber
/// earlier records.
///
/// # Example
///
/// ```no_run
/// use scrapkit::output::NdjsonWriter;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Listing { id: u64, title: String }
///
/// let writer = NdjsonWriter::new("data/listings.ndjson");
/// writer.append(&Listing { id: 1, title: "first".into() }).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NdjsonWriter {
    path: PathBuf,
}

impl NdjsonWriter {
    /// Creates a writer targeting `path`; nothing is opened until an append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The target file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a JSON line
    pub fn append<T: Serialize>(&self, record: &T) -> FsResult<()> {
        let line = serde_json::to_string(record)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| FilesystemError::Write {
                path: self.path.clone(),
                source,
            })?;

        writeln!(file, "{}", line).map_err(|source| FilesystemError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Appends every record in the iterator, stopping at the first failure
    pub fn append_all<T: Serialize>(
        &self,
        records: impl IntoIterator<Item = T>,
    ) -> FsResult<usize> {
        let mut written = 0;
        for record in records {
            self.append(&record)?;
            written += 1;
        }
        Ok(written)
    }
}
