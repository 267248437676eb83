use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Where review documents come from. The corpus is a flat set of
/// independent JSON documents identified by filename.
pub trait DocumentStore {
    /// List available document filenames. Only JSON documents are listed.
    fn list(&self) -> Result<Vec<String>>;

    /// Read one document's raw contents.
    fn read(&self, name: &str) -> Result<String>;
}

/// Filesystem-backed store: one review document per `.json` file in a
/// single directory.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentStore for DirStore {
    /// A missing or unreadable directory is an empty corpus, not a failure.
    /// Names are sorted so enumeration order is deterministic.
    fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".json"))
            .collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path)
            .map_err(|e| Error::Store(format!("failed to read {}: {e}", path.display())))
    }
}
