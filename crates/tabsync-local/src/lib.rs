//! Directory-backed document.
//!
//! Each tab is one `<name>.json` file in the directory: a JSON array of
//! row objects in row order. `save_records` fully overwrites the file;
//! `read_tab` deserializes the same format back into a table, preserving
//! column order (from the records' own key order), row order, and the
//! numeric/string distinction JSON itself maintains.

use std::fs;
use std::path::{Path, PathBuf};

use tabsync_core::{Record, Result, TabDocument, TabError, Table};
use tracing::debug;

const TAB_EXTENSION: &str = "json";

/// A document over an existing local directory.
#[derive(Debug)]
pub struct DirectoryDocument {
    root: PathBuf,
}

impl DirectoryDocument {
    /// Opens a directory as a document.
    ///
    /// The directory must already exist; a missing or non-directory path
    /// fails construction, so an eager handle never wraps a dangling root.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(TabError::Backend(format!(
                "'{}' is not an existing directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tab_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, TAB_EXTENSION))
    }
}

impl TabDocument for DirectoryDocument {
    fn backend_name(&self) -> &'static str {
        "directory"
    }

    fn tab_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(TAB_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_tab(&self, name: &str) -> Result<Table> {
        let path = self.tab_path(name);
        let contents = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TabError::NotFound {
                    name: name.to_string(),
                    backend: "directory",
                }
            } else {
                TabError::Io(e)
            }
        })?;
        let records: Vec<Record> = serde_json::from_str(&contents)?;
        debug!(tab = name, rows = records.len(), "read records file");
        Table::from_records(&records)
    }

    fn save_records(&self, name: &str, records: &[Record]) -> Result<()> {
        let path = self.tab_path(name);
        let contents = serde_json::to_string_pretty(records)?;
        fs::write(&path, contents)?;
        debug!(
            tab = name,
            rows = records.len(),
            path = %path.display(),
            "saved records file"
        );
        Ok(())
    }
}
