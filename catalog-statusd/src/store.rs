//! The status file: one JSON object mapping item id to its entry.
//!
//! Every change rewrites the whole file and every read loads the whole map.
//! There is no versioning and no locking; two writers racing on the file
//! clobber each other, last one wins. That limitation is accepted here.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A persisted status entry, with last-writer identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: String,
    pub updated_at: String,
    pub updated_by: String,
}

/// The GET payload form of an entry: metadata stripped.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusOnly {
    pub status: String,
}

pub type StatusMap = BTreeMap<String, StatusEntry>;

pub struct StatusFile {
    path: PathBuf,
}

impl StatusFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full-file read. A missing file is an empty map; malformed JSON is an
    /// error (surfaced as HTTP 500 by the caller).
    pub fn load(&self) -> Result<StatusMap> {
        if !self.path.exists() {
            return Ok(StatusMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read status file: {:?}", self.path))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse JSON from {:?}", self.path))
    }

    /// Lenient read used on the save path: a malformed file starts over as
    /// an empty map and is clobbered by the next write.
    fn load_lenient(&self) -> StatusMap {
        match self.load() {
            Ok(map) => map,
            Err(err) => {
                warn!("status file unreadable, starting over: {err:#}");
                StatusMap::new()
            }
        }
    }

    /// Applies one change and rewrites the whole file. A `None` status
    /// removes the entry. Returns the written entry, if any.
    pub fn apply(
        &self,
        item_id: &str,
        status: Option<&str>,
        updated_by: &str,
    ) -> Result<Option<StatusEntry>> {
        let mut map = self.load_lenient();

        let written = match status {
            None => {
                map.remove(item_id);
                None
            }
            Some(status) => {
                let entry = StatusEntry {
                    status: status.to_string(),
                    updated_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                    updated_by: updated_by.to_string(),
                };
                map.insert(item_id.to_string(), entry.clone());
                Some(entry)
            }
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write status file: {:?}", self.path))?;

        Ok(written)
    }

    /// The full map in GET payload form.
    pub fn statuses(&self) -> Result<BTreeMap<String, StatusOnly>> {
        Ok(self
            .load()?
            .into_iter()
            .map(|(id, entry)| {
                (
                    id,
                    StatusOnly {
                        status: entry.status,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn status_file(dir: &TempDir) -> StatusFile {
        StatusFile::new(dir.path().join("data").join("status-data.json"))
    }

    #[test]
    fn missing_file_loads_as_empty_map() {
        let dir = TempDir::new().unwrap();
        let file = status_file(&dir);
        assert!(file.load().unwrap().is_empty());
        assert!(file.statuses().unwrap().is_empty());
    }

    #[test]
    fn apply_writes_entry_with_writer_identity() {
        let dir = TempDir::new().unwrap();
        let file = status_file(&dir);

        let written = file
            .apply("item-1", Some("in-progress"), "127.0.0.1")
            .unwrap()
            .unwrap();
        assert_eq!(written.status, "in-progress");
        assert_eq!(written.updated_by, "127.0.0.1");

        let map = file.load().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["item-1"], written);

        let statuses = file.statuses().unwrap();
        assert_eq!(statuses["item-1"].status, "in-progress");
    }

    #[test]
    fn null_status_removes_the_entry() {
        let dir = TempDir::new().unwrap();
        let file = status_file(&dir);

        file.apply("item-1", Some("completed"), "10.0.0.1").unwrap();
        file.apply("item-2", Some("testing"), "10.0.0.1").unwrap();

        let written = file.apply("item-1", None, "10.0.0.1").unwrap();
        assert!(written.is_none());

        let map = file.load().unwrap();
        assert!(!map.contains_key("item-1"));
        assert!(map.contains_key("item-2"));
    }

    #[test]
    fn removing_an_unknown_id_still_rewrites_cleanly() {
        let dir = TempDir::new().unwrap();
        let file = status_file(&dir);
        assert!(file.apply("ghost", None, "10.0.0.1").unwrap().is_none());
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn repeated_writes_overwrite_the_entry() {
        let dir = TempDir::new().unwrap();
        let file = status_file(&dir);

        file.apply("item-1", Some("in-progress"), "a").unwrap();
        file.apply("item-1", Some("completed"), "b").unwrap();

        let map = file.load().unwrap();
        assert_eq!(map["item-1"].status, "completed");
        assert_eq!(map["item-1"].updated_by, "b");
    }

    #[test]
    fn malformed_file_errors_on_load_but_is_clobbered_on_save() {
        let dir = TempDir::new().unwrap();
        let file = status_file(&dir);
        fs::create_dir_all(file.path().parent().unwrap()).unwrap();
        fs::write(file.path(), "{not json").unwrap();

        assert!(file.load().is_err());
        assert!(file.statuses().is_err());

        // the save path starts over with an empty map
        file.apply("item-1", Some("on-hold"), "x").unwrap();
        let map = file.load().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["item-1"].status, "on-hold");
    }
}
